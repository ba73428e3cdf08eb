use std::borrow::Cow;

use super::{DiagnosticLog, ShaderObject, ShaderOptions, ShaderStage};

/// Link status of a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LinkStatus {
    Linked,
    Failed,
}

/// A vertex/fragment pair that went through the interface checks.
///
/// Holds the shader objects until the GPU program is built from them.
#[derive(Debug)]
pub struct LinkedStages {
    status: LinkStatus,
    log: DiagnosticLog,
    vertex: ShaderObject,
    fragment: ShaderObject,
}

impl LinkedStages {
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn is_linked(&self) -> bool {
        self.status == LinkStatus::Linked
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }
}

/// Checks that `vertex` and `fragment` form a complete, consistent program
/// fed by a vertex buffer with `attributes`.
///
/// Linking is attempted even when a stage failed to compile; that is
/// reported like any other link failure.
pub fn link_stages(
    vertex: ShaderObject,
    fragment: ShaderObject,
    attributes: &[wgpu::VertexAttribute],
    log_limit: usize,
) -> LinkedStages {
    let mut log = DiagnosticLog::with_limit(log_limit);

    check_slot(&mut log, &vertex, ShaderStage::Vertex);
    check_slot(&mut log, &fragment, ShaderStage::Fragment);

    if log.is_empty() {
        if let (Some(vs), Some(fs)) = (vertex.entry(), fragment.entry()) {
            check_vertex_inputs(&mut log, vs, attributes);
            check_interface(&mut log, vs, fs);
        }
    }

    let status = if log.is_empty() {
        LinkStatus::Linked
    } else {
        LinkStatus::Failed
    };

    LinkedStages {
        status,
        log,
        vertex,
        fragment,
    }
}

fn check_slot(log: &mut DiagnosticLog, obj: &ShaderObject, expected: ShaderStage) {
    if obj.stage() != expected {
        log.push(&format!(
            "error: {expected} slot holds a {} shader object",
            obj.stage()
        ));
    } else if !obj.is_compiled() {
        log.push(&format!("error: {expected} shader object is not compiled"));
    }
}

/// Shader input/output slot.
#[derive(Debug, Clone, PartialEq)]
enum Varying {
    Position,
    Location { location: u32, ty: naga::TypeInner },
}

fn collect_varyings(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(Varying::Location {
            location: *location,
            ty: module.types[ty].inner.clone(),
        }),
        Some(naga::Binding::BuiltIn(naga::BuiltIn::Position { .. })) => out.push(Varying::Position),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_varyings(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn outputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(result) = ep.function.result.as_ref() {
        collect_varyings(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn inputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect_varyings(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

/// Scalar a vertex attribute format arrives as in the shader.
fn attribute_scalar(format: wgpu::VertexFormat) -> naga::Scalar {
    use wgpu::VertexFormat as F;

    match format {
        F::Uint8 | F::Uint8x2 | F::Uint8x4 | F::Uint16 | F::Uint16x2 | F::Uint16x4 | F::Uint32
        | F::Uint32x2 | F::Uint32x3 | F::Uint32x4 => naga::Scalar::U32,
        F::Sint8 | F::Sint8x2 | F::Sint8x4 | F::Sint16 | F::Sint16x2 | F::Sint16x4 | F::Sint32
        | F::Sint32x2 | F::Sint32x3 | F::Sint32x4 => naga::Scalar::I32,
        F::Float64 | F::Float64x2 | F::Float64x3 | F::Float64x4 => naga::Scalar::F64,
        _ => naga::Scalar::F32,
    }
}

fn check_vertex_inputs(
    log: &mut DiagnosticLog,
    (module, ep): (&naga::Module, &naga::EntryPoint),
    attributes: &[wgpu::VertexAttribute],
) {
    for input in inputs(module, ep) {
        let Varying::Location { location, ty } = input else { continue };

        let Some(attr) = attributes.iter().find(|a| a.shader_location == location) else {
            log.push(&format!(
                "error: vertex input at location {location} has no attribute in the vertex layout"
            ));
            continue;
        };

        let scalar = match &ty {
            naga::TypeInner::Scalar(s) | naga::TypeInner::Vector { scalar: s, .. } => Some(*s),
            _ => None,
        };
        if scalar != Some(attribute_scalar(attr.format)) {
            log.push(&format!(
                "error: vertex input at location {location} is {ty:?} but the vertex layout supplies {:?}",
                attr.format
            ));
        }
    }
}

fn check_interface(
    log: &mut DiagnosticLog,
    (vs_module, vs_ep): (&naga::Module, &naga::EntryPoint),
    (fs_module, fs_ep): (&naga::Module, &naga::EntryPoint),
) {
    let vs_out = outputs(vs_module, vs_ep);

    if !vs_out.contains(&Varying::Position) {
        log.push("error: vertex stage does not write @builtin(position)");
    }

    for input in inputs(fs_module, fs_ep) {
        let Varying::Location { location, ty } = input else { continue };

        let written = vs_out.iter().find_map(|v| match v {
            Varying::Location { location: l, ty } if *l == location => Some(ty),
            _ => None,
        });

        match written {
            None => log.push(&format!(
                "error: fragment input at location {location} is not written by the vertex stage"
            )),
            Some(vs_ty) if *vs_ty != ty => log.push(&format!(
                "error: fragment input at location {location} is {ty:?} but the vertex stage writes {vs_ty:?}"
            )),
            Some(_) => {}
        }
    }

    let writes_color = outputs(fs_module, fs_ep)
        .iter()
        .any(|v| matches!(v, Varying::Location { location: 0, .. }));
    if !writes_color {
        log.push("error: fragment stage writes no color output at location 0");
    }
}

/// What a program is linked against: the device, the color target it renders
/// into and the vertex buffer layout it reads from.
pub struct ProgramTarget<'a> {
    pub device: &'a wgpu::Device,
    pub color_format: wgpu::TextureFormat,
    pub vertex_layout: wgpu::VertexBufferLayout<'a>,
}

/// Linked GPU program: one vertex and one fragment stage in a render pipeline.
///
/// A failed link still produces a `Program`; it has a diagnostic log and no
/// pipeline, and draws issued with it are no-ops.
#[derive(Debug)]
pub struct Program {
    status: LinkStatus,
    log: DiagnosticLog,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl Program {
    /// Links `vertex` and `fragment` and builds the GPU pipeline.
    ///
    /// The shader objects are consumed: they are released once the pipeline
    /// exists (or once linking has failed).
    pub fn link(
        target: &ProgramTarget<'_>,
        vertex: ShaderObject,
        fragment: ShaderObject,
        options: &ShaderOptions,
    ) -> Self {
        let stages = link_stages(
            vertex,
            fragment,
            target.vertex_layout.attributes,
            options.log_limit,
        );
        Self::build(target, stages)
    }

    /// Builds the GPU pipeline for stages that already went through [`link_stages`].
    pub fn build(target: &ProgramTarget<'_>, stages: LinkedStages) -> Self {
        let LinkedStages {
            status,
            log,
            vertex,
            fragment,
        } = stages;

        if status == LinkStatus::Failed {
            log::error!("shader program failed to link\n{log}");
            return Self::unusable(log);
        }

        let (Some(vs_entry), Some(fs_entry)) = (vertex.entry_point(), fragment.entry_point())
        else {
            return Self::unusable(log);
        };

        let device = target.device;

        // Anything the checks above miss surfaces here instead of in the
        // device's uncaptured-error handler.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("soup vertex shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(vertex.source())),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("soup fragment shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(fragment.source())),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("soup program layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("soup program"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(vs_entry),
                compilation_options: Default::default(),
                buffers: std::slice::from_ref(&target.vertex_layout),
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(fs_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let rejected = pollster::block_on(scope.pop());

        // The pipeline keeps what it needs; the stage objects go now.
        drop(vertex);
        drop(fragment);

        if let Some(err) = rejected {
            let mut log = log;
            log.push(&format!("error: {err}"));
            log::error!("shader program failed to link\n{log}");
            return Self::unusable(log);
        }

        log::debug!("shader program linked");

        Self {
            status,
            log,
            pipeline: Some(pipeline),
        }
    }

    /// A program that failed to link.
    pub fn unusable(log: DiagnosticLog) -> Self {
        Self {
            status: LinkStatus::Failed,
            log,
            pipeline: None,
        }
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// True when the program has a pipeline that can be bound.
    pub fn is_usable(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        self.pipeline.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VertexAttributeState;
    use crate::shader::DEFAULT_LOG_LIMIT;

    const VERTEX: &str = r"
        @vertex
        fn vs_main(@location(0) a_pos: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(a_pos, 1.0);
        }
    ";

    const FRAGMENT: &str = r"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 1.0, 0.0, 1.0);
        }
    ";

    const VERTEX_WITH_COLOR: &str = r"
        struct VsOut {
            @builtin(position) pos: vec4<f32>,
            @location(0) color: vec3<f32>,
        }

        @vertex
        fn vs_main(@location(0) a_pos: vec3<f32>) -> VsOut {
            var out: VsOut;
            out.pos = vec4<f32>(a_pos, 1.0);
            out.color = a_pos;
            return out;
        }
    ";

    const FRAGMENT_VEC3_INPUT: &str = r"
        @fragment
        fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(color, 1.0);
        }
    ";

    fn vs(src: &str) -> ShaderObject {
        ShaderObject::compile(ShaderStage::Vertex, src)
    }

    fn fs(src: &str) -> ShaderObject {
        ShaderObject::compile(ShaderStage::Fragment, src)
    }

    fn link(v: ShaderObject, f: ShaderObject) -> LinkedStages {
        link_stages(v, f, VertexAttributeState.attributes(), DEFAULT_LOG_LIMIT)
    }

    // ── success ───────────────────────────────────────────────────────────

    #[test]
    fn valid_pair_links_without_diagnostics() {
        let linked = link(vs(VERTEX), fs(FRAGMENT));
        assert_eq!(linked.status(), LinkStatus::Linked);
        assert!(linked.log().is_empty());
    }

    #[test]
    fn matching_varyings_link() {
        let linked = link(vs(VERTEX_WITH_COLOR), fs(FRAGMENT_VEC3_INPUT));
        assert!(linked.is_linked(), "{}", linked.log());
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn uncompiled_stage_fails_link() {
        let linked = link(vs("@vertex fn vs_main( {"), fs(FRAGMENT));
        assert_eq!(linked.status(), LinkStatus::Failed);
        assert!(linked.log().as_str().contains("vertex shader object is not compiled"));
    }

    #[test]
    fn swapped_stages_fail_link() {
        let linked = link(fs(FRAGMENT), vs(VERTEX));
        assert!(!linked.is_linked());
        assert!(linked.log().as_str().contains("vertex slot holds a fragment shader object"));
        assert!(linked.log().as_str().contains("fragment slot holds a vertex shader object"));
    }

    #[test]
    fn unwritten_fragment_input_fails_link() {
        let linked = link(vs(VERTEX), fs(FRAGMENT_VEC3_INPUT));
        assert!(!linked.is_linked());
        assert!(linked.log().as_str().contains("location 0 is not written"));
    }

    #[test]
    fn vertex_input_without_attribute_fails_link() {
        let vert = r"
            @vertex
            fn vs_main(@location(3) a: vec4<i32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(a);
            }
        ";
        let linked = link(vs(vert), fs(FRAGMENT));
        assert!(!linked.is_linked());
        assert!(linked
            .log()
            .as_str()
            .contains("vertex input at location 3 has no attribute"));
    }

    #[test]
    fn vertex_input_of_wrong_kind_fails_link() {
        let vert = r"
            @vertex
            fn vs_main(@location(0) a: vec3<i32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(vec3<f32>(a), 1.0);
            }
        ";
        let linked = link(vs(vert), fs(FRAGMENT));
        assert!(!linked.is_linked());
        assert!(linked.log().as_str().contains("vertex layout supplies Float32x3"));
    }

    #[test]
    fn attribute_formats_map_to_shader_scalars() {
        assert_eq!(attribute_scalar(wgpu::VertexFormat::Float32x3), naga::Scalar::F32);
        assert_eq!(attribute_scalar(wgpu::VertexFormat::Unorm8x4), naga::Scalar::F32);
        assert_eq!(attribute_scalar(wgpu::VertexFormat::Sint32x2), naga::Scalar::I32);
        assert_eq!(attribute_scalar(wgpu::VertexFormat::Uint16x2), naga::Scalar::U32);
        assert_eq!(attribute_scalar(wgpu::VertexFormat::Float64), naga::Scalar::F64);
    }

    #[test]
    fn mismatched_varying_type_fails_link() {
        let frag = r"
            @fragment
            fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
                return color;
            }
        ";
        let linked = link(vs(VERTEX_WITH_COLOR), fs(frag));
        assert!(!linked.is_linked());
        assert!(linked.log().as_str().contains("fragment input at location 0 is"));
    }

    #[test]
    fn missing_color_output_fails_link() {
        let frag = r"
            @fragment
            fn fs_main() -> @location(1) vec4<f32> {
                return vec4<f32>(1.0);
            }
        ";
        let linked = link(vs(VERTEX), fs(frag));
        assert!(!linked.is_linked());
        assert!(linked.log().as_str().contains("no color output at location 0"));
    }

    #[test]
    fn unusable_program_has_no_pipeline() {
        let mut log = DiagnosticLog::default();
        log.push("error: link failed");
        let program = Program::unusable(log);
        assert_eq!(program.status(), LinkStatus::Failed);
        assert!(!program.is_usable());
        assert!(program.pipeline().is_none());
        assert!(!program.log().is_empty());
    }
}
