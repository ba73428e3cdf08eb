use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, StartCtx};
use crate::device::{Gpu, GpuInit};
use crate::error::{RunError, StartupError};
use crate::input::platform::translate_window_event;
use crate::input::InputState;
use crate::render::{Color, LoopState, RenderLoop, Viewport};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Color every frame is cleared to.
    pub clear_color: Color,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "soup".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            clear_color: Color::MAGENTA,
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Creates the window and graphics context, runs `app` until close is
    /// requested, then releases everything.
    ///
    /// Startup failures are returned as [`RunError::Startup`] without a single
    /// frame having been rendered.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<(), RunError>
    where
        A: 'static + App,
    {
        let event_loop =
            EventLoop::new().map_err(|e| StartupError::Window(e.to_string()))?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop.run_app(&mut state)?;

        match state.failure.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: InputState,
    viewport: Viewport,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    render_loop: RenderLoop,
    window: Option<WindowEntry>,
    failure: Option<StartupError>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            render_loop: RenderLoop::new(),
            window: None,
            failure: None,
        }
    }

    /// Window, graphics context, then application setup, in that order.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry, StartupError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| StartupError::Window(e.to_string()))?;

        let size = window.inner_size();
        log::info!("window created: {}x{} \"{}\"", size.width, size.height, self.config.title);

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input: InputState::default(),
            viewport: Viewport::covering(size.width, size.height),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .map_err(|e| StartupError::graphics(&e))?;

        let app = &mut self.app;
        entry.with(|fields| {
            app.on_start(&mut StartCtx {
                window: fields.window,
                gpu: fields.gpu,
            })
        })?;

        Ok(entry)
    }

    /// Moves the loop to `Closing` and releases the context and window.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.render_loop.request_close();
        if self.window.take().is_some() {
            log::info!("window closed after {} frames", self.render_loop.frames());
        }
        event_loop.exit();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };

        entry.with_mut(|fields| {
            *fields.viewport = Viewport::covering(new_size.width, new_size.height);
            fields.gpu.resize(new_size);
            fields.window.request_redraw();
        });
        log::debug!("viewport set to 0,0 {}x{}", new_size.width, new_size.height);
    }

    /// One render loop iteration.
    fn iterate(&mut self, event_loop: &ActiveEventLoop) {
        let clear = self.config.clear_color;
        let (app, render_loop, Some(entry)) =
            (&mut self.app, &mut self.render_loop, self.window.as_mut())
        else {
            return;
        };

        let control = entry.with_mut(|fields| {
            if render_loop.process_input(fields.input) != LoopState::Running {
                return AppControl::Exit;
            }

            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                input: fields.input,
                viewport: *fields.viewport,
                clear,
                render_loop,
            };

            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            self.close(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_loop.state() != LoopState::Starting {
            return;
        }

        match self.start(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
                self.render_loop.start();
            }
            Err(err) => {
                self.render_loop.fail(&err);
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match self.render_loop.state() {
            LoopState::Running => {}
            LoopState::Starting => return,
            LoopState::Closing | LoopState::Failed => {
                event_loop.exit();
                return;
            }
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one iteration per event-loop turn.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match self.render_loop.state() {
            LoopState::Running => {}
            LoopState::Starting => return,
            LoopState::Closing | LoopState::Failed => {
                event_loop.exit();
                return;
            }
        }

        if let (Some(ev), Some(entry)) = (translate_window_event(&event), self.window.as_mut()) {
            entry.with_input_mut(|input| input.apply_event(&ev));
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = self
                    .window
                    .as_ref()
                    .map(|entry| entry.with_window(|w| w.inner_size()));
                if let Some(new_size) = new_size {
                    self.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => self.iterate(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Context before window: the entry drops `gpu` ahead of the window it borrows.
        self.window.take();
    }
}
