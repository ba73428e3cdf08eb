use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Current input state for the window.
///
/// Polled once per loop iteration, the way a GL program asks for the state of
/// a key rather than reacting to the press event.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release events are not delivered to an unfocused window.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        log::trace!("key down: {key}");
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn press_then_release() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::Escape, KeyState::Pressed));
        assert!(input.key_down(Key::Escape));

        input.apply_event(&key(Key::Escape, KeyState::Released));
        assert!(!input.key_down(Key::Escape));
    }

    #[test]
    fn repeat_keeps_key_down() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::Other(42), KeyState::Pressed));
        input.apply_event(&InputEvent::Key {
            key: Key::Other(42),
            state: KeyState::Pressed,
            repeat: true,
        });
        assert!(input.key_down(Key::Other(42)));
        assert_eq!(input.keys_down.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut input = InputState::default();
        input.apply_event(&InputEvent::Focused(true));
        input.apply_event(&key(Key::Escape, KeyState::Pressed));

        input.apply_event(&InputEvent::Focused(false));
        assert!(!input.focused);
        assert!(!input.key_down(Key::Escape));
    }
}
