//! Input handling: keyboard state and touch joysticks, collapsed into a
//! per-frame [`ControlSnapshot`].

pub mod touch;

pub use touch::{TouchControls, VirtualJoystick};

use engine_core::ControlSnapshot;
use std::collections::HashSet;

/// Keys bound to each drive control. A control is held if any of its keys is.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Vec<KeyCode>,
    pub backward: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub boost: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            backward: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            boost: vec![KeyCode::ShiftLeft, KeyCode::ShiftRight],
        }
    }
}

/// Manages keyboard state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
    bindings: KeyBindings,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Drop every held key. Called when the window loses focus so a key whose
    /// release event never arrives cannot keep the vehicle driving.
    pub fn release_all(&mut self) {
        if !self.keys_held.is_empty() {
            log::debug!("Releasing {} held keys", self.keys_held.len());
        }
        self.keys_released.extend(self.keys_held.drain());
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_held.contains(k))
    }

    /// Drive controls as currently held.
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            forward: self.any_held(&self.bindings.forward),
            backward: self.any_held(&self.bindings.backward),
            left: self.any_held(&self.bindings.left),
            right: self.any_held(&self.bindings.right),
            boost: self.any_held(&self.bindings.boost),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_both_drive() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        let snap = input.snapshot();
        assert!(snap.forward && snap.left);
        assert!(!snap.backward && !snap.right && !snap.boost);
    }

    #[test]
    fn pressed_is_per_frame_but_held_persists() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyW));
        input.begin_frame();
        assert!(!input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_held(KeyCode::KeyW));
        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert!(input.is_key_released(KeyCode::KeyW));
        assert!(input.snapshot().is_neutral());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        input.release_all();
        assert!(input.snapshot().is_neutral());
        assert!(input.is_key_released(KeyCode::ShiftLeft));
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let bindings = KeyBindings {
            forward: vec![KeyCode::KeyI],
            ..KeyBindings::default()
        };
        let mut input = InputState::with_bindings(bindings);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(!input.snapshot().forward);
        input.process_keyboard(KeyCode::KeyI, ElementState::Pressed);
        assert!(input.snapshot().forward);
    }
}
