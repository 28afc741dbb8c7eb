//! Window event handling.

use glam::Vec2;
use input::TouchControls;
use winit::event::WindowEvent;

use crate::GameState;

impl GameState {
    /// Returns true when the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.sim.camera_mut().set_aspect(size.width, size.height);
                self.touch = TouchControls::for_window(size.width as f32, size.height as f32);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                false
            }
            WindowEvent::Touch(touch) => {
                let point = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.touch.process_touch(touch.id, touch.phase, point);
                false
            }
            WindowEvent::Focused(false) => {
                // Release events for held keys will never arrive.
                self.input.release_all();
                self.touch.release_all();
                self.sim.release_controls();
                false
            }
            WindowEvent::Focused(true) => {
                self.time.resync();
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.window.request_redraw();
                !self.running
            }
            _ => false,
        }
    }
}
