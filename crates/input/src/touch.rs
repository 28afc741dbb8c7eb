//! On-screen twin-stick touch controls.
//!
//! Left stick X steers; right stick Y drives forward/back and a hard sideways
//! push on the right stick boosts.

use engine_core::ControlSnapshot;
use glam::Vec2;
use winit::event::TouchPhase;

/// Stick deflection below this is ignored.
pub const DEAD_ZONE: f32 = 0.25;
/// Sideways deflection of the right stick beyond this engages boost.
pub const BOOST_THRESHOLD: f32 = 0.7;

/// A circular on-screen joystick tracking at most one finger.
#[derive(Debug, Clone)]
pub struct VirtualJoystick {
    /// Centre of the stick base in window coordinates.
    pub center: Vec2,
    /// Radius of the stick base in pixels.
    pub radius: f32,
    touch_id: Option<u64>,
    axis: Vec2,
}

impl VirtualJoystick {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(1.0),
            touch_id: None,
            axis: Vec2::ZERO,
        }
    }

    /// Normalised deflection; each component in `[-1, 1]`, +Y is down-screen.
    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    pub fn is_active(&self) -> bool {
        self.touch_id.is_some()
    }

    fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
    }

    /// Deflection for a touch point, clamped to the edge of the base.
    fn deflection(&self, point: Vec2) -> Vec2 {
        let offset = (point - self.center) / self.radius;
        if offset.length() > 1.0 {
            offset.normalize()
        } else {
            offset
        }
    }

    /// Feed a touch event. Returns true if this stick consumed it.
    pub fn handle(&mut self, id: u64, phase: TouchPhase, point: Vec2) -> bool {
        match phase {
            TouchPhase::Started => {
                if self.touch_id.is_none() && self.contains(point) {
                    self.touch_id = Some(id);
                    self.axis = self.deflection(point);
                    return true;
                }
                false
            }
            TouchPhase::Moved => {
                if self.touch_id == Some(id) {
                    self.axis = self.deflection(point);
                    return true;
                }
                false
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.touch_id == Some(id) {
                    self.release();
                    return true;
                }
                false
            }
        }
    }

    /// Let go of the stick and recentre it.
    pub fn release(&mut self) {
        self.touch_id = None;
        self.axis = Vec2::ZERO;
    }
}

/// The pair of touch sticks.
#[derive(Debug, Clone)]
pub struct TouchControls {
    pub steer: VirtualJoystick,
    pub throttle: VirtualJoystick,
}

impl TouchControls {
    /// Lay out the sticks in the bottom corners of a window.
    pub fn for_window(width: f32, height: f32) -> Self {
        let radius = (width.min(height) * 0.12).max(40.0);
        let margin = radius * 1.5;
        Self {
            steer: VirtualJoystick::new(Vec2::new(margin, height - margin), radius),
            throttle: VirtualJoystick::new(Vec2::new(width - margin, height - margin), radius),
        }
    }

    pub fn process_touch(&mut self, id: u64, phase: TouchPhase, point: Vec2) {
        if !self.steer.handle(id, phase, point) {
            self.throttle.handle(id, phase, point);
        }
    }

    pub fn release_all(&mut self) {
        self.steer.release();
        self.throttle.release();
    }

    /// Drive controls implied by the current stick deflections.
    pub fn snapshot(&self) -> ControlSnapshot {
        let steer = self.steer.axis();
        let throttle = self.throttle.axis();
        ControlSnapshot {
            forward: throttle.y < -DEAD_ZONE,
            backward: throttle.y > DEAD_ZONE,
            left: steer.x < -DEAD_ZONE,
            right: steer.x > DEAD_ZONE,
            boost: throttle.x.abs() > BOOST_THRESHOLD,
        }
    }
}
