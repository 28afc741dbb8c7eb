//! Third-person follow camera.

use engine_core::{heading_forward, Mat4, Vec3};

use crate::state::VehicleState;
use crate::tuning::CameraTuning;

/// Trailing camera that eases toward a speed-dependent point behind the vehicle.
///
/// Reads the vehicle, never writes it. The only history it keeps is last
/// frame's smoothed position and look-at target.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub tuning: CameraTuning,
    position: Vec3,
    look_at: Vec3,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

/// Fraction of the remaining gap to close this frame for a convergence `rate`.
#[inline]
fn smoothing(rate: f32, delta: f32) -> f32 {
    1.0 - (-rate.max(0.0) * delta).exp()
}

impl FollowCamera {
    /// Create a camera already settled behind the vehicle.
    pub fn new(tuning: CameraTuning, vehicle: &VehicleState) -> Self {
        let mut camera = Self {
            tuning,
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            aspect: 16.0 / 9.0,
        };
        camera.snap(vehicle);
        camera
    }

    /// Where the camera wants to be for the vehicle's current pose and speed.
    pub fn ideal_position(&self, vehicle: &VehicleState) -> Vec3 {
        let speed = vehicle.speed();
        let distance = self.tuning.base_distance + self.tuning.distance_per_speed * speed;
        let height = self.tuning.base_height + self.tuning.height_per_speed * speed;
        vehicle.position() - heading_forward(vehicle.heading()) * distance + Vec3::Y * height
    }

    pub fn ideal_look_at(&self, vehicle: &VehicleState) -> Vec3 {
        vehicle.position() + Vec3::Y * self.tuning.look_height
    }

    /// Ease toward the ideal transform. The look-at converges faster than the position.
    pub fn update(&mut self, vehicle: &VehicleState, delta: f32) {
        let ideal = self.ideal_position(vehicle);
        let target = self.ideal_look_at(vehicle);
        self.position = self
            .position
            .lerp(ideal, smoothing(self.tuning.position_rate, delta));
        self.look_at = self
            .look_at
            .lerp(target, smoothing(self.tuning.look_rate, delta));
    }

    /// Drop all smoothing history and jump straight to the ideal transform.
    pub fn snap(&mut self, vehicle: &VehicleState) {
        self.position = self.ideal_position(vehicle);
        self.look_at = self.ideal_look_at(vehicle);
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.tuning.fov_degrees.to_radians(),
            self.aspect,
            self.tuning.near,
            self.tuning.far,
        )
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
