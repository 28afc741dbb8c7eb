//! Tunable constants. Loaded as part of the game config; every field has a default.

use serde::{Deserialize, Serialize};

/// Drive and resource constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Top forward speed (units/s).
    pub max_velocity: f32,
    /// Reverse top speed as a fraction of `max_velocity`.
    pub reverse_max_velocity_factor: f32,
    /// Rate (units/s²) used when the target is above the current velocity.
    pub acceleration: f32,
    /// Rate (units/s²) used when the target is below the current velocity.
    pub deceleration: f32,
    /// Full-rate yaw speed (rad/s).
    pub turn_speed: f32,
    /// Coast-down velocity multiplier per 60 Hz frame.
    pub friction_coefficient: f32,
    /// Energy per second while accelerating or reversing.
    pub drive_energy_rate: f32,
    /// Energy per second while steering a moving vehicle.
    pub turn_energy_rate: f32,
    /// Energy regained per second while nearly stationary.
    pub energy_regen_rate: f32,
    /// Health lost per unit of speed on impact.
    pub damage_coefficient: f32,
    /// Speeds and targets below this are treated as zero.
    pub epsilon: f32,
    /// Steering has no effect at or below this speed.
    pub turn_threshold: f32,
    /// Speed at which steering reaches full rate.
    pub velocity_normalizer: f32,
    /// Energy regenerates below this speed.
    pub recharge_threshold: f32,
    /// Acceleration multiplier while boosting.
    pub boost_acceleration_factor: f32,
    /// Drive energy multiplier while boosting.
    pub boost_energy_factor: f32,
    pub max_health: f32,
    pub max_energy: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_velocity: 5.0,
            reverse_max_velocity_factor: 0.5,
            acceleration: 2.0,
            deceleration: 3.0,
            turn_speed: 1.5,
            friction_coefficient: 0.98,
            drive_energy_rate: 5.0,
            turn_energy_rate: 1.0,
            energy_regen_rate: 2.0,
            damage_coefficient: 10.0,
            epsilon: 0.01,
            turn_threshold: 0.05,
            velocity_normalizer: 2.5,
            recharge_threshold: 1.0,
            boost_acceleration_factor: 2.0,
            boost_energy_factor: 2.0,
            max_health: 100.0,
            max_energy: 100.0,
        }
    }
}

impl VehicleTuning {
    /// Most negative velocity allowed.
    pub fn min_velocity(&self) -> f32 {
        -self.max_velocity * self.reverse_max_velocity_factor
    }
}

/// Which way the contact rays point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RayFrame {
    /// ±X and ±Z regardless of heading.
    WorldAxes,
    /// Forward, back, left and right of the vehicle.
    Heading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// A hit nearer than this along any ray is contact.
    pub contact_distance: f32,
    /// Rays start this far above the vehicle origin.
    pub ray_height: f32,
    pub ray_frame: RayFrame,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            contact_distance: 1.0,
            ray_height: 0.5,
            ray_frame: RayFrame::Heading,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub base_distance: f32,
    /// Extra trailing distance per unit of speed.
    pub distance_per_speed: f32,
    pub base_height: f32,
    /// Extra height per unit of speed.
    pub height_per_speed: f32,
    /// Look-at point sits this far above the vehicle.
    pub look_height: f32,
    /// Position convergence rate (1/s).
    pub position_rate: f32,
    /// Look-at convergence rate (1/s); faster than position.
    pub look_rate: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            base_distance: 10.0,
            distance_per_speed: 0.5,
            base_height: 5.0,
            height_per_speed: 0.2,
            look_height: 1.0,
            position_rate: 3.0,
            look_rate: 6.0,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Everything the simulation is tuned by.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    pub vehicle: VehicleTuning,
    pub collision: CollisionTuning,
    pub camera: CameraTuning,
    /// Longest frame the integrator will take; longer hitches are clamped.
    pub max_frame_delta: f32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            vehicle: VehicleTuning::default(),
            collision: CollisionTuning::default(),
            camera: CameraTuning::default(),
            max_frame_delta: 0.1,
        }
    }
}
