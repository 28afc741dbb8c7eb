//! The vehicle record and its resource pools.

use engine_core::{heading_forward, ResourcePool, Transform, Vec3};

use crate::tuning::VehicleTuning;

/// Latched steering intent. Persists until explicitly changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnIntent {
    Left,
    #[default]
    None,
    Right,
}

impl TurnIntent {
    /// Map a steering direction in `{-1, 0, 1}`; anything else is clamped by sign.
    pub fn from_direction(direction: i8) -> Self {
        match direction.signum() {
            -1 => Self::Left,
            1 => Self::Right,
            _ => Self::None,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::None => 0.0,
            Self::Right => 1.0,
        }
    }
}

/// The sole mutable simulation entity.
///
/// Fields are private: the kinematics and resource methods are the only writers,
/// and the collision flag is written only by the collision detector.
#[derive(Debug, Clone)]
pub struct VehicleState {
    pub(crate) position: Vec3,
    pub(crate) heading: f32,
    pub(crate) velocity: f32,
    pub(crate) target_velocity: f32,
    pub(crate) turn_intent: TurnIntent,
    pub(crate) boosting: bool,
    health: ResourcePool,
    energy: ResourcePool,
    is_colliding: bool,
}

impl VehicleState {
    /// A rested vehicle with full pools.
    pub fn new(position: Vec3, heading: f32, tuning: &VehicleTuning) -> Self {
        Self {
            position,
            heading,
            velocity: 0.0,
            target_velocity: 0.0,
            turn_intent: TurnIntent::None,
            boosting: false,
            health: ResourcePool::new(tuning.max_health),
            energy: ResourcePool::new(tuning.max_energy),
            is_colliding: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.abs()
    }

    pub fn target_velocity(&self) -> f32 {
        self.target_velocity
    }

    pub fn turn_intent(&self) -> TurnIntent {
        self.turn_intent
    }

    pub fn is_boosting(&self) -> bool {
        self.boosting
    }

    pub fn health(&self) -> f32 {
        self.health.current()
    }

    pub fn energy(&self) -> f32 {
        self.energy.current()
    }

    pub fn health_fraction(&self) -> f32 {
        self.health.fraction()
    }

    pub fn energy_fraction(&self) -> f32 {
        self.energy.fraction()
    }

    pub fn is_colliding(&self) -> bool {
        self.is_colliding
    }

    pub fn has_energy(&self) -> bool {
        !self.energy.is_empty()
    }

    pub fn is_destroyed(&self) -> bool {
        self.health.is_empty()
    }

    /// Unit vector the vehicle drives along at positive velocity.
    pub fn forward(&self) -> Vec3 {
        heading_forward(self.heading)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_heading(self.position, self.heading)
    }

    /// Spend energy. Negative amounts are ignored.
    pub fn use_energy(&mut self, amount: f32) {
        self.energy.drain(amount);
    }

    /// Regain energy, capped at the pool maximum. Negative amounts are ignored.
    pub fn recharge_energy(&mut self, amount: f32) {
        self.energy.restore(amount);
    }

    /// Lose health, bottoming out at zero. Negative amounts are ignored.
    pub fn take_damage(&mut self, amount: f32) {
        self.health.drain(amount);
    }

    pub(crate) fn set_colliding(&mut self, colliding: bool) {
        self.is_colliding = colliding;
    }
}
