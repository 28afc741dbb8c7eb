//! Kinematics controller: control intents and the per-frame integrator.
//!
//! Input never writes velocity directly. It sets a target velocity and a turn
//! intent; `integrate` then moves velocity toward the target at a bounded rate.
//! Braking and reversing share one path: pressing reverse while moving forward
//! flips the target's sign, and velocity runs down to exactly zero before it is
//! allowed to go negative.

use engine_core::{wrap_angle, ControlSnapshot};

use crate::state::{TurnIntent, VehicleState};
use crate::tuning::VehicleTuning;

/// Friction is specified per frame at this rate and rescaled for other deltas.
const FRICTION_REFERENCE_HZ: f32 = 60.0;

impl VehicleState {
    fn drive_energy_cost(&self, tuning: &VehicleTuning, delta: f32) -> f32 {
        let boost = if self.boosting {
            tuning.boost_energy_factor
        } else {
            1.0
        };
        tuning.drive_energy_rate * boost * delta
    }

    /// Seek full forward speed. Returns false (and changes nothing) without energy.
    pub fn request_accelerate(&mut self, tuning: &VehicleTuning, delta: f32) -> bool {
        if !self.has_energy() {
            return false;
        }
        self.target_velocity = tuning.max_velocity;
        let cost = self.drive_energy_cost(tuning, delta);
        self.use_energy(cost);
        true
    }

    /// Seek full reverse speed (braking first if moving forward).
    /// Returns false (and changes nothing) without energy.
    pub fn request_decelerate(&mut self, tuning: &VehicleTuning, delta: f32) -> bool {
        if !self.has_energy() {
            return false;
        }
        self.target_velocity = tuning.min_velocity();
        let cost = self.drive_energy_cost(tuning, delta);
        self.use_energy(cost);
        true
    }

    /// Latch a steering direction in `{-1, 0, 1}`. Costs nothing by itself.
    pub fn request_turn(&mut self, direction: i8) {
        self.turn_intent = TurnIntent::from_direction(direction);
    }

    /// No drive input: let the vehicle coast down under friction.
    pub fn release_throttle(&mut self) {
        self.target_velocity = 0.0;
        self.boosting = false;
    }

    /// Translate one frame of controls into intents.
    ///
    /// Forward and backward together cancel. A refused request (no energy)
    /// releases the throttle so friction takes over.
    pub fn apply_controls(&mut self, controls: &ControlSnapshot, tuning: &VehicleTuning, delta: f32) {
        match (controls.forward, controls.backward) {
            (true, false) => {
                self.boosting = controls.boost;
                if !self.request_accelerate(tuning, delta) {
                    self.release_throttle();
                }
            }
            (false, true) => {
                self.boosting = false;
                if !self.request_decelerate(tuning, delta) {
                    self.release_throttle();
                }
            }
            _ => self.release_throttle(),
        }
        self.request_turn(controls.steer_axis());
    }

    /// Advance velocity, heading and position by `delta` seconds.
    pub fn integrate(&mut self, tuning: &VehicleTuning, delta: f32) {
        // Contact blocks forward progress only; backing away stays possible.
        if self.is_colliding() && self.velocity > 0.0 {
            self.velocity = 0.0;
            self.target_velocity = 0.0;
        }

        self.velocity = self.seek_target(tuning, delta);
        // The seek step may have pulled a stopped vehicle forward again.
        if self.is_colliding() {
            self.velocity = self.velocity.min(0.0);
            self.target_velocity = self.target_velocity.min(0.0);
        }

        if self.target_velocity.abs() < tuning.epsilon {
            if self.velocity.abs() > tuning.epsilon {
                let friction = tuning
                    .friction_coefficient
                    .clamp(0.0, 1.0)
                    .powf(delta * FRICTION_REFERENCE_HZ);
                self.velocity *= friction;
            } else {
                self.velocity = 0.0;
            }
        }

        self.velocity = self
            .velocity
            .clamp(tuning.min_velocity(), tuning.max_velocity);

        let speed = self.velocity.abs();
        if self.turn_intent != TurnIntent::None && speed > tuning.turn_threshold && self.has_energy()
        {
            let normalizer = tuning.velocity_normalizer.max(f32::EPSILON);
            let rate = tuning.turn_speed * (speed / normalizer).min(1.0);
            self.heading = wrap_angle(self.heading - self.turn_intent.sign() * rate * delta);
            self.use_energy(tuning.turn_energy_rate * delta);
        }

        self.position.x -= self.heading.sin() * self.velocity * delta;
        self.position.z -= self.heading.cos() * self.velocity * delta;

        if speed < tuning.recharge_threshold {
            self.recharge_energy(delta * tuning.energy_regen_rate);
        }
    }

    /// Velocity after one step toward the target, never overshooting it and
    /// stopping at zero instead of crossing it.
    fn seek_target(&self, tuning: &VehicleTuning, delta: f32) -> f32 {
        let current = self.velocity;
        let target = self.target_velocity;
        let next = if target > current {
            let boost = if self.boosting {
                tuning.boost_acceleration_factor
            } else {
                1.0
            };
            (current + tuning.acceleration * boost * delta).min(target)
        } else if target < current {
            (current - tuning.deceleration * delta).max(target)
        } else {
            current
        };

        if (current > 0.0 && next < 0.0) || (current < 0.0 && next > 0.0) {
            0.0
        } else {
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (VehicleState, VehicleTuning) {
        let tuning = VehicleTuning::default();
        (VehicleState::new(Vec3::ZERO, 0.0, &tuning), tuning)
    }

    fn forward() -> ControlSnapshot {
        ControlSnapshot {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn acceleration_is_linear_then_capped() {
        let (mut v, t) = setup();
        for _ in 0..60 {
            v.apply_controls(&forward(), &t, DT);
            v.integrate(&t, DT);
        }
        // acceleration * 1 s
        assert!((v.velocity() - 2.0).abs() < 1e-3, "velocity {}", v.velocity());

        for _ in 0..120 {
            v.apply_controls(&forward(), &t, DT);
            v.integrate(&t, DT);
            assert!(v.velocity() <= t.max_velocity);
        }
        assert_eq!(v.velocity(), t.max_velocity);
    }

    #[test]
    fn boost_reaches_top_speed_sooner_and_costs_more() {
        let (mut plain, t) = setup();
        let (mut boosted, _) = setup();
        let boost = ControlSnapshot {
            boost: true,
            ..forward()
        };
        for _ in 0..60 {
            plain.apply_controls(&forward(), &t, DT);
            plain.integrate(&t, DT);
            boosted.apply_controls(&boost, &t, DT);
            boosted.integrate(&t, DT);
        }
        assert!(boosted.velocity() > plain.velocity());
        assert!(boosted.velocity() <= t.max_velocity);
        assert!(boosted.energy() < plain.energy());
    }

    #[test]
    fn braking_passes_through_zero_before_reversing() {
        let (mut v, t) = setup();
        v.velocity = 5.0;
        v.target_velocity = t.max_velocity;
        let reverse = ControlSnapshot {
            backward: true,
            ..Default::default()
        };

        let mut prev = v.velocity();
        let mut saw_zero = false;
        for _ in 0..400 {
            v.apply_controls(&reverse, &t, DT);
            v.integrate(&t, DT);
            let now = v.velocity();
            assert!(!(prev > 0.0 && now < 0.0), "jumped from {} to {}", prev, now);
            if now == 0.0 {
                saw_zero = true;
            }
            if now < 0.0 {
                assert!(saw_zero);
            }
            prev = now;
        }
        assert!(saw_zero);
        assert!((v.velocity() - t.min_velocity()).abs() < 1e-4);
    }

    #[test]
    fn coast_down_converges_and_recharges() {
        let (mut v, t) = setup();
        v.velocity = 4.0;
        v.use_energy(50.0);
        let neutral = ControlSnapshot::NEUTRAL;

        let mut recharged = false;
        for _ in 0..600 {
            let before = v.energy();
            v.apply_controls(&neutral, &t, DT);
            v.integrate(&t, DT);
            if v.speed() < t.recharge_threshold && v.energy() > before {
                recharged = true;
            }
        }
        assert_eq!(v.velocity(), 0.0);
        assert!(recharged);
        assert!(v.energy() > 50.0);
    }

    #[test]
    fn no_actuation_without_energy_but_friction_still_applies() {
        let (mut v, t) = setup();
        v.velocity = 3.0;
        v.use_energy(100.0);
        let before_heading = v.heading();
        let input = ControlSnapshot {
            forward: true,
            left: true,
            ..Default::default()
        };
        v.apply_controls(&input, &t, DT);
        assert_eq!(v.target_velocity(), 0.0);
        v.integrate(&t, DT);
        assert!(v.velocity() < 3.0);
        assert_eq!(v.heading(), before_heading);
    }

    #[test]
    fn turning_scales_with_speed_and_costs_energy() {
        let (mut slow, t) = setup();
        let (mut fast, _) = setup();
        slow.velocity = 0.5;
        slow.target_velocity = 0.5;
        fast.velocity = 5.0;
        fast.target_velocity = 5.0;
        slow.request_turn(-1);
        fast.request_turn(-1);
        slow.integrate(&t, DT);
        fast.integrate(&t, DT);
        // Left raises heading.
        assert!(slow.heading() > 0.0);
        assert!(fast.heading() > slow.heading());
        assert!((fast.heading() - t.turn_speed * DT).abs() < 1e-6);
        assert!(fast.energy() < 100.0);
    }

    #[test]
    fn turning_at_rest_does_nothing() {
        let (mut v, t) = setup();
        v.request_turn(1);
        v.integrate(&t, DT);
        assert_eq!(v.heading(), 0.0);
        assert_eq!(v.turn_intent(), TurnIntent::Right);
    }

    #[test]
    fn turn_intent_latches_until_cleared() {
        let (mut v, t) = setup();
        v.velocity = 4.0;
        v.target_velocity = 4.0;
        v.request_turn(1);
        v.integrate(&t, DT);
        v.integrate(&t, DT);
        assert_eq!(v.turn_intent(), TurnIntent::Right);
        v.request_turn(0);
        let h = v.heading();
        v.integrate(&t, DT);
        assert_eq!(v.heading(), h);
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let (mut v, t) = setup();
        v.velocity = 2.0;
        v.target_velocity = 2.0;
        v.integrate(&t, 0.5);
        assert!((v.position().z + 1.0).abs() < 1e-5);
        assert!(v.position().x.abs() < 1e-6);
    }

    #[test]
    fn held_throttle_against_contact_never_creeps_forward() {
        let (mut v, t) = setup();
        v.velocity = 3.0;
        v.set_colliding(true);
        for _ in 0..3600 {
            v.apply_controls(&forward(), &t, DT);
            v.integrate(&t, DT);
            assert!(v.velocity() <= 0.0);
        }
        assert_eq!(v.position(), Vec3::ZERO);
        assert_eq!(v.target_velocity(), 0.0);

        let reverse = ControlSnapshot {
            backward: true,
            ..Default::default()
        };
        for _ in 0..30 {
            v.apply_controls(&reverse, &t, DT);
            v.integrate(&t, DT);
        }
        assert!(v.velocity() < 0.0);
        assert!(v.position().z > 0.0);
    }

    #[test]
    fn bounds_hold_for_large_deltas() {
        let (mut v, t) = setup();
        for &dt in &[0.0, 0.1, 0.05, 0.1, 0.1] {
            v.apply_controls(&forward(), &t, dt);
            v.integrate(&t, dt);
            assert!(v.velocity() <= t.max_velocity && v.velocity() >= t.min_velocity());
            assert!((0.0..=100.0).contains(&v.energy()));
        }
        let reverse = ControlSnapshot {
            backward: true,
            ..Default::default()
        };
        for _ in 0..100 {
            v.apply_controls(&reverse, &t, 0.1);
            v.integrate(&t, 0.1);
            assert!(v.velocity() >= t.min_velocity());
        }
    }
}
