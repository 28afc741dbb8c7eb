//! The owned simulation context and its per-frame tick.

use engine_core::{ControlSnapshot, Vec3, WorldQuery};
use thiserror::Error;

use crate::camera::FollowCamera;
use crate::collision::{CollisionDetector, CollisionEvent};
use crate::portal::{PortalDescriptor, PortalEvent, PortalSet, TransitionContext};
use crate::state::VehicleState;
use crate::tuning::SimTuning;

/// Frame inputs or results the simulation refuses to carry forward.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("negative frame delta: {0}")]
    NegativeDelta(f32),
    #[error("non-finite frame delta")]
    NonFiniteDelta,
    #[error("integration produced a non-finite position {0}; reverted")]
    NonFinitePosition(Vec3),
    #[error("spawn position must be finite, got {0}")]
    InvalidSpawn(Vec3),
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Delta actually integrated (after clamping).
    pub delta: f32,
    pub collision: Option<CollisionEvent>,
    pub portal_events: Vec<PortalEvent>,
}

/// Sole owner of the vehicle. Presentation reads it between ticks.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: SimTuning,
    vehicle: VehicleState,
    detector: CollisionDetector,
    camera: FollowCamera,
    portals: PortalSet,
    context: TransitionContext,
    frame: u64,
}

impl Simulation {
    pub fn new(
        tuning: SimTuning,
        spawn: Vec3,
        heading: f32,
        portals: Vec<PortalDescriptor>,
        context: TransitionContext,
    ) -> Result<Self, SimError> {
        if !spawn.is_finite() || !heading.is_finite() {
            return Err(SimError::InvalidSpawn(spawn));
        }
        let vehicle = VehicleState::new(spawn, heading, &tuning.vehicle);
        let camera = FollowCamera::new(tuning.camera.clone(), &vehicle);
        let detector = CollisionDetector::new(tuning.collision.clone());
        log::info!(
            "Simulation ready: spawn {:?}, {} portal(s)",
            spawn,
            portals.len()
        );
        Ok(Self {
            tuning,
            vehicle,
            detector,
            camera,
            portals: PortalSet::new(portals),
            context,
            frame: 0,
        })
    }

    /// Advance one frame.
    ///
    /// Order: controls, collision, integration, camera, portals. A missing
    /// `world` means nothing can be hit this frame.
    pub fn tick(
        &mut self,
        controls: &ControlSnapshot,
        delta: f32,
        world: Option<&dyn WorldQuery>,
    ) -> Result<TickReport, SimError> {
        let delta = self.validate_delta(delta)?;
        let vehicle_tuning = &self.tuning.vehicle;

        self.vehicle.apply_controls(controls, vehicle_tuning, delta);
        let collision = self.detector.update(&mut self.vehicle, world, vehicle_tuning);

        let last_good = self.vehicle.clone();
        self.vehicle.integrate(vehicle_tuning, delta);
        if !self.vehicle.position().is_finite() {
            let bad = self.vehicle.position();
            self.vehicle = last_good;
            self.vehicle.velocity = 0.0;
            self.vehicle.release_throttle();
            log::warn!("Non-finite position {:?} on frame {}, reverted", bad, self.frame);
            return Err(SimError::NonFinitePosition(bad));
        }

        self.camera.update(&self.vehicle, delta);
        let portal_events =
            self.portals
                .update(self.vehicle.position(), self.vehicle.speed(), &self.context);

        self.frame += 1;
        Ok(TickReport {
            delta,
            collision,
            portal_events,
        })
    }

    fn validate_delta(&self, delta: f32) -> Result<f32, SimError> {
        if !delta.is_finite() {
            return Err(SimError::NonFiniteDelta);
        }
        if delta < 0.0 {
            return Err(SimError::NegativeDelta(delta));
        }
        let max = self.tuning.max_frame_delta;
        if max > 0.0 && delta > max {
            log::debug!("Frame delta {:.3}s clamped to {:.3}s", delta, max);
            return Ok(max);
        }
        Ok(delta)
    }

    /// Rest the vehicle on the ground at `height`. Drive is planar, so this is
    /// the only thing that moves it vertically. Non-finite heights are ignored.
    pub fn settle_on_ground(&mut self, height: f32) {
        if height.is_finite() {
            self.vehicle.position.y = height;
        }
    }

    /// Neutralise every latched intent (input source went away).
    pub fn release_controls(&mut self) {
        self.vehicle.release_throttle();
        self.vehicle.request_turn(0);
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FollowCamera {
        &mut self.camera
    }

    pub fn portals(&self) -> &PortalSet {
        &self.portals
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TurnIntent;
    use crate::tuning::VehicleTuning;

    const DT: f32 = 1.0 / 60.0;

    struct OpenField;

    impl WorldQuery for OpenField {
        fn cast_ray(&self, _o: Vec3, _d: Vec3, _m: f32) -> Option<f32> {
            None
        }
    }

    fn sim_with_portal(at: Vec3) -> Simulation {
        Simulation::new(
            SimTuning::default(),
            Vec3::ZERO,
            0.0,
            vec![PortalDescriptor::new(at, "https://portal.example/")],
            TransitionContext {
                username: "tester".to_string(),
                origin: "local".to_string(),
            },
        )
        .expect("valid spawn")
    }

    fn forward() -> ControlSnapshot {
        ControlSnapshot {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_bad_deltas_without_touching_state() {
        let mut sim = sim_with_portal(Vec3::new(0.0, 0.0, -100.0));
        assert_eq!(
            sim.tick(&forward(), -0.1, None),
            Err(SimError::NegativeDelta(-0.1))
        );
        assert_eq!(sim.tick(&forward(), f32::NAN, None), Err(SimError::NonFiniteDelta));
        assert_eq!(sim.vehicle().energy(), 100.0);
        assert_eq!(sim.vehicle().target_velocity(), 0.0);
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn long_hitches_are_clamped() {
        let mut sim = sim_with_portal(Vec3::new(0.0, 0.0, -100.0));
        let report = sim.tick(&forward(), 2.0, Some(&OpenField)).unwrap();
        assert_eq!(report.delta, 0.1);
        assert!((sim.vehicle().velocity() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn driving_into_portal_raises_one_transition() {
        let mut sim = sim_with_portal(Vec3::new(0.0, 0.0, -6.0));
        let mut preloads = 0;
        let mut transitions = Vec::new();
        for _ in 0..600 {
            let report = sim.tick(&forward(), DT, Some(&OpenField)).unwrap();
            for event in report.portal_events {
                match event {
                    PortalEvent::Preload { .. } => preloads += 1,
                    PortalEvent::Transition { url, .. } => transitions.push(url),
                }
            }
        }
        assert_eq!(preloads, 1);
        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].contains("username=tester"));
        assert!(transitions[0].contains("ref=local"));
    }

    #[test]
    fn camera_trails_the_vehicle() {
        let mut sim = sim_with_portal(Vec3::new(0.0, 0.0, -500.0));
        for _ in 0..120 {
            sim.tick(&forward(), DT, None).unwrap();
        }
        assert!(sim.vehicle().position().z < 0.0);
        assert!(sim.camera().position().z > sim.vehicle().position().z);
    }

    #[test]
    fn release_controls_neutralises_intents() {
        let mut sim = sim_with_portal(Vec3::new(0.0, 0.0, -500.0));
        let held = ControlSnapshot {
            forward: true,
            right: true,
            ..Default::default()
        };
        sim.tick(&held, DT, None).unwrap();
        assert_eq!(sim.vehicle().turn_intent(), TurnIntent::Right);
        sim.release_controls();
        assert_eq!(sim.vehicle().turn_intent(), TurnIntent::None);
        assert_eq!(sim.vehicle().target_velocity(), 0.0);
    }

    #[test]
    fn ground_height_only_moves_vertically() {
        let mut sim = sim_with_portal(Vec3::new(0.0, 0.0, -500.0));
        sim.settle_on_ground(2.5);
        sim.settle_on_ground(f32::NAN);
        assert_eq!(sim.vehicle().position(), Vec3::new(0.0, 2.5, 0.0));
    }

    #[test]
    fn overflowing_position_is_reverted_and_reported() {
        let tuning = SimTuning {
            vehicle: VehicleTuning {
                max_velocity: f32::MAX,
                acceleration: f32::MAX,
                ..Default::default()
            },
            ..Default::default()
        };
        let spawn = Vec3::new(0.0, 0.0, -f32::MAX);
        let mut sim =
            Simulation::new(tuning, spawn, 0.0, Vec::new(), TransitionContext::default())
                .expect("finite spawn");

        let result = sim.tick(&forward(), DT, None);
        assert!(
            matches!(result, Err(SimError::NonFinitePosition(p)) if p.z == f32::NEG_INFINITY),
            "got {:?}",
            result
        );
        assert_eq!(sim.vehicle().position(), spawn);
        assert!(sim.vehicle().position().is_finite());
        assert_eq!(sim.vehicle().velocity(), 0.0);
        assert_eq!(sim.vehicle().target_velocity(), 0.0);
        assert_eq!(sim.frame(), 0);
    }

    #[test]
    fn non_finite_spawn_is_refused() {
        let result = Simulation::new(
            SimTuning::default(),
            Vec3::new(f32::NAN, 0.0, 0.0),
            0.0,
            Vec::new(),
            TransitionContext::default(),
        );
        assert!(matches!(result, Err(SimError::InvalidSpawn(_))));
    }
}
