//! Contact detection against static world geometry.

use engine_core::{heading_forward, heading_right, Vec3, WorldQuery};

use crate::state::VehicleState;
use crate::tuning::{CollisionTuning, RayFrame, VehicleTuning};

/// Raised on the frame contact begins. Audio plays its impact cue from this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Speed at the moment of impact.
    pub speed: f32,
    /// Health removed by the impact.
    pub damage: f32,
}

/// Casts the contact rays and applies impact damage on the rising edge.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    pub tuning: CollisionTuning,
}

impl CollisionDetector {
    pub fn new(tuning: CollisionTuning) -> Self {
        Self { tuning }
    }

    /// The four ray directions for a vehicle at `heading`.
    pub fn ray_directions(&self, heading: f32) -> [Vec3; 4] {
        match self.tuning.ray_frame {
            RayFrame::WorldAxes => [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z],
            RayFrame::Heading => {
                let forward = heading_forward(heading);
                let right = heading_right(heading);
                [forward, -forward, right, -right]
            }
        }
    }

    /// Whether any ray finds geometry inside contact range.
    /// A missing world (scene not loaded yet) reports no contact.
    pub fn detect(&self, world: Option<&dyn WorldQuery>, position: Vec3, heading: f32) -> bool {
        let Some(world) = world else {
            return false;
        };
        let origin = position + Vec3::Y * self.tuning.ray_height;
        let reach = self.tuning.contact_distance;
        self.ray_directions(heading).iter().any(|&dir| {
            world
                .cast_ray(origin, dir, reach)
                .is_some_and(|d| d < reach)
        })
    }

    /// Recompute the vehicle's collision flag for this frame. On a new contact,
    /// deal damage proportional to speed and return the impact.
    pub fn update(
        &self,
        vehicle: &mut VehicleState,
        world: Option<&dyn WorldQuery>,
        tuning: &VehicleTuning,
    ) -> Option<CollisionEvent> {
        let colliding = self.detect(world, vehicle.position(), vehicle.heading());
        let was_colliding = vehicle.is_colliding();
        vehicle.set_colliding(colliding);

        if colliding && !was_colliding {
            let speed = vehicle.speed();
            let damage = tuning.damage_coefficient * speed;
            vehicle.take_damage(damage);
            log::debug!("Impact at {:.2} u/s, {:.1} damage", speed, damage);
            Some(CollisionEvent { speed, damage })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// World that answers every ray with a scripted per-frame distance.
    struct ScriptedWorld {
        frames: Vec<Option<f32>>,
        frame: Cell<usize>,
    }

    impl ScriptedWorld {
        fn new(frames: Vec<Option<f32>>) -> Self {
            Self {
                frames,
                frame: Cell::new(0),
            }
        }

        fn advance(&self) {
            self.frame.set(self.frame.get() + 1);
        }
    }

    impl WorldQuery for ScriptedWorld {
        fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max: f32) -> Option<f32> {
            self.frames.get(self.frame.get()).copied().flatten()
        }
    }

    /// Wall on one side only; records every ray it sees.
    struct WallAt {
        direction: Vec3,
        distance: f32,
        seen: RefCell<Vec<(Vec3, Vec3)>>,
    }

    impl WorldQuery for WallAt {
        fn cast_ray(&self, origin: Vec3, direction: Vec3, max: f32) -> Option<f32> {
            self.seen.borrow_mut().push((origin, direction));
            if direction.dot(self.direction) > 0.99 && self.distance <= max {
                Some(self.distance)
            } else {
                None
            }
        }
    }

    fn moving_vehicle() -> (VehicleState, VehicleTuning) {
        let tuning = VehicleTuning::default();
        let mut v = VehicleState::new(Vec3::ZERO, 0.0, &tuning);
        v.velocity = 2.0;
        (v, tuning)
    }

    #[test]
    fn damage_once_per_contact_episode() {
        let world = ScriptedWorld::new(vec![None, Some(0.5), Some(0.5), Some(0.5), None]);
        let detector = CollisionDetector::default();
        let (mut v, tuning) = moving_vehicle();

        let mut impacts = Vec::new();
        let mut flags = Vec::new();
        for frame in 0..5 {
            if let Some(hit) = detector.update(&mut v, Some(&world), &tuning) {
                impacts.push(frame);
                assert_eq!(hit.damage, 20.0);
            }
            flags.push(v.is_colliding());
            world.advance();
        }
        assert_eq!(impacts, vec![1]);
        assert_eq!(flags, vec![false, true, true, true, false]);
        assert_eq!(v.health(), 80.0);
    }

    #[test]
    fn missing_world_is_not_contact() {
        let detector = CollisionDetector::default();
        let (mut v, tuning) = moving_vehicle();
        assert!(detector.update(&mut v, None, &tuning).is_none());
        assert!(!v.is_colliding());
    }

    #[test]
    fn hit_beyond_contact_distance_is_ignored() {
        let world = ScriptedWorld::new(vec![Some(1.0)]);
        let detector = CollisionDetector::default();
        assert!(!detector.detect(Some(&world), Vec3::ZERO, 0.0));
    }

    #[test]
    fn heading_frame_rotates_rays() {
        // Facing +X (heading -PI/2): a wall ahead lies along +X.
        let heading = -std::f32::consts::FRAC_PI_2;
        let wall = WallAt {
            direction: Vec3::X,
            distance: 0.4,
            seen: RefCell::new(Vec::new()),
        };
        let detector = CollisionDetector::default();
        assert!(detector.detect(Some(&wall), Vec3::new(1.0, 0.0, 2.0), heading));
        let dirs = detector.ray_directions(heading);
        assert!((dirs[0] - Vec3::X).length() < 1e-5);
        let (origin, _) = wall.seen.borrow()[0];
        assert_eq!(origin, Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn world_axes_ignore_heading() {
        let detector = CollisionDetector::new(CollisionTuning {
            ray_frame: RayFrame::WorldAxes,
            ..Default::default()
        });
        assert_eq!(
            detector.ray_directions(1.234),
            [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z]
        );
    }
}
