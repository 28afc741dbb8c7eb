//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the things that live in the physics world.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static obstacles (boulders, rock formations)
    Environment = 1 << 0,
    /// The driven vehicle
    Vehicle = 1 << 1,
    /// Ground heightfield. Only ground-height rays see it.
    Terrain = 1 << 2,
}

impl CollisionGroup {
    /// Membership/filter pair for static environment geometry.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Environment as u32),
            Group::ALL,
        )
    }

    pub fn terrain() -> InteractionGroups {
        InteractionGroups::new(Group::from_bits_retain(Self::Terrain as u32), Group::ALL)
    }

    /// Query groups for rays that only want the ground.
    pub fn ground_query() -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Group::from_bits_retain(Self::Terrain as u32))
    }

    /// Membership/filter pair for the vehicle: it only sees the environment.
    pub fn vehicle() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Vehicle as u32),
            Group::from_bits_retain(Self::Environment as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_sees_environment_but_not_itself() {
        let vehicle = CollisionGroup::vehicle();
        let env = CollisionGroup::environment();
        assert!(vehicle.test(env));
        assert!(!vehicle.test(CollisionGroup::vehicle()));
        assert!(!vehicle.test(CollisionGroup::terrain()));
    }

    #[test]
    fn ground_query_sees_only_terrain() {
        let query = CollisionGroup::ground_query();
        assert!(query.test(CollisionGroup::terrain()));
        assert!(!query.test(CollisionGroup::environment()));
    }
}
