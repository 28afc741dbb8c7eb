//! Raycasting for proximity and contact queries.

use crate::{CollisionGroup, PhysicsWorld};
use engine_core::{Vec3, WorldQuery};
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Query filter that only sees environment geometry and never the vehicle itself.
    fn environment_filter(&self) -> QueryFilter<'static> {
        let filter = QueryFilter::default().groups(CollisionGroup::vehicle());
        match self.vehicle_collider() {
            Some(handle) => filter.exclude_collider(handle),
            None => filter,
        }
    }

    /// Cast a ray against the environment and return the first hit.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                self.environment_filter(),
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }
}

impl PhysicsWorld {
    /// Terrain height under (x, z), probing down from `from_y`.
    pub fn ground_height(&self, x: f32, z: f32, from_y: f32) -> Option<f32> {
        let ray = Ray::new(point![x, from_y, z], vector![0.0, -1.0, 0.0]);
        let filter = QueryFilter::default().groups(CollisionGroup::ground_query());
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                Real::MAX,
                true,
                filter,
            )
            .map(|(_, toi)| from_y - toi)
    }
}

impl WorldQuery for PhysicsWorld {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        self.raycast(origin, direction, max_distance)
            .map(|hit| hit.distance)
    }
}
