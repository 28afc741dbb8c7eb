//! Physics world management with Rapier3D.
//!
//! The drive has no dynamic bodies: the world is static terrain and obstacle
//! colliders plus one parentless collider that follows the vehicle so queries
//! can exclude it.

use crate::collision::CollisionGroup;
use engine_core::Vec3;
use rapier3d::na::{Isometry3, Vector3};
use rapier3d::prelude::*;

/// Static collision world queried by the simulation.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
    /// The vehicle's own collider, excluded from every world query.
    vehicle_collider: Option<ColliderHandle>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty physics world.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            vehicle_collider: None,
        }
    }

    /// Update query pipeline for raycasting. Call after adding or moving colliders.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Number of colliders in the world (vehicle included).
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Add a static sphere collider (boulders, rock formation pieces).
    pub fn add_static_ball(&mut self, center: Vec3, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a static cuboid collider. No parent body; collider is fixed in world.
    /// `translation`: world position of center. `rotation_y_rad`: rotation around Y axis in radians.
    /// `half_extents`: half sizes in local X, Y, Z (after rotation).
    pub fn add_static_cuboid(
        &mut self,
        translation: Vec3,
        rotation_y_rad: f32,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let tra = vector![translation.x, translation.y, translation.z];
        let axisangle = Vector3::y_axis().into_inner() * (rotation_y_rad as Real);
        let position = Isometry3::new(tra, axisangle);
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .position(position)
        .collision_groups(CollisionGroup::environment())
        .build();
        self.collider_set.insert(collider)
    }

    /// Add a heightfield collider for the terrain. It is kept out of contact
    /// queries and only answers [`PhysicsWorld::ground_height`].
    /// - `heights`: flat slice of height values in world Y, row-major order (index = z * ncols + x).
    /// - `nrows`, `ncols`: grid dimensions.
    /// - `size_x`, `size_z`: total extent in world units (terrain spans -size/2 to +size/2).
    /// - `base_y`: vertical offset applied to the whole field.
    pub fn add_terrain_heightfield(
        &mut self,
        heights: &[f32],
        nrows: usize,
        ncols: usize,
        size_x: f32,
        size_z: f32,
        base_y: f32,
    ) -> Option<ColliderHandle> {
        if nrows < 2 || ncols < 2 || heights.len() < nrows * ncols {
            log::warn!(
                "Skipping terrain heightfield: {}x{} grid with {} samples",
                nrows,
                ncols,
                heights.len()
            );
            return None;
        }

        let heights_matrix = DMatrix::from_fn(nrows, ncols, |i, j| heights[i * ncols + j] as Real);
        let scale = vector![size_x, 1.0, size_z];

        let collider = ColliderBuilder::heightfield(heights_matrix, scale)
            .translation(vector![0.0, base_y, 0.0])
            .collision_groups(CollisionGroup::terrain())
            .build();
        Some(self.collider_set.insert(collider))
    }

    /// Register the vehicle's own collision box. Replaces any previous vehicle collider.
    pub fn set_vehicle_collider(&mut self, half_extents: Vec3) -> ColliderHandle {
        if let Some(old) = self.vehicle_collider.take() {
            self.remove_collider(old);
        }
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(CollisionGroup::vehicle())
            .build();
        let handle = self.collider_set.insert(collider);
        self.vehicle_collider = Some(handle);
        handle
    }

    /// The vehicle's collider, if one is registered.
    pub fn vehicle_collider(&self) -> Option<ColliderHandle> {
        self.vehicle_collider
    }

    /// Move the vehicle collider to follow the simulated pose.
    pub fn sync_vehicle(&mut self, position: Vec3, heading: f32) {
        let Some(handle) = self.vehicle_collider else {
            return;
        };
        if let Some(collider) = self.collider_set.get_mut(handle) {
            let axisangle = Vector3::y_axis().into_inner() * (heading as Real);
            collider.set_position(Isometry3::new(
                vector![position.x, position.y, position.z],
                axisangle,
            ));
        }
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        let mut islands = IslandManager::new();
        self.collider_set
            .remove(handle, &mut islands, &mut self.rigid_body_set, true);
        if self.vehicle_collider == Some(handle) {
            self.vehicle_collider = None;
        }
    }
}
