//! Building the static collision world from generated terrain.

use anyhow::{bail, Result};
use glam::Vec3;
use physics::PhysicsWorld;
use procgen::{scatter_obstacles, Obstacle, ObstacleKind, TerrainData};
use rover::PortalDescriptor;

use crate::config::GameConfig;

/// Half extents of the vehicle's own collision box.
const VEHICLE_HALF_EXTENTS: Vec3 = Vec3::new(0.9, 0.5, 1.3);

/// Ground rays start this far above anything the terrain can reach.
const GROUND_RAY_HEIGHT: f32 = 100.0;

pub struct World {
    pub physics: PhysicsWorld,
    pub terrain: TerrainData,
    pub obstacles: Vec<Obstacle>,
}

impl World {
    pub fn build(config: &GameConfig) -> Result<Self> {
        let terrain = TerrainData::generate(config.terrain.clone());
        let obstacles = scatter_obstacles(&terrain, &config.scatter_with_clearings());

        let mut physics = PhysicsWorld::new();
        let res = terrain.config.resolution as usize;
        if physics
            .add_terrain_heightfield(
                &terrain.heightmap,
                res,
                res,
                terrain.config.size,
                terrain.config.size,
                terrain.config.base_height,
            )
            .is_none()
        {
            bail!("terrain grid {}x{} cannot back a heightfield", res, res);
        }
        for obstacle in &obstacles {
            physics.add_static_ball(obstacle.center, obstacle.radius);
        }
        physics.set_vehicle_collider(VEHICLE_HALF_EXTENTS);
        physics.update_query_pipeline();

        let world = Self {
            physics,
            terrain,
            obstacles,
        };
        log::info!(
            "World ready: {:.0}x{:.0} terrain, {} rocks, {} formation pieces, {} boulders",
            world.terrain.config.size,
            world.terrain.config.size,
            world.count(ObstacleKind::Rock),
            world.count(ObstacleKind::Formation),
            world.count(ObstacleKind::Boulder),
        );
        Ok(world)
    }

    fn count(&self, kind: ObstacleKind) -> usize {
        self.obstacles.iter().filter(|o| o.kind == kind).count()
    }

    /// Ground under (x, z): the heightfield if the ray finds it, else the sampled terrain.
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.physics
            .ground_height(x, z, GROUND_RAY_HEIGHT)
            .unwrap_or_else(|| self.terrain.sample_height(x, z))
    }

    pub fn spawn_point(&self, config: &GameConfig) -> Vec3 {
        let [x, z] = config.spawn;
        Vec3::new(x, self.ground_height(x, z), z)
    }

    /// Portals stand on the ground regardless of the configured height.
    pub fn grounded_portals(&self, portals: &[PortalDescriptor]) -> Vec<PortalDescriptor> {
        portals
            .iter()
            .cloned()
            .map(|mut portal| {
                portal.position.y = self.ground_height(portal.position.x, portal.position.z);
                portal
            })
            .collect()
    }
}
