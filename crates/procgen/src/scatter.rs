//! Static obstacle placement: loose rocks, rock formations and large boulders.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::terrain::{random_point, TerrainData};

/// A spherical static obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Rock,
    Formation,
    Boulder,
}

/// How many obstacles of each kind to scatter, and where not to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub rocks: u32,
    pub formations: u32,
    pub boulders: u32,
    /// Keep-out circles (XZ centre, radius) for spawn points and portals.
    pub clearings: Vec<(Vec2, f32)>,
    pub seed: u64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            rocks: 80,
            formations: 15,
            boulders: 12,
            clearings: vec![(Vec2::ZERO, 6.0)],
            seed: 0,
        }
    }
}

impl ScatterConfig {
    fn is_clear(&self, p: Vec2, radius: f32) -> bool {
        self.clearings
            .iter()
            .all(|(c, r)| p.distance(*c) > r + radius)
    }
}

/// Scatter obstacles over the terrain. Candidates landing in a clearing are dropped.
pub fn scatter_obstacles(terrain: &TerrainData, config: &ScatterConfig) -> Vec<Obstacle> {
    let mut rng = StdRng::seed_from_u64(config.seed ^ 0x726f_636b);
    let span = terrain.config.size;
    let mut out = Vec::new();

    let push = |out: &mut Vec<Obstacle>, p: Vec2, radius: f32, lift: f32, kind| {
        if config.is_clear(p, radius) {
            let ground = terrain.sample_height(p.x, p.y);
            out.push(Obstacle {
                center: Vec3::new(p.x, ground + lift, p.y),
                radius,
                kind,
            });
        }
    };

    for _ in 0..config.rocks {
        let p = random_point(&mut rng, span * 0.93);
        let radius = rng.gen_range(0.3..1.1);
        let lift = rng.gen_range(0.15..0.35);
        push(&mut out, p, radius, lift, ObstacleKind::Rock);
    }

    for _ in 0..config.formations {
        let base = random_point(&mut rng, span * 0.87);
        let scale = rng.gen_range(1.5..4.0);
        let pieces = rng.gen_range(3..8);
        for _ in 0..pieces {
            let offset = Vec2::new(
                (rng.gen::<f32>() - 0.5) * scale * 2.0,
                (rng.gen::<f32>() - 0.5) * scale * 2.0,
            );
            let radius = rng.gen_range(0.5..1.2) * scale;
            let lift = 0.5 + rng.gen::<f32>() * scale * 0.5;
            push(&mut out, base + offset, radius, lift, ObstacleKind::Formation);
        }
    }

    for _ in 0..config.boulders {
        let p = random_point(&mut rng, span * 0.67);
        let radius = rng.gen_range(2.0..5.0);
        let lift = rng.gen_range(1.0..1.5);
        push(&mut out, p, radius, lift, ObstacleKind::Boulder);
    }

    log::debug!("Scattered {} obstacles", out.len());
    out
}
