//! Terrain generation using noise functions plus stamped craters, hills and ridges.
//!
//! **Seed-based determinism:** all noise and feature placement derive from
//! `config.seed`, so the same seed always produces the same heightmap.

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin, Simplex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
/// Same (seed, offset) always gives the same result so terrain is reproducible.
#[inline]
pub(crate) fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for terrain generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Size of terrain in world units (square, centred on the origin).
    pub size: f32,
    /// Number of vertices per side.
    pub resolution: u32,
    /// World Y of the flat datum the terrain is built on.
    pub base_height: f32,
    /// Amplitude of the rolling noise layer.
    pub noise_amplitude: f32,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
    pub craters: u32,
    pub small_hills: u32,
    pub large_hills: u32,
    pub ridges: u32,
    /// Seed for random generation.
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 150.0,
            resolution: 151,
            base_height: -0.1,
            noise_amplitude: 0.3,
            frequency: 0.04,
            octaves: 3,
            lacunarity: 2.0,
            persistence: 0.5,
            craters: 25,
            small_hills: 20,
            large_hills: 5,
            ridges: 3,
            seed: 0,
        }
    }
}

/// Generated terrain heights.
#[derive(Debug, Clone)]
pub struct TerrainData {
    /// Row-major heights relative to `config.base_height` (index = z * resolution + x).
    pub heightmap: Vec<f32>,
    pub config: TerrainConfig,
}

impl TerrainData {
    /// Generate terrain from configuration.
    pub fn generate(config: TerrainConfig) -> Self {
        let perlin = Perlin::new(deterministic_noise_seed(config.seed, 0));
        let simplex = Simplex::new(deterministic_noise_seed(config.seed, 1));
        let res = config.resolution.max(2) as usize;
        let config = TerrainConfig {
            resolution: res as u32,
            ..config
        };

        let mut heightmap = Vec::with_capacity(res * res);
        for z in 0..res {
            for x in 0..res {
                let p = Self::grid_to_world(&config, x, z);
                let n = Self::fractal_noise(&perlin, &simplex, p.x as f64, p.y as f64, &config);
                heightmap.push((n as f32 - 0.5) * 2.0 * config.noise_amplitude);
            }
        }

        let mut terrain = Self { heightmap, config };
        terrain.stamp_features();
        terrain
    }

    /// World XZ of a grid vertex.
    fn grid_to_world(config: &TerrainConfig, x: usize, z: usize) -> Vec2 {
        let step = config.size / (config.resolution - 1) as f32;
        let half = config.size / 2.0;
        Vec2::new(x as f32 * step - half, z as f32 * step - half)
    }

    fn fractal_noise(
        perlin: &Perlin,
        simplex: &Simplex,
        x: f64,
        z: f64,
        config: &TerrainConfig,
    ) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = config.frequency;
        let mut max_value = 0.0;

        for _ in 0..config.octaves.max(1) {
            // Mix Perlin and Simplex for variety
            let perlin_sample = perlin.get([x * frequency, z * frequency]);
            let simplex_sample = simplex.get([x * frequency + 1000.0, z * frequency + 1000.0]);

            value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
            max_value += amplitude;

            amplitude *= config.persistence;
            frequency *= config.lacunarity;
        }

        // Normalize to 0-1 range
        (value / max_value + 1.0) * 0.5
    }

    /// Place craters, hills and ridges from a seeded RNG.
    fn stamp_features(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ 0x6372_6174_6572);
        let span = self.config.size;

        for _ in 0..self.config.craters {
            let c = random_point(&mut rng, span * 0.8);
            let radius = rng.gen_range(2.0..8.0);
            let depth = rng.gen_range(0.2..1.2);
            self.apply(|p| {
                let d = p.distance(c);
                if d < radius {
                    -(1.0 - d / radius) * depth
                } else {
                    0.0
                }
            });
        }

        let hills = [
            (self.config.small_hills, 0.87, 3.0..10.0, 0.4..1.9),
            (self.config.large_hills, 0.8, 10.0..25.0, 2.0..6.0),
        ];
        for (count, extent, radius_range, height_range) in hills {
            for _ in 0..count {
                let c = random_point(&mut rng, span * extent);
                let radius: f32 = rng.gen_range(radius_range.clone());
                let height: f32 = rng.gen_range(height_range.clone());
                let sigma2 = 2.0 * (radius * 0.4).powi(2);
                self.apply(|p| {
                    let d2 = p.distance_squared(c);
                    if d2 < radius * radius {
                        height * (-d2 / sigma2).exp()
                    } else {
                        0.0
                    }
                });
            }
        }

        for _ in 0..self.config.ridges {
            let start = random_point(&mut rng, span * 0.67);
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let length = rng.gen_range(20.0..60.0);
            let width = rng.gen_range(5.0..15.0);
            let height = rng.gen_range(1.5..4.5);
            let dir = Vec2::from_angle(angle);
            self.apply(|p| {
                let along = (p - start).dot(dir);
                if !(0.0..=length).contains(&along) {
                    return 0.0;
                }
                let across = (p - (start + dir * along)).length();
                if across >= width {
                    return 0.0;
                }
                let profile = 1.0 - (across / width).powi(2);
                let ripple = (along * 0.2).sin() * 0.3 + 0.7;
                height * profile * ripple
            });
        }
    }

    fn apply(&mut self, displacement: impl Fn(Vec2) -> f32) {
        let res = self.config.resolution as usize;
        for z in 0..res {
            for x in 0..res {
                let p = Self::grid_to_world(&self.config, x, z);
                self.heightmap[z * res + x] += displacement(p);
            }
        }
    }

    /// World-space terrain height at (x, z), bilinearly interpolated.
    /// Outside the terrain the edge height is used.
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let res = self.config.resolution as usize;
        let step = self.config.size / (res - 1) as f32;
        let half = self.config.size / 2.0;
        let gx = ((x + half) / step).clamp(0.0, (res - 1) as f32);
        let gz = ((z + half) / step).clamp(0.0, (res - 1) as f32);
        let x0 = (gx.floor() as usize).min(res - 2);
        let z0 = (gz.floor() as usize).min(res - 2);
        let fx = gx - x0 as f32;
        let fz = gz - z0 as f32;
        let h = |xi: usize, zi: usize| self.heightmap[zi * res + xi];
        let top = h(x0, z0) * (1.0 - fx) + h(x0 + 1, z0) * fx;
        let bottom = h(x0, z0 + 1) * (1.0 - fx) + h(x0 + 1, z0 + 1) * fx;
        self.config.base_height + top * (1.0 - fz) + bottom * fz
    }

    /// Surface point at (x, z).
    pub fn surface_point(&self, x: f32, z: f32) -> Vec3 {
        Vec3::new(x, self.sample_height(x, z), z)
    }
}

/// Uniform point in a square of side `extent` centred on the origin.
pub(crate) fn random_point(rng: &mut StdRng, extent: f32) -> Vec2 {
    Vec2::new(
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
    )
}
