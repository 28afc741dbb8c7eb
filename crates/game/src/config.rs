//! Game configuration (window, identity, world, tuning, portals). Loaded from config.ron at startup.

use glam::Vec3;
use procgen::{ScatterConfig, TerrainConfig};
use rover::{PortalDescriptor, SimTuning};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Start in fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Name shown to portal destinations.
    #[serde(default = "default_username")]
    pub username: String,
    /// Where travellers arriving from a portal can be sent back to.
    #[serde(default = "default_origin")]
    pub origin_url: String,
    /// Shared seed for terrain and obstacle placement.
    #[serde(default)]
    pub world_seed: u64,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub scatter: ScatterConfig,
    #[serde(default)]
    pub tuning: SimTuning,
    /// Vehicle spawn on the XZ plane; Y comes from the terrain.
    #[serde(default)]
    pub spawn: [f32; 2],
    #[serde(default = "default_portals")]
    pub portals: Vec<PortalDescriptor>,
    /// Print the destination instead of leaving the game when a portal fires.
    #[serde(default)]
    pub stay_on_transition: bool,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_username() -> String {
    "rover".to_string()
}
fn default_origin() -> String {
    "roverdrive".to_string()
}
fn default_portals() -> Vec<PortalDescriptor> {
    vec![PortalDescriptor::new(
        Vec3::new(0.0, 0.0, -40.0),
        "https://portal.pieter.com/",
    )]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            fullscreen: false,
            username: default_username(),
            origin_url: default_origin(),
            world_seed: 0,
            terrain: TerrainConfig::default(),
            scatter: ScatterConfig::default(),
            tuning: SimTuning::default(),
            spawn: [0.0, 0.0],
            portals: default_portals(),
            stay_on_transition: false,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::from_ron(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        let mut config: Self = ron::from_str(data)?;
        config.apply_world_seed();
        Ok(config)
    }

    /// Generators take their seed from `world_seed` unless one was set explicitly.
    fn apply_world_seed(&mut self) {
        if self.terrain.seed == 0 {
            self.terrain.seed = self.world_seed;
        }
        if self.scatter.seed == 0 {
            self.scatter.seed = self.world_seed;
        }
    }

    /// Keep obstacles off the spawn point and every portal.
    pub fn scatter_with_clearings(&self) -> ScatterConfig {
        let mut scatter = self.scatter.clone();
        scatter
            .clearings
            .push((glam::Vec2::from(self.spawn), 6.0));
        for portal in &self.portals {
            scatter.clearings.push((
                glam::Vec2::new(portal.position.x, portal.position.z),
                portal.trigger_radius + 2.0,
            ));
        }
        scatter
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = GameConfig::from_ron("()").unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.portals.len(), 1);
        assert_eq!(config.portals[0].label, "VIBEVERSE PORTAL");
        assert_eq!(config.tuning.vehicle.max_velocity, 5.0);
    }

    #[test]
    fn partial_tuning_overrides_only_named_fields() {
        let config = GameConfig::from_ron(
            "(username: \"ares\", world_seed: 7, tuning: (vehicle: (max_velocity: 8.0)))",
        )
        .unwrap();
        assert_eq!(config.username, "ares");
        assert_eq!(config.tuning.vehicle.max_velocity, 8.0);
        assert_eq!(config.tuning.vehicle.acceleration, 2.0);
        assert_eq!(config.terrain.seed, 7);
        assert_eq!(config.scatter.seed, 7);
    }

    #[test]
    fn portals_get_clearings() {
        let config = GameConfig::default();
        let scatter = config.scatter_with_clearings();
        assert!(scatter
            .clearings
            .iter()
            .any(|(c, _)| *c == glam::Vec2::new(0.0, -40.0)));
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(GameConfig::from_ron("(window_width: \"wide\")").is_err());
    }
}
