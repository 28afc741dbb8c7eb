//! World-query contract between the simulation and the obstacle provider.

use glam::Vec3;

/// Read-only ray queries against static world geometry.
///
/// Implementations must exclude the querying vehicle's own geometry from results.
pub trait WorldQuery {
    /// Distance to the nearest hit along `direction` (unit length) within `max_distance`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;
}
