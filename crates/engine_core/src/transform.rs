//! Transform and heading utilities for spatial positioning.

use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Forward direction for a yaw angle. Heading 0 faces -Z (right-handed, Y up).
#[inline]
pub fn heading_forward(heading: f32) -> Vec3 {
    Vec3::new(-heading.sin(), 0.0, -heading.cos())
}

/// Right direction for a yaw angle.
#[inline]
pub fn heading_right(heading: f32) -> Vec3 {
    Vec3::new(heading.cos(), 0.0, -heading.sin())
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// A 3D transform representing position and yaw rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a transform from a position and a yaw angle (radians).
    pub fn from_position_heading(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(heading),
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}
