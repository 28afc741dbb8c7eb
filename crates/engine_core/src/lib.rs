//! Core engine types and utilities for the rover drive.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Transform and heading helpers
//! - Frame time management
//! - Clamped resource pools
//! - The input snapshot and world-query contracts between the simulation and its collaborators

pub mod components;
pub mod controls;
pub mod query;
pub mod time;
pub mod transform;

pub use components::*;
pub use controls::*;
pub use query::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3};
