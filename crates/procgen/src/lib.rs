//! Procedural generation for the drive terrain and its static obstacles.

pub mod scatter;
pub mod terrain;

pub use scatter::*;
pub use terrain::*;
