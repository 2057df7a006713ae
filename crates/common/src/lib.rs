//! Shared types used by the simulation, the input tracker and the renderers.

pub mod types;

pub use types::{Extent, Rgba};
