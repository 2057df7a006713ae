//! wgpu render backend for the drift toy.
//!
//! Draws the flat-coloured triangle list produced by
//! [`drift_render::Tessellator`] with one alpha-blended pipeline and a
//! pixel-space orthographic projection.
//!
//! # Invariants
//! - Renderer never mutates session state; it only sees vertices.
//! - One vertex upload and one render pass per frame.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
