//! Rendering Adapter: a canvas-style drawing interface and the scene renderer.
//!
//! # Invariants
//! - Rendering is a pure read of session state; nothing here takes `&mut Session`.
//! - Frames are drawn back to front: background, skid marks oldest first, vehicle.
//!
//! [`SceneRenderer`] issues primitives through the [`Canvas`] trait. Two
//! canvases ship here: [`Tessellator`], which turns primitives into coloured
//! triangles for a GPU backend, and [`DrawRecorder`], which records the calls
//! for tests and headless inspection.

mod canvas;
mod recorder;
mod scene;
mod tessellate;

pub use canvas::Canvas;
pub use recorder::{DrawCommand, DrawRecorder};
pub use scene::{Palette, SKID_DOT_RADIUS, SKID_OPACITY, SceneRenderer};
pub use tessellate::{ColorVertex, Tessellator};
