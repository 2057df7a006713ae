use bytemuck::{Pod, Zeroable};
use drift_common::{Extent, Rgba};
use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

use crate::canvas::Canvas;

/// Triangles per filled circle.
const CIRCLE_SEGMENTS: usize = 12;

/// One vertex of a flat-coloured triangle, in surface pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Canvas that flattens primitives into a triangle list.
///
/// Keeps a canvas-style transform stack; every emitted vertex is already in
/// surface space, so a backend only needs a pixel-to-clip projection.
#[derive(Debug, Clone)]
pub struct Tessellator {
    size: Extent,
    transform: Affine2,
    stack: Vec<Affine2>,
    vertices: Vec<ColorVertex>,
}

impl Tessellator {
    pub fn new(size: Extent) -> Self {
        Self {
            size,
            transform: Affine2::IDENTITY,
            stack: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Start a new frame at `size`, keeping the vertex allocation.
    pub fn begin(&mut self, size: Extent) {
        self.size = size;
        self.transform = Affine2::IDENTITY;
        self.stack.clear();
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[ColorVertex] {
        &self.vertices
    }

    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for p in [a, b, c] {
            let p = self.transform.transform_point2(p);
            self.vertices.push(ColorVertex {
                position: p.to_array(),
                color,
            });
        }
    }
}

impl Canvas for Tessellator {
    fn size(&self) -> Extent {
        self.size
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        let color = color.to_array();
        let tl = Vec2::new(x, y);
        let tr = Vec2::new(x + width, y);
        let br = Vec2::new(x + width, y + height);
        let bl = Vec2::new(x, y + height);
        self.push_triangle(tl, tr, br, color);
        self.push_triangle(br, bl, tl, color);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        let color = color.to_array();
        let center = Vec2::new(cx, cy);
        let rim = |i: usize| center + Vec2::from_angle(i as f32 / CIRCLE_SEGMENTS as f32 * TAU) * radius;
        for i in 0..CIRCLE_SEGMENTS {
            self.push_triangle(center, rim(i), rim(i + 1), color);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        } else {
            tracing::warn!("unbalanced canvas restore ignored");
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform * Affine2::from_translation(Vec2::new(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.transform = self.transform * Affine2::from_angle(radians);
    }
}
