use drift_common::{Extent, Rgba};

/// A 2D drawing surface with a canvas-style transform stack.
///
/// Coordinates are surface pixels, y down. `translate` and `rotate` compose
/// onto the current transform; `save`/`restore` push and pop it.
pub trait Canvas {
    /// Current pixel dimensions of the surface.
    fn size(&self) -> Extent;

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);

    fn save(&mut self);

    /// Pop the last saved transform. Unbalanced restores are ignored.
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn rotate(&mut self, radians: f32);
}
