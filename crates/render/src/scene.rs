use drift_common::Rgba;
use drift_kernel::{Session, SkidTrail, Vehicle};
use std::f32::consts::FRAC_PI_2;

use crate::canvas::Canvas;

/// Radius of one skid-mark dot, in pixels.
pub const SKID_DOT_RADIUS: f32 = 2.0;

/// Mark opacity is its alpha times this dimming factor.
pub const SKID_OPACITY: f32 = 0.8;

/// Depth of each headlight strip along the body, in pixels.
const HEADLIGHT_DEPTH: f32 = 5.0;

/// Colours used to draw a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Asphalt.
    pub background: Rgba,
    pub skid: Rgba,
    pub body: Rgba,
    pub headlight: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::rgb8(0x6a, 0x6a, 0x6a),
            skid: Rgba::rgb8(40, 40, 40),
            body: Rgba::rgb8(0xff, 0x44, 0x44),
            headlight: Rgba::YELLOW,
        }
    }
}

/// Draws the drift scene onto any [`Canvas`].
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    pub palette: Palette,
}

impl SceneRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Redraw the full frame from the current session.
    pub fn render(&self, session: &Session, canvas: &mut impl Canvas) {
        self.draw_background(canvas);
        self.draw_skids(session.skids(), canvas);
        if let Some(vehicle) = session.vehicle() {
            self.draw_vehicle(vehicle, canvas);
        }
    }

    /// Fill the whole surface with the background colour.
    pub fn draw_background(&self, canvas: &mut impl Canvas) {
        let size = canvas.size();
        canvas.fill_rect(0.0, 0.0, size.width, size.height, self.palette.background);
    }

    fn draw_skids(&self, skids: &SkidTrail, canvas: &mut impl Canvas) {
        for mark in skids.iter() {
            let color = self.palette.skid.with_alpha(mark.alpha() * SKID_OPACITY);
            canvas.fill_circle(mark.position.x, mark.position.y, SKID_DOT_RADIUS, color);
        }
    }

    /// Body rectangle with its long side along the heading, headlights at the
    /// two front corners.
    fn draw_vehicle(&self, vehicle: &Vehicle, canvas: &mut impl Canvas) {
        let (w, h) = (vehicle.width(), vehicle.height());

        canvas.save();
        canvas.translate(vehicle.position.x, vehicle.position.y);
        // Local -y becomes the heading direction.
        canvas.rotate(vehicle.heading + FRAC_PI_2);
        canvas.fill_rect(-w / 2.0, -h / 2.0, w, h, self.palette.body);
        canvas.fill_rect(w / 4.0, -h / 2.0, w / 4.0, HEADLIGHT_DEPTH, self.palette.headlight);
        canvas.fill_rect(-w / 2.0, -h / 2.0, w / 4.0, HEADLIGHT_DEPTH, self.palette.headlight);
        canvas.restore();
    }
}
