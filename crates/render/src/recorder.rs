use drift_common::{Extent, Rgba};
use std::fmt;

use crate::canvas::Canvas;

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgba,
    },
    Save,
    Restore,
    Translate {
        dx: f32,
        dy: f32,
    },
    Rotate {
        radians: f32,
    },
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => write!(
                f,
                "fill_rect ({x:.2}, {y:.2}) {width:.2}x{height:.2} rgba({:.0}, {:.0}, {:.0}, {:.2})",
                color.r * 255.0,
                color.g * 255.0,
                color.b * 255.0,
                color.a
            ),
            Self::FillCircle {
                cx,
                cy,
                radius,
                color,
            } => write!(
                f,
                "fill_circle ({cx:.2}, {cy:.2}) r={radius:.2} rgba({:.0}, {:.0}, {:.0}, {:.2})",
                color.r * 255.0,
                color.g * 255.0,
                color.b * 255.0,
                color.a
            ),
            Self::Save => write!(f, "save"),
            Self::Restore => write!(f, "restore"),
            Self::Translate { dx, dy } => write!(f, "translate ({dx:.2}, {dy:.2})"),
            Self::Rotate { radians } => write!(f, "rotate {radians:.4}"),
        }
    }
}

/// Canvas that records every call instead of drawing.
///
/// Useful for tests, logging and headless frame dumps.
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    size: Extent,
    commands: Vec<DrawCommand>,
}

impl DrawRecorder {
    pub fn new(size: Extent) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Canvas for DrawRecorder {
    fn size(&self) -> Extent {
        self.size
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            cx,
            cy,
            radius,
            color,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate { radians });
    }
}
