use crate::event::{EventResponse, InputEvent};

/// Which half of the surface is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Left when `x` is strictly before the midline, right otherwise.
    pub fn from_x(x: f32, midline: f32) -> Self {
        if x < midline { Self::Left } else { Self::Right }
    }
}

/// Held steering state. Left and right are mutually exclusive by construction:
/// pressing one side always clears the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    left: bool,
    right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(&self) -> bool {
        self.left
    }

    pub fn right(&self) -> bool {
        self.right
    }

    pub fn held(&self) -> Option<Side> {
        match (self.left, self.right) {
            (true, _) => Some(Side::Left),
            (_, true) => Some(Side::Right),
            _ => None,
        }
    }

    pub fn press(&mut self, side: Side) {
        self.left = side == Side::Left;
        self.right = side == Side::Right;
    }

    pub fn release(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Apply a raw event against a surface whose horizontal midline is `midline`.
    pub fn apply(&mut self, event: &InputEvent, midline: f32) -> EventResponse {
        match event.x() {
            Some(x) => {
                let side = Side::from_x(x, midline);
                self.press(side);
                tracing::trace!(?side, x, "steer press");
            }
            None => {
                self.release();
                tracing::trace!("steer release");
            }
        }
        EventResponse {
            suppress_default: event.is_touch(),
        }
    }
}
