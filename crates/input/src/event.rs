/// A raw input event delivered by the host window or page.
///
/// Coordinates are surface-relative pixels, the same space the simulation
/// and the renderer use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp,
    /// Pointer left the surface while possibly still pressed.
    PointerLeave,
    TouchStart { x: f32, y: f32 },
    TouchEnd,
    TouchCancel,
}

impl InputEvent {
    /// True for events that begin a press (and may start the game).
    pub fn is_start(&self) -> bool {
        matches!(self, Self::PointerDown { .. } | Self::TouchStart { .. })
    }

    /// True for events that release any held side.
    pub fn is_end(&self) -> bool {
        !self.is_start()
    }

    /// Horizontal coordinate of a start event.
    pub fn x(&self) -> Option<f32> {
        match *self {
            Self::PointerDown { x, .. } | Self::TouchStart { x, .. } => Some(x),
            _ => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchStart { .. } | Self::TouchEnd | Self::TouchCancel
        )
    }
}

/// What the host should do with an event after the tracker consumed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// Default platform gesture handling (scroll, zoom, UI overlays) must not
    /// see this event.
    pub suppress_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_end_classification() {
        assert!(InputEvent::PointerDown { x: 1.0, y: 2.0 }.is_start());
        assert!(InputEvent::TouchStart { x: 1.0, y: 2.0 }.is_start());
        assert!(InputEvent::PointerUp.is_end());
        assert!(InputEvent::PointerLeave.is_end());
        assert!(InputEvent::TouchEnd.is_end());
        assert!(InputEvent::TouchCancel.is_end());
    }

    #[test]
    fn only_start_events_carry_x() {
        assert_eq!(InputEvent::TouchStart { x: 3.5, y: 0.0 }.x(), Some(3.5));
        assert_eq!(InputEvent::TouchCancel.x(), None);
    }

    #[test]
    fn touch_classification() {
        assert!(InputEvent::TouchEnd.is_touch());
        assert!(!InputEvent::PointerLeave.is_touch());
    }
}
