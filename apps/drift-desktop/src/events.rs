use drift_input::InputEvent;
use std::time::Instant;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, TouchPhase};

/// Map a mouse button change at the last known cursor position.
///
/// A press with no known cursor position (the cursor never entered the
/// window) is dropped.
pub fn pointer_event(
    state: ElementState,
    cursor: Option<PhysicalPosition<f64>>,
) -> Option<InputEvent> {
    match state {
        ElementState::Pressed => cursor.map(|p| InputEvent::PointerDown {
            x: p.x as f32,
            y: p.y as f32,
        }),
        ElementState::Released => Some(InputEvent::PointerUp),
    }
}

/// Map a touch phase. Moves do not change steering.
pub fn touch_event(phase: TouchPhase, location: PhysicalPosition<f64>) -> Option<InputEvent> {
    match phase {
        TouchPhase::Started => Some(InputEvent::TouchStart {
            x: location.x as f32,
            y: location.y as f32,
        }),
        TouchPhase::Ended => Some(InputEvent::TouchEnd),
        TouchPhase::Cancelled => Some(InputEvent::TouchCancel),
        TouchPhase::Moved => None,
    }
}

/// High-resolution frame timestamps in milliseconds since app start.
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
