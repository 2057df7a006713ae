//! Input Tracker: pointer and touch events mapped to left/right steering.
//!
//! # Invariants
//! - At most one of left/right is held at any time.
//! - Any end/cancel/leave event releases both sides.
//! - The simulation reads [`InputState`], never raw events.

pub mod event;
pub mod state;

pub use event::{EventResponse, InputEvent};
pub use state::{InputState, Side};
