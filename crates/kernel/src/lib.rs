//! Drift kernel: vehicle state, the per-frame physics step, skid trail,
//! scoring and the loop driver that sequences input, simulation and frames.
//!
//! # Invariants
//! - A step with non-positive or non-finite elapsed time changes nothing.
//! - The skid trail never holds more than [`MAX_SKID_MARKS`] marks.
//! - Score only grows, and only on drifting frames.
//! - After a step the vehicle body lies inside the surface bounds.
//! - Input and ticks are applied through `&mut` access on one thread, so they
//!   never interleave mid-update.

pub mod driver;
pub mod physics;
pub mod session;
pub mod skid;
pub mod tuning;
pub mod vehicle;

pub use driver::{LoopDriver, Phase, TickOutcome};
pub use physics::StepReport;
pub use session::{Score, Session, SessionEvent};
pub use skid::{MAX_SKID_MARKS, SkidMark, SkidTrail};
pub use tuning::{TuningError, VehicleTuning};
pub use vehicle::Vehicle;
