use drift_common::Extent;
use drift_input::{EventResponse, InputEvent};

use crate::physics::StepReport;
use crate::session::Session;
use crate::tuning::VehicleTuning;

/// Lifecycle of the game. `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the first press; the start prompt is visible.
    #[default]
    Idle,
    Running,
}

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The game has not started; nothing was simulated.
    Idle,
    /// Elapsed time was not positive; the physics step was skipped.
    Skipped,
    /// One physics step ran and the frame should be drawn.
    Stepped(StepReport),
}

impl TickOutcome {
    pub fn should_render(&self) -> bool {
        matches!(self, Self::Stepped(_))
    }
}

/// Sequences input, physics and frame scheduling on a single thread.
///
/// Timestamps are high-resolution milliseconds from any monotonic origin.
/// The host calls [`LoopDriver::request_frame`] after every tick and schedules
/// a redraw only when it returns `true`, so at most one frame request is ever
/// outstanding.
#[derive(Debug, Clone)]
pub struct LoopDriver {
    session: Session,
    phase: Phase,
    last_timestamp_ms: f64,
    frame_pending: bool,
}

impl LoopDriver {
    pub fn new(tuning: VehicleTuning) -> Self {
        Self {
            session: Session::new(tuning),
            phase: Phase::Idle,
            last_timestamp_ms: 0.0,
            frame_pending: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// The start prompt shows until the first press and never again.
    pub fn prompt_visible(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Score as displayed: whole points.
    pub fn score_display(&self) -> u64 {
        self.session.score().display()
    }

    pub fn resize(&mut self, extent: Extent) {
        self.session.resize(extent);
    }

    /// Feed one input event. The first start event also starts the game.
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) -> EventResponse {
        if event.is_start() && self.phase == Phase::Idle {
            self.start(now_ms);
        }
        self.session.apply_input(&event)
    }

    /// Ask whether the host should schedule another frame callback.
    pub fn request_frame(&mut self) -> bool {
        if self.phase != Phase::Running || self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Handle one frame callback at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        self.frame_pending = false;
        if self.phase == Phase::Idle {
            return TickOutcome::Idle;
        }

        // Subtract in f64 so large timestamps keep their precision; only the
        // frame delta is narrowed.
        let dt_ms = (now_ms - self.last_timestamp_ms) as f32;
        self.last_timestamp_ms = now_ms;

        match self.session.step(dt_ms) {
            Some(report) => TickOutcome::Stepped(report),
            None => TickOutcome::Skipped,
        }
    }

    fn start(&mut self, now_ms: f64) {
        self.phase = Phase::Running;
        self.session.reset();
        self.last_timestamp_ms = now_ms;
        self.frame_pending = false;
        tracing::info!("game started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_input::Side;

    const FRAME: f64 = 16.67;

    fn driver() -> LoopDriver {
        let mut d = LoopDriver::new(VehicleTuning::default());
        d.resize(Extent::new(400.0, 800.0));
        d
    }

    #[test]
    fn idle_until_first_press() {
        let mut d = driver();
        assert_eq!(d.phase(), Phase::Idle);
        assert!(d.prompt_visible());
        assert_eq!(d.tick(100.0), TickOutcome::Idle);
        assert!(!d.request_frame());
    }

    #[test]
    fn end_event_while_idle_does_not_start() {
        let mut d = driver();
        d.handle_input(InputEvent::PointerUp, 5.0);
        d.handle_input(InputEvent::TouchCancel, 6.0);
        assert_eq!(d.phase(), Phase::Idle);
    }

    #[test]
    fn first_press_starts_resets_and_steers() {
        let mut d = driver();
        d.handle_input(InputEvent::TouchStart { x: 390.0, y: 10.0 }, 1000.0);
        assert!(d.is_running());
        assert!(!d.prompt_visible());
        assert_eq!(d.session().input().held(), Some(Side::Right));
        assert_eq!(d.score_display(), 0);
        assert_eq!(
            d.session().events().last(),
            Some(&crate::session::SessionEvent::Reset)
        );
    }

    #[test]
    fn running_is_terminal() {
        let mut d = driver();
        d.handle_input(InputEvent::PointerDown { x: 1.0, y: 1.0 }, 0.0);
        for i in 1..=50 {
            d.tick(i as f64 * FRAME);
        }
        let frame = d.session().frame();
        d.handle_input(InputEvent::PointerUp, 900.0);
        d.handle_input(InputEvent::PointerDown { x: 1.0, y: 1.0 }, 901.0);
        assert!(d.is_running());
        // A second press steers but does not reset.
        assert_eq!(d.session().frame(), frame);
    }

    #[test]
    fn tick_uses_elapsed_time_since_start() {
        let mut d = driver();
        d.handle_input(InputEvent::PointerDown { x: 300.0, y: 0.0 }, 500.0);
        let outcome = d.tick(500.0 + FRAME);
        assert!(outcome.should_render());
        assert_eq!(d.session().frame(), 1);
    }

    #[test]
    fn long_running_clock_keeps_frame_delta() {
        let mut d = driver();
        let start = 3.6e9;
        d.handle_input(InputEvent::PointerDown { x: 300.0, y: 0.0 }, start);
        let mut reference = driver();
        reference.handle_input(InputEvent::PointerDown { x: 300.0, y: 0.0 }, 0.0);
        for i in 1..=10 {
            assert!(d.tick(start + i as f64 * FRAME).should_render());
            reference.tick(i as f64 * FRAME);
        }
        let a = d.session().vehicle().unwrap().position;
        let b = reference.session().vehicle().unwrap().position;
        assert!((a - b).length() < 1e-3);
    }

    #[test]
    fn non_positive_elapsed_skips_step() {
        let mut d = driver();
        d.handle_input(InputEvent::PointerDown { x: 300.0, y: 0.0 }, 500.0);
        // Frame timestamp earlier than the start reference.
        let hash = d.session().state_hash();
        assert_eq!(d.tick(490.0), TickOutcome::Skipped);
        assert_eq!(d.session().state_hash(), hash);
        // Same timestamp twice.
        d.tick(520.0);
        let hash = d.session().state_hash();
        assert_eq!(d.tick(520.0), TickOutcome::Skipped);
        assert_eq!(d.session().state_hash(), hash);
        // Scheduling continues after a skip.
        assert!(d.request_frame());
    }

    #[test]
    fn at_most_one_outstanding_frame() {
        let mut d = driver();
        d.handle_input(InputEvent::PointerDown { x: 300.0, y: 0.0 }, 0.0);
        assert!(d.request_frame());
        assert!(!d.request_frame());
        d.tick(FRAME);
        assert!(d.request_frame());
        assert!(!d.request_frame());
    }

    #[test]
    fn score_display_tracks_drift_frames() {
        let mut d = LoopDriver::new(VehicleTuning::default());
        d.resize(Extent::new(100_000.0, 100_000.0));
        d.handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 }, 0.0);
        let mut drifting = 0u64;
        for i in 1..=600 {
            if let TickOutcome::Stepped(r) = d.tick(i as f64 * FRAME) {
                drifting += r.drifting as u64;
            }
        }
        assert!(drifting > 0);
        assert_eq!(d.score_display(), drifting);
    }
}
