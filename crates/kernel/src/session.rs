use drift_common::Extent;
use drift_input::{EventResponse, InputEvent, InputState};
use serde::{Deserialize, Serialize};

use crate::physics::{self, StepReport};
use crate::skid::SkidTrail;
use crate::tuning::VehicleTuning;
use crate::vehicle::Vehicle;

/// Points awarded for every frame spent drifting.
///
/// Awarded per simulated frame, not per millisecond, so the scoring rate
/// follows the display refresh rate.
pub const DRIFT_POINTS_PER_FRAME: f64 = 1.0;

/// Accumulated drift score. Never negative, never decreases except on reset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Score(f64);

impl Score {
    pub fn add(&mut self, points: f64) {
        if points.is_finite() && points > 0.0 {
            self.0 += points;
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whole points, as shown on screen.
    pub fn display(&self) -> u64 {
        self.0.floor() as u64
    }

    pub fn reset(&mut self) {
        self.0 = 0.0;
    }
}

/// Notable changes in a session, drained by the host for logging or UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Vehicle, score, input and skid trail were reset.
    Reset,
    /// The drawing surface changed size.
    Resized { extent: Extent },
    /// The vehicle began drifting on the given frame.
    DriftStarted { frame: u64 },
    /// A drift ended after lasting `frames` frames.
    DriftEnded { frame: u64, frames: u64 },
}

/// All mutable game state: the surface size, vehicle, held input, skid trail
/// and score. Owned by the loop driver; nothing here is global.
#[derive(Debug, Clone)]
pub struct Session {
    extent: Extent,
    tuning: VehicleTuning,
    vehicle: Option<Vehicle>,
    input: InputState,
    skids: SkidTrail,
    score: Score,
    drift_streak: u64,
    frame: u64,
    events: Vec<SessionEvent>,
}

impl Session {
    /// A session with no surface size and no vehicle yet.
    pub fn new(tuning: VehicleTuning) -> Self {
        Self {
            extent: Extent::default(),
            tuning,
            vehicle: None,
            input: InputState::new(),
            skids: SkidTrail::new(),
            score: Score::default(),
            drift_streak: 0,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn skids(&self) -> &SkidTrail {
        &self.skids
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Number of physics steps applied since the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_drifting(&self) -> bool {
        self.vehicle.as_ref().is_some_and(|v| v.drifting)
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record a new surface size. The first resize also places the vehicle.
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        if self.vehicle.is_none() {
            self.place_vehicle();
        }
        self.events.push(SessionEvent::Resized { extent });
        tracing::debug!(width = extent.width, height = extent.height, "surface resized");
    }

    /// Fresh vehicle at the surface centre, zero score, no input, no skids.
    pub fn reset(&mut self) {
        self.place_vehicle();
        self.score.reset();
        self.input.release();
        self.skids.clear();
        self.drift_streak = 0;
        self.frame = 0;
        self.events.push(SessionEvent::Reset);
        tracing::debug!("session reset");
    }

    pub fn apply_input(&mut self, event: &InputEvent) -> EventResponse {
        self.input.apply(event, self.extent.midline())
    }

    /// Run one physics step. Returns `None`, leaving every field untouched,
    /// when `dt_ms` is not a positive finite duration or no vehicle exists.
    pub fn step(&mut self, dt_ms: f32) -> Option<StepReport> {
        if !physics::is_valid_dt(dt_ms) {
            tracing::trace!(dt_ms, "skipping step");
            return None;
        }
        let vehicle = self.vehicle.as_mut()?;
        let _span = tracing::info_span!("physics_step", frame = self.frame).entered();

        let report = physics::advance(vehicle, &self.input, dt_ms, self.extent);
        self.frame += 1;

        if report.drifting {
            self.score.add(DRIFT_POINTS_PER_FRAME);
            if self.drift_streak == 0 {
                self.events.push(SessionEvent::DriftStarted { frame: self.frame });
                tracing::debug!(frame = self.frame, "drift started");
            }
            self.drift_streak = self.drift_streak.saturating_add(1);
        } else if self.drift_streak > 0 {
            self.events.push(SessionEvent::DriftEnded {
                frame: self.frame,
                frames: self.drift_streak,
            });
            tracing::debug!(frames = self.drift_streak, score = self.score.display(), "drift ended");
            self.drift_streak = 0;
        }

        if report.leaves_skid() {
            self.skids.push(vehicle.rear_point());
        }
        self.skids.decay();

        Some(report)
    }

    /// Deterministic FNV-1a hash over the simulation state (events excluded).
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.extent.width.to_le_bytes());
        mix(&mut h, &self.extent.height.to_le_bytes());
        mix(&mut h, &[self.input.left() as u8, self.input.right() as u8]);
        mix(&mut h, &self.score.value().to_le_bytes());
        mix(&mut h, &self.drift_streak.to_le_bytes());
        mix(&mut h, &self.frame.to_le_bytes());
        if let Some(v) = &self.vehicle {
            for f in [
                v.position.x,
                v.position.y,
                v.heading,
                v.speed,
                v.velocity.x,
                v.velocity.y,
            ] {
                mix(&mut h, &f.to_le_bytes());
            }
            mix(&mut h, &[v.drifting as u8]);
        }
        for mark in self.skids.iter() {
            mix(&mut h, &mark.position.x.to_le_bytes());
            mix(&mut h, &mark.position.y.to_le_bytes());
            mix(&mut h, &mark.alpha().to_le_bytes());
        }
        h
    }

    fn place_vehicle(&mut self) {
        self.vehicle = Some(Vehicle::new(self.extent.center(), self.tuning));
    }
}
