//! The per-frame vehicle update: steering, drive, friction, the drift slip
//! model, integration and boundary bounce.

use drift_common::Extent;
use drift_input::InputState;
use glam::Vec2;
use std::f32::consts::{PI, TAU};

use crate::vehicle::Vehicle;

/// Frame duration the forward force is normalised against, in milliseconds.
pub const REFERENCE_FRAME_MS: f32 = 16.67;

/// Minimum |heading - movement direction| for a drift, in radians.
pub const DRIFT_ANGLE_THRESHOLD: f32 = 0.5;

/// Minimum velocity magnitude for a drift, in pixels per frame.
pub const DRIFT_SPEED_THRESHOLD: f32 = 1.5;

/// Minimum velocity magnitude for leaving a skid mark.
pub const SKID_SPEED_THRESHOLD: f32 = 1.0;

/// Velocity multiplier (with sign flip) on hitting an edge.
pub const BOUNCE_RESTITUTION: f32 = 0.5;

/// What one physics step observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub drifting: bool,
    /// Velocity magnitude measured before the slip model was applied.
    pub speed_magnitude: f32,
    /// Normalised heading minus movement direction.
    pub angle_diff: f32,
}

impl StepReport {
    pub fn leaves_skid(&self) -> bool {
        self.drifting && self.speed_magnitude > SKID_SPEED_THRESHOLD
    }
}

/// Whether an elapsed time can drive a step at all.
pub fn is_valid_dt(dt_ms: f32) -> bool {
    dt_ms.is_finite() && dt_ms > 0.0
}

/// Wrap an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    PI - (PI - angle).rem_euclid(TAU)
}

/// Advance `vehicle` by one frame.
///
/// Callers must reject invalid `dt_ms` with [`is_valid_dt`] first; this
/// function assumes a positive elapsed time.
pub fn advance(vehicle: &mut Vehicle, input: &InputState, dt_ms: f32, bounds: Extent) -> StepReport {
    let tuning = vehicle.tuning;

    if input.left() {
        vehicle.heading -= tuning.turn_rate;
    }
    if input.right() {
        vehicle.heading += tuning.turn_rate;
    }

    vehicle.speed = (vehicle.speed + tuning.acceleration).min(tuning.max_speed);

    let drive = vehicle.forward() * vehicle.speed;
    vehicle.velocity += drive * (dt_ms / REFERENCE_FRAME_MS);
    vehicle.velocity *= tuning.friction;

    let report = detect_drift(vehicle);
    vehicle.drifting = report.drifting;
    if report.drifting {
        vehicle.velocity = slip(
            vehicle.velocity,
            report.angle_diff,
            report.speed_magnitude,
            tuning.drift_retention,
        );
    }

    vehicle.position += vehicle.velocity;
    clamp_to_bounds(vehicle, bounds);

    report
}

/// Compare heading with the movement direction. A zero velocity is never a
/// drift and never feeds `atan2` a degenerate vector.
fn detect_drift(vehicle: &Vehicle) -> StepReport {
    let speed_magnitude = vehicle.speed_magnitude();
    if speed_magnitude <= f32::EPSILON {
        return StepReport {
            drifting: false,
            speed_magnitude,
            angle_diff: 0.0,
        };
    }
    let movement_dir = vehicle.velocity.y.atan2(vehicle.velocity.x);
    let angle_diff = normalize_angle(vehicle.heading - movement_dir);
    StepReport {
        drifting: angle_diff.abs() > DRIFT_ANGLE_THRESHOLD
            && speed_magnitude > DRIFT_SPEED_THRESHOLD,
        speed_magnitude,
        angle_diff,
    }
}

/// Heuristic slip: split the velocity into components along and across its
/// own direction, keep `retention` of the lateral part, and rotate back.
fn slip(velocity: Vec2, angle_diff: f32, speed_magnitude: f32, retention: f32) -> Vec2 {
    let movement_dir = velocity.y.atan2(velocity.x);
    let forward = angle_diff.cos() * speed_magnitude;
    let sideways = angle_diff.sin() * speed_magnitude * retention;
    Vec2::from_angle(movement_dir).rotate(Vec2::new(forward, sideways))
}

/// Keep the body inside the surface, bouncing softly off each edge.
fn clamp_to_bounds(vehicle: &mut Vehicle, bounds: Extent) {
    let half = vehicle.half_extent();

    if vehicle.position.x - half.x < 0.0 {
        vehicle.position.x = half.x;
        vehicle.velocity.x *= -BOUNCE_RESTITUTION;
    }
    if vehicle.position.x + half.x > bounds.width {
        vehicle.position.x = bounds.width - half.x;
        vehicle.velocity.x *= -BOUNCE_RESTITUTION;
    }
    if vehicle.position.y - half.y < 0.0 {
        vehicle.position.y = half.y;
        vehicle.velocity.y *= -BOUNCE_RESTITUTION;
    }
    if vehicle.position.y + half.y > bounds.height {
        vehicle.position.y = bounds.height - half.y;
        vehicle.velocity.y *= -BOUNCE_RESTITUTION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::VehicleTuning;
    use drift_input::Side;

    const BOUNDS: Extent = Extent {
        width: 400.0,
        height: 800.0,
    };

    fn parked() -> Vehicle {
        Vehicle::new(BOUNDS.center(), VehicleTuning::default())
    }

    #[test]
    fn normalize_angle_range() {
        assert_eq!(normalize_angle(PI), PI);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(PI + 0.5) - (0.5 - PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-6);
        assert!((normalize_angle(-7.0) - (-7.0 + TAU)).abs() < 1e-5);
        for i in -50..50 {
            let a = normalize_angle(i as f32 * 0.7);
            assert!(a > -PI - 1e-5 && a <= PI + 1e-5, "{a}");
        }
    }

    #[test]
    fn dt_validity() {
        assert!(is_valid_dt(16.67));
        assert!(!is_valid_dt(0.0));
        assert!(!is_valid_dt(-3.0));
        assert!(!is_valid_dt(f32::NAN));
        assert!(!is_valid_dt(f32::INFINITY));
    }

    #[test]
    fn single_step_from_rest() {
        let mut v = parked();
        let start = v.position;
        let report = advance(&mut v, &InputState::new(), REFERENCE_FRAME_MS, BOUNDS);

        let tuning = VehicleTuning::default();
        assert_eq!(v.heading, crate::vehicle::START_HEADING);
        assert_eq!(v.speed, tuning.acceleration);
        assert!(v.velocity.y < 0.0);
        assert!(v.velocity.x.abs() < 1e-6);
        let expected = tuning.acceleration * tuning.friction;
        assert!((v.velocity.length() - expected).abs() < 1e-6);
        assert!(!report.drifting);
        assert!(!v.drifting);
        assert!((v.position - (start + v.velocity)).length() < 1e-4);
    }

    #[test]
    fn force_scales_with_dt() {
        let mut a = parked();
        let mut b = parked();
        advance(&mut a, &InputState::new(), REFERENCE_FRAME_MS, BOUNDS);
        advance(&mut b, &InputState::new(), REFERENCE_FRAME_MS * 2.0, BOUNDS);
        assert!((b.velocity.length() - 2.0 * a.velocity.length()).abs() < 1e-5);
    }

    #[test]
    fn steering_changes_heading_by_turn_rate() {
        let mut input = InputState::new();
        let mut v = parked();
        input.press(Side::Left);
        advance(&mut v, &input, REFERENCE_FRAME_MS, BOUNDS);
        assert_eq!(v.heading, crate::vehicle::START_HEADING - 0.06);

        let mut v = parked();
        input.press(Side::Right);
        advance(&mut v, &input, REFERENCE_FRAME_MS, BOUNDS);
        assert_eq!(v.heading, crate::vehicle::START_HEADING + 0.06);
    }

    #[test]
    fn speed_caps_at_max() {
        let mut v = parked();
        for _ in 0..200 {
            advance(&mut v, &InputState::new(), REFERENCE_FRAME_MS, BOUNDS);
        }
        assert_eq!(v.speed, v.tuning.max_speed);
    }

    #[test]
    fn zero_velocity_is_not_a_drift() {
        let mut v = parked();
        v.heading = 2.0;
        let report = detect_drift(&v);
        assert!(!report.drifting);
        assert_eq!(report.speed_magnitude, 0.0);
        assert!(report.angle_diff.is_finite());
    }

    #[test]
    fn sideways_motion_is_a_drift() {
        let mut v = parked();
        // Heading up, moving right at speed 3.
        v.velocity = Vec2::new(3.0, 0.0);
        let report = detect_drift(&v);
        assert!(report.drifting);
        assert!((report.angle_diff + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn slow_sideways_motion_is_not_a_drift() {
        let mut v = parked();
        v.velocity = Vec2::new(1.4, 0.0);
        assert!(!detect_drift(&v).drifting);
    }

    #[test]
    fn slip_decomposition_matches_formula() {
        let velocity = Vec2::new(3.0, 4.0);
        let m = velocity.y.atan2(velocity.x);
        let diff = 0.8_f32;
        let mag = velocity.length();
        let retention = 0.9;
        let out = slip(velocity, diff, mag, retention);

        let fwd = diff.cos() * mag;
        let side = diff.sin() * mag * retention;
        let ex = m.cos() * fwd - m.sin() * side;
        let ey = m.sin() * fwd + m.cos() * side;
        assert!((out.x - ex).abs() < 1e-4);
        assert!((out.y - ey).abs() < 1e-4);
    }

    #[test]
    fn full_retention_only_rotates() {
        let velocity = Vec2::new(0.0, -5.0);
        let out = slip(velocity, 0.7, velocity.length(), 1.0);
        assert!((out.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn bounce_off_left_edge() {
        let mut v = parked();
        v.position = Vec2::new(5.0, 400.0);
        v.velocity = Vec2::new(-2.0, 0.0);
        clamp_to_bounds(&mut v, BOUNDS);
        assert_eq!(v.position.x, 10.0);
        assert_eq!(v.velocity.x, 1.0);
    }

    #[test]
    fn bounce_off_bottom_right_corner() {
        let mut v = parked();
        v.position = Vec2::new(395.0, 790.0);
        v.velocity = Vec2::new(4.0, 6.0);
        clamp_to_bounds(&mut v, BOUNDS);
        assert_eq!(v.position, Vec2::new(390.0, 780.0));
        assert_eq!(v.velocity, Vec2::new(-2.0, -3.0));
    }

    #[test]
    fn stays_in_bounds_while_circling() {
        let small = Extent::new(120.0, 160.0);
        let mut v = Vehicle::new(small.center(), VehicleTuning::default());
        let mut input = InputState::new();
        input.press(Side::Right);
        for _ in 0..2000 {
            advance(&mut v, &input, REFERENCE_FRAME_MS, small);
            let half = v.half_extent();
            assert!(v.position.x - half.x >= 0.0);
            assert!(v.position.x + half.x <= small.width);
            assert!(v.position.y - half.y >= 0.0);
            assert!(v.position.y + half.y <= small.height);
        }
    }
}
