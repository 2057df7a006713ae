use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::tuning::VehicleTuning;

/// Heading of a freshly placed vehicle: pointing up the screen.
///
/// Angles follow screen coordinates: 0 is right, `PI / 2` is down.
pub const START_HEADING: f32 = -FRAC_PI_2;

/// Kinematic state of the car plus its tuning constants.
///
/// `heading` is where the body points; `velocity` is where it actually moves.
/// The two diverge while drifting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vec2,
    pub heading: f32,
    /// Signed forward drive magnitude. Only grows; friction acts on velocity.
    pub speed: f32,
    pub velocity: Vec2,
    pub drifting: bool,
    pub tuning: VehicleTuning,
}

impl Vehicle {
    /// Place a vehicle at rest at `position`, heading up.
    pub fn new(position: Vec2, tuning: VehicleTuning) -> Self {
        Self {
            position,
            heading: START_HEADING,
            speed: 0.0,
            velocity: Vec2::ZERO,
            drifting: false,
            tuning,
        }
    }

    pub fn width(&self) -> f32 {
        self.tuning.width
    }

    pub fn height(&self) -> f32 {
        self.tuning.height
    }

    /// Half the body extent on each axis, as used for boundary clamping.
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height) / 2.0
    }

    /// Unit vector along the heading.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Magnitude of the actual velocity.
    pub fn speed_magnitude(&self) -> f32 {
        self.velocity.length()
    }

    /// Point half a body length behind the centre, along the reverse heading.
    pub fn rear_point(&self) -> Vec2 {
        self.position + Vec2::from_angle(self.heading + PI) * (self.tuning.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vehicle_is_at_rest_heading_up() {
        let v = Vehicle::new(Vec2::new(100.0, 200.0), VehicleTuning::default());
        assert_eq!(v.position, Vec2::new(100.0, 200.0));
        assert_eq!(v.heading, START_HEADING);
        assert_eq!(v.speed, 0.0);
        assert_eq!(v.velocity, Vec2::ZERO);
        assert!(!v.drifting);
    }

    #[test]
    fn forward_points_up_at_start() {
        let v = Vehicle::new(Vec2::ZERO, VehicleTuning::default());
        let f = v.forward();
        assert!(f.x.abs() < 1e-6);
        assert!((f.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn rear_point_is_half_length_behind() {
        let v = Vehicle::new(Vec2::new(50.0, 50.0), VehicleTuning::default());
        let rear = v.rear_point();
        // Heading up means the rear sits below the centre.
        assert!((rear.x - 50.0).abs() < 1e-4);
        assert!((rear.y - 70.0).abs() < 1e-4);
    }

    #[test]
    fn half_extent_uses_body_size() {
        let v = Vehicle::new(Vec2::ZERO, VehicleTuning::default());
        assert_eq!(v.half_extent(), Vec2::new(10.0, 20.0));
    }
}
