use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating vehicle tuning.
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must lie in {range}, got {value}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f32,
    },
}

/// Per-vehicle constants. Rates are per reference frame (16.67 ms).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Body width across the heading, in pixels.
    pub width: f32,
    /// Body length along the heading, in pixels.
    pub height: f32,
    /// Speed gained every frame.
    pub acceleration: f32,
    pub max_speed: f32,
    /// Heading change per frame while a side is held, in radians.
    pub turn_rate: f32,
    /// Velocity multiplier applied every frame, in `(0, 1]`.
    pub friction: f32,
    /// Share of sideways velocity kept while drifting, in `[0, 1]`.
    pub drift_retention: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 40.0,
            acceleration: 0.08,
            max_speed: 4.0,
            turn_rate: 0.06,
            friction: 0.97,
            drift_retention: 0.9,
        }
    }
}

impl VehicleTuning {
    /// Parse YAML; omitted fields keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_yaml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?tuning, "loaded vehicle tuning");
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("acceleration", self.acceleration),
            ("max_speed", self.max_speed),
            ("turn_rate", self.turn_rate),
            ("friction", self.friction),
            ("drift_retention", self.drift_retention),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("acceleration", self.acceleration),
            ("max_speed", self.max_speed),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if self.turn_rate < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "turn_rate",
                range: "[0, inf)",
                value: self.turn_rate,
            });
        }
        if self.friction <= 0.0 || self.friction > 1.0 {
            return Err(TuningError::OutOfRange {
                field: "friction",
                range: "(0, 1]",
                value: self.friction,
            });
        }
        if !(0.0..=1.0).contains(&self.drift_retention) {
            return Err(TuningError::OutOfRange {
                field: "drift_retention",
                range: "[0, 1]",
                value: self.drift_retention,
            });
        }
        Ok(())
    }
}
