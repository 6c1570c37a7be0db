//! Deadzone filtering and normalisation for continuous inputs

use crate::control::Action;
use crate::error::ConfigError;
use tracing::{debug, warn};

/// Normalises joystick or pointer readings for one axis.
///
/// Readings inside the deadzone become 0. Outside it the deadzone is
/// subtracted and the remainder rescaled, so the extremes still reach
/// `±scale`. Results are rounded to three decimals and only emitted when they
/// differ from the last emitted value.
#[derive(Debug, Clone)]
pub struct AnalogueAxis {
    axis: String,
    deadzone: f64,
    scale: f64,
    last: f64,
}

impl AnalogueAxis {
    pub fn new(axis: impl Into<String>, scale: f64, deadzone: f64) -> Result<Self, ConfigError> {
        let axis = axis.into();
        if axis.is_empty() {
            return Err(ConfigError::EmptyAxisName);
        }
        if !(deadzone.is_finite() && (0.0..1.0).contains(&deadzone)) {
            return Err(ConfigError::InvalidDeadzone { axis, deadzone });
        }
        if !scale.is_finite() {
            return Err(ConfigError::InvalidScale { axis, scale });
        }

        Ok(Self {
            axis,
            deadzone,
            scale: scale / (1.0 - deadzone),
            last: 0.0,
        })
    }

    pub fn axis(&self) -> &str {
        &self.axis
    }

    /// Scale after compensating for the deadzone
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn last(&self) -> f64 {
        self.last
    }

    pub fn normalise(&self, raw: f64) -> f64 {
        if raw.abs() < self.deadzone {
            return 0.0;
        }
        let shifted = if raw > 0.0 {
            raw - self.deadzone
        } else {
            raw + self.deadzone
        };
        round3(shifted * self.scale)
    }

    /// At most one action, none when the normalised value did not change or
    /// the reading is not a number
    pub fn handle_reading(&mut self, raw: f64) -> Vec<Action> {
        if !raw.is_finite() {
            warn!("{}: ignoring non-finite reading {}", self.axis, raw);
            return Vec::new();
        }
        let value = self.normalise(raw);
        if value == self.last {
            return Vec::new();
        }
        debug!("{}: {:.3} -> {:.3}", self.axis, self.last, value);
        self.last = value;
        vec![Action::analogue(self.axis.as_str(), value)]
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
