//! Error types shared by the control core

use thiserror::Error;

/// Construction time contract violations. Raised at startup, never at runtime.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("deadzone for axis '{axis}' must be in [0, 1), got {deadzone}")]
    InvalidDeadzone { axis: String, deadzone: f64 },

    #[error("scale for axis '{axis}' must be finite, got {scale}")]
    InvalidScale { axis: String, scale: f64 },

    #[error("max for axis '{axis}' must be positive and finite, got {max}")]
    InvalidMax { axis: String, max: f64 },

    #[error("step for axis '{axis}' must be in [0, {max}], got {step}")]
    InvalidStep { axis: String, step: f64, max: f64 },

    #[error("adjust for axis '{axis}' must be finite, got {adjust}")]
    InvalidAdjust { axis: String, adjust: f64 },

    #[error("axis name must not be empty")]
    EmptyAxisName,

    #[error("viewport must be at least 1x1, got {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("joystick axis {0} is bound twice")]
    DuplicateJoystickIndex(u32),

    #[error("control point for axis '{0}' is configured twice")]
    DuplicateControlPoint(String),
}

/// Mismatch between what the translator can emit and the control points that exist.
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("no control point for axis '{0}'")]
    MissingAxis(String),
}
