//! Action vocabulary
//!
//! The only operations allowed to change a [`ControlPoint`](super::ControlPoint)
//! or to signal a session level event.

use std::fmt;

/// Instruction produced by the translator and consumed by the applier.
///
/// Payload ranges:
/// - `AnalogueSet`: `value` in `[-1, 1]`, becomes `value * max`
/// - `DigitalSet`: `value` in `{-1, 0, 1}`, becomes `value * step`
/// - `StepAbsolute`: `value` in `[-1, 1]`, becomes the step `value * max`
/// - `StepRelative`: step changes by `value * adjust`
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Zero every axis
    Stop,
    /// End the session
    Quit,
    AnalogueSet { axis: String, value: f64 },
    DigitalSet { axis: String, value: i8 },
    StepAbsolute { axis: String, value: f64 },
    StepRelative { axis: String, value: f64 },
}

impl Action {
    pub fn analogue(axis: impl Into<String>, value: f64) -> Self {
        Action::AnalogueSet {
            axis: axis.into(),
            value,
        }
    }

    pub fn digital(axis: impl Into<String>, value: i8) -> Self {
        Action::DigitalSet {
            axis: axis.into(),
            value,
        }
    }

    pub fn step_absolute(axis: impl Into<String>, value: f64) -> Self {
        Action::StepAbsolute {
            axis: axis.into(),
            value,
        }
    }

    pub fn step_relative(axis: impl Into<String>, value: f64) -> Self {
        Action::StepRelative {
            axis: axis.into(),
            value,
        }
    }

    /// Target axis, `None` for the session level variants
    pub fn axis(&self) -> Option<&str> {
        match self {
            Action::Stop | Action::Quit => None,
            Action::AnalogueSet { axis, .. }
            | Action::DigitalSet { axis, .. }
            | Action::StepAbsolute { axis, .. }
            | Action::StepRelative { axis, .. } => Some(axis),
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Action::Quit)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Stop => write!(f, "Stop"),
            Action::Quit => write!(f, "Quit"),
            Action::AnalogueSet { axis, value } => write!(f, "AnalogueSet({axis}, {value:.3})"),
            Action::DigitalSet { axis, value } => write!(f, "DigitalSet({axis}, {value})"),
            Action::StepAbsolute { axis, value } => write!(f, "StepAbsolute({axis}, {value:.3})"),
            Action::StepRelative { axis, value } => write!(f, "StepRelative({axis}, {value:+})"),
        }
    }
}
