//! Control state of the vehicle
//!
//! ```text
//! Translator ──► Action ──► ControlPoints::apply ──► ControlSnapshot
//! ```
//!
//! Control points are addressed by axis name only. The translator never holds
//! a reference to them, so bindings and control points can be configured
//! independently and are cross-checked once at startup.

pub mod action;
pub mod control_point;

pub use action::Action;
pub use control_point::{
    AxisState, ControlPoint, ControlPointConfig, ControlPoints, ControlSnapshot,
};
