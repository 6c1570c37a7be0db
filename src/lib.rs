//! Teleoperation front-end.
//!
//! Turns key presses, joystick motion and pointer motion into `speed`/`turn`
//! commands for a remotely operated vehicle.

pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod mapping;
pub mod session;

pub use control::{Action, ControlPoint, ControlPoints, ControlSnapshot};
pub use error::{ConfigError, ControlError};
pub use mapping::{BindingConfig, RawInputEvent, Translator};
pub use session::{Session, SessionEnd, SessionError};
