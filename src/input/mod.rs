//! Input drivers feeding the control loop
//!
//! Both drivers push into the same bounded channel; the control loop drains it
//! once per cycle.
//!
//! ```text
//! window  (keys, pointer) ──┐
//!                           ├──► mpsc<InputEvent> ──► Session
//! gamepad (stick axes)   ───┘
//! ```

pub mod gamepad;
pub mod window;

/// Raw event as produced by the drivers in this module
pub type InputEvent = crate::mapping::RawInputEvent<egui::Key>;
