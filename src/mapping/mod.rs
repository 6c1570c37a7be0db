//! Translation of raw input events into control actions.
//!
//! ```text
//! RawInputEvent ──► Translator ──┬─► DigitalAxis  (key pairs)
//!                                ├─► AnalogueAxis (joystick axes)
//!                                └─► AnalogueAxis (pointer x/y)
//!                                          │
//!                                          ▼
//!                                     Vec<Action>
//! ```
//!
//! Key identifiers are opaque to this module and only compared for equality,
//! which keeps it independent of whichever window or device layer delivers
//! the events.

pub mod analogue;
pub mod bindings;
pub mod digital;
pub mod translator;

pub use analogue::AnalogueAxis;
pub use bindings::{
    AnalogueBinding, BindingConfig, DigitalBinding, JoystickBinding, MouseBindings, Viewport,
};
pub use digital::DigitalAxis;
pub use translator::{RawInputEvent, Translator};
