//! Static binding table handed to the translator

use serde::{Deserialize, Serialize};

/// Keys driving one digital axis
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DigitalBinding<K> {
    pub axis: String,
    pub plus: K,
    pub minus: K,
    pub more: K,
    pub less: K,
}

/// Joystick axis index bound to an analogue axis
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct JoystickBinding {
    pub index: u32,
    pub axis: String,
    pub scale: f64,
    pub deadzone: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AnalogueBinding {
    pub axis: String,
    pub scale: f64,
    pub deadzone: f64,
}

/// Pointer dimensions, `x` is horizontal and `y` vertical
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct MouseBindings {
    pub x: AnalogueBinding,
    pub y: AnalogueBinding,
}

/// Size of the input window, used to normalise pointer positions
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Everything the translator needs. Immutable once built.
///
/// `digital` is processed in declaration order, which is also the order
/// actions for one key event are emitted in.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct BindingConfig<K> {
    pub stop_key: K,
    pub quit_key: K,
    pub digital: Vec<DigitalBinding<K>>,
    #[serde(default)]
    pub joystick: Vec<JoystickBinding>,
    pub mouse: MouseBindings,
    #[serde(default)]
    pub viewport: Viewport,
}

impl<K> BindingConfig<K> {
    /// Builds the classic layout: speed on `speed_keys`, turn on `turn_keys`,
    /// stick axes 0/1 and the pointer driving turn/speed.
    ///
    /// Key tuples are `(plus, minus, more, less)`.
    pub fn standard(
        stop_key: K,
        quit_key: K,
        speed_keys: (K, K, K, K),
        turn_keys: (K, K, K, K),
    ) -> Self {
        let (speed_plus, speed_minus, speed_more, speed_less) = speed_keys;
        let (turn_plus, turn_minus, turn_more, turn_less) = turn_keys;

        Self {
            stop_key,
            quit_key,
            digital: vec![
                DigitalBinding {
                    axis: "speed".to_string(),
                    plus: speed_plus,
                    minus: speed_minus,
                    more: speed_more,
                    less: speed_less,
                },
                DigitalBinding {
                    axis: "turn".to_string(),
                    plus: turn_plus,
                    minus: turn_minus,
                    more: turn_more,
                    less: turn_less,
                },
            ],
            joystick: vec![
                JoystickBinding {
                    index: 0,
                    axis: "turn".to_string(),
                    scale: 1.0,
                    deadzone: 0.1,
                },
                JoystickBinding {
                    index: 1,
                    axis: "speed".to_string(),
                    scale: -1.0,
                    deadzone: 0.1,
                },
            ],
            mouse: MouseBindings {
                x: AnalogueBinding {
                    axis: "turn".to_string(),
                    scale: 1.0,
                    deadzone: 0.3,
                },
                y: AnalogueBinding {
                    axis: "speed".to_string(),
                    scale: -1.0,
                    deadzone: 0.3,
                },
            },
            viewport: Viewport::default(),
        }
    }
}
