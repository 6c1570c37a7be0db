//! Raw input event dispatch
//!
//! The translator owns every axis mapper and turns one raw event into an
//! ordered list of actions. It keeps no reference to the control points.

use crate::control::Action;
use crate::error::ConfigError;
use crate::mapping::bindings::{BindingConfig, Viewport};
use crate::mapping::{AnalogueAxis, DigitalAxis};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use tracing::{debug, info};

/// Events delivered by an input driver
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent<K> {
    QuitRequest,
    KeyDown(K),
    KeyUp(K),
    JoystickAxis { index: u32, value: f64 },
    PointerButtonToggle,
    PointerMotion { x: i32, y: i32 },
}

pub struct Translator<K> {
    stop_key: K,
    quit_key: K,
    key_axes: Vec<DigitalAxis<K>>,
    joystick_axes: HashMap<u32, AnalogueAxis>,
    // [horizontal, vertical]
    mouse_axes: [AnalogueAxis; 2],
    viewport: Viewport,
    pointer_captured: bool,
}

impl<K: Copy + PartialEq + Debug> Translator<K> {
    pub fn new(config: &BindingConfig<K>) -> Result<Self, ConfigError> {
        if config.viewport.width == 0 || config.viewport.height == 0 {
            return Err(ConfigError::InvalidViewport {
                width: config.viewport.width,
                height: config.viewport.height,
            });
        }

        let mut key_axes = Vec::with_capacity(config.digital.len());
        for binding in &config.digital {
            if binding.axis.is_empty() {
                return Err(ConfigError::EmptyAxisName);
            }
            key_axes.push(DigitalAxis::new(
                binding.axis.as_str(),
                binding.plus,
                binding.minus,
                binding.more,
                binding.less,
            ));
        }

        let mut joystick_axes = HashMap::new();
        for binding in &config.joystick {
            let axis = AnalogueAxis::new(binding.axis.as_str(), binding.scale, binding.deadzone)?;
            if joystick_axes.insert(binding.index, axis).is_some() {
                return Err(ConfigError::DuplicateJoystickIndex(binding.index));
            }
        }

        let mouse = &config.mouse;
        let mouse_axes = [
            AnalogueAxis::new(mouse.x.axis.as_str(), mouse.x.scale, mouse.x.deadzone)?,
            AnalogueAxis::new(mouse.y.axis.as_str(), mouse.y.scale, mouse.y.deadzone)?,
        ];

        info!(
            "Translator ready: {} key axes, {} joystick axes, viewport {}x{}",
            key_axes.len(),
            joystick_axes.len(),
            config.viewport.width,
            config.viewport.height
        );

        Ok(Self {
            stop_key: config.stop_key,
            quit_key: config.quit_key,
            key_axes,
            joystick_axes,
            mouse_axes,
            viewport: config.viewport,
            pointer_captured: false,
        })
    }

    /// Every axis name this translator can emit actions for
    pub fn axis_names(&self) -> BTreeSet<&str> {
        self.key_axes
            .iter()
            .map(DigitalAxis::axis)
            .chain(self.joystick_axes.values().map(AnalogueAxis::axis))
            .chain(self.mouse_axes.iter().map(AnalogueAxis::axis))
            .collect()
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn handle_event(&mut self, event: &RawInputEvent<K>) -> Vec<Action> {
        match event {
            RawInputEvent::QuitRequest => vec![Action::Quit],
            RawInputEvent::KeyDown(key) => self.handle_key_down(*key),
            RawInputEvent::KeyUp(key) => self
                .key_axes
                .iter_mut()
                .flat_map(|axis| axis.handle_key_up(*key))
                .collect(),
            RawInputEvent::JoystickAxis { index, value } => match self.joystick_axes.get_mut(index) {
                Some(axis) => axis.handle_reading(*value),
                None => Vec::new(),
            },
            RawInputEvent::PointerButtonToggle => {
                self.pointer_captured = !self.pointer_captured;
                info!(
                    "Pointer capture {}",
                    if self.pointer_captured { "engaged" } else { "released" }
                );
                Vec::new()
            }
            RawInputEvent::PointerMotion { x, y } => {
                if self.pointer_captured {
                    self.handle_pointer_motion(*x, *y)
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn handle_key_down(&mut self, key: K) -> Vec<Action> {
        if key == self.stop_key {
            debug!("Stop key {:?}", key);
            return vec![Action::Stop];
        }
        if key == self.quit_key {
            debug!("Quit key {:?}", key);
            return vec![Action::Quit];
        }
        self.key_axes
            .iter_mut()
            .flat_map(|axis| axis.handle_key_down(key))
            .collect()
    }

    fn handle_pointer_motion(&mut self, x: i32, y: i32) -> Vec<Action> {
        let (half_width, half_height) = self.viewport.center();
        let dx = (f64::from(x) - half_width) / half_width;
        let dy = (f64::from(y) - half_height) / half_height;

        let [horizontal, vertical] = &mut self.mouse_axes;
        let mut actions = horizontal.handle_reading(dx);
        actions.extend(vertical.handle_reading(dy));
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::bindings::JoystickBinding;

    fn config() -> BindingConfig<char> {
        BindingConfig::standard(' ', 'q', ('w', 's', 'u', 'j'), ('d', 'a', 'l', 'h'))
    }

    fn translator() -> Translator<char> {
        Translator::new(&config()).unwrap()
    }

    #[test]
    fn reserved_keys_win() {
        let mut t = translator();
        assert_eq!(t.handle_event(&RawInputEvent::KeyDown(' ')), vec![Action::Stop]);
        assert_eq!(t.handle_event(&RawInputEvent::KeyDown('q')), vec![Action::Quit]);
        assert_eq!(t.handle_event(&RawInputEvent::QuitRequest), vec![Action::Quit]);
        assert!(t.handle_event(&RawInputEvent::KeyUp('q')).is_empty());
    }

    #[test]
    fn keys_reach_their_axis() {
        let mut t = translator();
        assert_eq!(
            t.handle_event(&RawInputEvent::KeyDown('a')),
            vec![Action::digital("turn", -1)]
        );
        assert_eq!(
            t.handle_event(&RawInputEvent::KeyDown('u')),
            vec![Action::step_relative("speed", 1.0), Action::digital("speed", 0)]
        );
        assert_eq!(
            t.handle_event(&RawInputEvent::KeyUp('a')),
            vec![Action::digital("turn", 0)]
        );
        assert!(t.handle_event(&RawInputEvent::KeyDown('z')).is_empty());
    }

    #[test]
    fn shared_key_follows_declaration_order() {
        let mut config = config();
        config.digital[1].more = 'u';
        let mut t = Translator::new(&config).unwrap();
        assert_eq!(
            t.handle_event(&RawInputEvent::KeyDown('u')),
            vec![
                Action::step_relative("speed", 1.0),
                Action::digital("speed", 0),
                Action::step_relative("turn", 1.0),
                Action::digital("turn", 0),
            ]
        );
    }

    #[test]
    fn joystick_dispatch_and_unbound_index() {
        let mut t = translator();
        assert_eq!(
            t.handle_event(&RawInputEvent::JoystickAxis { index: 1, value: 1.0 }),
            vec![Action::analogue("speed", -1.0)]
        );
        assert!(t
            .handle_event(&RawInputEvent::JoystickAxis { index: 7, value: 1.0 })
            .is_empty());
    }

    #[test]
    fn pointer_motion_requires_capture() {
        let mut t = translator();
        assert!(t
            .handle_event(&RawInputEvent::PointerMotion { x: 400, y: 0 })
            .is_empty());

        assert!(t.handle_event(&RawInputEvent::PointerButtonToggle).is_empty());
        assert!(t.pointer_captured());
        assert_eq!(
            t.handle_event(&RawInputEvent::PointerMotion { x: 400, y: 0 }),
            vec![Action::analogue("turn", 1.0), Action::analogue("speed", 1.0)]
        );
        // centre lies inside the deadzone on both dimensions
        assert_eq!(
            t.handle_event(&RawInputEvent::PointerMotion { x: 200, y: 150 }),
            vec![Action::analogue("turn", 0.0), Action::analogue("speed", 0.0)]
        );

        t.handle_event(&RawInputEvent::PointerButtonToggle);
        assert!(!t.pointer_captured());
        assert!(t
            .handle_event(&RawInputEvent::PointerMotion { x: 0, y: 0 })
            .is_empty());
    }

    #[test]
    fn axis_names_cover_all_sources() {
        let mut config = config();
        config.joystick.push(JoystickBinding {
            index: 3,
            axis: "pan".to_string(),
            scale: 1.0,
            deadzone: 0.2,
        });
        let t = Translator::new(&config).unwrap();
        assert_eq!(
            t.axis_names().into_iter().collect::<Vec<_>>(),
            ["pan", "speed", "turn"]
        );
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut zero_viewport = config();
        zero_viewport.viewport.height = 0;
        assert!(matches!(
            Translator::new(&zero_viewport),
            Err(ConfigError::InvalidViewport { .. })
        ));

        let mut duplicate = config();
        duplicate.joystick[1].index = 0;
        assert!(matches!(
            Translator::new(&duplicate),
            Err(ConfigError::DuplicateJoystickIndex(0))
        ));

        let mut bad_mouse = config();
        bad_mouse.mouse.y.deadzone = 1.5;
        assert!(matches!(
            Translator::new(&bad_mouse),
            Err(ConfigError::InvalidDeadzone { .. })
        ));
    }
}
