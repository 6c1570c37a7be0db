//! Key pair mapping for one axis

use crate::control::Action;
use std::fmt::Debug;
use tracing::debug;

/// Two direction keys and two step keys driving one axis.
///
/// `direction` remembers which of `plus`/`minus` was pressed last. A key-up
/// only clears it when it belongs to that key, so releasing a key that was
/// already overridden by the opposite one does not stop the axis.
#[derive(Debug, Clone)]
pub struct DigitalAxis<K> {
    axis: String,
    plus: K,
    minus: K,
    more: K,
    less: K,
    direction: i8,
}

impl<K: Copy + PartialEq + Debug> DigitalAxis<K> {
    pub fn new(axis: impl Into<String>, plus: K, minus: K, more: K, less: K) -> Self {
        Self {
            axis: axis.into(),
            plus,
            minus,
            more,
            less,
            direction: 0,
        }
    }

    pub fn axis(&self) -> &str {
        &self.axis
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn handle_key_down(&mut self, key: K) -> Vec<Action> {
        if key == self.plus {
            self.direction = 1;
            vec![self.digital()]
        } else if key == self.minus {
            self.direction = -1;
            vec![self.digital()]
        } else if key == self.more {
            debug!("Increasing step of {}", self.axis);
            vec![self.adjust(1.0), self.digital()]
        } else if key == self.less {
            debug!("Decreasing step of {}", self.axis);
            vec![self.adjust(-1.0), self.digital()]
        } else {
            Vec::new()
        }
    }

    pub fn handle_key_up(&mut self, key: K) -> Vec<Action> {
        if (key == self.plus && self.direction == 1) || (key == self.minus && self.direction == -1)
        {
            self.direction = 0;
            vec![self.digital()]
        } else {
            Vec::new()
        }
    }

    fn digital(&self) -> Action {
        Action::digital(self.axis.as_str(), self.direction)
    }

    fn adjust(&self, by: f64) -> Action {
        Action::step_relative(self.axis.as_str(), by)
    }
}
