//! Bounded, steppable control values and the action applier

use crate::control::Action;
use crate::error::{ConfigError, ControlError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Current value and digital step configuration of one logical axis.
///
/// `0 <= step <= max` always holds. `value` is not clamped here: digital sets
/// are bounded by `step`, analogue sets by the normaliser that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    value: f64,
    step: f64,
    adjust: f64,
    max: f64,
}

impl ControlPoint {
    pub fn new(axis: &str, step: f64, adjust: f64, max: f64) -> Result<Self, ConfigError> {
        if !(max.is_finite() && max > 0.0) {
            return Err(ConfigError::InvalidMax {
                axis: axis.to_string(),
                max,
            });
        }
        if !(step.is_finite() && (0.0..=max).contains(&step)) {
            return Err(ConfigError::InvalidStep {
                axis: axis.to_string(),
                step,
                max,
            });
        }
        if !adjust.is_finite() {
            return Err(ConfigError::InvalidAdjust {
                axis: axis.to_string(),
                adjust,
            });
        }

        Ok(Self {
            value: 0.0,
            step,
            adjust,
            max,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn adjust(&self) -> f64 {
        self.adjust
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Value mapped onto `[-range, range]`
    pub fn scaled(&self, range: f64) -> f64 {
        (self.value / self.max) * range
    }

    /// Step mapped onto `[0, range]`
    pub fn scaled_step(&self, range: f64) -> f64 {
        (self.step / self.max) * range
    }

    fn set_analogue(&mut self, value: f64) {
        self.value = value * self.max;
    }

    fn set_digital(&mut self, direction: i8) {
        self.value = f64::from(direction) * self.step;
    }

    fn set_step_absolute(&mut self, value: f64) {
        self.step = (value * self.max).clamp(0.0, self.max);
    }

    fn set_step_relative(&mut self, value: f64) {
        self.step = (self.step + value * self.adjust).clamp(0.0, self.max);
    }
}

/// Static description of a control point, as read from the config file
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ControlPointConfig {
    pub axis: String,
    pub step: f64,
    pub adjust: f64,
    pub max: f64,
}

/// Read-only copy of one axis for telemetry consumers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisState {
    pub axis: String,
    pub value: f64,
    pub step: f64,
    pub max: f64,
    /// `value` as a percentage of `max`
    pub value_percent: f64,
    /// `step` as a percentage of `max`
    pub step_percent: f64,
}

/// State of every axis after a cycle, sorted by axis name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlSnapshot {
    pub axes: Vec<AxisState>,
    /// Whether pointer motion currently drives the analogue axes
    pub pointer_captured: bool,
}

impl ControlSnapshot {
    pub fn get(&self, axis: &str) -> Option<&AxisState> {
        self.axes.iter().find(|state| state.axis == axis)
    }
}

/// All control points of a session, addressed by axis name
#[derive(Debug, Clone, Default)]
pub struct ControlPoints {
    points: HashMap<String, ControlPoint>,
}

impl ControlPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &[ControlPointConfig]) -> Result<Self, ConfigError> {
        let mut points = Self::new();
        for config in configs {
            if config.axis.is_empty() {
                return Err(ConfigError::EmptyAxisName);
            }
            if points.points.contains_key(&config.axis) {
                return Err(ConfigError::DuplicateControlPoint(config.axis.clone()));
            }
            let point = ControlPoint::new(&config.axis, config.step, config.adjust, config.max)?;
            points.insert(config.axis.clone(), point);
        }
        Ok(points)
    }

    pub fn insert(&mut self, axis: impl Into<String>, point: ControlPoint) {
        self.points.insert(axis.into(), point);
    }

    pub fn get(&self, axis: &str) -> Option<&ControlPoint> {
        self.points.get(axis)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fails on the first axis name without a control point
    pub fn ensure_covers<'a, I>(&self, axes: I) -> Result<(), ControlError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for axis in axes {
            if !self.points.contains_key(axis) {
                return Err(ControlError::MissingAxis(axis.to_string()));
            }
        }
        Ok(())
    }

    /// Applies one action. `Quit` is left to the session loop.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Stop => {
                for point in self.points.values_mut() {
                    point.value = 0.0;
                }
                debug!("All axes stopped");
            }
            Action::Quit => {}
            Action::AnalogueSet { axis, value } => {
                if let Some(point) = self.point_mut(axis) {
                    point.set_analogue(*value);
                }
            }
            Action::DigitalSet { axis, value } => {
                if let Some(point) = self.point_mut(axis) {
                    point.set_digital(*value);
                }
            }
            Action::StepAbsolute { axis, value } => {
                if let Some(point) = self.point_mut(axis) {
                    point.set_step_absolute(*value);
                }
            }
            Action::StepRelative { axis, value } => {
                if let Some(point) = self.point_mut(axis) {
                    point.set_step_relative(*value);
                }
            }
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        let mut axes: Vec<AxisState> = self
            .points
            .iter()
            .map(|(axis, point)| AxisState {
                axis: axis.clone(),
                value: point.value,
                step: point.step,
                max: point.max,
                value_percent: point.scaled(100.0),
                step_percent: point.scaled_step(100.0),
            })
            .collect();
        axes.sort_by(|a, b| a.axis.cmp(&b.axis));
        ControlSnapshot {
            axes,
            pointer_captured: false,
        }
    }

    fn point_mut(&mut self, axis: &str) -> Option<&mut ControlPoint> {
        let point = self.points.get_mut(axis);
        if point.is_none() {
            // unreachable once ensure_covers passed
            warn!("Dropping action for unknown axis '{}'", axis);
        }
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn points(step: f64, adjust: f64, max: f64) -> ControlPoints {
        let mut points = ControlPoints::new();
        points.insert("speed", ControlPoint::new("speed", step, adjust, max).unwrap());
        points.insert("turn", ControlPoint::new("turn", step, adjust, max).unwrap());
        points
    }

    #[test]
    fn rejects_invalid_construction() {
        assert!(matches!(
            ControlPoint::new("speed", 0.0, 1.0, 0.0),
            Err(ConfigError::InvalidMax { .. })
        ));
        assert!(matches!(
            ControlPoint::new("speed", 11.0, 1.0, 10.0),
            Err(ConfigError::InvalidStep { .. })
        ));
        assert!(matches!(
            ControlPoint::new("speed", -1.0, 1.0, 10.0),
            Err(ConfigError::InvalidStep { .. })
        ));
        assert!(matches!(
            ControlPoint::new("speed", 1.0, f64::NAN, 10.0),
            Err(ConfigError::InvalidAdjust { .. })
        ));
    }

    #[test]
    fn analogue_set_scales_by_max() {
        let mut points = points(2.0, 1.0, 10.0);
        points.apply(&Action::analogue("speed", 0.444));
        assert_eq!(points.get("speed").unwrap().value(), 0.444 * 10.0);
        assert_eq!(points.get("turn").unwrap().value(), 0.0);
    }

    #[test]
    fn digital_set_scales_by_step() {
        let mut points = points(2.5, 1.0, 10.0);
        points.apply(&Action::digital("turn", -1));
        assert_eq!(points.get("turn").unwrap().value(), -2.5);
        points.apply(&Action::digital("turn", 0));
        assert_eq!(points.get("turn").unwrap().value(), 0.0);
    }

    #[test]
    fn step_relative_stays_within_bounds() {
        let mut points = points(0.0, 3.0, 10.0);
        let deltas = [1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0];
        for delta in deltas {
            points.apply(&Action::step_relative("speed", delta));
            let step = points.get("speed").unwrap().step();
            assert!((0.0..=10.0).contains(&step), "step {step} out of bounds");
        }
        assert_eq!(points.get("speed").unwrap().step(), 3.0);
    }

    #[test]
    fn step_absolute_is_clamped() {
        let mut points = points(5.0, 1.0, 10.0);
        points.apply(&Action::step_absolute("speed", 0.25));
        assert_eq!(points.get("speed").unwrap().step(), 2.5);
        points.apply(&Action::step_absolute("speed", -0.5));
        assert_eq!(points.get("speed").unwrap().step(), 0.0);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut points = points(2.0, 1.0, 10.0);
        points.apply(&Action::digital("speed", 1));
        points.apply(&Action::analogue("turn", -0.5));

        points.apply(&Action::Stop);
        assert!(points.snapshot().axes.iter().all(|a| a.value == 0.0));
        points.apply(&Action::Stop);
        assert!(points.snapshot().axes.iter().all(|a| a.value == 0.0));
        // steps survive a stop
        assert_eq!(points.get("speed").unwrap().step(), 2.0);
    }

    #[test]
    fn quit_does_not_touch_points() {
        let mut points = points(2.0, 1.0, 10.0);
        points.apply(&Action::digital("speed", 1));
        points.apply(&Action::Quit);
        assert_eq!(points.get("speed").unwrap().value(), 2.0);
    }

    #[test]
    fn unknown_axis_is_ignored() {
        let mut points = points(2.0, 1.0, 10.0);
        points.apply(&Action::digital("pan", 1));
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn ensure_covers_reports_missing_axis() {
        let points = points(2.0, 1.0, 10.0);
        assert!(points.ensure_covers(["speed", "turn"]).is_ok());
        assert_eq!(
            points.ensure_covers(["speed", "pan"]),
            Err(ControlError::MissingAxis("pan".to_string()))
        );
    }

    #[test]
    fn from_configs_rejects_duplicates() {
        let config = ControlPointConfig {
            axis: "speed".to_string(),
            step: 1.0,
            adjust: 1.0,
            max: 10.0,
        };
        assert_eq!(
            ControlPoints::from_configs(&[config.clone(), config]).unwrap_err(),
            ConfigError::DuplicateControlPoint("speed".to_string())
        );
    }

    #[test]
    fn scaled_helpers_map_onto_range() {
        let mut points = points(5.0, 1.0, 10.0);
        points.apply(&Action::analogue("speed", -0.5));
        let point = points.get("speed").unwrap();
        assert_eq!(point.scaled(100.0), -50.0);
        assert_eq!(point.scaled_step(100.0), 50.0);

        let state = points.snapshot().get("speed").cloned().unwrap();
        assert_eq!(state.value_percent, -50.0);
        assert_eq!(state.step_percent, 50.0);
    }

    #[test]
    fn snapshot_is_sorted() {
        let points = points(1.0, 1.0, 10.0);
        let snapshot = points.snapshot();
        let names: Vec<&str> = snapshot.axes.iter().map(|a| a.axis.as_str()).collect();
        assert_eq!(names, ["speed", "turn"]);
        assert_eq!(snapshot.get("turn").unwrap().max, 10.0);
    }

    #[derive(Debug, Clone)]
    enum StepChange {
        Relative(f64),
        Absolute(f64),
    }

    fn step_change() -> impl Strategy<Value = StepChange> {
        prop_oneof![
            prop_oneof![Just(1.0), Just(-1.0), -3.0..3.0f64].prop_map(StepChange::Relative),
            (-2.0..2.0f64).prop_map(StepChange::Absolute),
        ]
    }

    proptest! {
        #[test]
        fn step_stays_within_bounds_for_any_sequence(
            max in 0.1..1000.0f64,
            start in 0.0..=1.0f64,
            adjust in -100.0..100.0f64,
            changes in prop::collection::vec(step_change(), 0..64),
        ) {
            let mut points = ControlPoints::new();
            points.insert("speed", ControlPoint::new("speed", start * max, adjust, max).unwrap());

            for change in changes {
                let action = match change {
                    StepChange::Relative(value) => Action::step_relative("speed", value),
                    StepChange::Absolute(value) => Action::step_absolute("speed", value),
                };
                points.apply(&action);
                let step = points.get("speed").unwrap().step();
                prop_assert!((0.0..=max).contains(&step), "step {} outside [0, {}]", step, max);
            }
        }
    }
}
