use super::InputEvent;
use crate::mapping::RawInputEvent;
use chrono::Local;
use gilrs::{Axis, Event, EventType, GamepadId, Gilrs};
use serde::{Deserialize, Serialize};
use statum::{machine, state};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Gamepad polling settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct GamepadSettings {
    /// Skip gamepad collection entirely
    pub enabled: bool,
    /// Sleep between two polls of the gilrs event queue
    pub poll_interval_ms: u64,
}

impl Default for GamepadSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 2,
        }
    }
}

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),

    #[error("Failed to send event: {0}")]
    EventSendError(String),
}

/// Joystick index for a gilrs axis, plus whether its sign must be flipped.
///
/// Stick Y axes are reported down-positive like screen coordinates, so the
/// bindings read the same for pointer and stick.
pub fn axis_index(axis: Axis) -> Option<(u32, bool)> {
    match axis {
        Axis::LeftStickX => Some((0, false)),
        Axis::LeftStickY => Some((1, true)),
        Axis::RightStickX => Some((2, false)),
        Axis::RightStickY => Some((3, true)),
        Axis::LeftZ => Some((4, false)),
        Axis::RightZ => Some((5, false)),
        _ => None,
    }
}

/// Converts a gilrs axis reading into a joystick event, `None` for unmapped axes
pub fn joystick_event(axis: Axis, value: f32) -> Option<InputEvent> {
    axis_index(axis).map(|(index, invert)| {
        let value = f64::from(value).clamp(-1.0, 1.0);
        RawInputEvent::JoystickAxis {
            index,
            value: if invert { -value } else { value },
        }
    })
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    gilrs: Gilrs,

    // Only events from this pad are forwarded
    active_gamepad: Option<GamepadId>,

    settings: GamepadSettings,

    event_sender: mpsc::Sender<InputEvent>,

    shutdown: CancellationToken,
}

impl EventCollector<Initializing> {
    pub fn create(
        settings: GamepadSettings,
        event_sender: mpsc::Sender<InputEvent>,
        shutdown: CancellationToken,
    ) -> Result<Self, CollectorError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, settings, event_sender, shutdown))
    }

    /// Picks the first connected gamepad. Without one the collector idles
    /// until a pad connects.
    pub fn initialize(mut self) -> EventCollector<Collecting> {
        let first = self.gilrs.gamepads().next().map(|(id, gamepad)| {
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
            id
        });
        if first.is_none() {
            warn!("No gamepad connected, waiting for one");
        }
        self.active_gamepad = first;
        self.transition()
    }
}

impl EventCollector<Collecting> {
    /// Forwards every queued gilrs event, returns how many were sent
    pub fn collect_pending(&mut self) -> Result<usize, CollectorError> {
        let mut sent = 0;
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected if self.active_gamepad.is_none() => {
                    info!("Gamepad {} connected, selecting it", id);
                    self.active_gamepad = Some(id);
                    continue;
                }
                EventType::Disconnected if self.active_gamepad == Some(id) => {
                    warn!("Active gamepad {} disconnected", id);
                    self.active_gamepad = None;
                    continue;
                }
                _ => {}
            }

            if self.active_gamepad != Some(id) {
                continue;
            }

            let EventType::AxisChanged(axis, value, _) = event else {
                continue;
            };
            let Some(raw_event) = joystick_event(axis, value) else {
                debug!("Ignoring unsupported axis: {:?}", axis);
                continue;
            };

            self.event_sender
                .try_send(raw_event)
                .map_err(|e| CollectorError::EventSendError(e.to_string()))?;
            sent += 1;
        }
        Ok(sent)
    }

    pub fn run_collection_loop(&mut self) {
        info!("Starting gamepad collection loop");

        let poll_interval = Duration::from_millis(self.settings.poll_interval_ms);
        let mut event_count = 0;
        let mut last_log_time = Local::now();
        let log_interval = chrono::Duration::seconds(30);

        while !self.shutdown.is_cancelled() {
            match self.collect_pending() {
                Ok(sent) => event_count += sent,
                // A full channel only drops readings, the next one supersedes them
                Err(e) => warn!("Error collecting gamepad events: {}", e),
            }

            let now = Local::now();
            if now - last_log_time > log_interval {
                info!(
                    "Gamepad collector stats: {} events in last {} seconds",
                    event_count,
                    log_interval.num_seconds()
                );
                event_count = 0;
                last_log_time = now;
            }

            std::thread::sleep(poll_interval);
        }
        info!("Gamepad collection loop stopped");
    }
}

/// Starts the collector on a blocking task. Runs until `shutdown` is cancelled.
pub fn spawn(
    settings: GamepadSettings,
    event_sender: mpsc::Sender<InputEvent>,
    shutdown: CancellationToken,
) -> Result<JoinHandle<()>, CollectorError> {
    info!("Spawning gamepad collector with settings: {:?}", settings);
    let collector = EventCollector::create(settings, event_sender, shutdown)?;

    Ok(tokio::task::spawn_blocking(move || {
        let mut collecting = collector.initialize();
        collecting.run_collection_loop();
    }))
}
