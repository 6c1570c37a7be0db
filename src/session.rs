//! Cooperative control loop
//!
//! One cycle collects every pending raw event, translates them in delivery
//! order, applies the resulting actions in emission order and publishes the
//! new control state:
//!
//! ```text
//! mpsc<RawInputEvent> ──► collect ──► translate + apply ──► watch<ControlSnapshot>
//! ```
//!
//! Nothing in a cycle blocks. The loop ends on a `Quit` action, when the shared
//! cancellation token fires, or when every input driver hung up.

use crate::control::{ControlPoints, ControlSnapshot};
use crate::error::ControlError;
use crate::mapping::{RawInputEvent, Translator};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Timing of the control loop
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SessionSettings {
    /// Length of one poll/apply cycle
    pub cycle_interval_ms: u64,
    /// Capacity of the raw event channel shared by all input drivers
    pub event_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 20,
            event_buffer: 1000,
        }
    }
}

impl SessionSettings {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms.max(1))
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("all input drivers disconnected")]
    InputDisconnected,
}

/// Why a session ended normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    Cancelled,
}

/// Result of a single cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleOutcome {
    pub events: usize,
    pub applied: usize,
    pub quit: bool,
}

pub struct Session<K> {
    translator: Translator<K>,
    points: ControlPoints,
}

impl<K: Copy + PartialEq + Debug> Session<K> {
    /// Fails when the translator can address an axis without a control point
    pub fn new(translator: Translator<K>, points: ControlPoints) -> Result<Self, ControlError> {
        points.ensure_covers(translator.axis_names())?;
        info!("Session created with {} control points", points.len());
        Ok(Self { translator, points })
    }

    pub fn control_points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn translator(&self) -> &Translator<K> {
        &self.translator
    }

    /// Control state plus the translator's pointer capture flag
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            pointer_captured: self.translator.pointer_captured(),
            ..self.points.snapshot()
        }
    }

    /// Handles one batch. Stops at the first `Quit`, dropping what follows it.
    pub fn run_cycle(&mut self, batch: &[RawInputEvent<K>]) -> CycleOutcome {
        let mut outcome = CycleOutcome {
            events: batch.len(),
            ..CycleOutcome::default()
        };

        for event in batch {
            for action in self.translator.handle_event(event) {
                if action.is_quit() {
                    info!("Quit requested");
                    outcome.quit = true;
                    return outcome;
                }
                debug!("Applying {}", action);
                self.points.apply(&action);
                outcome.applied += 1;
            }
        }
        outcome
    }

    /// Runs cycles until quit or cancellation. Cancels `shutdown` on quit so
    /// every other task sharing the token stops too.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<RawInputEvent<K>>,
        snapshots: watch::Sender<ControlSnapshot>,
        shutdown: CancellationToken,
        cycle: Duration,
    ) -> Result<SessionEnd, SessionError> {
        info!("Starting control loop with {:?} cycle", cycle);
        let mut ticker = tokio::time::interval(cycle);
        snapshots.send_replace(self.snapshot());
        let mut pointer_captured = self.translator.pointer_captured();

        let mut cycles: u64 = 0;
        let mut total_events = 0;
        let mut last_stats_time = Local::now();
        let stats_interval = chrono::Duration::seconds(30);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Control loop cancelled");
                    return Ok(SessionEnd::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            let batch = match collect_batch(&mut events) {
                Some(batch) => batch,
                None => {
                    warn!("Input channel disconnected, ending session");
                    shutdown.cancel();
                    return Err(SessionError::InputDisconnected);
                }
            };

            let outcome = self.run_cycle(&batch);
            cycles += 1;
            total_events += outcome.events;

            let capture_changed = self.translator.pointer_captured() != pointer_captured;
            if outcome.applied > 0 || capture_changed {
                let snapshot = self.snapshot();
                pointer_captured = snapshot.pointer_captured;
                for state in &snapshot.axes {
                    debug!(
                        "{}: value {:+.1}% step {:.1}%",
                        state.axis, state.value_percent, state.step_percent
                    );
                }
                snapshots.send_replace(snapshot);
            }

            if outcome.quit {
                shutdown.cancel();
                return Ok(SessionEnd::Quit);
            }

            let now = Local::now();
            if now - last_stats_time > stats_interval {
                info!(
                    "Control loop stats: {} cycles, {} events in {} seconds",
                    cycles,
                    total_events,
                    (now - last_stats_time).num_seconds()
                );
                cycles = 0;
                total_events = 0;
                last_stats_time = now;
            }
        }
    }
}

/// Drains the channel without waiting. `None` once every sender is gone and
/// nothing is left to read.
fn collect_batch<K>(
    events: &mut mpsc::Receiver<RawInputEvent<K>>,
) -> Option<Vec<RawInputEvent<K>>> {
    let mut batch = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => batch.push(event),
            Err(mpsc::error::TryRecvError::Empty) => return Some(batch),
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return if batch.is_empty() { None } else { Some(batch) };
            }
        }
    }
}
