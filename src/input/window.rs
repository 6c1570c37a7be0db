//! Debug window acting as keyboard and pointer driver
//!
//! The window exists to receive key and pointer events. Each frame the egui
//! input events are converted into raw input events and forwarded to the
//! control loop; the latest control snapshot is shown as plain text.

use super::InputEvent;
use crate::control::ControlSnapshot;
use crate::mapping::{RawInputEvent, Viewport};
use eframe::egui::{self, CursorGrab, Event, Pos2, ViewportCommand};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Converts one egui event. Key repeats are dropped, only button presses toggle capture.
pub fn convert_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key {
            key,
            pressed,
            repeat: false,
            ..
        } => Some(if *pressed {
            RawInputEvent::KeyDown(*key)
        } else {
            RawInputEvent::KeyUp(*key)
        }),
        Event::PointerButton { pressed: true, .. } => Some(RawInputEvent::PointerButtonToggle),
        Event::PointerMoved(pos) => Some(RawInputEvent::PointerMotion {
            x: pos.x.round() as i32,
            y: pos.y.round() as i32,
        }),
        _ => None,
    }
}

pub struct InputWindow {
    event_sender: mpsc::Sender<InputEvent>,
    snapshots: watch::Receiver<ControlSnapshot>,
    shutdown: CancellationToken,
    viewport: Viewport,
    cursor_grabbed: bool,
    quit_sent: bool,
}

impl InputWindow {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        event_sender: mpsc::Sender<InputEvent>,
        snapshots: watch::Receiver<ControlSnapshot>,
        shutdown: CancellationToken,
        viewport: Viewport,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        Self {
            event_sender,
            snapshots,
            shutdown,
            viewport,
            cursor_grabbed: false,
            quit_sent: false,
        }
    }

    /// `false` when the event had to be dropped
    fn forward(&self, event: InputEvent) -> bool {
        debug!("Forwarding {:?}", event);
        match self.event_sender.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping input event: {}", e);
                false
            }
        }
    }

    // The control loop owns the capture flag, the cursor only follows it
    fn sync_cursor(&mut self, ctx: &egui::Context, captured: bool) {
        if captured == self.cursor_grabbed {
            return;
        }
        self.cursor_grabbed = captured;
        for command in cursor_commands(captured, self.viewport) {
            ctx.send_viewport_cmd(command);
        }
    }
}

/// Viewport commands that grab, hide and center the cursor, or release it
pub fn cursor_commands(captured: bool, viewport: Viewport) -> Vec<ViewportCommand> {
    if captured {
        let (cx, cy) = viewport.center();
        vec![
            ViewportCommand::CursorGrab(CursorGrab::Confined),
            ViewportCommand::CursorVisible(false),
            ViewportCommand::CursorPosition(Pos2::new(cx as f32, cy as f32)),
        ]
    } else {
        vec![
            ViewportCommand::CursorGrab(CursorGrab::None),
            ViewportCommand::CursorVisible(true),
        ]
    }
}

impl eframe::App for InputWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.shutdown.is_cancelled() {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }

        let events = ctx.input(|i| i.events.clone());
        for event in events.iter().filter_map(convert_event) {
            self.forward(event);
        }

        if ctx.input(|i| i.viewport().close_requested()) && !self.quit_sent {
            info!("Window close requested");
            self.quit_sent = self.forward(RawInputEvent::QuitRequest);
        }

        let snapshot = self.snapshots.borrow().clone();
        self.sync_cursor(ctx, snapshot.pointer_captured);

        egui::CentralPanel::default().show(ctx, |ui| {
            ctx.request_repaint_after(Duration::from_millis(16));
            for state in &snapshot.axes {
                ui.monospace(format!(
                    "{:<8} {:+7.1}%   step {:5.1}%",
                    state.axis, state.value_percent, state.step_percent
                ));
            }
            ui.separator();
            ui.label(if snapshot.pointer_captured {
                "Pointer captured, click to release"
            } else {
                "Click to steer with the pointer"
            });
        });
    }
}

/// Opens the window on the calling thread and blocks until it closes
pub fn run(
    viewport: Viewport,
    event_sender: mpsc::Sender<InputEvent>,
    snapshots: watch::Receiver<ControlSnapshot>,
    shutdown: CancellationToken,
) -> eframe::Result {
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("teleop")
        .with_inner_size([viewport.width as f32, viewport.height as f32])
        .with_resizable(false);

    eframe::run_native(
        "teleop",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(InputWindow::new(
                cc,
                event_sender,
                snapshots,
                shutdown,
                viewport,
            )))
        }),
    )
}
