//! The UI context.
//!
//! A single task owns the [`SaveController`] and applies clipboard deltas and
//! operator commands one at a time, in arrival order. The watcher thread and
//! the front end only ever talk to it through an unbounded channel, so no
//! controller state is shared across threads.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::clipboard::{ClipboardError, ClipboardListener};
use crate::controller::{SaveController, StatusSnapshot};
use crate::files::SortOrder;

/// Operator commands, one per front-end control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartTracking,
    StopTracking,
    ToggleTracking,
    Save,
    Duplicate,
    SetOutputFolder(String),
    ChooseFolder,
    Back,
    Refresh,
    SetSortOrder(SortOrder),
    SetLeading(String),
    SetCounter(String),
    SetPadWidth(String),
    SetTrailing(String),
    SetAutoSave(bool),
    /// Select a directory-view entry; relative paths resolve against the current directory
    Select(PathBuf),
    RenameSelected(String),
    DeleteSelected,
    OpenSelected,
    ShowInExplorer,
    ReportStatus,
}

enum AppEvent {
    Clipboard(String),
    WatcherFailed(String),
    Command(Command),
    Status(oneshot::Sender<StatusSnapshot>),
    Shutdown,
}

/// Handle to the running UI context
pub struct App {
    event_tx: mpsc::UnboundedSender<AppEvent>,
    handle: JoinHandle<SaveController>,
}

impl App {
    /// Spawn the UI context task around `controller`
    pub fn spawn(controller: SaveController) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_app(controller, event_rx));

        Self { event_tx, handle }
    }

    /// Queue an operator command
    pub fn send(&self, command: Command) {
        if self.event_tx.send(AppEvent::Command(command)).is_err() {
            tracing::warn!("UI context stopped; command dropped");
        }
    }

    /// A watcher listener that forwards into this context
    pub fn listener(&self) -> Arc<dyn ClipboardListener> {
        Arc::new(ChannelListener {
            event_tx: self.event_tx.clone(),
        })
    }

    /// Current status, after every previously queued event has run
    pub async fn status(&self) -> Option<StatusSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.event_tx.send(AppEvent::Status(tx)).ok()?;
        rx.await.ok()
    }

    /// Drain queued events, stop the loop and hand back the controller
    pub async fn shutdown(self) -> Option<SaveController> {
        let _ = self.event_tx.send(AppEvent::Shutdown);
        match self.handle.await {
            Ok(controller) => Some(controller),
            Err(e) => {
                tracing::error!("UI context task failed: {}", e);
                None
            }
        }
    }
}

/// Forwards watcher callbacks from the watcher thread to the UI context
struct ChannelListener {
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ClipboardListener for ChannelListener {
    fn on_clipboard_update(&self, text: &str) {
        if self.event_tx.send(AppEvent::Clipboard(text.to_string())).is_err() {
            tracing::debug!("UI context gone; clipboard delta dropped");
        }
    }

    fn on_watcher_failed(&self, error: &ClipboardError) {
        let _ = self.event_tx.send(AppEvent::WatcherFailed(error.to_string()));
    }
}

/// Main UI loop
async fn run_app(
    mut controller: SaveController,
    mut event_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> SaveController {
    tracing::debug!("UI context started");

    while let Some(event) = event_rx.recv().await {
        match event {
            AppEvent::Clipboard(text) => controller.on_clipboard_delta(&text, true).await,
            AppEvent::WatcherFailed(message) => controller.on_watcher_failed(&message),
            AppEvent::Command(command) => handle_command(&mut controller, command).await,
            AppEvent::Status(reply) => {
                let _ = reply.send(controller.status());
            }
            AppEvent::Shutdown => {
                tracing::debug!("UI context shutting down");
                break;
            }
        }
    }

    controller
}

async fn handle_command(controller: &mut SaveController, command: Command) {
    tracing::debug!("Command: {:?}", command);

    match command {
        Command::StartTracking => controller.start_tracking(),
        Command::StopTracking => controller.stop_tracking(),
        Command::ToggleTracking => {
            controller.toggle_tracking();
        }
        Command::Save => {
            controller.save().await;
        }
        Command::Duplicate => controller.duplicate_last().await,
        Command::SetOutputFolder(folder) => controller.set_output_folder(&folder).await,
        Command::ChooseFolder => controller.choose_folder().await,
        Command::Back => controller.back().await,
        Command::Refresh => controller.refresh().await,
        Command::SetSortOrder(order) => controller.set_sort_order(order).await,
        Command::SetLeading(text) => controller.set_leading(&text),
        Command::SetCounter(text) => controller.set_counter(&text),
        Command::SetPadWidth(text) => controller.set_pad_width(&text),
        Command::SetTrailing(text) => controller.set_trailing(&text),
        Command::SetAutoSave(enabled) => controller.set_auto_save_on_multiline(enabled),
        Command::Select(path) => {
            let path = match controller.state().current_directory.as_ref() {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path,
            };
            if path.is_dir() {
                controller.on_folder_selected(&path).await;
            } else {
                controller.on_file_selected(&path).await;
            }
        }
        Command::RenameSelected(name) => {
            controller.rename_selected(&name).await;
        }
        Command::DeleteSelected => {
            controller.delete_selected().await;
        }
        Command::OpenSelected => controller.open_selected(),
        Command::ShowInExplorer => controller.show_in_explorer(),
        Command::ReportStatus => controller.report_status(),
    }
}
