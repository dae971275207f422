// Runtime abstraction for the user-facing front end
//
// The controller never talks to a window toolkit directly. Everything it needs
// from the UI (rendering state, confirmation dialogs, the directory picker) goes
// through the ClipRuntime trait.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::console::LogLevel;
use crate::controller::StatusSnapshot;
use crate::files::DirectoryEntry;

/// Runtime-specific errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Event receiver closed")]
    ReceiverClosed,

    #[error("Prompt timed out after {0}s")]
    PromptTimeout(u64),
}

/// State changes pushed to the front end
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    /// Tracking switched on or off
    StatusChanged { tracking: bool },

    /// Pending (unsaved) text changed
    BufferChanged { contents: String },

    /// The "last pasted" surface changed (trimmed text)
    LastPastedChanged { text: String },

    /// The computed output file name (or its counter) changed
    FileNameChanged { file_name: String, counter: String },

    /// Directory view should show `entries` for `path`
    DirectoryRefreshed {
        path: PathBuf,
        entries: Vec<DirectoryEntry>,
    },

    /// File viewer content (empty when a folder is selected)
    FileViewerChanged {
        path: Option<PathBuf>,
        content: String,
    },

    /// Operator log entry
    Log { level: LogLevel, message: String },

    /// The runtime is waiting for an answer from the operator
    PromptRequested { request_id: String, prompt: String },

    /// Front end should open `path` with the platform handler
    OpenRequested { path: PathBuf },

    /// Clipboard watcher stopped for good
    WatcherFailed { message: String },

    /// Answer to an explicit status request
    StatusReport { status: StatusSnapshot },
}

/// Confirmation dialogs the controller may raise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfirmKind {
    Overwrite { path: PathBuf },
    Delete { path: PathBuf },
}

impl ConfirmKind {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmKind::Overwrite { path } => {
                format!("{} already exists. Overwrite? (y/n)", path.display())
            }
            ConfirmKind::Delete { path } => format!("Delete {}? (y/n)", path.display()),
        }
    }
}

/// Runtime abstraction over the front end
///
/// This trait provides platform-specific functionality for:
/// - Emitting state changes (rendering, operator log)
/// - Asking the operator to confirm destructive operations
/// - Picking an output directory
///
/// Object-safe; used as `Arc<dyn ClipRuntime>`.
#[async_trait]
pub trait ClipRuntime: Send + Sync + 'static {
    /// Emit an event to the front end
    ///
    /// # Errors
    /// Returns `RuntimeError::ReceiverClosed` if the front end has gone away.
    fn emit(&self, event: RuntimeEvent) -> Result<(), RuntimeError>;

    /// Ask the operator to confirm an operation. Blocks the caller until answered.
    async fn confirm(&self, kind: ConfirmKind) -> Result<bool, RuntimeError>;

    /// Ask the operator for a directory. `None` means the picker was cancelled.
    async fn pick_directory(&self) -> Result<Option<PathBuf>, RuntimeError>;

    /// Check if running in interactive mode (has UI or TTY)
    fn is_interactive(&self) -> bool;

    /// Graceful shutdown
    async fn shutdown(&self) -> Result<(), RuntimeError>;
}

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(test)]
pub mod mock;

#[cfg(feature = "cli")]
pub use cli::CliRuntime;
