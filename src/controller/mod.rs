//! Save controller.
//!
//! Owns the session state, the pending buffer and the naming fields, and is
//! the only place that writes, renames or deletes output files. It runs on
//! the UI context: every method is called from one task, one at a time, so
//! saves never overlap.
//!
//! Tracking is a two-state machine (`Idle` / `Tracking`) switched by explicit
//! start/stop commands. While idle, clipboard deltas are discarded here; the
//! watcher keeps running.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::buffer::Buffer;
use crate::console::{LogLevel, OperatorLog};
use crate::error::{ClipError, Result};
use crate::files::{self, SortOrder};
use crate::naming::FileNameSpec;
use crate::runtime::{ClipRuntime, ConfirmKind, RuntimeEvent};
use crate::state::SessionState;


/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Buffer written to this path
    Saved(PathBuf),
    /// Operator declined to overwrite; buffer kept
    Aborted,
    /// Validation or I/O failure; buffer and counter kept
    Failed,
}

/// Snapshot for status displays
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub tracking: bool,
    pub auto_save_on_multiline: bool,
    pub output_folder: String,
    pub file_name: String,
    pub buffered_entries: usize,
    pub selected_file: Option<PathBuf>,
    pub watcher_failure: Option<String>,
}

pub struct SaveController {
    runtime: Arc<dyn ClipRuntime>,
    state: SessionState,
    buffer: Buffer,
    naming: FileNameSpec,
    file_name: String,
    last_pasted: String,
    log: OperatorLog,
    increment_after_save: bool,
}

impl SaveController {
    pub fn new(runtime: Arc<dyn ClipRuntime>) -> Self {
        Self {
            runtime,
            state: SessionState::new(),
            buffer: Buffer::new(),
            naming: FileNameSpec::default(),
            file_name: String::new(),
            last_pasted: String::new(),
            log: OperatorLog::new(),
            increment_after_save: true,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn naming(&self) -> &FileNameSpec {
        &self.naming
    }

    /// The last successfully computed file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Trimmed copy of the last captured value
    pub fn last_pasted(&self) -> &str {
        &self.last_pasted
    }

    pub fn log(&self) -> &OperatorLog {
        &self.log
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            tracking: self.state.is_tracking,
            auto_save_on_multiline: self.state.auto_save_on_multiline,
            output_folder: self.state.output_folder.clone(),
            file_name: self.file_name.clone(),
            buffered_entries: self.buffer.len(),
            selected_file: self.state.selected_file.clone(),
            watcher_failure: self.state.watcher_failure.clone(),
        }
    }

    /// Push a status snapshot to the front end.
    pub fn report_status(&self) {
        self.emit(RuntimeEvent::StatusReport {
            status: self.status(),
        });
    }

    pub fn set_increment_after_save(&mut self, enabled: bool) {
        self.increment_after_save = enabled;
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    pub fn start_tracking(&mut self) {
        if self.state.is_tracking {
            return;
        }
        self.state.is_tracking = true;
        self.emit(RuntimeEvent::StatusChanged { tracking: true });
        self.report(LogLevel::Info, "Start tracking clipboard changes...");
    }

    pub fn stop_tracking(&mut self) {
        if !self.state.is_tracking {
            return;
        }
        self.state.is_tracking = false;
        self.emit(RuntimeEvent::StatusChanged { tracking: false });
        self.report(LogLevel::Info, "Stop tracking clipboard changes...");
    }

    /// Flip tracking and return the new state.
    pub fn toggle_tracking(&mut self) -> bool {
        if self.state.is_tracking {
            self.stop_tracking();
        } else {
            self.start_tracking();
        }
        self.state.is_tracking
    }

    pub fn set_auto_save_on_multiline(&mut self, enabled: bool) {
        self.state.auto_save_on_multiline = enabled;
    }

    // ========================================================================
    // Clipboard deltas
    // ========================================================================

    /// Handle a value delivered by the clipboard watcher.
    ///
    /// Ignored while idle, and when `text` equals the last captured value.
    pub async fn on_clipboard_delta(&mut self, text: &str, check_auto_save: bool) {
        if !self.state.is_tracking {
            return;
        }
        if text == self.state.last_clipboard_value {
            tracing::debug!("Ignoring repeated clipboard value");
            return;
        }
        self.capture(text, check_auto_save).await;
    }

    /// Append the last captured value again.
    ///
    /// Never triggers auto-save, even for multi-line values.
    pub async fn duplicate_last(&mut self) {
        if self.last_pasted.trim().is_empty() {
            self.report(LogLevel::Warn, "Previous clipboard is empty!");
            return;
        }

        let value = self.state.last_clipboard_value.clone();
        self.capture(&value, false).await;
    }

    async fn capture(&mut self, text: &str, check_auto_save: bool) {
        if !self.state.is_tracking {
            tracing::debug!("Not tracking; dropping clipboard value");
            return;
        }

        self.state.last_clipboard_value = text.to_string();
        self.buffer.append(text);
        self.emit(RuntimeEvent::BufferChanged {
            contents: self.buffer.contents(),
        });

        self.last_pasted = text.trim().to_string();
        self.emit(RuntimeEvent::LastPastedChanged {
            text: self.last_pasted.clone(),
        });

        if check_auto_save && self.state.auto_save_on_multiline && has_line_break(text) {
            tracing::debug!("Multi-line value captured; saving");
            self.save().await;
        }
    }

    // ========================================================================
    // Naming
    // ========================================================================

    pub fn set_leading(&mut self, leading: &str) {
        self.naming.leading = leading.to_string();
        self.update_file_name();
    }

    pub fn set_counter(&mut self, counter: &str) {
        self.naming.counter = counter.to_string();
        self.update_file_name();
    }

    pub fn set_pad_width(&mut self, pad_width: &str) {
        self.naming.pad_width = pad_width.to_string();
        self.update_file_name();
    }

    pub fn set_trailing(&mut self, trailing: &str) {
        self.naming.trailing = trailing.to_string();
        self.update_file_name();
    }

    pub fn set_naming(&mut self, naming: FileNameSpec) {
        self.naming = naming;
        self.update_file_name();
    }

    /// Recompute the file name; on a parse failure the previous name stays.
    fn update_file_name(&mut self) {
        match self.naming.render() {
            Ok(name) => {
                self.file_name = name;
                self.emit(RuntimeEvent::FileNameChanged {
                    file_name: self.file_name.clone(),
                    counter: self.naming.counter.clone(),
                });
            }
            Err(e) => {
                self.report(LogLevel::Error, format!("Error updating file name! ({})", e));
            }
        }
    }

    fn advance_counter(&mut self) {
        if !self.increment_after_save {
            return;
        }

        match self.naming.increment_counter() {
            Ok(true) => self.update_file_name(),
            Ok(false) => {}
            Err(e) => {
                self.report(
                    LogLevel::Error,
                    format!("Error incrementing file number ({})", e),
                );
            }
        }
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Write the buffer to `<output folder>/<file name>.txt`.
    ///
    /// On success the buffer is cleared, the directory view refreshed and the
    /// counter advanced. Any other outcome leaves buffer and counter as they were.
    pub async fn save(&mut self) -> SaveOutcome {
        match self.write_buffer().await {
            Ok(path) => {
                self.buffer.clear();
                self.emit(RuntimeEvent::BufferChanged {
                    contents: String::new(),
                });
                self.report(LogLevel::Info, format!("Saved {}", path.display()));
                self.refresh().await;
                self.advance_counter();
                SaveOutcome::Saved(path)
            }
            Err(ClipError::Declined) => {
                self.report(LogLevel::Info, "Abort overriding existing file!");
                SaveOutcome::Aborted
            }
            Err(e) => {
                self.report_error(&e);
                SaveOutcome::Failed
            }
        }
    }

    async fn write_buffer(&self) -> Result<PathBuf> {
        let folder = self.state.output_folder.trim();
        let name = self.file_name.trim();

        if folder.is_empty() || name.is_empty() {
            return Err(ClipError::validation(
                "Error! Empty file name or directory. Please enter name or folder",
            ));
        }

        let path = files::target_path(Path::new(folder), name);

        if tokio::fs::try_exists(&path).await? {
            let confirmed = self
                .confirm(ConfirmKind::Overwrite { path: path.clone() })
                .await;
            if !confirmed {
                return Err(ClipError::Declined);
            }
        }

        files::write_text_file(&path, &self.buffer.contents()).await?;
        Ok(path)
    }

    // ========================================================================
    // Directory view
    // ========================================================================

    /// Change the output folder and refresh the directory view.
    pub async fn set_output_folder(&mut self, folder: &str) {
        self.state.output_folder = folder.to_string();
        self.refresh().await;
    }

    /// Re-validate the output folder and re-list it.
    pub async fn refresh(&mut self) {
        let folder = self.state.output_folder.clone();
        if !self.state.set_output_folder(&folder) {
            tracing::debug!("Output folder {:?} is not a directory", folder);
            return;
        }

        let Some(directory) = self.state.current_directory.clone() else {
            return;
        };

        match files::list_directory(&directory, self.state.sort_order).await {
            Ok(entries) => self.emit(RuntimeEvent::DirectoryRefreshed {
                path: directory,
                entries,
            }),
            Err(e) => self.report(
                LogLevel::Error,
                format!("Failed to list {}: {}", directory.display(), e),
            ),
        }
    }

    /// Navigate to the parent of the current directory.
    pub async fn back(&mut self) {
        let Some(parent) = self.state.parent_directory.clone() else {
            return;
        };
        if !parent.is_dir() {
            return;
        }
        self.set_output_folder(&parent.to_string_lossy()).await;
    }

    /// Ask the directory picker for a new output folder.
    pub async fn choose_folder(&mut self) {
        match self.runtime.pick_directory().await {
            Ok(Some(directory)) => self.set_output_folder(&directory.to_string_lossy()).await,
            Ok(None) => {}
            Err(e) => self.report(LogLevel::Warn, format!("Directory picker failed: {}", e)),
        }
    }

    pub async fn set_sort_order(&mut self, order: SortOrder) {
        self.state.sort_order = order;
        self.refresh().await;
    }

    /// A file was clicked in the directory view.
    pub async fn on_file_selected(&mut self, path: &Path) {
        self.state.selected_file = Some(path.to_path_buf());

        match files::read_text_file(path).await {
            Ok(content) => self.emit(RuntimeEvent::FileViewerChanged {
                path: Some(path.to_path_buf()),
                content,
            }),
            Err(e) => self.report(
                LogLevel::Error,
                format!("Failed to read {}: {}", path.display(), e),
            ),
        }
    }

    /// A folder was clicked in the directory view.
    pub async fn on_folder_selected(&mut self, path: &Path) {
        self.set_output_folder(&path.to_string_lossy()).await;
        self.emit(RuntimeEvent::FileViewerChanged {
            path: None,
            content: String::new(),
        });
    }

    pub fn open_selected(&mut self) {
        match self.state.selected_file.clone() {
            Some(path) => self.emit(RuntimeEvent::OpenRequested { path }),
            None => self.report(LogLevel::Warn, "Please select a file to open!"),
        }
    }

    pub fn show_in_explorer(&mut self) {
        match self.state.current_directory.clone() {
            Some(path) => self.emit(RuntimeEvent::OpenRequested { path }),
            None => self.report(LogLevel::Warn, "No output folder to show!"),
        }
    }

    // ========================================================================
    // Rename / delete
    // ========================================================================

    pub async fn rename_selected(&mut self, new_name: &str) -> bool {
        match self.state.selected_file.clone() {
            Some(file) => self.rename(&file, new_name).await,
            None => {
                self.report(LogLevel::Warn, "Please select a file to rename!");
                false
            }
        }
    }

    /// Rename a managed text file within its directory.
    ///
    /// A blank or unchanged name does nothing. Returns `true` when a file was renamed.
    pub async fn rename(&mut self, file: &Path, new_name: &str) -> bool {
        match self.try_rename(file, new_name).await {
            Ok(Some(target)) => {
                self.report(
                    LogLevel::Info,
                    format!("Renamed {} to {}", file.display(), target.display()),
                );
                self.refresh().await;
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.report_error(&e);
                false
            }
        }
    }

    async fn try_rename(&self, file: &Path, new_name: &str) -> Result<Option<PathBuf>> {
        if !tokio::fs::try_exists(file).await? {
            return Err(ClipError::validation("Please select a file to rename!"));
        }
        if !files::is_managed_text_file(file) {
            return Err(ClipError::validation(
                "Only allowed to rename text (.txt) files!",
            ));
        }

        let Some(name) = files::managed_file_name(new_name) else {
            return Ok(None);
        };
        if !files::is_plain_file_name(&name) {
            return Err(ClipError::validation(format!(
                "Invalid file name: {}",
                new_name.trim()
            )));
        }
        let target = file.with_file_name(name);
        if target == file {
            return Ok(None);
        }
        if tokio::fs::try_exists(&target).await? {
            return Err(ClipError::validation(format!(
                "{} already exists!",
                target.display()
            )));
        }

        tokio::fs::rename(file, &target).await?;
        Ok(Some(target))
    }

    pub async fn delete_selected(&mut self) -> bool {
        match self.state.selected_file.clone() {
            Some(file) => self.delete(&file).await,
            None => {
                self.report(LogLevel::Warn, "Please select a file to delete!");
                false
            }
        }
    }

    /// Delete a managed text file after confirmation.
    pub async fn delete(&mut self, file: &Path) -> bool {
        if !files::is_managed_text_file(file) {
            self.report(LogLevel::Error, "Only allowed to delete text (.txt) files!");
            return false;
        }

        let confirmed = self
            .confirm(ConfirmKind::Delete {
                path: file.to_path_buf(),
            })
            .await;
        if !confirmed {
            self.report(
                LogLevel::Info,
                format!("Delete cancelled: {}", file.display()),
            );
            return false;
        }

        match tokio::fs::remove_file(file).await {
            Ok(()) => {
                self.report(
                    LogLevel::Info,
                    format!("Successfully deleted: {}", file.display()),
                );
                self.refresh().await;
                true
            }
            Err(e) => {
                self.report(
                    LogLevel::Error,
                    format!("Error occurred deleting: {} ({})", file.display(), e),
                );
                false
            }
        }
    }

    // ========================================================================
    // Watcher status
    // ========================================================================

    /// Record that the clipboard watcher stopped for good.
    pub fn on_watcher_failed(&mut self, message: &str) {
        self.state.watcher_failure = Some(message.to_string());
        self.emit(RuntimeEvent::WatcherFailed {
            message: message.to_string(),
        });
        self.report(
            LogLevel::Error,
            format!("Clipboard watcher stopped: {}", message),
        );
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Ask for confirmation; an unavailable prompt counts as a decline.
    async fn confirm(&self, kind: ConfirmKind) -> bool {
        match self.runtime.confirm(kind).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                tracing::warn!("Confirmation unavailable: {}", e);
                false
            }
        }
    }

    fn emit(&self, event: RuntimeEvent) {
        if let Err(e) = self.runtime.emit(event) {
            tracing::warn!("Failed to emit event: {}", e);
        }
    }

    /// Append to the operator log and forward to the front end.
    pub fn report(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = self.log.push(level, message);
        self.emit(RuntimeEvent::Log {
            level: entry.level,
            message: entry.message,
        });
    }

    fn report_error(&mut self, error: &ClipError) {
        let message = match error {
            ClipError::Validation(message) => message.clone(),
            other => other.to_string(),
        };
        self.report(LogLevel::Error, message);
    }
}

fn has_line_break(text: &str) -> bool {
    text.contains('\n') || text.contains('\r')
}
