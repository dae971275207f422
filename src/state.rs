use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::files::SortOrder;

/// Mutable session state for one process.
///
/// Owned by the UI context (through the `SaveController`); nothing here is
/// global. Lives for the whole process and is never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    /// Whether clipboard changes are captured into the buffer
    pub is_tracking: bool,

    /// Whether a captured value containing a line break saves immediately
    pub auto_save_on_multiline: bool,

    /// Output folder exactly as entered by the operator
    pub output_folder: String,

    /// The output folder, when it names an existing directory
    pub current_directory: Option<PathBuf>,

    /// Parent of `current_directory`
    pub parent_directory: Option<PathBuf>,

    /// File selected in the directory view
    pub selected_file: Option<PathBuf>,

    /// Last text dispatched to the buffer
    pub last_clipboard_value: String,

    /// Set once the clipboard watcher has failed permanently
    pub watcher_failure: Option<String>,

    /// Ordering used for directory listings
    pub sort_order: SortOrder,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the session at a new output folder.
    ///
    /// Returns `true` when the folder is an existing directory. In that case the
    /// current and parent directories follow it and the selection is cleared;
    /// otherwise both directories are cleared.
    pub fn set_output_folder(&mut self, folder: &str) -> bool {
        self.output_folder = folder.to_string();

        let path = Path::new(folder);
        if !folder.trim().is_empty() && path.is_dir() {
            self.selected_file = None;
            self.current_directory = Some(path.to_path_buf());
            self.parent_directory = path.parent().map(Path::to_path_buf);
            true
        } else {
            self.current_directory = None;
            self.parent_directory = None;
            false
        }
    }
}
