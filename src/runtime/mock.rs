//! Recording runtime for tests.

use super::{ClipRuntime, ConfirmKind, RuntimeError, RuntimeEvent};
use crate::console::LogLevel;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Records every emitted event and answers prompts from a script.
///
/// Confirmations pop from `answers`; once it is empty `default_answer` is used.
pub struct MockRuntime {
    events: Mutex<Vec<RuntimeEvent>>,
    confirm_requests: Mutex<Vec<ConfirmKind>>,
    answers: Mutex<VecDeque<bool>>,
    default_answer: bool,
    directory: Mutex<Option<PathBuf>>,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::with_default_answer(true)
    }

    pub fn with_default_answer(default_answer: bool) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_requests: Mutex::new(Vec::new()),
            answers: Mutex::new(VecDeque::new()),
            default_answer,
            directory: Mutex::new(None),
        }
    }

    pub fn push_answer(&self, answer: bool) {
        self.answers.lock().push_back(answer);
    }

    pub fn set_picked_directory(&self, directory: Option<PathBuf>) {
        *self.directory.lock() = directory;
    }

    pub fn events(&self) -> Vec<RuntimeEvent> {
        self.events.lock().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    pub fn confirm_requests(&self) -> Vec<ConfirmKind> {
        self.confirm_requests.lock().clone()
    }

    /// Operator log messages emitted so far
    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RuntimeEvent::Log { level, message } => Some((*level, message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Listings received by the directory view
    pub fn refreshes(&self) -> Vec<PathBuf> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RuntimeEvent::DirectoryRefreshed { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ClipRuntime for MockRuntime {
    fn emit(&self, event: RuntimeEvent) -> Result<(), RuntimeError> {
        self.events.lock().push(event);
        Ok(())
    }

    async fn confirm(&self, kind: ConfirmKind) -> Result<bool, RuntimeError> {
        self.confirm_requests.lock().push(kind);
        Ok(self
            .answers
            .lock()
            .pop_front()
            .unwrap_or(self.default_answer))
    }

    async fn pick_directory(&self) -> Result<Option<PathBuf>, RuntimeError> {
        Ok(self.directory.lock().clone())
    }

    fn is_interactive(&self) -> bool {
        false
    }

    async fn shutdown(&self) -> Result<(), RuntimeError> {
        Ok(())
    }
}
