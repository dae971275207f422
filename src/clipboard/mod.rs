//! Clipboard access and change detection.
//!
//! - `ClipboardSource`: a readable text clipboard (the system one, or a fake in tests)
//! - `watcher`: background thread that polls a source and fans changes out to listeners

pub mod watcher;

pub use watcher::{ClipboardListener, ClipboardWatcher, WatcherConfig, WatcherHandle};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The platform clipboard service cannot be used at all
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard holds something that is not text
    #[error("clipboard content is not text")]
    NotText,

    /// A single read failed; the next poll may succeed
    #[error("clipboard access failed: {0}")]
    Access(String),
}

impl ClipboardError {
    /// Whether the watcher must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClipboardError::Unavailable(_))
    }
}

/// Something the watcher can read plain text from.
pub trait ClipboardSource {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// The operating system clipboard, via `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.inner.get_text().map_err(|e| match e {
            arboard::Error::ContentNotAvailable | arboard::Error::ConversionFailure => {
                ClipboardError::NotText
            }
            arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable(e.to_string()),
            other => ClipboardError::Access(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_fatal() {
        assert!(ClipboardError::Unavailable("gone".into()).is_fatal());
        assert!(!ClipboardError::NotText.is_fatal());
        assert!(!ClipboardError::Access("busy".into()).is_fatal());
    }
}
