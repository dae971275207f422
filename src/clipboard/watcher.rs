use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{ClipboardError, ClipboardSource};

const MAX_CONSECUTIVE_ERRORS: u32 = 10;

/// Receives clipboard changes from the watcher thread.
///
/// Called synchronously on the watcher thread, one value at a time.
/// Implementations should hand the value off rather than touch UI state.
pub trait ClipboardListener: Send + Sync {
    fn on_clipboard_update(&self, text: &str);

    /// The watcher hit a fatal error and has stopped.
    fn on_watcher_failed(&self, _error: &ClipboardError) {}
}

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Time between clipboard reads
    pub poll_interval: Duration,
    /// Wait before re-reading a changed value, so a viewer that writes the
    /// clipboard in two steps is observed after its second write
    pub settle_delay: Duration,
    /// Upper bound for the polling interval while reads keep failing
    pub max_backoff: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            settle_delay: Duration::from_millis(100),
            max_backoff: Duration::from_millis(5000),
        }
    }
}

/// Polls a clipboard source and delivers each new text value, in order,
/// once, to every registered listener.
///
/// The value present when the watcher starts is taken as the baseline and is
/// not delivered.
pub struct ClipboardWatcher {
    config: WatcherConfig,
    listeners: Vec<Arc<dyn ClipboardListener>>,
}

/// Handle to a running watcher thread
pub struct WatcherHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Ask the thread to stop after its current cycle.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.thread
            .as_ref()
            .map(|thread| thread.is_finished())
            .unwrap_or(true)
    }

    /// Stop the thread and wait for it to exit.
    pub fn join(mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("[clipboard-watcher] Thread panicked");
            }
        }
    }
}

impl ClipboardWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ClipboardListener>) {
        self.listeners.push(listener);
    }

    /// Start watching on a dedicated thread.
    ///
    /// `open_source` runs on that thread, so the source itself need not be `Send`.
    pub fn spawn<F, S>(self, open_source: F) -> std::io::Result<WatcherHandle>
    where
        F: FnOnce() -> Result<S, ClipboardError> + Send + 'static,
        S: ClipboardSource,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let thread = thread::Builder::new()
            .name("clipboard-watcher".to_string())
            .spawn(move || match open_source() {
                Ok(source) => self.run(source, &thread_stop),
                Err(e) => self.fail(&e),
            })?;

        Ok(WatcherHandle {
            stop,
            thread: Some(thread),
        })
    }

    fn run<S: ClipboardSource>(&self, mut source: S, stop: &AtomicBool) {
        let mut previous = None;
        let mut baseline_taken = match Self::read_baseline(&mut source) {
            Ok(text) => {
                previous = text;
                true
            }
            Err(e) if e.is_fatal() => return self.fail(&e),
            Err(e) => {
                tracing::debug!("[clipboard-watcher] Baseline read failed, retrying: {}", e);
                false
            }
        };

        tracing::info!("[clipboard-watcher] Started monitoring");
        let mut consecutive_errors = 0u32;
        let mut interval = self.config.poll_interval;

        loop {
            thread::sleep(interval);
            if stop.load(Ordering::SeqCst) {
                tracing::info!("[clipboard-watcher] Stopped");
                return;
            }

            let result = if baseline_taken {
                self.poll(&mut source, &mut previous)
            } else {
                Self::read_baseline(&mut source).map(|text| {
                    previous = text;
                    baseline_taken = true;
                })
            };

            interval = match result {
                Ok(()) => {
                    consecutive_errors = 0;
                    self.config.poll_interval
                }
                Err(e) if e.is_fatal() => return self.fail(&e),
                Err(ClipboardError::NotText) => {
                    consecutive_errors = 0;
                    tracing::debug!("[clipboard-watcher] Skipping non-text content");
                    self.config.poll_interval
                }
                Err(e) => {
                    consecutive_errors += 1;
                    if consecutive_errors == 1 || consecutive_errors % 10 == 0 {
                        tracing::warn!(
                            "[clipboard-watcher] Failed to read clipboard (error #{}): {}",
                            consecutive_errors,
                            e
                        );
                    }
                    if consecutive_errors == MAX_CONSECUTIVE_ERRORS {
                        tracing::warn!(
                            "[clipboard-watcher] Too many consecutive errors. Reducing polling frequency."
                        );
                    }
                    self.backoff(consecutive_errors)
                }
            };
        }
    }

    /// Text already on the clipboard at startup. Non-text content leaves no baseline.
    fn read_baseline<S: ClipboardSource>(
        source: &mut S,
    ) -> Result<Option<String>, ClipboardError> {
        match source.read_text() {
            Ok(text) => Ok(Some(text)),
            Err(ClipboardError::NotText) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read once and deliver the value if it changed.
    fn poll<S: ClipboardSource>(
        &self,
        source: &mut S,
        previous: &mut Option<String>,
    ) -> Result<(), ClipboardError> {
        let mut text = source.read_text()?;
        if previous.as_deref() == Some(text.as_str()) {
            return Ok(());
        }

        if !self.config.settle_delay.is_zero() {
            thread::sleep(self.config.settle_delay);
            text = source.read_text()?;
            if previous.as_deref() == Some(text.as_str()) {
                return Ok(());
            }
        }

        *previous = Some(text.clone());
        if text.is_empty() {
            return Ok(());
        }

        tracing::debug!("[clipboard-watcher] Detected clipboard change");
        for listener in &self.listeners {
            listener.on_clipboard_update(&text);
        }
        Ok(())
    }

    fn backoff(&self, consecutive_errors: u32) -> Duration {
        if consecutive_errors < MAX_CONSECUTIVE_ERRORS {
            return self.config.poll_interval;
        }

        let factor = 2u32.pow((consecutive_errors - MAX_CONSECUTIVE_ERRORS).min(4));
        std::cmp::min(self.config.poll_interval * factor, self.config.max_backoff)
    }

    fn fail(&self, error: &ClipboardError) {
        tracing::error!("[clipboard-watcher] Stopping: {}", error);
        for listener in &self.listeners {
            listener.on_watcher_failed(error);
        }
    }
}
