use super::{ClipRuntime, ConfirmKind, RuntimeError, RuntimeEvent};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// A question waiting for the next line of operator input
struct PendingPrompt {
    request_id: String,
    tx: oneshot::Sender<String>,
}

pub struct CliRuntime {
    event_tx: RwLock<mpsc::UnboundedSender<RuntimeEvent>>,
    pending: Mutex<Option<PendingPrompt>>,
    /// Set by `shutdown`; no new prompts after that
    closed: AtomicBool,
    auto_confirm: bool,
    prompt_timeout: Duration,
}

impl CliRuntime {
    pub fn new(
        event_tx: mpsc::UnboundedSender<RuntimeEvent>,
        auto_confirm: bool,
        prompt_timeout: Duration,
    ) -> Self {
        Self {
            event_tx: RwLock::new(event_tx),
            pending: Mutex::new(None),
            closed: AtomicBool::new(false),
            auto_confirm,
            prompt_timeout,
        }
    }

    pub fn has_pending_prompt(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Hand an input line to the waiting prompt.
    ///
    /// Returns `false` when no prompt is waiting, in which case the line is a
    /// regular command.
    pub fn answer_pending(&self, line: &str) -> bool {
        match self.pending.lock().take() {
            Some(prompt) => {
                tracing::debug!("Answering prompt {}", prompt.request_id);
                // Receiver gone means the prompt already timed out
                let _ = prompt.tx.send(line.trim().to_string());
                true
            }
            None => false,
        }
    }

    async fn ask(&self, prompt: String) -> Result<String, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        let request_id = Uuid::new_v4().to_string();

        {
            let mut pending = self.pending.lock();
            if self.closed.load(Ordering::SeqCst) {
                return Err(RuntimeError::ReceiverClosed);
            }
            *pending = Some(PendingPrompt {
                request_id: request_id.clone(),
                tx,
            });
        }
        self.emit(RuntimeEvent::PromptRequested { request_id, prompt })?;

        match tokio::time::timeout(self.prompt_timeout, rx).await {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(_)) => Err(RuntimeError::ReceiverClosed),
            Err(_) => {
                self.pending.lock().take();
                Err(RuntimeError::PromptTimeout(self.prompt_timeout.as_secs()))
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ClipRuntime for CliRuntime {
    fn emit(&self, event: RuntimeEvent) -> Result<(), RuntimeError> {
        self.event_tx
            .read()
            .send(event)
            .map_err(|_| RuntimeError::ReceiverClosed)?;
        Ok(())
    }

    async fn confirm(&self, kind: ConfirmKind) -> Result<bool, RuntimeError> {
        if self.auto_confirm {
            tracing::info!("[auto-confirmed] {}", kind.prompt());
            return Ok(true);
        }

        let answer = self.ask(kind.prompt()).await?;
        Ok(is_yes(&answer))
    }

    async fn pick_directory(&self) -> Result<Option<PathBuf>, RuntimeError> {
        let answer = self
            .ask("Output folder (empty to cancel):".to_string())
            .await?;

        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }

    fn is_interactive(&self) -> bool {
        atty::is(atty::Stream::Stdin)
    }

    async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.closed.store(true, Ordering::SeqCst);
        // Dropping a pending prompt unblocks its waiter with ReceiverClosed
        self.pending.lock().take();
        Ok(())
    }
}
