//! CLI bootstrap - wire settings, runtime, controller and watcher together.
//!
//! This module provides `CliContext`, which owns every running piece of a
//! headless session: the UI context task, the clipboard watcher thread and
//! the runtime that connects them to the terminal.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::app::App;
use crate::clipboard::{
    ClipboardError, ClipboardWatcher, SystemClipboard, WatcherConfig, WatcherHandle,
};
use crate::controller::SaveController;
use crate::naming::FileNameSpec;
use crate::runtime::{CliRuntime, ClipRuntime, RuntimeEvent};
use crate::settings::schema::WatcherSettings;
use crate::settings::{get_with_env_fallback, ClipSettings, SettingsManager, OUTPUT_FOLDER_ENV};

use super::args::Args;

/// Context for CLI execution containing all running services.
pub struct CliContext {
    /// Terminal runtime; the REPL routes prompt answers through it
    pub runtime: Arc<CliRuntime>,

    /// Event receiver for output handling (taken by the output loop)
    pub event_rx: Option<mpsc::UnboundedReceiver<RuntimeEvent>>,

    /// The UI context
    pub app: App,

    /// Clipboard watcher thread, if it could be started
    watcher: Option<WatcherHandle>,

    /// Settings manager
    pub settings_manager: Arc<SettingsManager>,

    /// Command-line arguments
    pub args: Args,
}

impl CliContext {
    /// Graceful shutdown - stop the watcher, drain the UI context.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(watcher) = self.watcher {
            watcher.stop();
            tokio::task::spawn_blocking(move || watcher.join())
                .await
                .context("Failed to join clipboard watcher")?;
        }

        // Unblocks a save that is still waiting on a confirmation
        if let Err(e) = self.runtime.shutdown().await {
            tracing::warn!("Runtime shutdown error: {}", e);
        }

        if let Some(controller) = self.app.shutdown().await {
            if !controller.buffer().is_empty() {
                tracing::warn!(
                    "Exiting with {} unsaved clipboard entries",
                    controller.buffer().len()
                );
            }
        }

        Ok(())
    }
}

/// Initialize the CLI context with all services.
pub async fn initialize(args: &Args) -> Result<CliContext> {
    // Load settings
    let settings_manager = Arc::new(
        match &args.settings {
            Some(path) => SettingsManager::with_path(path.clone()).await,
            None => SettingsManager::new().await,
        }
        .context("Failed to initialize settings manager")?,
    );

    // Ensure the global settings file exists (creates template on first run)
    if args.settings.is_none() {
        if let Err(e) = settings_manager.ensure_settings_file().await {
            tracing::warn!("Failed to create settings template: {}", e);
        }
    }

    let settings = settings_manager.get().await;

    init_logging(args.verbose, settings.logging.level.as_deref());

    if args.verbose {
        eprintln!(
            "[cli] Settings loaded from {}",
            settings_manager.path().display()
        );
    }

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel::<RuntimeEvent>();

    let runtime = Arc::new(CliRuntime::new(
        event_tx,
        args.yes,
        Duration::from_secs(settings.dialogs.confirm_timeout_secs),
    ));

    let controller = build_controller(runtime.clone(), &settings, args).await;

    if args.verbose {
        eprintln!(
            "[cli] Output folder: {}",
            controller.state().output_folder
        );
        eprintln!("[cli] File name: {}", controller.file_name());
    }

    let app = App::spawn(controller);
    let watcher = spawn_watcher(&settings.watcher, &app);

    Ok(CliContext {
        runtime,
        event_rx: Some(event_rx),
        app,
        watcher,
        settings_manager,
        args: args.clone(),
    })
}

/// Initialize tracing. `RUST_LOG` wins, then `--verbose`, then `logging.level`.
fn init_logging(verbose: bool, configured: Option<&str>) {
    let directive = if verbose {
        "clipcompiler=debug"
    } else {
        configured.unwrap_or("clipcompiler=warn")
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the controller from settings, with CLI flags taking precedence.
async fn build_controller(
    runtime: Arc<dyn ClipRuntime>,
    settings: &ClipSettings,
    args: &Args,
) -> SaveController {
    let mut controller = SaveController::new(runtime);

    let naming = &settings.naming;
    controller.set_naming(FileNameSpec::new(
        args.leading.clone().unwrap_or_else(|| naming.leading.clone()),
        args.number.clone().unwrap_or_else(|| naming.number.clone()),
        args.pad.clone().unwrap_or_else(|| naming.pad_width.clone()),
        args.trailing.clone().unwrap_or_else(|| naming.trailing.clone()),
    ));
    controller.set_increment_after_save(naming.increment_after_save);
    controller.set_auto_save_on_multiline(
        args.auto_save || settings.capture.auto_save_on_multiline,
    );
    controller.set_sort_order(settings.output.sort).await;

    if let Some(folder) = resolve_output_folder(args, settings) {
        controller.set_output_folder(&folder).await;
    }

    if args.track || settings.capture.start_tracking {
        controller.start_tracking();
    }

    controller
}

/// Resolve the output folder: CLI argument > settings > environment.
fn resolve_output_folder(args: &Args, settings: &ClipSettings) -> Option<String> {
    if let Some(ref output) = args.output {
        return Some(output.to_string_lossy().to_string());
    }

    get_with_env_fallback(&settings.output.folder, &[OUTPUT_FOLDER_ENV], None)
}

fn watcher_config(settings: &WatcherSettings) -> WatcherConfig {
    WatcherConfig {
        poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
        settle_delay: Duration::from_millis(settings.settle_delay_ms),
        max_backoff: Duration::from_millis(settings.max_backoff_ms),
    }
}

/// Start the clipboard watcher, feeding the UI context.
fn spawn_watcher(settings: &WatcherSettings, app: &App) -> Option<WatcherHandle> {
    let listener = app.listener();
    let mut watcher = ClipboardWatcher::new(watcher_config(settings));
    watcher.add_listener(listener.clone());

    match watcher.spawn(SystemClipboard::open) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!("Failed to start clipboard watcher: {}", e);
            listener.on_watcher_failed(&ClipboardError::Unavailable(e.to_string()));
            None
        }
    }
}
