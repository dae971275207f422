//! TOML-based settings for clipcompiler.
//!
//! Settings are loaded from `~/.clipcompiler/settings.toml` with environment
//! variable interpolation support. The output folder falls back to the
//! `CLIPCOMPILER_OUTPUT` environment variable through `get_with_env_fallback`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use clipcompiler_lib::settings::{get_with_env_fallback, SettingsManager, OUTPUT_FOLDER_ENV};
//!
//! let manager = SettingsManager::new().await?;
//! let settings = manager.get().await;
//!
//! let folder = get_with_env_fallback(&settings.output.folder, &[OUTPUT_FOLDER_ENV], None);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_with_env_fallback, settings_path, SettingsManager, OUTPUT_FOLDER_ENV};
pub use schema::ClipSettings;
