//! Settings schema definitions for clipcompiler configuration.
//!
//! All settings structs use `#[serde(default)]` to allow partial configuration files.
//! Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::files::SortOrder;

/// Root settings structure.
///
/// Loaded from `~/.clipcompiler/settings.toml` with environment variable interpolation support.
/// Version field enables future migrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSettings {
    /// Schema version for migrations
    pub version: u32,

    /// Where saved files go and how the directory view is sorted
    pub output: OutputSettings,

    /// Initial naming fields
    pub naming: NamingSettings,

    /// Capture behavior at startup
    pub capture: CaptureSettings,

    /// Clipboard polling
    pub watcher: WatcherSettings,

    /// Confirmation dialogs
    pub dialogs: DialogSettings,

    /// Diagnostic logging
    pub logging: LoggingSettings,
}

/// Output folder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputSettings {
    /// Output folder (supports $ENV_VAR syntax)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Directory view order: "name" | "date"
    pub sort: SortOrder,
}

/// Initial values of the four naming fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingSettings {
    pub leading: String,
    pub number: String,
    pub pad_width: String,
    pub trailing: String,

    /// Advance the number after every successful save
    pub increment_after_save: bool,
}

/// Capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CaptureSettings {
    /// Save as soon as a multi-line value is captured
    pub auto_save_on_multiline: bool,

    /// Start in the tracking state
    pub start_tracking: bool,
}

/// Clipboard watcher timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    pub poll_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub max_backoff_ms: u64,
}

/// Confirmation dialog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogSettings {
    /// Unanswered confirmations are declined after this many seconds
    pub confirm_timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSettings {
    /// tracing filter directive, e.g. "clipcompiler=info"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

// =============================================================================
// Default implementations
// =============================================================================

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            version: 1,
            output: OutputSettings::default(),
            naming: NamingSettings::default(),
            capture: CaptureSettings::default(),
            watcher: WatcherSettings::default(),
            dialogs: DialogSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            leading: String::new(),
            number: "1".to_string(),
            pad_width: "3".to_string(),
            trailing: String::new(),
            increment_after_save: true,
        }
    }
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            settle_delay_ms: 100,
            max_backoff_ms: 5000,
        }
    }
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            confirm_timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ClipSettings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.output.folder, None);
        assert_eq!(settings.output.sort, SortOrder::Name);
        assert!(settings.naming.increment_after_save);
        assert!(!settings.capture.auto_save_on_multiline);
        assert_eq!(settings.watcher.poll_interval_ms, 250);
        assert_eq!(settings.dialogs.confirm_timeout_secs, 120);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            version = 1
            [output]
            folder = "/tmp/clips"
            sort = "date"
        "#;

        let settings: ClipSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.output.folder.as_deref(), Some("/tmp/clips"));
        assert_eq!(settings.output.sort, SortOrder::Date);
        // Defaults should fill in missing fields
        assert_eq!(settings.naming.pad_width, "3");
        assert_eq!(settings.watcher.settle_delay_ms, 100);
    }

    #[test]
    fn test_serialize_settings() {
        let settings = ClipSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[naming]"));
        assert!(!toml_str.contains("folder"));
    }

    #[test]
    fn test_template_parses() {
        let settings: ClipSettings =
            toml::from_str(include_str!("template.toml")).unwrap();
        assert_eq!(settings, ClipSettings::default());
    }
}
