//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for clipcompiler. Every flag overrides
//! the matching value from the settings file.

use clap::Parser;
use std::path::PathBuf;

/// clipcompiler - collect clipboard text into numbered .txt files
#[derive(Parser, Debug, Clone)]
#[command(name = "clipcompiler")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Output folder (default: settings file, then $CLIPCOMPILER_OUTPUT)
    pub output: Option<PathBuf>,

    /// Settings file to use instead of ~/.clipcompiler/settings.toml
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Start tracking the clipboard immediately
    #[arg(short = 't', long)]
    pub track: bool,

    /// Save as soon as a multi-line value is copied
    #[arg(short = 'a', long)]
    pub auto_save: bool,

    /// Leading text of the file name
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub leading: Option<String>,

    /// Counter part of the file name
    #[arg(short = 'n', long, value_name = "N")]
    pub number: Option<String>,

    /// Zero-pad the counter to this many digits (0 or empty: no padding)
    #[arg(short = 'p', long, value_name = "WIDTH")]
    pub pad: Option<String>,

    /// Trailing text of the file name
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub trailing: Option<String>,

    /// Answer "yes" to every overwrite/delete confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output events as JSON lines (for scripting/parsing)
    #[arg(long)]
    pub json: bool,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["clipcompiler"]);
        assert_eq!(args.output, None);
        assert_eq!(args.settings, None);
        assert!(!args.track);
        assert!(!args.auto_save);
        assert!(!args.yes);
        assert!(!args.json);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_output_folder() {
        let args = Args::parse_from(["clipcompiler", "/tmp/clips"]);
        assert_eq!(args.output, Some(PathBuf::from("/tmp/clips")));
    }

    #[test]
    fn test_args_naming_fields() {
        let args = Args::parse_from([
            "clipcompiler",
            "--leading",
            "IMG",
            "-n",
            "7",
            "--pad",
            "3",
            "--trailing",
            "final",
        ]);
        assert_eq!(args.leading.as_deref(), Some("IMG"));
        assert_eq!(args.number.as_deref(), Some("7"));
        assert_eq!(args.pad.as_deref(), Some("3"));
        assert_eq!(args.trailing.as_deref(), Some("final"));
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from(["clipcompiler", "-t", "-a", "-y", "--json", "-v"]);
        assert!(args.track);
        assert!(args.auto_save);
        assert!(args.yes);
        assert!(args.json);
        assert!(args.verbose);
    }

    #[test]
    fn test_args_settings_path() {
        let args = Args::parse_from(["clipcompiler", "--settings", "/etc/clip.toml"]);
        assert_eq!(args.settings, Some(PathBuf::from("/etc/clip.toml")));
    }
}
