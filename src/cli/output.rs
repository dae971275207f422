//! CLI output handling - Event receiver loop.
//!
//! Receives events from the controller via the runtime channel and renders
//! them as short tagged lines, or as JSON lines with `--json`.

use std::io::{self, Write};

use anyhow::Result;
use tokio::sync::mpsc;

use crate::console::LogLevel;
use crate::controller::StatusSnapshot;
use crate::runtime::RuntimeEvent;

/// Run the event loop until every sender has been dropped.
///
/// # Arguments
///
/// * `event_rx` - Channel receiver for runtime events
/// * `json_mode` - If true, output events as JSON lines
pub async fn run_event_loop(
    mut event_rx: mpsc::UnboundedReceiver<RuntimeEvent>,
    json_mode: bool,
) -> Result<()> {
    while let Some(event) = event_rx.recv().await {
        if json_mode {
            println!("{}", serde_json::to_string(&event)?);
            io::stdout().flush()?;
            continue;
        }

        match &event {
            RuntimeEvent::Log {
                level: LogLevel::Error,
                ..
            }
            | RuntimeEvent::WatcherFailed { .. } => {
                if let Some(text) = format_event(&event) {
                    eprintln!("{}", text);
                }
            }
            _ => {
                if let Some(text) = format_event(&event) {
                    println!("{}", text);
                    io::stdout().flush()?;
                }
            }
        }
    }

    Ok(())
}

/// Render an event for the terminal. `None` means the event is not shown.
fn format_event(event: &RuntimeEvent) -> Option<String> {
    let text = match event {
        RuntimeEvent::StatusChanged { tracking } => {
            let status = if *tracking { "tracking" } else { "idle" };
            format!("[status] {}", status)
        }
        RuntimeEvent::BufferChanged { contents } => {
            if contents.is_empty() {
                "[buffer] (empty)".to_string()
            } else {
                format!(
                    "[buffer] {} line(s): {}",
                    contents.lines().count(),
                    truncate(&single_line(contents), 60)
                )
            }
        }
        RuntimeEvent::LastPastedChanged { text } => {
            format!("[pasted] {}", truncate(&single_line(text), 60))
        }
        RuntimeEvent::FileNameChanged { file_name, .. } => format!("[name] {}.txt", file_name),
        RuntimeEvent::DirectoryRefreshed { path, entries } => {
            let mut text = format!("[dir] {} ({} entries)", path.display(), entries.len());
            for entry in entries {
                let suffix = if entry.is_dir { "/" } else { "" };
                let modified = entry
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                let name = format!("{}{}", entry.name, suffix);
                text.push_str(&format!("\n  {:<40} {}", name, modified));
            }
            text
        }
        RuntimeEvent::FileViewerChanged { path, content } => match path {
            Some(path) => format!("[file] {}\n{}", path.display(), content),
            None => return None,
        },
        RuntimeEvent::Log { level, message } => format!("[{}] {}", level_tag(*level), message),
        RuntimeEvent::PromptRequested { prompt, .. } => format!("[?] {}", prompt),
        RuntimeEvent::OpenRequested { path } => format!("[open] {}", path.display()),
        RuntimeEvent::WatcherFailed { message } => format!("[watcher] stopped: {}", message),
        RuntimeEvent::StatusReport { status } => format_status(status),
    };

    Some(text)
}

fn level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

fn format_status(status: &StatusSnapshot) -> String {
    let mut lines = vec![
        format!(
            "[status] {}",
            if status.tracking { "tracking" } else { "idle" }
        ),
        format!(
            "  auto-save:  {}",
            if status.auto_save_on_multiline { "on" } else { "off" }
        ),
        format!("  folder:     {}", status.output_folder),
        format!("  file name:  {}.txt", status.file_name),
        format!("  pending:    {} entries", status.buffered_entries),
    ];
    if let Some(ref selected) = status.selected_file {
        lines.push(format!("  selected:   {}", selected.display()));
    }
    if let Some(ref failure) = status.watcher_failure {
        lines.push(format!("  watcher:    stopped ({})", failure));
    }
    lines.join("\n")
}

/// Collapse line breaks for one-line display.
fn single_line(s: &str) -> String {
    s.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("ääääää", 5), "ää...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\r\nb\nc"), "a | b | c");
        assert_eq!(single_line("plain"), "plain");
    }

    #[test]
    fn test_format_buffer() {
        let event = RuntimeEvent::BufferChanged {
            contents: "one\ntwo".to_string(),
        };
        assert_eq!(
            format_event(&event).unwrap(),
            "[buffer] 2 line(s): one | two"
        );

        let empty = RuntimeEvent::BufferChanged {
            contents: String::new(),
        };
        assert_eq!(format_event(&empty).unwrap(), "[buffer] (empty)");
    }

    #[test]
    fn test_format_log_and_prompt() {
        let log = RuntimeEvent::Log {
            level: LogLevel::Warn,
            message: "Previous clipboard is empty!".to_string(),
        };
        assert_eq!(
            format_event(&log).unwrap(),
            "[warn] Previous clipboard is empty!"
        );

        let prompt = RuntimeEvent::PromptRequested {
            request_id: "id".to_string(),
            prompt: "Delete /tmp/a.txt? (y/n)".to_string(),
        };
        assert_eq!(
            format_event(&prompt).unwrap(),
            "[?] Delete /tmp/a.txt? (y/n)"
        );
    }

    #[test]
    fn test_cleared_viewer_is_hidden() {
        let event = RuntimeEvent::FileViewerChanged {
            path: None,
            content: String::new(),
        };
        assert!(format_event(&event).is_none());

        let shown = RuntimeEvent::FileViewerChanged {
            path: Some(PathBuf::from("/tmp/a.txt")),
            content: "hi".to_string(),
        };
        assert_eq!(format_event(&shown).unwrap(), "[file] /tmp/a.txt\nhi");
    }

    #[test]
    fn test_format_status() {
        let status = StatusSnapshot {
            tracking: true,
            auto_save_on_multiline: false,
            output_folder: "/tmp/clips".to_string(),
            file_name: "IMG 007 final".to_string(),
            buffered_entries: 2,
            selected_file: None,
            watcher_failure: Some("clipboard unavailable: gone".to_string()),
        };
        let text = format_status(&status);
        assert!(text.starts_with("[status] tracking"));
        assert!(text.contains("  file name:  IMG 007 final.txt"));
        assert!(text.contains("  pending:    2 entries"));
        assert!(text.ends_with("  watcher:    stopped (clipboard unavailable: gone)"));
        assert!(!text.contains("selected"));
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let event = RuntimeEvent::StatusChanged { tracking: true };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["tracking"], true);
    }
}
