//! Line-oriented REPL for clipcompiler.
//!
//! Each slash command maps onto one front-end control (see `/help`). While a
//! confirmation or folder prompt is pending, the next line answers it instead
//! of being parsed as a command.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::app::Command;
use crate::files::SortOrder;
use crate::runtime::ClipRuntime;

use super::bootstrap::CliContext;

const HELP: &str = "\
Commands:
  /start, /stop, /toggle     start or stop tracking the clipboard
  /save                      write pending text to the output folder
  /dup                       append the last copied text again
  /folder <path>             set the output folder
  /choose                    pick the output folder interactively
  /back, /refresh            navigate to the parent folder, re-list the folder
  /sort name|date            directory listing order
  /leading <text>            file name: leading text
  /number <n>                file name: counter
  /pad <width>               file name: zero-pad width (0 or empty: none)
  /trailing <text>           file name: trailing text
  /autosave on|off           save as soon as a multi-line value is copied
  /select <path>             select a file or folder in the listing
  /rename <name>             rename the selected .txt file
  /delete                    delete the selected .txt file
  /open, /explorer           open the selected file, or the output folder
  /status                    show the current session
  /help                      show this help
  /quit                      exit";

/// REPL command variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Exit the REPL
    Quit,
    /// Show the command list
    Help,
    /// Forward to the UI context
    Run(Command),
    /// Known command with bad arguments (message is the usage line)
    Invalid(String),
    /// Unknown command (will show help)
    Unknown(String),
    /// Empty input (skip)
    Empty,
}

impl ReplCommand {
    /// Parse user input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }

        if !trimmed.starts_with('/') {
            return ReplCommand::Unknown(trimmed.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "/quit" | "/exit" | "/q" => return ReplCommand::Quit,
            "/help" | "/h" | "/?" => return ReplCommand::Help,
            "/status" => Command::ReportStatus,
            "/start" => Command::StartTracking,
            "/stop" => Command::StopTracking,
            "/toggle" => Command::ToggleTracking,
            "/save" => Command::Save,
            "/dup" | "/duplicate" => Command::Duplicate,
            "/folder" => Command::SetOutputFolder(rest.to_string()),
            "/choose" => Command::ChooseFolder,
            "/back" => Command::Back,
            "/refresh" => Command::Refresh,
            "/sort" => match rest.parse::<SortOrder>() {
                Ok(order) => Command::SetSortOrder(order),
                Err(_) => return ReplCommand::Invalid("Usage: /sort name|date".to_string()),
            },
            "/leading" => Command::SetLeading(rest.to_string()),
            "/number" => Command::SetCounter(rest.to_string()),
            "/pad" => Command::SetPadWidth(rest.to_string()),
            "/trailing" => Command::SetTrailing(rest.to_string()),
            "/autosave" => match parse_switch(rest) {
                Some(enabled) => Command::SetAutoSave(enabled),
                None => return ReplCommand::Invalid("Usage: /autosave on|off".to_string()),
            },
            "/select" if !rest.is_empty() => Command::Select(PathBuf::from(rest)),
            "/select" => return ReplCommand::Invalid("Usage: /select <path>".to_string()),
            "/rename" if !rest.is_empty() => Command::RenameSelected(rest.to_string()),
            "/rename" => return ReplCommand::Invalid("Usage: /rename <name>".to_string()),
            "/delete" => Command::DeleteSelected,
            "/open" => Command::OpenSelected,
            "/explorer" => Command::ShowInExplorer,
            _ => return ReplCommand::Unknown(trimmed.to_string()),
        };

        ReplCommand::Run(command)
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Read stdin lines on a dedicated thread.
///
/// Stdin reads block, and the REPL must stay responsive to prompts raised by
/// the UI context while it waits.
fn spawn_stdin_reader() -> io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// Run an interactive REPL session.
///
/// Returns when the user exits or on EOF (Ctrl+D).
pub async fn run_repl(ctx: &CliContext) -> Result<()> {
    let mut lines = spawn_stdin_reader()?;
    let json_mode = ctx.args.json;
    let show_banner = !json_mode && ctx.runtime.is_interactive();

    if show_banner {
        eprintln!("clipcompiler interactive mode");
        eprintln!("Type /help for commands, /quit to exit\n");
    }

    while let Some(line) = lines.recv().await {
        if ctx.runtime.answer_pending(&line) {
            continue;
        }

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => eprintln!("{}", HELP),
            ReplCommand::Run(command) => ctx.app.send(command),
            ReplCommand::Invalid(usage) => eprintln!("{}", usage),
            ReplCommand::Unknown(input) => {
                eprintln!("Unknown command: {}", input);
                eprintln!("Type /help for the list of commands");
            }
        }
    }

    if show_banner {
        eprintln!("Goodbye!");
    }

    Ok(())
}
