//! CLI module for headless clipcompiler sessions.
//!
//! The terminal stands in for the window: the controller talks to the
//! `ClipRuntime` abstraction, and `CliRuntime` turns its events into a
//! channel consumed by the output handler.
//!
//! ```text
//! +-----------------+     +-------------+     +---------------+
//! | SaveController  | --> | CliRuntime  | --> | output.rs     |
//! | (UI context)    |     | (emit())    |     | (print/JSON)  |
//! +-----------------+     +-------------+     +---------------+
//!         ^                      ^
//!         |  Command             |  prompt answers
//!         +------- repl.rs ------+
//! ```
//!
//! # REPL Mode
//!
//! Operator controls are slash commands read from stdin. See `repl.rs`.

mod args;
mod bootstrap;
mod output;
mod repl;

pub use args::Args;
pub use bootstrap::{initialize, CliContext};
pub use output::run_event_loop;
pub use repl::run_repl;
