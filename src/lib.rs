//! clipcompiler: collects clipboard text into a buffer and saves it as
//! auto-named `.txt` files.
//!
//! The pieces, bottom-up:
//! - `naming`, `buffer`, `console`, `state`, `files`: plain data and helpers
//! - `clipboard`: system clipboard access and the polling watcher thread
//! - `controller`: the `SaveController` state machine
//! - `runtime`: the front-end abstraction the controller talks to
//! - `app`: the UI context task that owns the controller
//! - `settings`, `cli`: configuration and the terminal front end

pub mod app;
pub mod buffer;
pub mod clipboard;
pub mod console;
pub mod controller;
pub mod error;
pub mod files;
pub mod naming;
pub mod runtime;
pub mod settings;
pub mod state;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{ClipError, Result};
