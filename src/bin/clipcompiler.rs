//! clipcompiler - collect clipboard text into numbered .txt files
//!
//! # Usage
//!
//! ```bash
//! # Track the clipboard into ~/clips, saving multi-line copies right away
//! ./target/debug/clipcompiler ~/clips --track --auto-save
//!
//! # Name files "IMG 007 final.txt", "IMG 008 final.txt", ...
//! ./target/debug/clipcompiler ~/clips --leading IMG -n 7 --pad 3 --trailing final
//!
//! # JSON output for scripting
//! ./target/debug/clipcompiler ~/clips --json --yes | jq .
//! ```

use anyhow::Result;
use clap::Parser;

use clipcompiler_lib::cli::{initialize, run_event_loop, run_repl, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut ctx = initialize(&args).await?;

    let event_rx = ctx
        .event_rx
        .take()
        .ok_or_else(|| anyhow::anyhow!("Event receiver already taken"))?;
    let output = tokio::spawn(run_event_loop(event_rx, args.json));

    let result = run_repl(&ctx).await;

    // Graceful shutdown; the output loop ends once the runtime is dropped
    ctx.shutdown().await?;
    output.await??;

    result
}
