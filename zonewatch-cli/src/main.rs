//! ## zonewatch-cli
//! **Operator interface**
//! `zonewatch run` monitors a live camera through the external analysis
//! service, `zonewatch simulate` drives the same engine with seeded
//! collaborators, and `zonewatch config` prints the effective settings.
//!
//! ### Expectations:
//! - Configuration from `config/*.yaml` and `ZONEWATCH_*` variables
//! - Ctrl-C stops monitoring gracefully
//! - Non-zero exit on configuration errors and hash mismatches

use clap::Parser;

mod commands;
mod render;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
