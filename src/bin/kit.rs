//! Scaffold agent for round-based arena matches.
//!
//! Consumes the engine handshake and every per-round update, and finishes
//! every turn without sending commands. Diagnostics go to stderr; stdout
//! belongs to the engine.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use arena_sdk::{Harness, HarnessConfig};

#[derive(Parser)]
#[command(name = "arena-kit", about = "Scaffold agent for round-based arena matches")]
struct Cli {
    /// Per-read deadline in seconds (0 blocks indefinitely)
    #[arg(long, default_value_t = 60)]
    read_deadline: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = HarnessConfig {
        read_deadline: match cli.read_deadline {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
    };

    Harness::from_stdio(&config).run()?;
    Ok(())
}
