//! Command-line configuration and logging setup.

use clap::Parser;
use tracing::Level;

use crate::commands::Command;

/// Inspect, compare and sort node addresses.
#[derive(Debug, Parser)]
#[command(name = "nodectl", version, about)]
pub struct CliConfig {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Log level for the configured verbosity. Warnings are always shown.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Install logging, run the command and print its result.
    pub fn run(self) -> anyhow::Result<()> {
        init_logging(self.log_level());
        let result = self.command.execute()?;
        println!("{}", result);
        Ok(())
    }
}

fn init_logging(level: Level) {
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
