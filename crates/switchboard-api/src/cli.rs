//! CLI definitions for the `switchboard` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Conversational backend with routed chat, vision, PDF and image handlers.
#[derive(Parser)]
#[command(name = "switchboard", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (defaults to `<data dir>/config.toml`).
    #[arg(long, global = true, env = "SWITCHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (the default).
    Serve {
        /// Override `server.port`.
        #[arg(long, short)]
        port: Option<u16>,

        /// Override `server.host`.
        #[arg(long)]
        host: Option<String>,
    },

    /// Validate the configuration and print the effective values.
    CheckConfig,
}

impl Cli {
    /// Filter used when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info,tower_http=info",
            1 => "debug,sqlx=warn,hyper=info",
            _ => "trace",
        }
    }
}
