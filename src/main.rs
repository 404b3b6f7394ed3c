//! Vigicrues command-line client
//!
//! Usage:
//!   vigicrues search "Saint-Sulpice"          # catalog search, each hit checked
//!   vigicrues search Sulpice --no-check       # raw catalog hits
//!   vigicrues get O408101001                  # details + latest H/Q readings
//!   vigicrues territories
//!   vigicrues troncons 25
//!   vigicrues stations AG3
//!
//! Environment:
//!   RUST_LOG                  - log filter (overrides --log-level)
//!   VIGICRUES_BASE_URL        - operational API root
//!   VIGICRUES_DISCOVERY_URL   - catalog dataset URL
//!   VIGICRUES_TIMEOUT_SECS    - request timeout

use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vigicrues::cli::{self, Cli};
use vigicrues::{ClientConfig, Vigicrues};

fn main() -> ExitCode {
    let args = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut config = match ClientConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(timeout) = args.timeout {
        if !timeout.is_finite() || timeout <= 0.0 {
            eprintln!("❌ --timeout must be a positive number of seconds");
            return ExitCode::FAILURE;
        }
        config.timeout_secs = timeout;
    }

    let client = match Vigicrues::with_config(config, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli::run(&client, &args.command, args.json, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
