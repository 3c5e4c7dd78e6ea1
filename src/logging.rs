// src/logging.rs

//! Subscriber setup for the `taskpad` binary.
//!
//! `--log-level` sets a single global level. Without it, `TASKPAD_LOG` is read
//! as a full filter directive, so `TASKPAD_LOG=taskpad::exec=debug` shows the
//! output of background tasks without the rest of the debug noise.
//!
//! Logs go to stderr; stdout belongs to the tasks.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "TASKPAD_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))
}

/// Pick the filter: the CLI flag wins, then the env directive, then `info`.
/// A directive that does not parse is reported and ignored.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<String>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }

    match env_value.as_deref().map(str::trim) {
        Some(directive) if !directive.is_empty() => EnvFilter::try_new(directive)
            .unwrap_or_else(|err| {
                eprintln!("taskpad: ignoring {LOG_ENV_VAR}={directive:?}: {err}");
                EnvFilter::new(DEFAULT_DIRECTIVE)
            }),
        _ => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
