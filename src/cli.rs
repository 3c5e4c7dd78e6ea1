// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `taskpad`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskpad",
    version,
    about = "Run named project tasks declared in a TOML task file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task file (TOML).
    ///
    /// When left at the default and the file does not exist, the built-in
    /// task table is used instead.
    #[arg(long, value_name = "PATH", default_value = crate::config::loader::DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKPAD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all registered tasks.
    List,

    /// Resolve a task and print the invocations it would run.
    Show {
        /// Task name or alias.
        task: String,

        /// Task arguments: `key=value` or positional values.
        args: Vec<String>,
    },

    /// Resolve and run a task (and its prerequisites).
    Run {
        /// Task name or alias.
        task: String,

        /// Task arguments: `key=value` or positional values.
        args: Vec<String>,
    },

    /// Write the built-in task table to the config path.
    Init,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_mixed_args() {
        let args = CliArgs::try_parse_from(["taskpad", "run", "go", "example=demo", "extra"])
            .unwrap();
        match args.command {
            Command::Run { task, args } => {
                assert_eq!(task, "go");
                assert_eq!(args, vec!["example=demo", "extra"]);
            }
            other => panic!("expected run, got {:?}", other),
        }
        assert_eq!(args.config, "Taskpad.toml");
    }
}
