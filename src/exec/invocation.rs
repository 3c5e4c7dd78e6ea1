// src/exec/invocation.rs

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;

use crate::errors::{Result, TaskpadError};

use super::diagnostics::ErrorMarker;

/// Where an invocation's output and result are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputRouting {
    /// Dedicated terminal panel, optionally sized (rows).
    Terminal { size: Option<u16> },
    /// Blocking run. With `bang`, a non-zero exit is an error.
    Immediate { bang: bool },
    /// Plain run; output goes to the debug log only.
    #[default]
    Background,
}

impl OutputRouting {
    pub fn signals_failure(&self) -> bool {
        matches!(self, OutputRouting::Immediate { bang: true })
    }
}

impl fmt::Display for OutputRouting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputRouting::Terminal { size: Some(rows) } => write!(f, "terminal({rows})"),
            OutputRouting::Terminal { size: None } => f.write_str("terminal"),
            OutputRouting::Immediate { bang: true } => f.write_str("immediate!"),
            OutputRouting::Immediate { bang: false } => f.write_str("immediate"),
            OutputRouting::Background => f.write_str("background"),
        }
    }
}

/// A ready-to-run external process call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    pub program: String,
    /// Positional, in declaration order.
    pub args: Vec<String>,
    /// Overrides merged onto the ambient environment.
    pub env: BTreeMap<String, String>,
    pub routing: OutputRouting,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn routing(mut self, routing: OutputRouting) -> Self {
        self.routing = routing;
        self
    }

    /// The environment the process will see, given the ambient one.
    pub fn merged_env<I>(&self, ambient: I) -> BTreeMap<OsString, OsString>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        merge_environment(ambient, &self.env)
    }

    /// Shell-like rendering for dry runs and logs.
    pub fn command_line(&self) -> String {
        let mut parts: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, shell_quote(v)))
            .collect();
        parts.push(shell_quote(&self.program));
        parts.extend(self.args.iter().map(|a| shell_quote(a)));
        parts.join(" ")
    }
}

/// Overlay `overrides` on `ambient`. Variables not named in `overrides` are
/// kept as they are.
pub fn merge_environment<I>(
    ambient: I,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut merged: BTreeMap<OsString, OsString> = ambient.into_iter().collect();
    for (key, value) in overrides.iter() {
        merged.insert(OsString::from(key), OsString::from(value));
    }
    merged
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// What happened when an invocation ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub success: bool,
    /// Diagnostics collected from immediate runs.
    pub markers: Vec<ErrorMarker>,
}

impl InvocationOutcome {
    pub fn from_code(exit_code: i32) -> Self {
        Self {
            exit_code,
            success: exit_code == 0,
            markers: Vec::new(),
        }
    }

    /// Apply the routing's failure-signaling: a failed `bang` run is an error.
    pub fn check(&self, task: &str, invocation: &Invocation) -> Result<()> {
        if !self.success && invocation.routing.signals_failure() {
            return Err(TaskpadError::TaskFailed {
                task: task.to_string(),
                program: invocation.program.clone(),
                code: self.exit_code,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_quotes_when_needed() {
        let inv = Invocation::new("cargo")
            .args(["run", "--", "--linksdir", "episodes links"])
            .env("RUST_LOG", "chapter_tracker=debug");
        assert_eq!(
            inv.command_line(),
            "RUST_LOG=chapter_tracker=debug cargo run -- --linksdir 'episodes links'"
        );
    }

    #[test]
    fn override_replaces_only_named_variable() {
        let ambient = vec![
            (OsString::from("PATH"), OsString::from("/usr/bin")),
            (OsString::from("RUST_BACKTRACE"), OsString::from("0")),
        ];
        let inv = Invocation::new("cargo").env("RUST_BACKTRACE", "1");
        let merged = inv.merged_env(ambient);
        assert_eq!(merged.get(&OsString::from("PATH")), Some(&OsString::from("/usr/bin")));
        assert_eq!(merged.get(&OsString::from("RUST_BACKTRACE")), Some(&OsString::from("1")));
    }

    #[test]
    fn only_bang_failures_are_errors() {
        let failed = InvocationOutcome::from_code(101);
        let bang = Invocation::new("cargo").routing(OutputRouting::Immediate { bang: true });
        let quiet = Invocation::new("cargo").routing(OutputRouting::Immediate { bang: false });

        assert!(matches!(
            failed.check("check", &bang),
            Err(TaskpadError::TaskFailed { code: 101, .. })
        ));
        assert!(failed.check("check", &quiet).is_ok());
        assert!(InvocationOutcome::from_code(0).check("check", &bang).is_ok());
    }
}
