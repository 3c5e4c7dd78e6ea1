// src/types.rs

use std::str::FromStr;
use serde::Deserialize;

/// Where a task's output and result are surfaced.
///
/// - `Terminal`: the process owns the terminal (the "panel").
/// - `Immediate`: blocking run; output is echoed and scanned for diagnostics.
/// - `Background`: plain run; output only reaches the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Terminal,
    Immediate,
    Background,
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Background
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terminal" => Ok(OutputMode::Terminal),
            "immediate" => Ok(OutputMode::Immediate),
            "background" => Ok(OutputMode::Background),
            other => Err(format!(
                "invalid output mode: {other} (expected \"terminal\", \"immediate\" or \"background\")"
            )),
        }
    }
}
