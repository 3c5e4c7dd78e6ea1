// src/exec/diagnostics.rs

//! Extraction of rustc/cargo diagnostics from immediate-run output.
//!
//! Recognised shape:
//!
//! ```text
//! error[E0308]: mismatched types
//!   --> src/main.rs:4:18
//! ```
//!
//! A headline without a following `-->` location is kept with no position.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static HEADLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(error|warning)(?:\[[A-Za-z0-9]+\])?: (.+)$").expect("headline regex is valid")
});

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*--> (.+?):(\d+):(\d+)\s*$").expect("location regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One diagnostic, as an editor would put it in a quickfix list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMarker {
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl fmt::Display for ErrorMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(col)) => {
                write!(f, "{file}:{line}:{col}: {}: {}", self.severity, self.message)
            }
            _ => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Line-fed collector; feed every output line, then call [`finish`].
///
/// [`finish`]: DiagnosticCollector::finish
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    markers: Vec<ErrorMarker>,
    // Headline still waiting for its location line.
    pending: Option<ErrorMarker>,
}

impl DiagnosticCollector {
    pub fn feed(&mut self, line: &str) {
        if let Some(caps) = HEADLINE.captures(line) {
            self.flush();
            let severity = if &caps[1] == "error" {
                Severity::Error
            } else {
                Severity::Warning
            };
            self.pending = Some(ErrorMarker {
                severity,
                message: caps[2].trim().to_string(),
                file: None,
                line: None,
                column: None,
            });
            return;
        }

        if let Some(caps) = LOCATION.captures(line) {
            if let Some(mut marker) = self.pending.take() {
                marker.file = Some(caps[1].to_string());
                marker.line = caps[2].parse().ok();
                marker.column = caps[3].parse().ok();
                self.markers.push(marker);
            }
        }
    }

    fn flush(&mut self) {
        if let Some(marker) = self.pending.take() {
            self.markers.push(marker);
        }
    }

    pub fn finish(mut self) -> Vec<ErrorMarker> {
        self.flush();
        // Cargo's closing summary ("could not compile ...") is not a location.
        self.markers
            .retain(|m| m.file.is_some() || !m.message.starts_with("could not compile"));
        self.markers
    }
}

/// Collect diagnostics from a complete block of output.
pub fn parse_diagnostics(output: &str) -> Vec<ErrorMarker> {
    let mut collector = DiagnosticCollector::default();
    for line in output.lines() {
        collector.feed(line);
    }
    collector.finish()
}
