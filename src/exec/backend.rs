// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The session talks to an `ExecutorBackend` instead of spawning processes
//! itself, so tests can swap in a fake that records invocations.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;

use super::invocation::{Invocation, InvocationOutcome};
use super::process::run_invocation;

/// Trait abstracting how invocations are executed.
///
/// Production code uses [`ProcessExecutor`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ExecutorBackend: Send {
    /// Run one invocation of `task` to completion.
    ///
    /// Implementations report the exit status; they do not turn a failed
    /// `bang` run into an error (the session does).
    fn invoke<'a>(
        &'a mut self,
        task: &'a str,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationOutcome>> + Send + 'a>>;
}

/// Real executor backend: one OS process per invocation, run in the
/// project directory.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    project_dir: PathBuf,
}

impl ProcessExecutor {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }
}

impl ExecutorBackend for ProcessExecutor {
    fn invoke<'a>(
        &'a mut self,
        task: &'a str,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let outcome = run_invocation(task, invocation, &self.project_dir).await?;
            Ok(outcome)
        })
    }
}
