// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`]: the `Invocation` value, output routing and outcomes.
//! - [`process`]: spawning one invocation with `tokio::process::Command`
//!   and routing its output.
//! - [`diagnostics`]: rustc/cargo diagnostic extraction for immediate runs.
//! - [`backend`]: the `ExecutorBackend` trait and the production
//!   `ProcessExecutor`; tests replace it with a fake.

pub mod backend;
pub mod diagnostics;
pub mod invocation;
pub mod process;

pub use backend::{ExecutorBackend, ProcessExecutor};
pub use diagnostics::{ErrorMarker, Severity};
pub use invocation::{merge_environment, Invocation, InvocationOutcome, OutputRouting};
