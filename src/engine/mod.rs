// src/engine/mod.rs

//! Trigger handling.
//!
//! A [`TaskSession`] owns the registry for one project and an executor
//! backend. Each trigger is planned, then its invocations run one after the
//! other. Triggers are independent; a failed trigger leaves the session
//! usable.

pub mod session;

pub use session::{TaskRun, TaskSession, TriggerReport};
