// src/engine/session.rs

use std::fmt;

use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::{ExecutorBackend, InvocationOutcome};
use crate::registry::{ResolvedTask, SuppliedArgs, TaskRegistry};

/// Outcomes of one task's invocations within a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRun {
    pub task: String,
    pub outcomes: Vec<InvocationOutcome>,
}

/// Everything that ran for one trigger, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerReport {
    pub runs: Vec<TaskRun>,
}

impl TriggerReport {
    pub fn success(&self) -> bool {
        self.runs
            .iter()
            .flat_map(|run| run.outcomes.iter())
            .all(|outcome| outcome.success)
    }

    pub fn invocation_count(&self) -> usize {
        self.runs.iter().map(|run| run.outcomes.len()).sum()
    }
}

pub struct TaskSession<E: ExecutorBackend> {
    registry: TaskRegistry,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for TaskSession<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSession")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> TaskSession<E> {
    pub fn new(registry: TaskRegistry, executor: E) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Plan a trigger without running anything.
    pub fn render(&self, name: &str, args: &SuppliedArgs) -> Result<Vec<ResolvedTask>> {
        self.registry.plan(name, args)
    }

    /// Plan and run a trigger.
    ///
    /// Invocations run sequentially. The first spawn error or failed `bang`
    /// invocation stops the trigger and is returned.
    pub async fn trigger(&mut self, name: &str, args: &SuppliedArgs) -> Result<TriggerReport> {
        let plan = self.registry.plan(name, args)?;
        info!(
            task = %name,
            plan = ?plan.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "task triggered"
        );

        let mut report = TriggerReport::default();
        for resolved in plan.iter() {
            let mut run = TaskRun {
                task: resolved.name.clone(),
                outcomes: Vec::with_capacity(resolved.invocations.len()),
            };

            for invocation in resolved.invocations.iter() {
                let outcome = self.executor.invoke(&resolved.name, invocation).await?;
                outcome.check(&resolved.name, invocation)?;
                run.outcomes.push(outcome);
            }

            debug!(task = %run.task, invocations = run.outcomes.len(), "task finished");
            report.runs.push(run);
        }

        Ok(report)
    }
}
