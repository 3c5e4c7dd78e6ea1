// src/registry/plan.rs

//! Prerequisite ordering for `after = [...]`.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, TaskpadError};

use super::{ResolvedTask, SuppliedArgs, TaskRegistry};

impl TaskRegistry {
    /// Resolve `name` and everything it depends on, in execution order.
    ///
    /// The requested task is last and receives `supplied`; prerequisites are
    /// resolved with no arguments. Each task appears once.
    pub fn plan(&self, name: &str, supplied: &SuppliedArgs) -> Result<Vec<ResolvedTask>> {
        let root = self
            .get(name)
            .ok_or_else(|| TaskpadError::UnknownTask(name.to_string()))?;

        let no_args = SuppliedArgs::new();
        self.execution_order(&root.name)?
            .into_iter()
            .map(|task| {
                let args = if task == root.name { supplied } else { &no_args };
                self.resolve(&task, args)
            })
            .collect()
    }

    /// Names of `name` and its transitive prerequisites, dependencies first.
    pub fn execution_order(&self, name: &str) -> Result<Vec<String>> {
        let root = self
            .get(name)
            .ok_or_else(|| TaskpadError::UnknownTask(name.to_string()))?;

        // Edge direction: dep -> task.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        graph.add_node(root.name.as_str());
        let mut pending = vec![root];

        while let Some(current) = pending.pop() {
            for dep in current.after.iter() {
                let dep_def = self
                    .get(dep)
                    .ok_or_else(|| TaskpadError::UnknownTask(dep.clone()))?;
                if !graph.contains_node(dep_def.name.as_str()) {
                    pending.push(dep_def);
                }
                graph.add_edge(dep_def.name.as_str(), current.name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
            Err(cycle) => Err(TaskpadError::DependencyCycle(format!(
                "cycle detected in `after` chain involving task '{}'",
                cycle.node_id()
            ))),
        }
    }
}
