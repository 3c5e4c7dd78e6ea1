// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile, TaskConfig};
use crate::errors::{Result, TaskpadError};
use crate::provider::is_known_provider;
use crate::registry::template::placeholders;
use crate::types::OutputMode;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskpadError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    for (name, task) in cfg.task.iter() {
        validate_task_body(name, task)?;
        validate_params(name, task)?;
        validate_placeholders(name, task)?;
    }
    validate_names(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(TaskpadError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_body(name: &str, task: &TaskConfig) -> Result<()> {
    match (&task.program, task.steps.is_empty()) {
        (Some(_), false) => Err(TaskpadError::ConfigError(format!(
            "task '{}' sets both `program` and `steps`",
            name
        ))),
        (None, true) => Err(TaskpadError::ConfigError(format!(
            "task '{}' needs either `program` or at least one entry in `steps`",
            name
        ))),
        (Some(program), true) if program.trim().is_empty() => Err(TaskpadError::ConfigError(
            format!("task '{}' has an empty `program`", name),
        )),
        _ => {
            for step in task.effective_steps() {
                if let Some(output) = &step.output {
                    if output.size.is_some() && output.mode != OutputMode::Terminal {
                        return Err(TaskpadError::ConfigError(format!(
                            "task '{}': `size` only applies to terminal output",
                            name
                        )));
                    }
                    if output.bang && output.mode != OutputMode::Immediate {
                        return Err(TaskpadError::ConfigError(format!(
                            "task '{}': `bang` only applies to immediate output",
                            name
                        )));
                    }
                }
            }
            Ok(())
        }
    }
}

fn validate_params(name: &str, task: &TaskConfig) -> Result<()> {
    let mut seen: Vec<&str> = Vec::new();
    for param in task.params.iter() {
        if seen.contains(&param.name.as_str()) {
            return Err(TaskpadError::ConfigError(format!(
                "task '{}' declares parameter '{}' twice",
                name, param.name
            )));
        }
        seen.push(param.name.as_str());

        if param.default.is_some() && param.provider.is_some() {
            return Err(TaskpadError::ConfigError(format!(
                "task '{}' parameter '{}' sets both `default` and `provider`",
                name, param.name
            )));
        }
        if let Some(provider) = &param.provider {
            if !is_known_provider(provider) {
                return Err(TaskpadError::ConfigError(format!(
                    "task '{}' parameter '{}' uses unknown provider '{}'",
                    name, param.name, provider
                )));
            }
        }
    }
    Ok(())
}

fn validate_placeholders(name: &str, task: &TaskConfig) -> Result<()> {
    for step in task.effective_steps() {
        let texts = std::iter::once(&step.program)
            .chain(step.args.iter())
            .chain(step.env.values());
        for text in texts {
            for placeholder in placeholders(text) {
                if !task.params.iter().any(|p| p.name == placeholder) {
                    return Err(TaskpadError::ConfigError(format!(
                        "task '{}' references undeclared parameter '{{{}}}'",
                        name, placeholder
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Task names and aliases share one namespace.
fn validate_names(cfg: &RawConfigFile) -> Result<()> {
    let mut owners: BTreeMap<&str, &str> = cfg
        .task
        .keys()
        .map(|name| (name.as_str(), name.as_str()))
        .collect();

    for (name, task) in cfg.task.iter() {
        for alias in task.aliases.iter() {
            if let Some(owner) = owners.insert(alias.as_str(), name.as_str()) {
                return Err(TaskpadError::ConfigError(format!(
                    "alias '{}' of task '{}' clashes with task '{}'",
                    alias, name, owner
                )));
            }
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if !cfg.task.contains_key(dep) {
                return Err(TaskpadError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(TaskpadError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(TaskpadError::DependencyCycle(format!(
            "cycle detected in `after` chain involving task '{}'",
            cycle.node_id()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn rejects_program_and_steps_together() {
        let err = parse(
            r#"
[task.a]
program = "echo"
[[task.a.steps]]
program = "echo"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaskpadError::ConfigError(msg) if msg.contains("both `program` and `steps`")));
    }

    #[test]
    fn rejects_undeclared_placeholder() {
        let err = parse(
            r#"
[task.a]
program = "echo"
args = ["{who}"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaskpadError::ConfigError(msg) if msg.contains("'{who}'")));
    }

    #[test]
    fn rejects_alias_clashing_with_task_name() {
        let err = parse(
            r#"
[task.a]
program = "true"
[task.b]
program = "true"
aliases = ["a"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaskpadError::ConfigError(msg) if msg.contains("clashes")));
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = parse(
            r#"
[task.a]
program = "echo"
args = ["{x}"]
params = [{ name = "x", provider = "crystal_ball" }]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaskpadError::ConfigError(msg) if msg.contains("crystal_ball")));
    }

    #[test]
    fn rejects_bang_outside_immediate_mode() {
        let err = parse(
            r#"
[task.a]
program = "true"
output = { mode = "terminal", bang = true }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaskpadError::ConfigError(msg) if msg.contains("`bang`")));
    }

    #[test]
    fn accepts_steps_with_inherited_env() {
        let cfg = parse(
            r#"
[task.a]
env = { A = "1" }
[[task.a.steps]]
program = "echo"
env = { B = "2" }
"#,
        )
        .unwrap();
        let steps = cfg.task["a"].effective_steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].env.get("A").map(String::as_str), Some("1"));
        assert_eq!(steps[0].env.get("B").map(String::as_str), Some("2"));
    }
}
