// src/registry/mod.rs

//! The task registry.
//!
//! Holds named [`TaskDefinition`]s for one project directory and turns a
//! trigger (task name + supplied arguments) into concrete [`Invocation`]s.
//!
//! - [`args`]: arguments supplied with a trigger.
//! - [`body`]: the `TaskBody` trait (resolved params -> invocations).
//! - [`definition`]: task and parameter definitions.
//! - [`template`]: `{param}` templates used by config-driven tasks.
//! - [`plan`]: prerequisite ordering (`after`).
//!
//! [`Invocation`]: crate::exec::Invocation

pub mod args;
pub mod body;
pub mod definition;
pub mod plan;
pub mod template;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::model::{ConfigFile, TaskConfig};
use crate::errors::{Result, TaskpadError};
use crate::exec::Invocation;
use crate::provider::{provider_by_name, ProviderContext};

pub use args::SuppliedArgs;
pub use body::{ResolvedParams, TaskBody};
pub use definition::{ParamDefault, ParamSpec, TaskDefinition};
pub use template::{InvocationTemplate, TemplateBody};

/// A task resolved for one trigger: parameters bound, invocations rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTask {
    pub name: String,
    pub params: ResolvedParams,
    pub invocations: Vec<Invocation>,
}

#[derive(Debug)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, TaskDefinition>,
    /// alias -> task name
    aliases: BTreeMap<String, String>,
    ctx: ProviderContext,
}

impl TaskRegistry {
    pub fn new(ctx: ProviderContext) -> Self {
        Self {
            tasks: BTreeMap::new(),
            aliases: BTreeMap::new(),
            ctx,
        }
    }

    /// Build a registry from a validated task file.
    pub fn from_config(cfg: &ConfigFile, ctx: ProviderContext) -> Result<Self> {
        let mut registry = Self::new(ctx);
        for (name, task) in cfg.task.iter() {
            registry.register(definition_from_config(name, task)?)?;
        }
        Ok(registry)
    }

    pub fn context(&self) -> &ProviderContext {
        &self.ctx
    }

    /// Add a task. Its name and aliases must not be taken yet.
    pub fn register(&mut self, def: TaskDefinition) -> Result<()> {
        let mut claimed: Vec<&str> = Vec::new();
        for name in std::iter::once(&def.name).chain(def.aliases.iter()) {
            if self.tasks.contains_key(name)
                || self.aliases.contains_key(name)
                || claimed.contains(&name.as_str())
            {
                return Err(TaskpadError::DuplicateTask(name.clone()));
            }
            claimed.push(name.as_str());
        }

        for alias in def.aliases.iter() {
            self.aliases.insert(alias.clone(), def.name.clone());
        }
        debug!(task = %def.name, aliases = ?def.aliases, "registered task");
        self.tasks.insert(def.name.clone(), def);
        Ok(())
    }

    /// Look up a task by name or alias.
    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|target| self.tasks.get(target))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Task names (not aliases), sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Bind parameters and render the task's invocations.
    ///
    /// Prerequisites are not included; see [`TaskRegistry::plan`].
    pub fn resolve(&self, name: &str, supplied: &SuppliedArgs) -> Result<ResolvedTask> {
        let def = self
            .get(name)
            .ok_or_else(|| TaskpadError::UnknownTask(name.to_string()))?;

        let params = self.resolve_params(def, supplied)?;
        let invocations = def.body().render(&params)?;

        debug!(
            task = %def.name,
            invocations = invocations.len(),
            "resolved task"
        );

        Ok(ResolvedTask {
            name: def.name.clone(),
            params,
            invocations,
        })
    }

    fn resolve_params(
        &self,
        def: &TaskDefinition,
        supplied: &SuppliedArgs,
    ) -> Result<ResolvedParams> {
        let mut resolved = ResolvedParams::new();

        for (key, value) in supplied.named.iter() {
            if def.param(key).is_none() {
                return Err(TaskpadError::UnknownParameter {
                    task: def.name.clone(),
                    param: key.clone(),
                });
            }
            resolved.insert(key.clone(), value.clone());
        }

        let mut positional = supplied.positional.iter();
        for spec in def.params.iter() {
            if resolved.contains_key(&spec.name) {
                continue;
            }
            match positional.next() {
                Some(value) => {
                    resolved.insert(spec.name.clone(), value.clone());
                }
                None => break,
            }
        }
        if let Some(extra) = positional.next() {
            return Err(TaskpadError::UnknownParameter {
                task: def.name.clone(),
                param: format!("unexpected positional argument '{}'", extra),
            });
        }

        for spec in def.params.iter() {
            if !resolved.contains_key(&spec.name) {
                let value = self.default_for(def, spec)?;
                resolved.insert(spec.name.clone(), value);
            }
        }

        Ok(resolved)
    }

    fn default_for(&self, def: &TaskDefinition, spec: &ParamSpec) -> Result<String> {
        let candidates = match &spec.default {
            Some(ParamDefault::Value(value)) => return Ok(value.clone()),
            Some(ParamDefault::Provider(provider)) => match provider.candidates(&self.ctx) {
                Ok(candidates) => candidates,
                Err(err) => {
                    warn!(
                        task = %def.name,
                        param = %spec.name,
                        provider = provider.name(),
                        error = %err,
                        "default provider failed"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        match candidates.as_slice() {
            [only] => {
                debug!(task = %def.name, param = %spec.name, value = %only, "parameter defaulted by provider");
                Ok(only.clone())
            }
            _ => Err(TaskpadError::MissingParameter {
                task: def.name.clone(),
                param: spec.name.clone(),
                candidates,
            }),
        }
    }
}

fn definition_from_config(name: &str, task: &TaskConfig) -> Result<TaskDefinition> {
    let steps = task
        .effective_steps()
        .into_iter()
        .map(|step| InvocationTemplate {
            routing: step.output.unwrap_or_default().routing(),
            program: step.program,
            args: step.args,
            env: step.env,
        })
        .collect();

    let mut def = TaskDefinition::new(name, TemplateBody::new(steps));
    def.aliases = task.aliases.clone();
    def.description = task.description.clone();
    def.after = task.after.clone();

    for param in task.params.iter() {
        let spec = match (&param.default, &param.provider) {
            (Some(value), _) => ParamSpec::with_value(&param.name, value),
            (None, Some(provider)) => {
                let provider = provider_by_name(provider).ok_or_else(|| {
                    TaskpadError::ConfigError(format!(
                        "task '{}' parameter '{}' uses unknown provider '{}'",
                        name, param.name, provider
                    ))
                })?;
                ParamSpec::with_provider(&param.name, provider)
            }
            (None, None) => ParamSpec::required(&param.name),
        };
        def = def.with_param(spec);
    }

    Ok(def)
}
