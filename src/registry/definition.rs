// src/registry/definition.rs

use std::fmt;
use std::sync::Arc;

use crate::provider::DefaultProvider;

use super::body::TaskBody;

/// Where a parameter's value comes from when the caller does not supply it.
#[derive(Clone)]
pub enum ParamDefault {
    Value(String),
    Provider(Arc<dyn DefaultProvider>),
}

impl fmt::Debug for ParamDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDefault::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ParamDefault::Provider(p) => f.debug_tuple("Provider").field(&p.name()).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub default: Option<ParamDefault>,
}

impl ParamSpec {
    /// A parameter the caller must always supply.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(ParamDefault::Value(value.into())),
        }
    }

    pub fn with_provider(name: impl Into<String>, provider: Arc<dyn DefaultProvider>) -> Self {
        Self {
            name: name.into(),
            default: Some(ParamDefault::Provider(provider)),
        }
    }
}

/// A named task: its parameters, prerequisites and body.
#[derive(Clone)]
pub struct TaskDefinition {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
    /// Tasks run before this one, resolved with no supplied arguments.
    pub after: Vec<String>,
    body: Arc<dyn TaskBody>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>, body: impl TaskBody + 'static) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            params: Vec::new(),
            after: Vec::new(),
            body: Arc::new(body),
        }
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn after(mut self, task: impl Into<String>) -> Self {
        self.after.push(task.into());
        self
    }

    pub fn body(&self) -> &dyn TaskBody {
        self.body.as_ref()
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .field("after", &self.after)
            .finish_non_exhaustive()
    }
}
