// src/registry/template.rs

//! `{param}` placeholder templates for config-driven tasks.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::errors::{Result, TaskpadError};
use crate::exec::{Invocation, OutputRouting};

use super::body::{ResolvedParams, TaskBody};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex is valid")
});

/// Parameter names referenced by `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Substitute every `{name}` in `text` with its resolved value.
///
/// Text that does not look like a placeholder is left untouched.
pub fn substitute(text: &str, params: &ResolvedParams) -> Result<String> {
    let mut missing: Option<String> = None;
    let rendered = PLACEHOLDER.replace_all(text, |caps: &Captures| {
        match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| caps[1].to_string());
                caps[0].to_string()
            }
        }
    });

    match missing {
        Some(name) => Err(TaskpadError::ConfigError(format!(
            "template references undeclared parameter '{{{}}}'",
            name
        ))),
        None => Ok(rendered.into_owned()),
    }
}

/// One invocation with placeholders still in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTemplate {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub routing: OutputRouting,
}

impl InvocationTemplate {
    pub fn render(&self, params: &ResolvedParams) -> Result<Invocation> {
        let args = self
            .args
            .iter()
            .map(|arg| substitute(arg, params))
            .collect::<Result<Vec<_>>>()?;

        let mut env = BTreeMap::new();
        for (key, value) in self.env.iter() {
            env.insert(key.clone(), substitute(value, params)?);
        }

        Ok(Invocation {
            program: substitute(&self.program, params)?,
            args,
            env,
            routing: self.routing,
        })
    }
}

/// Body of a config-driven task: its templates rendered in order.
#[derive(Debug, Clone)]
pub struct TemplateBody {
    steps: Vec<InvocationTemplate>,
}

impl TemplateBody {
    pub fn new(steps: Vec<InvocationTemplate>) -> Self {
        Self { steps }
    }
}

impl TaskBody for TemplateBody {
    fn render(&self, params: &ResolvedParams) -> Result<Vec<Invocation>> {
        self.steps.iter().map(|step| step.render(params)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ResolvedParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn finds_placeholders_in_order() {
        assert_eq!(placeholders("{a}-{b_2}-{a}"), vec!["a", "b_2", "a"]);
        assert!(placeholders("{} {1x} {not closed").is_empty());
    }

    #[test]
    fn substitutes_inside_an_argument() {
        let p = params(&[("name", "add_tags")]);
        assert_eq!(
            substitute("--migration={name}.sql", &p).unwrap(),
            "--migration=add_tags.sql"
        );
    }

    #[test]
    fn value_with_spaces_stays_one_argument() {
        let template = InvocationTemplate {
            program: "echo".to_string(),
            args: vec!["{msg}".to_string(), "tail".to_string()],
            env: BTreeMap::new(),
            routing: OutputRouting::Background,
        };
        let inv = template.render(&params(&[("msg", "two words")])).unwrap();
        assert_eq!(inv.args, vec!["two words", "tail"]);
    }

    #[test]
    fn unknown_placeholder_is_reported() {
        let err = substitute("{ghost}", &ResolvedParams::new()).unwrap_err();
        assert!(matches!(err, TaskpadError::ConfigError(msg) if msg.contains("ghost")));
    }
}
