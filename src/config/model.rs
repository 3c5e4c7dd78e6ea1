// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::OutputRouting;
use crate::types::OutputMode;

/// Top-level task file as read from TOML.
///
/// ```toml
/// [config]
/// project_dir = "."
///
/// [task.go]
/// program = "cargo"
/// args = ["run", "-q", "--example", "{example}"]
/// env = { RUST_BACKTRACE = "1" }
/// output = { mode = "terminal", size = 40 }
/// params = [{ name = "example", provider = "cargo_example" }]
/// ```
///
/// This is the unvalidated form; convert it into [`ConfigFile`] with
/// `ConfigFile::try_from` to run the semantic checks.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A task file that passed validation.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<String, TaskConfig>,
    ) -> Self {
        Self { config, task }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Directory tasks run in. Relative paths are taken from the directory
    /// holding the task file; if unset, that directory itself is used.
    #[serde(default)]
    pub project_dir: Option<PathBuf>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    /// One-line description shown by `taskpad list`.
    #[serde(default)]
    pub description: Option<String>,

    /// Extra names this task answers to.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Tasks that run before this one.
    #[serde(default)]
    pub after: Vec<String>,

    /// Declared parameters, in positional order.
    #[serde(default)]
    pub params: Vec<ParamConfig>,

    /// Program for a single-invocation task. Mutually exclusive with `steps`.
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Environment overrides; also applied to every entry of `steps`.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub output: OutputConfig,

    /// Several invocations, run in order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl TaskConfig {
    /// The invocations this task declares, with task-level `env` and
    /// `output` folded into each step.
    pub fn effective_steps(&self) -> Vec<StepConfig> {
        if let Some(program) = &self.program {
            return vec![StepConfig {
                program: program.clone(),
                args: self.args.clone(),
                env: self.env.clone(),
                output: Some(self.output.clone()),
            }];
        }

        self.steps
            .iter()
            .map(|step| {
                let mut env = self.env.clone();
                env.extend(step.env.iter().map(|(k, v)| (k.clone(), v.clone())));
                StepConfig {
                    program: step.program.clone(),
                    args: step.args.clone(),
                    env,
                    output: Some(step.output.clone().unwrap_or_else(|| self.output.clone())),
                }
            })
            .collect()
    }
}

/// One `[[task.<name>.steps]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Falls back to the task's `output` when absent.
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

/// `output = { mode = "...", size = N, bang = true }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,

    /// Terminal panel height hint (terminal mode only).
    #[serde(default)]
    pub size: Option<u16>,

    /// Surface a non-zero exit as an error (immediate mode only).
    #[serde(default)]
    pub bang: bool,
}

impl OutputConfig {
    pub fn routing(&self) -> OutputRouting {
        match self.mode {
            OutputMode::Terminal => OutputRouting::Terminal { size: self.size },
            OutputMode::Immediate => OutputRouting::Immediate { bang: self.bang },
            OutputMode::Background => OutputRouting::Background,
        }
    }
}

/// One entry of `params = [...]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamConfig {
    pub name: String,

    /// Literal default value.
    #[serde(default)]
    pub default: Option<String>,

    /// Named default-provider (`cargo_example`, `env:<VAR>`).
    #[serde(default)]
    pub provider: Option<String>,
}
