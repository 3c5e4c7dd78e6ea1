#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use taskpad::config::{ConfigFile, ConfigSection, OutputConfig, ParamConfig, RawConfigFile, TaskConfig};
use taskpad::fs::mock::MockFileSystem;
use taskpad::provider::ProviderContext;
use taskpad::registry::TaskRegistry;
use taskpad::types::OutputMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Build the config and a registry over an in-memory project at `proj`.
    pub fn build_registry(self, fs: MockFileSystem) -> TaskRegistry {
        let cfg = self.build();
        TaskRegistry::from_config(&cfg, ProviderContext::new("proj", Arc::new(fs)))
            .expect("Failed to build registry from config")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            task: TaskConfig {
                program: Some(program.to_string()),
                ..TaskConfig::default()
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.task.args.push(arg.to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.task.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.task.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.task.aliases.push(alias.to_string());
        self
    }

    pub fn required_param(mut self, name: &str) -> Self {
        self.task.params.push(ParamConfig {
            name: name.to_string(),
            default: None,
            provider: None,
        });
        self
    }

    pub fn param_with_default(mut self, name: &str, value: &str) -> Self {
        self.task.params.push(ParamConfig {
            name: name.to_string(),
            default: Some(value.to_string()),
            provider: None,
        });
        self
    }

    pub fn param_with_provider(mut self, name: &str, provider: &str) -> Self {
        self.task.params.push(ParamConfig {
            name: name.to_string(),
            default: None,
            provider: Some(provider.to_string()),
        });
        self
    }

    pub fn terminal(mut self, size: Option<u16>) -> Self {
        self.task.output = OutputConfig {
            mode: OutputMode::Terminal,
            size,
            bang: false,
        };
        self
    }

    pub fn immediate(mut self, bang: bool) -> Self {
        self.task.output = OutputConfig {
            mode: OutputMode::Immediate,
            size: None,
            bang,
        };
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
