// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskpadError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error while {action} `{program}` for task '{task}': {source}")]
    IoError {
        task: String,
        program: String,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Task already registered: {0}")]
    DuplicateTask(String),

    #[error("Missing parameter '{param}' for task '{task}'{}", describe_candidates(.candidates))]
    MissingParameter {
        task: String,
        param: String,
        candidates: Vec<String>,
    },

    #[error("Unknown parameter for task '{task}': {param}")]
    UnknownParameter { task: String, param: String },

    #[error("Cycle detected in task prerequisites: {0}")]
    DependencyCycle(String),

    #[error("Task '{task}' failed: `{program}` exited with code {code}")]
    TaskFailed {
        task: String,
        program: String,
        code: i32,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        String::new()
    } else {
        format!(" (candidates: {})", candidates.join(", "))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskpadError>;

impl TaskpadError {
    /// I/O failure while driving the process of `program` for `task`.
    pub fn process_io(
        task: &str,
        program: &str,
        action: &'static str,
        source: std::io::Error,
    ) -> Self {
        TaskpadError::IoError {
            task: task.to_string(),
            program: program.to_string(),
            action,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_task_and_program() {
        let err = TaskpadError::process_io(
            "go",
            "cargo",
            "spawning",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("IO error while spawning `cargo` for task 'go'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_parameter_lists_candidates() {
        let err = TaskpadError::MissingParameter {
            task: "go".to_string(),
            param: "example".to_string(),
            candidates: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing parameter 'example' for task 'go' (candidates: a, b)"
        );
    }

    #[test]
    fn missing_parameter_without_candidates() {
        let err = TaskpadError::MissingParameter {
            task: "add_migration".to_string(),
            param: "name".to_string(),
            candidates: vec![],
        };
        assert_eq!(
            err.to_string(),
            "Missing parameter 'name' for task 'add_migration'"
        );
    }
}
