// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::builtin::BUILTIN_CONFIG;
use crate::config::loader::{builtin_config, default_config_path, load_and_validate_from_fs};
use crate::config::model::ConfigFile;
use crate::engine::TaskSession;
use crate::exec::ProcessExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::provider::ProviderContext;
use crate::registry::{ParamDefault, ResolvedTask, SuppliedArgs, TaskRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - task file loading (or the built-in table)
/// - the registry for the project directory
/// - the process executor
/// - the requested subcommand (list, show, run, init)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command {
        Command::Init => write_builtin_config(fs.as_ref(), &config_path),
        Command::List => {
            let session = open_session(&config_path, fs)?;
            print_task_list(session.registry());
            Ok(())
        }
        Command::Show { task, args } => {
            let session = open_session(&config_path, fs)?;
            let plan = session.render(&task, &SuppliedArgs::parse(&args))?;
            print_plan(&plan);
            Ok(())
        }
        Command::Run { task, args } => {
            let mut session = open_session(&config_path, fs)?;
            let report = session.trigger(&task, &SuppliedArgs::parse(&args)).await?;
            info!(
                task = %task,
                invocations = report.invocation_count(),
                success = report.success(),
                "trigger finished"
            );
            Ok(())
        }
    }
}

/// Load the task file and build the session for its project directory.
fn open_session(
    config_path: &Path,
    fs: Arc<dyn FileSystem>,
) -> Result<TaskSession<ProcessExecutor>> {
    let cfg = load_config(fs.as_ref(), config_path)?;
    let project_dir = project_dir(&cfg, config_path);
    debug!(project_dir = %project_dir.display(), "project directory");

    let registry = TaskRegistry::from_config(&cfg, ProviderContext::new(&project_dir, fs))?;
    let executor = ProcessExecutor::new(&project_dir);
    Ok(TaskSession::new(registry, executor))
}

/// Load the task file, falling back to the built-in table only when the
/// default path is used and nothing exists there.
fn load_config(fs: &dyn FileSystem, config_path: &Path) -> Result<ConfigFile> {
    if config_path == default_config_path() && !fs.exists(config_path) {
        info!("no {} found; using built-in task table", config_path.display());
        return Ok(builtin_config()?);
    }
    Ok(load_and_validate_from_fs(fs, config_path)?)
}

fn write_builtin_config(fs: &dyn FileSystem, config_path: &Path) -> Result<()> {
    if fs.exists(config_path) {
        bail!("{} already exists; not overwriting", config_path.display());
    }
    fs.write(config_path, BUILTIN_CONFIG.as_bytes())?;
    println!("wrote {}", config_path.display());
    Ok(())
}

/// Directory tasks run in.
///
/// `[config].project_dir` wins (relative to the task file's directory);
/// otherwise the task file's directory; a bare filename like
/// "Taskpad.toml" means the current working directory.
fn project_dir(cfg: &ConfigFile, config_path: &Path) -> PathBuf {
    let base = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir = match &cfg.config.project_dir {
        Some(dir) => base.join(dir),
        None => base,
    };
    std::path::absolute(&dir).unwrap_or(dir)
}

fn print_task_list(registry: &TaskRegistry) {
    println!("tasks ({}):", registry.len());
    for def in registry.tasks() {
        let mut line = format!("  {}", def.name);
        if !def.aliases.is_empty() {
            line.push_str(&format!(" (alias: {})", def.aliases.join(", ")));
        }
        for param in def.params.iter() {
            match &param.default {
                None => line.push_str(&format!(" <{}>", param.name)),
                Some(ParamDefault::Value(value)) => {
                    line.push_str(&format!(" [{}={}]", param.name, value))
                }
                Some(ParamDefault::Provider(provider)) => {
                    line.push_str(&format!(" [{}={}]", param.name, provider.name()))
                }
            }
        }
        println!("{line}");
        if let Some(description) = &def.description {
            println!("      {description}");
        }
        if !def.after.is_empty() {
            println!("      after: {:?}", def.after);
        }
    }
}

/// Dry-run output: every invocation the trigger would run.
fn print_plan(plan: &[ResolvedTask]) {
    for task in plan {
        println!("{}", task.name);
        for (name, value) in task.params.iter() {
            println!("  {name} = {value}");
        }
        for invocation in task.invocations.iter() {
            println!("  [{}] {}", invocation.routing, invocation.command_line());
        }
    }
    debug!("dry-run complete (no execution)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn task_file_is_read_through_the_given_filesystem() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "proj/Taskpad.toml",
            r#"
[task.hello]
program = "echo"
"#,
        );

        let cfg = load_config(&fs, Path::new("proj/Taskpad.toml")).unwrap();
        assert_eq!(cfg.task.len(), 1);
        assert!(cfg.task.contains_key("hello"));
    }

    #[test]
    fn missing_default_file_falls_back_to_builtin_table() {
        let fs = MockFileSystem::new();
        let cfg = load_config(&fs, &default_config_path()).unwrap();
        assert!(cfg.task.contains_key("add_migration"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let fs = MockFileSystem::new();
        assert!(load_config(&fs, Path::new("elsewhere/Taskpad.toml")).is_err());
    }
}
