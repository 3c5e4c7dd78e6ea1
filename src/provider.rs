// src/provider.rs

//! Default-providers: named sources of parameter defaults.
//!
//! A provider reports candidate values. Resolution uses the value only when
//! there is exactly one candidate; otherwise the parameter counts as missing
//! and the candidates are shown to the user.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::fs::FileSystem;

/// Everything a provider may look at.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub project_dir: PathBuf,
    pub fs: Arc<dyn FileSystem>,
}

impl ProviderContext {
    pub fn new(project_dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            project_dir: project_dir.into(),
            fs,
        }
    }
}

pub trait DefaultProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn candidates(&self, ctx: &ProviderContext) -> Result<Vec<String>>;
}

/// Name used in task files for [`CargoExampleProvider`].
pub const CARGO_EXAMPLE: &str = "cargo_example";

/// Prefix used in task files for [`EnvVarProvider`] (`env:RUST_LOG`).
pub const ENV_PREFIX: &str = "env:";

/// Lists the project's cargo examples: `examples/<name>.rs` files and
/// `examples/<name>/main.rs` directories.
#[derive(Debug, Clone, Default)]
pub struct CargoExampleProvider;

impl DefaultProvider for CargoExampleProvider {
    fn name(&self) -> &str {
        CARGO_EXAMPLE
    }

    fn candidates(&self, ctx: &ProviderContext) -> Result<Vec<String>> {
        let examples_dir = ctx.project_dir.join("examples");
        if !ctx.fs.is_dir(&examples_dir) {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = ctx
            .fs
            .read_dir(&examples_dir)?
            .into_iter()
            .filter_map(|path| example_name(ctx.fs.as_ref(), &path))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

fn example_name(fs: &dyn FileSystem, path: &Path) -> Option<String> {
    let is_example = if fs.is_dir(path) {
        fs.is_file(&path.join("main.rs"))
    } else {
        fs.is_file(path) && path.extension().is_some_and(|ext| ext == "rs")
    };
    if !is_example {
        return None;
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Reads a default from an environment variable; unset or empty means no
/// candidate.
#[derive(Debug, Clone)]
pub struct EnvVarProvider {
    name: String,
    var: String,
}

impl EnvVarProvider {
    pub fn new(var: impl Into<String>) -> Self {
        let var = var.into();
        Self {
            name: format!("{ENV_PREFIX}{var}"),
            var,
        }
    }
}

impl DefaultProvider for EnvVarProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn candidates(&self, _ctx: &ProviderContext) -> Result<Vec<String>> {
        Ok(std::env::var(&self.var)
            .ok()
            .filter(|value| !value.is_empty())
            .into_iter()
            .collect())
    }
}

/// Look up a provider by the name used in task files.
pub fn provider_by_name(name: &str) -> Option<Arc<dyn DefaultProvider>> {
    if name == CARGO_EXAMPLE {
        return Some(Arc::new(CargoExampleProvider));
    }
    match name.strip_prefix(ENV_PREFIX) {
        Some(var) if !var.is_empty() => Some(Arc::new(EnvVarProvider::new(var))),
        _ => None,
    }
}

pub fn is_known_provider(name: &str) -> bool {
    provider_by_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn ctx_with(fs: MockFileSystem) -> ProviderContext {
        ProviderContext::new("proj", Arc::new(fs))
    }

    #[test]
    fn cargo_examples_from_files_and_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("proj/examples/scan_for_new_files.rs", "fn main() {}");
        fs.add_file("proj/examples/normalize_database/main.rs", "fn main() {}");
        fs.add_file("proj/examples/README.md", "# examples");
        fs.add_dir("proj/examples/empty_dir");

        let names = CargoExampleProvider.candidates(&ctx_with(fs)).unwrap();
        assert_eq!(names, vec!["normalize_database", "scan_for_new_files"]);
    }

    #[test]
    fn no_examples_dir_means_no_candidates() {
        let fs = MockFileSystem::new();
        fs.add_file("proj/src/main.rs", "fn main() {}");

        let names = CargoExampleProvider.candidates(&ctx_with(fs)).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn provider_names() {
        assert!(is_known_provider("cargo_example"));
        assert!(is_known_provider("env:HOME"));
        assert!(!is_known_provider("env:"));
        assert!(!is_known_provider("cargo_examples"));
        assert_eq!(
            provider_by_name("env:EDITOR").map(|p| p.name().to_string()),
            Some("env:EDITOR".to_string())
        );
    }
}
