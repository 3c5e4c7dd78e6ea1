// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::builtin::BUILTIN_CONFIG;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Name of the task file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "Taskpad.toml";

/// Parse TOML text into an unvalidated [`RawConfigFile`].
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a task file through the given filesystem, without semantic checks.
pub fn load_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path)?;
    parse_str(&contents)
}

/// Load a task file from disk, without semantic checks.
///
/// Use [`load_and_validate`] for anything that builds a registry.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_fs(&RealFileSystem, path.as_ref())
}

/// Load a task file from disk and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks task bodies, parameters, placeholders, aliases,
///   `after` references and cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_from_fs(&RealFileSystem, path.as_ref())
}

/// [`load_and_validate`] through the given filesystem.
pub fn load_and_validate_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_fs(fs, path)?)
}

/// The embedded chapter-tracker task table, validated.
pub fn builtin_config() -> Result<ConfigFile> {
    ConfigFile::try_from(parse_str(BUILTIN_CONFIG)?)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
