// src/config/mod.rs

//! Task file loading and validation.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a task file from disk (or any [`FileSystem`]).
//! - `validate.rs`: semantic checks, run by `ConfigFile::try_from`.
//! - `builtin.rs`: the embedded default task table.
//!
//! [`FileSystem`]: crate::fs::FileSystem

pub mod builtin;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    builtin_config, load_and_validate, load_and_validate_from_fs, load_from_fs, load_from_path,
};
pub use model::{
    ConfigFile, ConfigSection, OutputConfig, ParamConfig, RawConfigFile, StepConfig, TaskConfig,
};
