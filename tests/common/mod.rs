#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use taskpad::config::builtin_config;
use taskpad::fs::mock::MockFileSystem;
use taskpad::provider::ProviderContext;
use taskpad::registry::TaskRegistry;
use tempfile::NamedTempFile;

pub use taskpad_test_utils::init_tracing;

/// Write a task file to a temp location.
pub fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

/// The built-in chapter-tracker registry over an in-memory project at `proj`.
pub fn builtin_registry(fs: MockFileSystem) -> TaskRegistry {
    let cfg = builtin_config().unwrap();
    TaskRegistry::from_config(&cfg, ProviderContext::new("proj", Arc::new(fs))).unwrap()
}
