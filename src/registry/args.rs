// src/registry/args.rs

use std::collections::BTreeMap;

/// Arguments supplied with a trigger.
///
/// Named values bind by parameter name. Positional values fill the declared
/// parameters in order, skipping those already bound by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppliedArgs {
    pub named: BTreeMap<String, String>,
    pub positional: Vec<String>,
}

impl SuppliedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CLI words: `key=value` binds by name when `key` looks like an
    /// identifier, anything else is positional.
    pub fn parse<S: AsRef<str>>(words: &[S]) -> Self {
        let mut args = Self::new();
        for word in words {
            let word = word.as_ref();
            match word.split_once('=') {
                Some((key, value)) if is_identifier(key) => {
                    args.named.insert(key.to_string(), value.to_string());
                }
                _ => args.positional.push(word.to_string()),
            }
        }
        args
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn with_positional(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
