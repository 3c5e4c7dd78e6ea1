// src/registry/body.rs

use std::collections::BTreeMap;

use crate::errors::Result;
use crate::exec::Invocation;

/// Parameter name -> value, after defaults have been applied.
pub type ResolvedParams = BTreeMap<String, String>;

/// Turns resolved parameters into the invocations a task runs.
pub trait TaskBody: Send + Sync {
    fn render(&self, params: &ResolvedParams) -> Result<Vec<Invocation>>;
}

impl<F> TaskBody for F
where
    F: Fn(&ResolvedParams) -> Result<Vec<Invocation>> + Send + Sync,
{
    fn render(&self, params: &ResolvedParams) -> Result<Vec<Invocation>> {
        self(params)
    }
}
