use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskpad::errors::Result;
use taskpad::exec::{ExecutorBackend, Invocation, InvocationOutcome};

/// One invocation as the fake executor saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub task: String,
    pub invocation: Invocation,
}

/// A fake executor that:
/// - records every invocation it is handed
/// - reports exit code 0, or the code configured for that program.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    recorded: Arc<Mutex<Vec<RecordedInvocation>>>,
    exit_codes: HashMap<String, i32>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `program` exit with `code`.
    pub fn exit_with(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    /// Shared handle to the recording, usable after the executor has been
    /// moved into a session.
    pub fn recorded(&self) -> Arc<Mutex<Vec<RecordedInvocation>>> {
        Arc::clone(&self.recorded)
    }
}

impl ExecutorBackend for FakeExecutor {
    fn invoke<'a>(
        &'a mut self,
        task: &'a str,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationOutcome>> + Send + 'a>> {
        let code = self
            .exit_codes
            .get(&invocation.program)
            .copied()
            .unwrap_or(0);

        self.recorded.lock().unwrap().push(RecordedInvocation {
            task: task.to_string(),
            invocation: invocation.clone(),
        });

        Box::pin(async move { Ok(InvocationOutcome::from_code(code)) })
    }
}
