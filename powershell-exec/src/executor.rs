use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{
    error::Error,
    format::format_outcome,
    interpreter::{self, Interpreter},
    runner,
    types::ExecutionRequest,
    validate::validate,
    Result,
};

/// Facade sequencing detection, validation, execution and formatting for one
/// call. Cheap to clone; clones share the cached interpreter.
///
/// Interpreter detection runs at most once per executor: the first call
/// probes the candidates behind a do-once cell, concurrent first calls wait
/// for that single probe, and the result is reused for the lifetime of the
/// instance.
#[derive(Clone, Default)]
pub struct Executor {
    interpreter: Arc<OnceCell<Option<Interpreter>>>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor with a pre-resolved (or known-absent) interpreter, skipping
    /// detection.
    #[cfg(test)]
    pub(crate) fn with_interpreter(interpreter: Option<Interpreter>) -> Self {
        Self {
            interpreter: Arc::new(OnceCell::new_with(Some(interpreter))),
        }
    }

    /// Execute one request and return its output. Never fails at the type
    /// level: every error is rendered as a string starting with `"Error: "`.
    pub async fn execute(&self, request: ExecutionRequest) -> String {
        match self.try_execute(&request).await {
            Ok(output) => output,
            Err(e) => {
                warn!("PowerShell command failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }

    async fn try_execute(&self, request: &ExecutionRequest) -> Result<String> {
        let interpreter = self.interpreter().await?;
        validate(&request.code)?;

        info!(
            "Executing PowerShell command (exe: {}, length: {}, timeout: {}s)",
            interpreter.program(),
            request.code.chars().count(),
            request.timeout_secs
        );

        let outcome = runner::run(interpreter, &request.code, request.timeout_secs).await?;
        Ok(format_outcome(&outcome))
    }

    async fn interpreter(&self) -> Result<&Interpreter> {
        self.interpreter
            .get_or_init(interpreter::detect)
            .await
            .as_ref()
            .ok_or(Error::NoInterpreter)
    }
}
