//! # PowerShell Execution Engine
//!
//! Runs arbitrary PowerShell snippets in an external interpreter process and
//! returns their captured output as a single string, subject to a wall-clock
//! budget. Interpreter discovery happens once per [`Executor`] instance;
//! timed-out processes are terminated cooperatively first and force-killed
//! after a grace period.

mod error;
mod executor;
mod format;
mod interpreter;
mod runner;
mod types;
mod validate;

pub use error::Error;
pub use executor::Executor;
pub use types::{ExecutionOutcome, ExecutionRequest, DEFAULT_TIMEOUT_SECS};
pub use validate::MAX_COMMAND_LEN;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;
