use thiserror::Error;

/// Failures the engine can report. Display strings are part of the public
/// contract: the [`Executor`](crate::Executor) prefixes them with `"Error: "`
/// and returns them to the caller verbatim.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Empty command provided")]
    EmptyCommand,

    #[error("Command too long (max {max} characters)")]
    CommandTooLong { max: usize },

    #[error("No PowerShell executable found on system")]
    NoInterpreter,

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unexpected error occurred: {0}")]
    Unexpected(String),
}
