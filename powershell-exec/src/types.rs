use serde::{Deserialize, Serialize};

/// Timeout applied when a request does not carry one
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// One command execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// PowerShell code to execute
    pub code: String,
    /// Wall-clock budget in seconds; 0 disables the timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            code: code.into(),
            timeout_secs,
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Captured result of one completed process, trimmed of leading and
/// trailing whitespace on both streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}
