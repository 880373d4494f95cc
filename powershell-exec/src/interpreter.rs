use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};
use which::which;

/// One PowerShell variant to probe, most preferred first.
struct Candidate {
    program: &'static str,
    label: &'static str,
}

const CANDIDATES: [Candidate; 2] = [
    Candidate {
        program: "pwsh",
        label: "PowerShell 7 (pwsh)",
    },
    Candidate {
        program: "powershell",
        label: "Windows PowerShell 5.1 (powershell)",
    },
];

/// Flags prepended to every invocation. The code string follows as a single
/// literal argument, never re-parsed by an outer shell.
const SAFETY_FLAGS: [&str; 5] = [
    "-NonInteractive",
    "-NoProfile",
    "-ExecutionPolicy",
    "Bypass",
    "-Command",
];

/// An interpreter confirmed runnable on this host, together with the fixed
/// flags used for every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    program: String,
    args: Vec<String>,
}

impl Interpreter {
    fn powershell(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: SAFETY_FLAGS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Interpreter backed by an arbitrary program, for exercising the runner
    /// without a PowerShell install.
    #[cfg(test)]
    pub(crate) fn custom(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Invocation for one script: program, fixed flags, then the raw code as
    /// one argument.
    pub(crate) fn command(&self, code: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(code);
        command
    }
}

/// Probe the candidates in preference order and return the first one that
/// starts and exits 0. A failed spawn counts as unavailable, not an error.
pub(crate) async fn detect() -> Option<Interpreter> {
    for candidate in &CANDIDATES {
        if which(candidate.program).is_err() {
            debug!("{} not on PATH", candidate.program);
            continue;
        }
        if probe(candidate.program).await {
            info!("Using {}", candidate.label);
            return Some(Interpreter::powershell(candidate.program));
        }
        debug!("{} found on PATH but probe failed", candidate.program);
    }
    warn!("No PowerShell executable found");
    None
}

async fn probe(program: &str) -> bool {
    Command::new(program)
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "$PSVersionTable.PSVersion",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
