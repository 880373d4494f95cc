use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, warn};

use crate::{error::Error, interpreter::Interpreter, types::ExecutionOutcome, Result};

/// Window between the cooperative termination signal and the forceful kill
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Run one command in the given interpreter, capturing both standard streams,
/// and enforce the wall-clock budget. `timeout_secs == 0` disables the timer.
///
/// On timeout the child is handed to a detached escalation task and the call
/// fails immediately; partial output is discarded.
pub(crate) async fn run(
    interpreter: &Interpreter,
    code: &str,
    timeout_secs: u64,
) -> Result<ExecutionOutcome> {
    let mut command = interpreter.command(code);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| Error::Spawn {
        program: interpreter.program().to_string(),
        source,
    })?;

    // Drain both pipes concurrently with the wait so neither can fill up and
    // stall the child.
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    let status = if timeout_secs == 0 {
        debug!("Waiting for process with no timeout");
        child
            .wait()
            .await
            .map_err(|e| Error::Unexpected(e.to_string()))?
    } else {
        match time::timeout(Duration::from_secs(timeout_secs), child.wait()).await {
            Ok(status) => status.map_err(|e| Error::Unexpected(e.to_string()))?,
            Err(_) => {
                warn!(
                    "Command timed out after {} seconds, terminating process",
                    timeout_secs
                );
                tokio::spawn(terminate(child));
                return Err(Error::Timeout(timeout_secs));
            }
        }
    };

    let stdout = join_drain(stdout_task).await?;
    let stderr = join_drain(stderr_task).await?;

    Ok(ExecutionOutcome {
        stdout: stdout.trim().to_string(),
        stderr: stderr.trim().to_string(),
        // A missing exit code (killed by an external signal) is reported as
        // success.
        exit_code: status.code().unwrap_or(0),
    })
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

async fn join_drain(task: JoinHandle<String>) -> Result<String> {
    task.await
        .map_err(|e| Error::Unexpected(format!("output capture failed: {e}")))
}

/// Escalating termination: cooperative signal, grace wait, then SIGKILL.
/// Runs detached from the call that timed out; `Child::kill` also reaps.
async fn terminate(mut child: Child) {
    if let Some(pid) = child.id() {
        let _ = Command::new("kill").arg(pid.to_string()).status().await;
    }

    match time::timeout(KILL_GRACE, child.wait()).await {
        Ok(_) => debug!("Process terminated gracefully"),
        Err(_) => {
            error!("Process did not terminate gracefully, killing");
            if let Err(e) = child.kill().await {
                error!("Failed to kill process: {}", e);
            }
        }
    }
}
