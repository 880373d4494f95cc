use std::time::{Duration, Instant};

use crate::{interpreter::Interpreter, types::ExecutionRequest, Executor, MAX_COMMAND_LEN};

mod test_cases {
    pub const HELLO: &str = "printf hello";
    pub const HELLO_TRAILING_NEWLINE: &str = "echo hello";
    pub const WARN_WITH_OUTPUT: &str = "echo out; echo warn 1>&2";
    pub const WARN_ONLY: &str = "echo warn 1>&2";
    pub const FAIL_WITH_STDERR: &str = "echo boom 1>&2; exit 1";
    pub const FAIL_SILENTLY: &str = "exit 3";
    pub const SLEEP_FOREVER: &str = "sleep 600";
    pub const SLOW_SUCCESS: &str = "sleep 1; echo done";
}

/// Runner and formatter behavior is exercised through `sh -c` so the suite
/// passes on hosts without a PowerShell install.
fn shell_executor() -> Executor {
    Executor::with_interpreter(Some(Interpreter::custom("sh", &["-c"])))
}

async fn execute(code: &str, timeout_secs: u64) -> String {
    shell_executor()
        .execute(ExecutionRequest::new(code, timeout_secs))
        .await
}

#[tokio::test]
async fn empty_command_is_rejected() {
    assert_eq!(execute("", 10).await, "Error: Empty command provided");
    assert_eq!(execute("  \n\t ", 10).await, "Error: Empty command provided");
}

#[tokio::test]
async fn over_long_command_is_rejected() {
    let code = "a".repeat(MAX_COMMAND_LEN + 1);
    assert_eq!(
        execute(&code, 10).await,
        "Error: Command too long (max 10000 characters)"
    );
}

#[tokio::test]
async fn missing_interpreter_is_reported() {
    let executor = Executor::with_interpreter(None);
    assert_eq!(
        executor.execute(ExecutionRequest::new("Get-Date", 10)).await,
        "Error: No PowerShell executable found on system"
    );
}

#[tokio::test]
async fn interpreter_is_checked_before_validation() {
    let executor = Executor::with_interpreter(None);
    assert_eq!(
        executor.execute(ExecutionRequest::new("", 10)).await,
        "Error: No PowerShell executable found on system"
    );
}

#[tokio::test]
async fn spawn_failure_is_reported() {
    let executor = Executor::with_interpreter(Some(Interpreter::custom(
        "/nonexistent/powershell-exec-probe",
        &[],
    )));
    let output = executor.execute(ExecutionRequest::new("true", 10)).await;
    assert!(
        output.starts_with("Error: Failed to spawn"),
        "unexpected output: {output}"
    );
}

#[tokio::test]
async fn stdout_is_returned_verbatim() {
    assert_eq!(execute(test_cases::HELLO, 10).await, "hello");
}

#[tokio::test]
async fn trailing_whitespace_is_trimmed() {
    assert_eq!(execute(test_cases::HELLO_TRAILING_NEWLINE, 10).await, "hello");
}

#[tokio::test]
async fn stderr_on_success_is_appended_as_warning() {
    assert_eq!(
        execute(test_cases::WARN_WITH_OUTPUT, 10).await,
        "out\n[Warning: warn]"
    );
}

#[tokio::test]
async fn stderr_alone_on_success_becomes_warning() {
    assert_eq!(execute(test_cases::WARN_ONLY, 10).await, "[Warning: warn]");
}

#[tokio::test]
async fn nonzero_exit_reports_stderr() {
    assert_eq!(execute(test_cases::FAIL_WITH_STDERR, 10).await, "Error: boom");
}

#[tokio::test]
async fn nonzero_exit_without_stderr_reports_code() {
    assert_eq!(
        execute(test_cases::FAIL_SILENTLY, 10).await,
        "Error: Command failed with exit code 3"
    );
}

#[tokio::test]
async fn timeout_terminates_the_process() {
    let start = Instant::now();
    let output = execute(test_cases::SLEEP_FOREVER, 1).await;
    assert_eq!(output, "Error: Command timed out after 1 seconds");
    assert!(output.contains("timed out after 1 seconds"));
    // The call fails as soon as the timer fires, not after the grace window.
    assert!(start.elapsed() < Duration::from_secs(3));

    // Let the detached escalation task deliver the cooperative signal before
    // the runtime shuts down.
    tokio::time::sleep(Duration::from_millis(500)).await;
}

#[tokio::test]
async fn timeout_child_is_terminated_within_grace_window() {
    // The child records its own pid, then replaces itself with the sleep so
    // the recorded pid is the one the escalation signals.
    let pid_file = std::env::temp_dir().join(format!(
        "powershell-exec-timeout-{}.pid",
        std::process::id()
    ));
    let code = format!("echo $$ > {}; exec sleep 600", pid_file.display());

    let output = execute(&code, 1).await;
    assert_eq!(output, "Error: Command timed out after 1 seconds");

    // Cooperative signal, 5 s grace, then SIGKILL; allow a little slack.
    tokio::time::sleep(Duration::from_secs(7)).await;

    let pid = std::fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .to_string();
    let _ = std::fs::remove_file(&pid_file);

    // Signal 0 probes for existence without delivering anything.
    let alive = std::process::Command::new("kill")
        .args(["-0", &pid])
        .status()
        .unwrap()
        .success();
    assert!(!alive, "child process {pid} still running after grace window");
}

#[tokio::test]
async fn zero_timeout_disables_the_timer() {
    assert_eq!(execute(test_cases::SLOW_SUCCESS, 0).await, "done");
}

#[tokio::test]
async fn concurrent_executions_do_not_interfere() {
    let executor = shell_executor();

    let mut handles = vec![];
    for tag in ["alpha", "beta", "gamma"] {
        let executor = executor.clone();
        let code = format!("printf {tag}");
        handles.push(tokio::spawn(async move {
            (tag, executor.execute(ExecutionRequest::new(code, 10)).await)
        }));
    }

    for handle in handles {
        let (tag, output) = handle.await.unwrap();
        assert_eq!(output, tag);
    }
}
