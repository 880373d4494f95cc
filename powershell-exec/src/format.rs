use crate::types::ExecutionOutcome;

/// Collapse an outcome into the single string returned to the caller.
///
/// Non-zero exit reports stderr (or the exit code when stderr is empty) and
/// discards stdout. On success, stderr is a non-fatal warning appended to or
/// standing in for stdout.
pub(crate) fn format_outcome(outcome: &ExecutionOutcome) -> String {
    if outcome.exit_code != 0 {
        if outcome.stderr.is_empty() {
            return format!("Error: Command failed with exit code {}", outcome.exit_code);
        }
        return format!("Error: {}", outcome.stderr);
    }

    if outcome.stderr.is_empty() {
        outcome.stdout.clone()
    } else if outcome.stdout.is_empty() {
        format!("[Warning: {}]", outcome.stderr)
    } else {
        format!("{}\n[Warning: {}]", outcome.stdout, outcome.stderr)
    }
}
