use crate::{error::Error, Result};

/// Maximum accepted command length, in characters
pub const MAX_COMMAND_LEN: usize = 10_000;

/// Pre-flight check on the raw code string. Runs before any process is
/// spawned; rules are checked in order.
pub(crate) fn validate(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(Error::EmptyCommand);
    }
    if code.chars().count() > MAX_COMMAND_LEN {
        return Err(Error::CommandTooLong {
            max: MAX_COMMAND_LEN,
        });
    }
    Ok(())
}
