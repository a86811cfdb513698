use tracing::debug;

use crate::core::QuizError;

/// Runs `op` with attempt numbers `0..max_attempts` until it succeeds.
///
/// Only recoverable errors are retried; any other error, or the error of
/// the last attempt, is returned as is.
pub fn retry_bounded<T, F>(max_attempts: usize, mut op: F) -> Result<T, QuizError>
where
    F: FnMut(usize) -> Result<T, QuizError>,
{
    if max_attempts == 0 {
        return Err(QuizError::invalid_input("max_attempts must be at least 1"));
    }

    let mut attempt = 0;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_recoverable() && attempt + 1 < max_attempts => {
                debug!(attempt, max_attempts, error = %e, "attempt failed, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
