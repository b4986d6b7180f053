#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("nothing to open from position {start} of {len}")]
pub struct NothingToOpenError {
    pub start: usize,
    pub len: usize,
}

/// Number of identifiers a run starting at `start` will open.
///
/// A `batch_size` of 0 means everything that remains.
pub fn total_to_open(
    len: usize,
    start: usize,
    batch_size: usize,
) -> Result<usize, NothingToOpenError> {
    let remaining = len.saturating_sub(start);
    let total = if batch_size > 0 {
        batch_size.min(remaining)
    } else {
        remaining
    };
    if total == 0 {
        return Err(NothingToOpenError { start, len });
    }
    Ok(total)
}
