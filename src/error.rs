use std::collections::TryReserveError;
use thiserror::Error;

/// Failure to build a map.
#[derive(Debug, Error)]
pub enum TableError {
    /// No prime bucket count at or above the request fits in `usize`.
    #[error("requested bucket count {requested} exceeds the largest representable prime")]
    CapacityOverflow { requested: usize },
    #[error("failed to allocate bucket array")]
    Allocation(#[from] TryReserveError),
}

/// Why a cursor could not be dereferenced.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CursorError {
    #[error("cursor is at the end marker")]
    End,
    /// The entry the cursor pointed at has been erased.
    #[error("cursor refers to an erased entry")]
    Stale,
}
