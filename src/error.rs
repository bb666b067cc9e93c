//! Error types for the mood analytics engine

use thiserror::Error;

/// Errors that can surface from a stats computation.
///
/// Degenerate input (empty history, unmapped mood labels, missing notes) is
/// never an error; every aggregate has a documented default. The variants
/// here cover contract violations and upstream storage failures only.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The caller passed a missing, non-positive, or otherwise invalid user
    /// identifier. A programming error in the caller, distinct from a user
    /// with no entries.
    #[error("Invalid user identifier: {0}")]
    InvalidUserId(String),

    /// The persistence layer failed while fetching entries. Propagated to
    /// the caller unchanged; no partial snapshot is produced.
    #[error("Entry store failure: {0}")]
    Store(String),
}
