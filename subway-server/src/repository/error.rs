//! Repository error types.

use crate::domain::{LineId, SectionId, StationId};

/// Errors raised by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No station with this identifier
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// No line with this identifier
    #[error("line {0} not found")]
    LineNotFound(LineId),

    /// Station names are unique
    #[error("station name already exists: {0}")]
    DuplicateStationName(String),

    /// Line names are unique
    #[error("line name already exists: {0}")]
    DuplicateLineName(String),

    /// Station is still part of a line
    #[error("station {0} is still used by a line")]
    StationInUse(StationId),

    /// Section row does not belong to the line being saved
    #[error("section {id} does not belong to line {line}")]
    UnknownSection { id: SectionId, line: LineId },

    /// Section refers to a station that has not been stored
    #[error("station {0} has not been stored")]
    UnsavedStation(String),

    /// Stored row cannot be turned back into a domain value
    #[error("corrupt section row {id}: {reason}")]
    CorruptRow { id: SectionId, reason: String },

    /// Reading or writing the snapshot file failed
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}
