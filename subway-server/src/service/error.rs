//! Service error types.

use crate::domain::{
    CorruptSections, DomainError, InvalidDistance, InvalidFare, InvalidLine, InvalidStationName,
    NegativeFare, SelfLoopSection, TopologyError,
};
use crate::repository::RepositoryError;

/// Broad category of a [`ServiceError`], for mapping to user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input caught at construction
    Validation,
    /// Rejected change to a line's sections
    Topology,
    /// Unknown station or line
    NotFound,
    /// Name already taken, or station still in use
    Conflict,
    /// Stored data violates an invariant
    Corrupt,
    /// Persistence failed
    Storage,
}

/// Errors from subway service operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(DomainError::Topology(_)) => ErrorKind::Topology,
            ServiceError::Domain(DomainError::Corrupt(_)) => ErrorKind::Corrupt,
            ServiceError::Domain(_) => ErrorKind::Validation,
            ServiceError::Repository(e) => match e {
                RepositoryError::StationNotFound(_) | RepositoryError::LineNotFound(_) => {
                    ErrorKind::NotFound
                }
                RepositoryError::DuplicateStationName(_)
                | RepositoryError::DuplicateLineName(_)
                | RepositoryError::StationInUse(_) => ErrorKind::Conflict,
                RepositoryError::CorruptRow { .. } => ErrorKind::Corrupt,
                RepositoryError::UnknownSection { .. }
                | RepositoryError::UnsavedStation(_)
                | RepositoryError::Snapshot { .. } => ErrorKind::Storage,
            },
        }
    }
}

impl From<InvalidDistance> for ServiceError {
    fn from(e: InvalidDistance) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<NegativeFare> for ServiceError {
    fn from(e: NegativeFare) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<InvalidFare> for ServiceError {
    fn from(e: InvalidFare) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<InvalidStationName> for ServiceError {
    fn from(e: InvalidStationName) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<SelfLoopSection> for ServiceError {
    fn from(e: SelfLoopSection) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<InvalidLine> for ServiceError {
    fn from(e: InvalidLine) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<TopologyError> for ServiceError {
    fn from(e: TopologyError) -> Self {
        ServiceError::Domain(e.into())
    }
}

impl From<CorruptSections> for ServiceError {
    fn from(e: CorruptSections) -> Self {
        ServiceError::Domain(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Distance, LineId};

    #[test]
    fn kinds() {
        let err: ServiceError = TopologyError::CannotDeleteLastSection.into();
        assert_eq!(err.kind(), ErrorKind::Topology);

        let err: ServiceError = Distance::from_meters(0).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: ServiceError = RepositoryError::LineNotFound(LineId(1)).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: ServiceError = RepositoryError::DuplicateLineName("Line 2".into()).into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err: ServiceError = RepositoryError::Snapshot {
            message: "disk full".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn display_is_transparent() {
        let err: ServiceError = RepositoryError::LineNotFound(LineId(4)).into();
        assert_eq!(err.to_string(), "line 4 not found");
    }
}
