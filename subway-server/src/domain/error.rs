//! Domain error types.
//!
//! Validation errors come from the value types' constructors. Topology errors
//! come from adding or removing sections on a line. A corrupt edge set is a
//! separate condition: it means stored data broke the single-path invariant,
//! not that the caller asked for something invalid.

use super::{
    InvalidDistance, InvalidFare, InvalidLine, InvalidStationName, NegativeFare, SelfLoopSection,
};

/// Rejected change to a line's sections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Neither endpoint of the new section is on the line
    #[error("section {up} -> {down} does not connect to the line")]
    SectionNotConnectable { up: String, down: String },

    /// A section between the same stations already exists
    #[error("section {up} -> {down} already exists")]
    DuplicateSection { up: String, down: String },

    /// The new section is not shorter than the section it would split
    #[error("section of {requested} must be shorter than the {existing} section it splits")]
    DistanceExceedsSection { requested: String, existing: String },

    /// The new section cannot be placed without breaking the path
    #[error("section {up} -> {down} cannot be added to the line")]
    InvalidSection { up: String, down: String },

    /// The station is not on the line
    #[error("station {0} is not on the line")]
    StationNotOnLine(String),

    /// A line must keep at least one section
    #[error("cannot delete from a line with a single section")]
    CannotDeleteLastSection,

    /// A trip must start and end at different stations
    #[error("trip must start and end at different stations, both are {0}")]
    SameStation(String),

    /// The line would be longer than a distance can represent
    #[error("line length would exceed the maximum distance")]
    DistanceOverflow,
}

/// Stored sections do not form a single simple path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt sections: {reason}")]
pub struct CorruptSections {
    pub(crate) reason: String,
}

/// Any failure raised by the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    Distance(#[from] InvalidDistance),

    #[error(transparent)]
    Fare(#[from] NegativeFare),

    #[error(transparent)]
    FareRange(#[from] InvalidFare),

    #[error(transparent)]
    StationName(#[from] InvalidStationName),

    #[error(transparent)]
    SelfLoop(#[from] SelfLoopSection),

    #[error(transparent)]
    Line(#[from] InvalidLine),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Corrupt(#[from] CorruptSections),
}
