//! Section (track segment) type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Distance, Station};

/// Error returned when a section would start and end at the same station.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("section cannot start and end at station {station}")]
pub struct SelfLoopSection {
    station: String,
}

/// Persistent identifier of a section row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed track segment between two adjacent stations.
///
/// `PartialEq` is domain equality: two sections are equal when they join the
/// same stations in the same direction over the same distance, whatever their
/// identifiers. Use [`Section::same_identity`] to compare persisted rows.
#[derive(Debug, Clone)]
pub struct Section {
    id: Option<SectionId>,
    up: Station,
    down: Station,
    distance: Distance,
}

impl Section {
    /// Create a section that has not been persisted yet.
    pub fn new(up: Station, down: Station, distance: Distance) -> Result<Self, SelfLoopSection> {
        if up == down {
            return Err(SelfLoopSection {
                station: up.name().to_string(),
            });
        }
        Ok(Section {
            id: None,
            up,
            down,
            distance,
        })
    }

    /// Create a section with a known identifier.
    pub fn with_id(
        id: SectionId,
        up: Station,
        down: Station,
        distance: Distance,
    ) -> Result<Self, SelfLoopSection> {
        let mut section = Self::new(up, down, distance)?;
        section.id = Some(id);
        Ok(section)
    }

    /// Builds a section from endpoints already known to differ.
    pub(crate) fn joining(
        id: Option<SectionId>,
        up: Station,
        down: Station,
        distance: Distance,
    ) -> Self {
        debug_assert!(up != down, "section endpoints must differ");
        Section {
            id,
            up,
            down,
            distance,
        }
    }

    pub fn id(&self) -> Option<SectionId> {
        self.id
    }

    pub fn up(&self) -> &Station {
        &self.up
    }

    pub fn down(&self) -> &Station {
        &self.down
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Returns true if `station` is either endpoint.
    pub fn contains_station(&self, station: &Station) -> bool {
        &self.up == station || &self.down == station
    }

    /// Returns true if both sections start at the same station.
    pub fn shares_up_with(&self, other: &Section) -> bool {
        self.up == other.up
    }

    /// Returns true if both sections end at the same station.
    pub fn shares_down_with(&self, other: &Section) -> bool {
        self.down == other.down
    }

    /// Returns true if both sections join the same stations in the same direction.
    pub fn same_endpoints(&self, other: &Section) -> bool {
        self.shares_up_with(other) && self.shares_down_with(other)
    }

    /// Returns true if both sections are the same persisted row.
    pub fn same_identity(&self, other: &Section) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.same_endpoints(other) && self.distance == other.distance
    }
}

impl Eq for Section {}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.up, self.down, self.distance)
    }
}
