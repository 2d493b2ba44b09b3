//! Station types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a station name is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: must not be blank")]
pub struct InvalidStationName;

/// Persistent identifier of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subway station.
///
/// Stations built with [`Station::new`] have no identifier yet; the repository
/// assigns one when the station is stored.
///
/// Two stations are equal when both carry identifiers and the identifiers match.
/// If either side has not been persisted, the names are compared instead.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Station, StationId};
///
/// let gangnam = Station::new("Gangnam").unwrap();
/// assert_eq!(gangnam.name(), "Gangnam");
/// assert!(gangnam.id().is_none());
///
/// let stored = Station::with_id(StationId(1), "Gangnam").unwrap();
/// assert_eq!(gangnam, stored);
///
/// assert!(Station::new("   ").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Station {
    id: Option<StationId>,
    name: String,
}

impl Station {
    /// Create a station that has not been persisted yet.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidStationName> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidStationName);
        }
        Ok(Station { id: None, name })
    }

    /// Create a station with a known identifier.
    pub fn with_id(id: StationId, name: impl Into<String>) -> Result<Self, InvalidStationName> {
        let mut station = Self::new(name)?;
        station.id = Some(id);
        Ok(station)
    }

    /// Returns the identifier, if the station has been persisted.
    pub fn id(&self) -> Option<StationId> {
        self.id
    }

    /// Returns the station name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

impl Eq for Station {}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
