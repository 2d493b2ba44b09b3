//! Track distance type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a distance would not be strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid distance: {reason}")]
pub struct InvalidDistance {
    reason: &'static str,
}

/// A strictly positive distance, stored as whole meters.
///
/// Every constructor and every arithmetic result is checked, so a `Distance`
/// value can never be zero or negative.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let d = Distance::from_meters(1500).unwrap();
/// assert_eq!(d.meters(), 1500);
///
/// // Kilometers are rounded to the nearest meter
/// let km = Distance::from_kilometers(2.0004).unwrap();
/// assert_eq!(km.meters(), 2000);
///
/// assert!(Distance::from_meters(0).is_err());
/// assert!(Distance::from_meters(-5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Distance(u32);

impl Distance {
    /// Create a distance from a meter count.
    pub fn from_meters(meters: i64) -> Result<Self, InvalidDistance> {
        if meters <= 0 {
            return Err(InvalidDistance {
                reason: "must be greater than zero",
            });
        }
        u32::try_from(meters)
            .map(Distance)
            .map_err(|_| InvalidDistance {
                reason: "too large to represent",
            })
    }

    /// Create a distance from kilometers, rounding to the nearest meter.
    pub fn from_kilometers(km: f64) -> Result<Self, InvalidDistance> {
        if !km.is_finite() {
            return Err(InvalidDistance {
                reason: "must be a finite number",
            });
        }
        let meters = (km * 1000.0).round();
        if meters > u32::MAX as f64 {
            return Err(InvalidDistance {
                reason: "too large to represent",
            });
        }
        Self::from_meters(meters as i64)
    }

    /// Returns the distance in meters.
    pub fn meters(&self) -> u32 {
        self.0
    }

    /// Returns the distance in kilometers.
    pub fn kilometers(&self) -> f64 {
        f64::from(self.0) / 1000.0
    }

    /// Sum of two distances.
    pub fn plus(self, other: Distance) -> Result<Self, InvalidDistance> {
        self.0
            .checked_add(other.0)
            .map(Distance)
            .ok_or(InvalidDistance {
                reason: "too large to represent",
            })
    }

    /// Difference of two distances.
    ///
    /// Fails unless `other` is strictly smaller than `self`; splitting a section
    /// must leave a positive remainder on both sides.
    pub fn minus(self, other: Distance) -> Result<Self, InvalidDistance> {
        Self::from_meters(i64::from(self.0) - i64::from(other.0))
    }
}

impl TryFrom<i64> for Distance {
    type Error = InvalidDistance;

    fn try_from(meters: i64) -> Result<Self, Self::Error> {
        Distance::from_meters(meters)
    }
}

impl From<Distance> for u32 {
    fn from(distance: Distance) -> Self {
        distance.0
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({}m)", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}
