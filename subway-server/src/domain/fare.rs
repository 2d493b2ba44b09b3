//! Fare value type and the distance-based fare policy.
//!
//! The base fare covers the first 10 km. Between 10 km and 50 km every started
//! 5 km costs another 100; beyond 50 km every started 8 km costs another 100.
//! Tier counts always round up.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Distance;

const BASE_FARE: u32 = 1250;
const TIER_FARE: u32 = 100;

const BASE_LIMIT_KM: f64 = 10.0;
const MIDDLE_LIMIT_KM: f64 = 50.0;
const MIDDLE_TIER_KM: f64 = 5.0;
const LONG_TIER_KM: f64 = 8.0;

/// Error returned when a fare cannot be computed or represented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fare: {reason}")]
pub struct InvalidFare {
    reason: &'static str,
}

const TOO_LARGE: InvalidFare = InvalidFare {
    reason: "too large to represent",
};

/// Error returned when a fare would drop below zero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fare cannot be negative: {value} - {subtracted}")]
pub struct NegativeFare {
    value: u32,
    subtracted: u32,
}

/// A non-negative monetary amount.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Fare;
///
/// let fare = Fare::new(1250).plus(Fare::new(900)).unwrap();
/// assert_eq!(fare.value(), 2150);
///
/// assert!(Fare::new(100).minus(Fare::new(200)).is_err());
/// assert!(Fare::new(u32::MAX).plus(Fare::new(1)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fare(u32);

impl Fare {
    pub const ZERO: Fare = Fare(0);

    pub fn new(value: u32) -> Self {
        Fare(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn plus(self, other: Fare) -> Result<Fare, InvalidFare> {
        self.0.checked_add(other.0).map(Fare).ok_or(TOO_LARGE)
    }

    pub fn minus(self, other: Fare) -> Result<Fare, NegativeFare> {
        self.0
            .checked_sub(other.0)
            .map(Fare)
            .ok_or(NegativeFare {
                value: self.0,
                subtracted: other.0,
            })
    }

    /// Base fare for travelling `distance`.
    pub fn for_distance(distance: Distance) -> Result<Fare, InvalidFare> {
        distance_fare(distance.kilometers())
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Base fare for a trip of `km` kilometers.
///
/// Fails for negative or non-finite distances, and for distances so long the
/// fare does not fit in a [`Fare`].
///
/// # Examples
///
/// ```
/// use subway_server::domain::distance_fare;
///
/// assert_eq!(distance_fare(10.0).unwrap().value(), 1250);
/// assert_eq!(distance_fare(11.0).unwrap().value(), 1350);
/// assert_eq!(distance_fare(51.0).unwrap().value(), 2150);
/// assert!(distance_fare(f64::NAN).is_err());
/// ```
pub fn distance_fare(km: f64) -> Result<Fare, InvalidFare> {
    if !km.is_finite() || km < 0.0 {
        return Err(InvalidFare {
            reason: "distance must be a finite, non-negative number of kilometers",
        });
    }
    if km <= BASE_LIMIT_KM {
        return Ok(Fare(BASE_FARE));
    }

    let middle_km = km.min(MIDDLE_LIMIT_KM) - BASE_LIMIT_KM;
    let mut tier_count = tiers(middle_km, MIDDLE_TIER_KM);
    if km > MIDDLE_LIMIT_KM {
        tier_count = tier_count
            .checked_add(tiers(km - MIDDLE_LIMIT_KM, LONG_TIER_KM))
            .ok_or(TOO_LARGE)?;
    }

    tier_count
        .checked_mul(u64::from(TIER_FARE))
        .and_then(|surcharge| surcharge.checked_add(u64::from(BASE_FARE)))
        .and_then(|fare| u32::try_from(fare).ok())
        .map(Fare)
        .ok_or(TOO_LARGE)
}

/// Fare for a trip across lines: base distance fare plus the highest surcharge.
///
/// Surcharges are not added together; only the most expensive line counts.
pub fn trip_fare(
    distance: Distance,
    surcharges: impl IntoIterator<Item = Fare>,
) -> Result<Fare, InvalidFare> {
    let surcharge = surcharges.into_iter().max().unwrap_or(Fare::ZERO);
    Fare::for_distance(distance)?.plus(surcharge)
}

/// Number of started tiers, rounding up. Saturates at `u64::MAX`.
fn tiers(km: f64, tier_km: f64) -> u64 {
    (km / tier_km).ceil() as u64
}
