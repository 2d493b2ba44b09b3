//! Domain types for the subway network.
//!
//! This module contains the value types (distance, fare, station, section)
//! and the line aggregate with its section topology engine. All types enforce
//! their invariants at construction time, so code that receives these types
//! can trust their validity. Nothing here performs I/O.

mod distance;
mod error;
mod fare;
mod line;
mod section;
mod sections;
mod station;

pub use distance::{Distance, InvalidDistance};
pub use error::{CorruptSections, DomainError, TopologyError};
pub use fare::{Fare, InvalidFare, NegativeFare, distance_fare, trip_fare};
pub use line::{InvalidLine, Line, LineId, LineInfo};
pub use section::{Section, SectionId, SelfLoopSection};
pub use sections::Sections;
pub use station::{InvalidStationName, Station, StationId};
