//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, LineId, Section, SectionId, Station, StationId};
use crate::service::{FareQuote, NewLine, NewSection};

/// Request to create a station.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub id: Option<StationId>,
    pub name: String,
}

impl StationResponse {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id(),
            name: station.name().to_string(),
        }
    }
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,

    /// CSS color class, e.g. "bg-red-600"
    pub color: String,

    pub up_station_id: StationId,

    pub down_station_id: StationId,

    /// Length of the first section in meters
    pub distance: i64,

    /// Line surcharge (defaults to 0)
    pub extra_fare: Option<u32>,
}

impl LineRequest {
    pub fn into_new_line(self) -> NewLine {
        NewLine {
            name: self.name,
            color: self.color,
            extra_fare: self.extra_fare.unwrap_or(0),
            up_station_id: self.up_station_id,
            down_station_id: self.down_station_id,
            distance_meters: self.distance,
        }
    }
}

/// Request to replace a line's details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineUpdateRequest {
    pub name: String,
    pub color: String,
    pub extra_fare: Option<u32>,
}

/// Request to add a section to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,

    /// Section length in meters
    pub distance: i64,
}

impl SectionRequest {
    pub fn into_new_section(self) -> NewSection {
        NewSection {
            up_station_id: self.up_station_id,
            down_station_id: self.down_station_id,
            distance_meters: self.distance,
        }
    }
}

/// A section in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: Option<SectionId>,
    pub up_station_id: Option<StationId>,
    pub down_station_id: Option<StationId>,

    /// Section length in meters
    pub distance: u32,
}

impl SectionResponse {
    pub fn from_section(section: &Section) -> Self {
        Self {
            id: section.id(),
            up_station_id: section.up().id(),
            down_station_id: section.down().id(),
            distance: section.distance().meters(),
        }
    }
}

/// A line with its stations in travel order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: Option<LineId>,
    pub name: String,
    pub color: String,
    pub extra_fare: u32,

    /// Stations from the up terminus to the down terminus
    pub stations: Vec<StationResponse>,

    pub sections: Vec<SectionResponse>,

    /// Sum of section lengths in meters
    pub total_distance: Option<u32>,
}

impl LineResponse {
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            extra_fare: line.extra_fare().value(),
            stations: line
                .stations()
                .into_iter()
                .map(StationResponse::from_station)
                .collect(),
            sections: line
                .sections()
                .iter()
                .map(SectionResponse::from_section)
                .collect(),
            total_distance: line.total_distance().map(|d| d.meters()),
        }
    }
}

/// Query for removing a station from a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationQuery {
    pub station_id: StationId,
}

/// Query for a fare between two stations.
#[derive(Debug, Deserialize)]
pub struct FareQuery {
    pub source: StationId,
    pub target: StationId,
}

/// Fare quote response.
#[derive(Debug, Serialize)]
pub struct FareResponse {
    /// Distance travelled in meters
    pub distance: u32,
    pub fare: u32,
}

impl FareResponse {
    pub fn from_quote(quote: &FareQuote) -> Self {
        Self {
            distance: quote.distance.meters(),
            fare: quote.fare.value(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
