//! Line aggregate.
//!
//! A `Line` owns its [`Sections`] exclusively. All topology changes go through
//! [`Line::add_section`] and [`Line::delete_station`], so the single-path
//! invariants cannot be bypassed by splicing the edge list directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CorruptSections, Distance, Fare, Section, Sections, Station, TopologyError};

/// Error returned when line details are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line: {reason}")]
pub struct InvalidLine {
    reason: &'static str,
}

/// Persistent identifier of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated descriptive fields of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    name: String,
    color: String,
    extra_fare: Fare,
}

impl LineInfo {
    /// Validate line details. Name and color must not be blank.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        extra_fare: Fare,
    ) -> Result<Self, InvalidLine> {
        let name = name.into();
        let color = color.into();
        if name.trim().is_empty() {
            return Err(InvalidLine {
                reason: "name must not be blank",
            });
        }
        if color.trim().is_empty() {
            return Err(InvalidLine {
                reason: "color must not be blank",
            });
        }
        Ok(LineInfo {
            name,
            color,
            extra_fare,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Surcharge added to trips that use this line.
    pub fn extra_fare(&self) -> Fare {
        self.extra_fare
    }
}

/// A subway line: descriptive details plus an ordered chain of sections.
#[derive(Debug, Clone)]
pub struct Line {
    id: Option<LineId>,
    info: LineInfo,
    sections: Sections,
}

impl Line {
    /// Create a new, not yet persisted line with its first section.
    pub fn new(info: LineInfo, first: Section) -> Self {
        Line {
            id: None,
            info,
            sections: Sections::single(first),
        }
    }

    /// Rebuild a stored line from its unordered section rows.
    pub fn restore(
        id: LineId,
        info: LineInfo,
        sections: Vec<Section>,
    ) -> Result<Self, CorruptSections> {
        Ok(Line {
            id: Some(id),
            info,
            sections: Sections::restore(sections)?,
        })
    }

    pub fn id(&self) -> Option<LineId> {
        self.id
    }

    pub fn info(&self) -> &LineInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn color(&self) -> &str {
        self.info.color()
    }

    pub fn extra_fare(&self) -> Fare {
        self.info.extra_fare()
    }

    /// Returns true if both lines carry the same name.
    pub fn has_same_name(&self, other: &Line) -> bool {
        self.info.name == other.info.name
    }

    pub fn add_section(&mut self, section: Section) -> Result<(), TopologyError> {
        self.sections.add(section)
    }

    /// Remove a station from the line, returning the section that disappeared.
    pub fn delete_station(&mut self, station: &Station) -> Result<Section, TopologyError> {
        self.sections.delete(station)
    }

    /// Sections in path order.
    pub fn sections(&self) -> &[Section] {
        self.sections.sections()
    }

    /// Stations in path order.
    pub fn stations(&self) -> Vec<&Station> {
        self.sections.stations()
    }

    pub fn total_distance(&self) -> Option<Distance> {
        self.sections.total_distance()
    }

    pub fn distance_between(&self, from: &Station, to: &Station) -> Result<Distance, TopologyError> {
        self.sections.distance_between(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SectionId, StationId};

    fn station(id: u64, name: &str) -> Station {
        Station::with_id(StationId(id), name).unwrap()
    }

    fn section(up: (u64, &str), down: (u64, &str), meters: i64) -> Section {
        Section::new(
            station(up.0, up.1),
            station(down.0, down.1),
            Distance::from_meters(meters).unwrap(),
        )
        .unwrap()
    }

    fn info(name: &str) -> LineInfo {
        LineInfo::new(name, "bg-red-600", Fare::new(900)).unwrap()
    }

    #[test]
    fn reject_blank_name_or_color() {
        assert!(LineInfo::new("", "bg-red-600", Fare::ZERO).is_err());
        assert!(LineInfo::new("Shinbundang", " ", Fare::ZERO).is_err());
        let err = LineInfo::new(" ", "bg-red-600", Fare::ZERO).unwrap_err();
        assert_eq!(err.to_string(), "invalid line: name must not be blank");
    }

    #[test]
    fn new_line_has_two_stations() {
        let line = Line::new(info("Shinbundang"), section((1, "Gangnam"), (2, "Yangjae"), 10));
        assert!(line.id().is_none());
        assert_eq!(line.name(), "Shinbundang");
        assert_eq!(line.color(), "bg-red-600");
        assert_eq!(line.extra_fare(), Fare::new(900));
        let names: Vec<_> = line.stations().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["Gangnam", "Yangjae"]);
    }

    #[test]
    fn three_station_line_merges_on_delete() {
        let mut line = Line::new(info("Shinbundang"), section((1, "A"), (2, "B"), 10));
        line.add_section(section((2, "B"), (3, "C"), 5)).unwrap();
        assert_eq!(line.total_distance().unwrap().meters(), 15);

        line.delete_station(&station(2, "B")).unwrap();
        assert_eq!(line.sections().len(), 1);
        assert_eq!(line.sections()[0], section((1, "A"), (3, "C"), 15));
    }

    #[test]
    fn restore_orders_sections() {
        let rows = vec![
            Section::with_id(SectionId(2), station(2, "B"), station(3, "C"), Distance::from_meters(5).unwrap()).unwrap(),
            Section::with_id(SectionId(1), station(1, "A"), station(2, "B"), Distance::from_meters(10).unwrap()).unwrap(),
        ];
        let line = Line::restore(LineId(7), info("Line 2"), rows).unwrap();
        assert_eq!(line.id(), Some(LineId(7)));
        let ids: Vec<_> = line.sections().iter().map(|s| s.id().unwrap()).collect();
        assert_eq!(ids, [SectionId(1), SectionId(2)]);
    }

    #[test]
    fn has_same_name() {
        let a = Line::new(info("Line 2"), section((1, "A"), (2, "B"), 10));
        let b = Line::new(info("Line 2"), section((3, "C"), (4, "D"), 3));
        let c = Line::new(info("Line 3"), section((1, "A"), (2, "B"), 10));
        assert!(a.has_same_name(&b));
        assert!(!a.has_same_name(&c));
    }

    #[test]
    fn distance_between() {
        let mut line = Line::new(info("Line 2"), section((1, "A"), (2, "B"), 10));
        line.add_section(section((2, "B"), (3, "C"), 5)).unwrap();
        let d = line
            .distance_between(&station(3, "C"), &station(1, "A"))
            .unwrap();
        assert_eq!(d.meters(), 15);
    }
}
