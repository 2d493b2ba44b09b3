//! Ordered sections of one line.
//!
//! `Sections` owns the edges of a single line and keeps them as one simple
//! path: every station has at most one outgoing and one incoming section, no
//! two sections join the same pair of stations, and the sections are
//! connected. Edges are always stored head to tail, so callers that need the
//! order (the repository assigns row indices from it) can rely on it.

use super::{CorruptSections, Distance, Section, Station, TopologyError};

/// The section chain of a line.
///
/// # Invariants
///
/// - Edges form a single path ordered from head to tail
/// - Each station has in-degree and out-degree of at most one
/// - The total path distance fits in a [`Distance`]
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Distance, Section, Sections, Station, StationId};
///
/// let station = |id, name| Station::with_id(StationId(id), name).unwrap();
/// let meters = |m| Distance::from_meters(m).unwrap();
///
/// let mut sections = Sections::new();
/// sections
///     .add(Section::new(station(1, "A"), station(3, "C"), meters(10)).unwrap())
///     .unwrap();
///
/// // Insert B between A and C
/// sections
///     .add(Section::new(station(1, "A"), station(2, "B"), meters(4)).unwrap())
///     .unwrap();
///
/// let names: Vec<_> = sections.stations().iter().map(|s| s.name()).collect();
/// assert_eq!(names, ["A", "B", "C"]);
/// assert_eq!(sections.sections()[1].distance().meters(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sections {
    edges: Vec<Section>,
}

impl Sections {
    /// Create an empty section chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain holding a single section.
    pub fn single(section: Section) -> Self {
        Sections {
            edges: vec![section],
        }
    }

    /// Rebuild a chain from an unordered set of stored sections.
    ///
    /// The path order is recovered by walking from the single head station.
    ///
    /// # Errors
    ///
    /// Returns [`CorruptSections`] if the edges do not form one simple path:
    /// a station with two outgoing or incoming sections, zero or several
    /// candidate heads, or sections unreachable from the head.
    pub fn restore(edges: Vec<Section>) -> Result<Self, CorruptSections> {
        let edges = order_path(edges)?;
        let total: u64 = edges.iter().map(|e| u64::from(e.distance().meters())).sum();
        if total > u64::from(u32::MAX) {
            return Err(CorruptSections {
                reason: format!("total distance of {total}m is out of range"),
            });
        }
        Ok(Sections { edges })
    }

    /// Add a section to the line.
    ///
    /// The section either extends the line at one of its ends or splits an
    /// existing section that shares its start or end station.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`TopologyError::SectionNotConnectable`] if neither station is on the line
    /// - [`TopologyError::DuplicateSection`] if the same pair is already joined
    /// - [`TopologyError::InvalidSection`] if both stations are already on the line
    /// - [`TopologyError::DistanceExceedsSection`] if a split section is not shorter
    ///   than the section being split
    pub fn add(&mut self, section: Section) -> Result<(), TopologyError> {
        if self.edges.is_empty() {
            self.edges.push(section);
            return Ok(());
        }

        let up_known = self.contains_station(section.up());
        let down_known = self.contains_station(section.down());

        if !up_known && !down_known {
            return Err(TopologyError::SectionNotConnectable {
                up: section.up().to_string(),
                down: section.down().to_string(),
            });
        }

        if self.edges.iter().any(|e| e.same_endpoints(&section)) {
            return Err(TopologyError::DuplicateSection {
                up: section.up().to_string(),
                down: section.down().to_string(),
            });
        }

        if up_known && down_known {
            return Err(invalid(&section));
        }

        if up_known {
            if self.tail() == Some(section.up()) {
                self.ensure_extension_fits(&section)?;
                self.edges.push(section);
                return Ok(());
            }
            let idx = self
                .edges
                .iter()
                .position(|e| e.shares_up_with(&section))
                .ok_or_else(|| invalid(&section))?;
            self.split_after_up(idx, section)
        } else {
            if self.head() == Some(section.down()) {
                self.ensure_extension_fits(&section)?;
                self.edges.insert(0, section);
                return Ok(());
            }
            let idx = self
                .edges
                .iter()
                .position(|e| e.shares_down_with(&section))
                .ok_or_else(|| invalid(&section))?;
            self.split_before_down(idx, section)
        }
    }

    /// Remove a station from the line, returning the section that disappeared.
    ///
    /// Removing a terminus drops its only section. Removing an interior
    /// station merges its two sections: the successor's slot (and identifier)
    /// is kept for the merged section and the predecessor is returned.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::StationNotOnLine`] if the station is not on the line
    /// - [`TopologyError::CannotDeleteLastSection`] if only one section remains
    pub fn delete(&mut self, station: &Station) -> Result<Section, TopologyError> {
        if !self.contains_station(station) {
            return Err(TopologyError::StationNotOnLine(station.to_string()));
        }
        if self.edges.len() == 1 {
            return Err(TopologyError::CannotDeleteLastSection);
        }

        if self.head() == Some(station) {
            return Ok(self.edges.remove(0));
        }
        let last = self.edges.len() - 1;
        if self.tail() == Some(station) {
            return Ok(self.edges.remove(last));
        }

        let idx = self
            .edges
            .iter()
            .position(|e| e.down() == station)
            .filter(|&i| i < last)
            .ok_or_else(|| TopologyError::StationNotOnLine(station.to_string()))?;

        let predecessor = &self.edges[idx];
        let successor = &self.edges[idx + 1];
        let distance = predecessor
            .distance()
            .plus(successor.distance())
            .map_err(|_| TopologyError::DistanceOverflow)?;
        let merged = Section::joining(
            successor.id(),
            predecessor.up().clone(),
            successor.down().clone(),
            distance,
        );

        self.edges[idx + 1] = merged;
        Ok(self.edges.remove(idx))
    }

    /// Sections in path order, head to tail.
    pub fn sections(&self) -> &[Section] {
        &self.edges
    }

    /// Stations in path order, head to tail.
    ///
    /// Empty for an empty chain, otherwise one more than the section count.
    pub fn stations(&self) -> Vec<&Station> {
        let Some(first) = self.edges.first() else {
            return Vec::new();
        };
        std::iter::once(first.up())
            .chain(self.edges.iter().map(Section::down))
            .collect()
    }

    /// The first station of the line.
    pub fn head(&self) -> Option<&Station> {
        self.edges.first().map(Section::up)
    }

    /// The last station of the line.
    pub fn tail(&self) -> Option<&Station> {
        self.edges.last().map(Section::down)
    }

    pub fn contains_station(&self, station: &Station) -> bool {
        self.edges.iter().any(|e| e.contains_station(station))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of all section distances, or `None` for an empty chain.
    pub fn total_distance(&self) -> Option<Distance> {
        let total: u64 = self.total_meters();
        Distance::from_meters(i64::try_from(total).ok()?).ok()
    }

    /// Distance travelled between two stations on the line, in either direction.
    pub fn distance_between(&self, from: &Station, to: &Station) -> Result<Distance, TopologyError> {
        let stations = self.stations();
        let position = |station: &Station| {
            stations
                .iter()
                .position(|s| *s == station)
                .ok_or_else(|| TopologyError::StationNotOnLine(station.to_string()))
        };

        let a = position(from)?;
        let b = position(to)?;
        if a == b {
            return Err(TopologyError::SameStation(from.to_string()));
        }
        let (start, end) = if a < b { (a, b) } else { (b, a) };

        let meters: u64 = self.edges[start..end]
            .iter()
            .map(|e| u64::from(e.distance().meters()))
            .sum();
        i64::try_from(meters)
            .ok()
            .and_then(|m| Distance::from_meters(m).ok())
            .ok_or(TopologyError::DistanceOverflow)
    }

    fn total_meters(&self) -> u64 {
        self.edges
            .iter()
            .map(|e| u64::from(e.distance().meters()))
            .sum()
    }

    fn ensure_extension_fits(&self, section: &Section) -> Result<(), TopologyError> {
        let total = self.total_meters() + u64::from(section.distance().meters());
        if total > u64::from(u32::MAX) {
            return Err(TopologyError::DistanceOverflow);
        }
        Ok(())
    }

    /// Insert `section` right after the shared up station of `edges[idx]`.
    ///
    /// `A -> C` becomes `A -> new.down -> C`.
    fn split_after_up(&mut self, idx: usize, section: Section) -> Result<(), TopologyError> {
        let existing = &self.edges[idx];
        let remainder = remaining_distance(existing, &section)?;

        let first = Section::joining(
            existing.id(),
            existing.up().clone(),
            section.down().clone(),
            section.distance(),
        );
        let second = Section::joining(
            None,
            section.down().clone(),
            existing.down().clone(),
            remainder,
        );

        self.edges[idx] = first;
        self.edges.insert(idx + 1, second);
        Ok(())
    }

    /// Insert `section` right before the shared down station of `edges[idx]`.
    ///
    /// `A -> C` becomes `A -> new.up -> C`.
    fn split_before_down(&mut self, idx: usize, section: Section) -> Result<(), TopologyError> {
        let existing = &self.edges[idx];
        let remainder = remaining_distance(existing, &section)?;

        let first = Section::joining(
            existing.id(),
            existing.up().clone(),
            section.up().clone(),
            remainder,
        );
        let second = Section::joining(
            None,
            section.up().clone(),
            existing.down().clone(),
            section.distance(),
        );

        self.edges[idx] = first;
        self.edges.insert(idx + 1, second);
        Ok(())
    }
}

fn invalid(section: &Section) -> TopologyError {
    TopologyError::InvalidSection {
        up: section.up().to_string(),
        down: section.down().to_string(),
    }
}

fn remaining_distance(existing: &Section, inserted: &Section) -> Result<Distance, TopologyError> {
    existing
        .distance()
        .minus(inserted.distance())
        .map_err(|_| TopologyError::DistanceExceedsSection {
            requested: inserted.distance().to_string(),
            existing: existing.distance().to_string(),
        })
}

/// Order an unordered edge set from head to tail.
fn order_path(mut edges: Vec<Section>) -> Result<Vec<Section>, CorruptSections> {
    if edges.is_empty() {
        return Ok(edges);
    }

    for (i, edge) in edges.iter().enumerate() {
        for other in &edges[i + 1..] {
            if edge.shares_up_with(other) {
                return Err(CorruptSections {
                    reason: format!("station {} has several outgoing sections", edge.up()),
                });
            }
            if edge.shares_down_with(other) {
                return Err(CorruptSections {
                    reason: format!("station {} has several incoming sections", edge.down()),
                });
            }
        }
    }

    let heads: Vec<usize> = edges
        .iter()
        .enumerate()
        .filter(|(_, e)| !edges.iter().any(|other| other.down() == e.up()))
        .map(|(i, _)| i)
        .collect();
    let &[head] = heads.as_slice() else {
        return Err(CorruptSections {
            reason: format!("expected one head station, found {}", heads.len()),
        });
    };

    let mut ordered = Vec::with_capacity(edges.len());
    let mut next = Some(head);
    while let Some(idx) = next {
        let edge = edges.swap_remove(idx);
        next = edges.iter().position(|e| e.up() == edge.down());
        ordered.push(edge);
    }

    if !edges.is_empty() {
        return Err(CorruptSections {
            reason: format!("{} sections are not reachable from the head", edges.len()),
        });
    }

    Ok(ordered)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::StationId;
    use proptest::prelude::*;

    fn station(id: u64) -> Station {
        Station::with_id(StationId(id), format!("S{id}")).unwrap()
    }

    /// A line S0 -> S1 -> ... -> Sn with the given distances.
    fn line(distances: &[u32]) -> Sections {
        let mut sections = Sections::new();
        for (i, &d) in distances.iter().enumerate() {
            let i = i as u64;
            let distance = Distance::from_meters(i64::from(d)).unwrap();
            sections
                .add(Section::new(station(i), station(i + 1), distance).unwrap())
                .unwrap();
        }
        sections
    }

    fn distances() -> impl Strategy<Value = Vec<u32>> {
        proptest::collection::vec(2u32..10_000, 1..12)
    }

    const FRESH: u64 = 1_000;

    proptest! {
        /// One more station than sections
        #[test]
        fn stations_exceed_sections_by_one(ds in distances()) {
            let sections = line(&ds);
            prop_assert_eq!(sections.stations().len(), sections.sections().len() + 1);
        }

        /// Splitting a section keeps the total distance
        #[test]
        fn split_preserves_distance(ds in distances(), pick in any::<prop::sample::Index>(), frac in 0.01f64..0.99, from_up in any::<bool>()) {
            let mut sections = line(&ds);
            let idx = pick.index(ds.len());
            let existing = sections.sections()[idx].clone();
            let part = ((f64::from(existing.distance().meters()) * frac) as i64).max(1);
            prop_assume!(part < i64::from(existing.distance().meters()));
            let part = Distance::from_meters(part).unwrap();

            let new = if from_up {
                Section::new(existing.up().clone(), station(FRESH), part).unwrap()
            } else {
                Section::new(station(FRESH), existing.down().clone(), part).unwrap()
            };
            let before = sections.total_distance();
            sections.add(new).unwrap();

            prop_assert_eq!(sections.total_distance(), before);
            prop_assert_eq!(sections.len(), ds.len() + 1);
            let first = &sections.sections()[idx];
            let second = &sections.sections()[idx + 1];
            prop_assert_eq!(
                first.distance().plus(second.distance()).unwrap(),
                existing.distance()
            );
        }

        /// Adding a station and deleting it again restores the line
        #[test]
        fn add_then_delete_restores(ds in distances(), pick in any::<prop::sample::Index>(), kind in 0u8..4, frac in 0.01f64..0.99) {
            let mut sections = line(&ds);
            let original: Vec<Section> = sections.sections().to_vec();
            let idx = pick.index(ds.len());
            let existing = original[idx].clone();
            let part = ((f64::from(existing.distance().meters()) * frac) as i64).max(1);
            prop_assume!(part < i64::from(existing.distance().meters()));
            let part = Distance::from_meters(part).unwrap();
            let fresh = station(FRESH);

            let new = match kind {
                0 => Section::new(sections.tail().unwrap().clone(), fresh.clone(), part),
                1 => Section::new(fresh.clone(), sections.head().unwrap().clone(), part),
                2 => Section::new(existing.up().clone(), fresh.clone(), part),
                _ => Section::new(fresh.clone(), existing.down().clone(), part),
            }
            .unwrap();

            sections.add(new).unwrap();
            sections.delete(&fresh).unwrap();
            prop_assert_eq!(sections.sections(), &original[..]);
        }

        /// Deleting an interior station merges its two sections
        #[test]
        fn merge_preserves_distance(ds in proptest::collection::vec(1u32..10_000, 2..12), pick in any::<prop::sample::Index>()) {
            let mut sections = line(&ds);
            let interior = pick.index(ds.len() - 1) + 1;
            let before = sections.total_distance();
            sections.delete(&station(interior as u64)).unwrap();

            prop_assert_eq!(sections.total_distance(), before);
            let merged = &sections.sections()[interior - 1];
            prop_assert_eq!(merged.distance().meters(), ds[interior - 1] + ds[interior]);
        }

        /// Deleting a terminus drops one section and leaves the other end alone
        #[test]
        fn delete_terminus(ds in proptest::collection::vec(1u32..10_000, 2..12), at_head in any::<bool>()) {
            let mut sections = line(&ds);
            let n = ds.len() as u64;
            let (first, second) = (station(0), station(1));
            let (last, before_last) = (station(n), station(n - 1));
            if at_head {
                sections.delete(&first).unwrap();
                prop_assert_eq!(sections.tail(), Some(&last));
                prop_assert_eq!(sections.head(), Some(&second));
            } else {
                sections.delete(&last).unwrap();
                prop_assert_eq!(sections.head(), Some(&first));
                prop_assert_eq!(sections.tail(), Some(&before_last));
            }
            prop_assert_eq!(sections.len(), ds.len() - 1);
        }

        /// Restoring a shuffled edge set recovers the path order
        #[test]
        fn restore_recovers_order(ds in distances(), seed in any::<u64>()) {
            let sections = line(&ds);
            let mut shuffled: Vec<Section> = sections.sections().to_vec();
            let len = shuffled.len();
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                shuffled.swap(i, (state >> 33) as usize % (i + 1));
            }
            let restored = Sections::restore(shuffled).unwrap();
            prop_assert_eq!(restored.sections(), sections.sections());
        }
    }
}
