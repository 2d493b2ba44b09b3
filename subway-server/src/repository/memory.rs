//! In-memory repository.
//!
//! Rows live in hash maps, so section rows come back in arbitrary order and
//! the domain has to recover the path order from topology. The whole store
//! can be written to a JSON snapshot file on every flush.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Distance, Fare, LineId, LineInfo, Section, SectionId, Station, StationId};

use super::snapshot::{Snapshot, SnapshotFile};
use super::{RepositoryError, SubwayRepository};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct StationRow {
    pub id: StationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct LineRow {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub extra_fare: Fare,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct SectionRow {
    pub id: SectionId,
    pub line_id: LineId,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: Distance,
    pub index: usize,
}

/// Repository backed by in-process hash maps.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    stations: HashMap<StationId, StationRow>,
    lines: HashMap<LineId, LineRow>,
    sections: HashMap<SectionId, SectionRow>,
    /// Next identifier to hand out; shared by all row kinds.
    next_id: u64,
    snapshot: Option<SnapshotFile>,
}

impl MemoryRepository {
    /// Create an empty repository that is never written to disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository persisted to `file`.
    ///
    /// Loads the existing snapshot if there is one; a missing file starts an
    /// empty network.
    pub fn with_snapshot(file: SnapshotFile) -> Result<Self, RepositoryError> {
        let mut repo = match file.load()? {
            Some(snapshot) => Self::from_snapshot(snapshot),
            None => Self::new(),
        };
        debug!(
            path = %file.path().display(),
            stations = repo.stations.len(),
            lines = repo.lines.len(),
            "opened snapshot"
        );
        repo.snapshot = Some(file);
        Ok(repo)
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        let max_id = snapshot
            .stations
            .iter()
            .map(|r| r.id.0)
            .chain(snapshot.lines.iter().map(|r| r.id.0))
            .chain(snapshot.sections.iter().map(|r| r.id.0))
            .max()
            .unwrap_or(0);

        MemoryRepository {
            stations: snapshot.stations.into_iter().map(|r| (r.id, r)).collect(),
            lines: snapshot.lines.into_iter().map(|r| (r.id, r)).collect(),
            sections: snapshot.sections.into_iter().map(|r| (r.id, r)).collect(),
            next_id: snapshot.next_id.max(max_id + 1),
            snapshot: None,
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        let mut stations: Vec<_> = self.stations.values().cloned().collect();
        stations.sort_by_key(|r| r.id);
        let mut lines: Vec<_> = self.lines.values().cloned().collect();
        lines.sort_by_key(|r| r.id);
        let mut sections: Vec<_> = self.sections.values().cloned().collect();
        sections.sort_by_key(|r| (r.line_id, r.index));

        Snapshot {
            next_id: self.next_id,
            stations,
            lines,
            sections,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn station_row(&self, id: StationId) -> Result<&StationRow, RepositoryError> {
        self.stations
            .get(&id)
            .ok_or(RepositoryError::StationNotFound(id))
    }

    fn line_row(&self, id: LineId) -> Result<&LineRow, RepositoryError> {
        self.lines.get(&id).ok_or(RepositoryError::LineNotFound(id))
    }

    fn line_name_taken(&self, name: &str, except: Option<LineId>) -> bool {
        self.lines
            .values()
            .any(|r| r.name == name && Some(r.id) != except)
    }

    fn to_station(row: &StationRow) -> Result<Station, RepositoryError> {
        Station::with_id(row.id, row.name.clone()).map_err(|_| RepositoryError::Snapshot {
            message: format!("station {} has a blank name", row.id),
        })
    }

    fn to_section(&self, row: &SectionRow) -> Result<Section, RepositoryError> {
        let corrupt = |reason: String| RepositoryError::CorruptRow { id: row.id, reason };
        let endpoint = |id: StationId| {
            self.station_row(id)
                .map_err(|e| corrupt(e.to_string()))
                .and_then(Self::to_station)
        };
        let up = endpoint(row.up_station_id)?;
        let down = endpoint(row.down_station_id)?;
        Section::with_id(row.id, up, down, row.distance).map_err(|e| corrupt(e.to_string()))
    }
}

impl SubwayRepository for MemoryRepository {
    fn insert_station(&mut self, station: &Station) -> Result<Station, RepositoryError> {
        if self.stations.values().any(|r| r.name == station.name()) {
            return Err(RepositoryError::DuplicateStationName(
                station.name().to_string(),
            ));
        }
        let id = StationId(self.allocate_id());
        let row = StationRow {
            id,
            name: station.name().to_string(),
        };
        let stored = Self::to_station(&row)?;
        self.stations.insert(id, row);
        Ok(stored)
    }

    fn find_station(&self, id: StationId) -> Result<Station, RepositoryError> {
        Self::to_station(self.station_row(id)?)
    }

    fn stations(&self) -> Result<Vec<Station>, RepositoryError> {
        let mut rows: Vec<_> = self.stations.values().collect();
        rows.sort_by_key(|r| r.id);
        rows.into_iter().map(Self::to_station).collect()
    }

    fn delete_station(&mut self, id: StationId) -> Result<(), RepositoryError> {
        self.station_row(id)?;
        let in_use = self
            .sections
            .values()
            .any(|r| r.up_station_id == id || r.down_station_id == id);
        if in_use {
            return Err(RepositoryError::StationInUse(id));
        }
        self.stations.remove(&id);
        Ok(())
    }

    fn insert_line(&mut self, info: &LineInfo) -> Result<LineId, RepositoryError> {
        if self.line_name_taken(info.name(), None) {
            return Err(RepositoryError::DuplicateLineName(info.name().to_string()));
        }
        let id = LineId(self.allocate_id());
        self.lines.insert(
            id,
            LineRow {
                id,
                name: info.name().to_string(),
                color: info.color().to_string(),
                extra_fare: info.extra_fare(),
            },
        );
        Ok(id)
    }

    fn find_line_info(&self, id: LineId) -> Result<LineInfo, RepositoryError> {
        let row = self.line_row(id)?;
        LineInfo::new(row.name.clone(), row.color.clone(), row.extra_fare).map_err(|e| {
            RepositoryError::Snapshot {
                message: format!("line {id}: {e}"),
            }
        })
    }

    fn line_ids(&self) -> Vec<LineId> {
        let mut ids: Vec<_> = self.lines.keys().copied().collect();
        ids.sort();
        ids
    }

    fn update_line(&mut self, id: LineId, info: &LineInfo) -> Result<(), RepositoryError> {
        self.line_row(id)?;
        if self.line_name_taken(info.name(), Some(id)) {
            return Err(RepositoryError::DuplicateLineName(info.name().to_string()));
        }
        let row = self
            .lines
            .get_mut(&id)
            .ok_or(RepositoryError::LineNotFound(id))?;
        row.name = info.name().to_string();
        row.color = info.color().to_string();
        row.extra_fare = info.extra_fare();
        Ok(())
    }

    fn delete_line(&mut self, id: LineId) -> Result<(), RepositoryError> {
        self.lines
            .remove(&id)
            .ok_or(RepositoryError::LineNotFound(id))?;
        self.sections.retain(|_, r| r.line_id != id);
        Ok(())
    }

    fn load_sections(&self, line: LineId) -> Result<Vec<Section>, RepositoryError> {
        self.line_row(line)?;
        self.sections
            .values()
            .filter(|r| r.line_id == line)
            .map(|r| self.to_section(r))
            .collect()
    }

    fn save_sections(&mut self, line: LineId, sections: &[Section]) -> Result<(), RepositoryError> {
        self.line_row(line)?;

        // Validate everything before touching any row.
        let mut keep = HashSet::new();
        for section in sections {
            for station in [section.up(), section.down()] {
                let id = station
                    .id()
                    .ok_or_else(|| RepositoryError::UnsavedStation(station.name().to_string()))?;
                self.station_row(id)?;
            }
            if let Some(id) = section.id() {
                match self.sections.get(&id) {
                    Some(row) if row.line_id == line => {
                        keep.insert(id);
                    }
                    _ => return Err(RepositoryError::UnknownSection { id, line }),
                }
            }
        }

        self.sections
            .retain(|id, r| r.line_id != line || keep.contains(id));

        for (index, section) in sections.iter().enumerate() {
            let (Some(up_station_id), Some(down_station_id)) =
                (section.up().id(), section.down().id())
            else {
                continue;
            };
            let id = match section.id() {
                Some(id) => id,
                None => SectionId(self.allocate_id()),
            };
            self.sections.insert(
                id,
                SectionRow {
                    id,
                    line_id: line,
                    up_station_id,
                    down_station_id,
                    distance: section.distance(),
                    index,
                },
            );
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), RepositoryError> {
        match &self.snapshot {
            Some(file) => file.save(&self.to_snapshot()),
            None => Ok(()),
        }
    }
}
