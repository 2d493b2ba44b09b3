//! Persistence for stations, lines and their section rows.
//!
//! The domain never talks to storage directly. Services load a line's
//! unordered section rows through [`SubwayRepository`], let the domain restore
//! and mutate the path, then hand the full ordered section list back for a
//! rewrite of that line's rows.

mod error;
mod memory;
mod snapshot;

pub use error::RepositoryError;
pub use memory::MemoryRepository;
pub use snapshot::SnapshotFile;

use crate::domain::{LineId, LineInfo, Section, Station, StationId};

/// Storage for the subway network.
///
/// This abstraction allows the services to run against any backing store.
/// Implementations do not need internal locking: callers hold exclusive
/// access for the whole read-modify-write cycle of a mutation.
pub trait SubwayRepository {
    /// Store a new station, returning it with its assigned identifier.
    fn insert_station(&mut self, station: &Station) -> Result<Station, RepositoryError>;

    fn find_station(&self, id: StationId) -> Result<Station, RepositoryError>;

    /// All stations, ordered by identifier.
    fn stations(&self) -> Result<Vec<Station>, RepositoryError>;

    /// Delete a station that no section refers to.
    fn delete_station(&mut self, id: StationId) -> Result<(), RepositoryError>;

    /// Store a new line's details, returning its assigned identifier.
    fn insert_line(&mut self, info: &LineInfo) -> Result<LineId, RepositoryError>;

    fn find_line_info(&self, id: LineId) -> Result<LineInfo, RepositoryError>;

    /// All line identifiers, in ascending order.
    fn line_ids(&self) -> Vec<LineId>;

    fn update_line(&mut self, id: LineId, info: &LineInfo) -> Result<(), RepositoryError>;

    /// Delete a line together with all of its section rows.
    fn delete_line(&mut self, id: LineId) -> Result<(), RepositoryError>;

    /// The line's section rows, in no particular order.
    fn load_sections(&self, line: LineId) -> Result<Vec<Section>, RepositoryError>;

    /// Rewrite the line's section rows to match `sections` exactly.
    ///
    /// Sections with an identifier update their row, sections without one are
    /// inserted, and rows missing from `sections` are deleted. Each row's
    /// index is its position in `sections`.
    fn save_sections(&mut self, line: LineId, sections: &[Section]) -> Result<(), RepositoryError>;

    /// Make all previous writes durable.
    fn flush(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
