//! Subway network service.

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{
    Distance, Fare, Line, LineId, LineInfo, Section, Station, StationId, trip_fare,
};
use crate::repository::SubwayRepository;

use super::ServiceError;

/// Request to create a line with its first section.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub extra_fare: u32,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance_meters: i64,
}

/// Request to add a section to an existing line.
#[derive(Debug, Clone, Copy)]
pub struct NewSection {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance_meters: i64,
}

/// Fare for a trip between two stations of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareQuote {
    pub distance: Distance,
    pub fare: Fare,
}

/// Stations, lines and section edits on top of a repository.
pub struct SubwayService<R> {
    repo: RwLock<R>,
}

impl<R: SubwayRepository> SubwayService<R> {
    /// Create a new service owning `repo`.
    pub fn new(repo: R) -> Self {
        Self {
            repo: RwLock::new(repo),
        }
    }

    pub async fn create_station(&self, name: &str) -> Result<Station, ServiceError> {
        let station = Station::new(name)?;

        let mut repo = self.repo.write().await;
        let stored = repo.insert_station(&station)?;
        repo.flush()?;

        info!(id = ?stored.id(), name = stored.name(), "created station");
        Ok(stored)
    }

    pub async fn stations(&self) -> Result<Vec<Station>, ServiceError> {
        let stations = self.repo.read().await.stations()?;
        Ok(stations)
    }

    pub async fn delete_station(&self, id: StationId) -> Result<(), ServiceError> {
        let mut repo = self.repo.write().await;
        repo.delete_station(id)?;
        repo.flush()?;

        info!(%id, "deleted station");
        Ok(())
    }

    /// Create a line together with its first section.
    pub async fn create_line(&self, request: NewLine) -> Result<Line, ServiceError> {
        let info = LineInfo::new(request.name, request.color, Fare::new(request.extra_fare))?;
        let distance = Distance::from_meters(request.distance_meters)?;

        let mut repo = self.repo.write().await;
        let up = repo.find_station(request.up_station_id)?;
        let down = repo.find_station(request.down_station_id)?;
        let line = Line::new(info, Section::new(up, down, distance)?);

        let id = repo.insert_line(line.info())?;
        if let Err(e) = repo.save_sections(id, line.sections()) {
            // Undo the half-created line; the original error is what matters.
            if let Err(cleanup) = repo.delete_line(id) {
                warn!(%id, error = %cleanup, "failed to roll back line creation");
            }
            return Err(e.into());
        }
        repo.flush()?;

        info!(%id, name = line.name(), "created line");
        load_line(&*repo, id)
    }

    /// All lines with their stations in path order.
    pub async fn lines(&self) -> Result<Vec<Line>, ServiceError> {
        let repo = self.repo.read().await;
        repo.line_ids()
            .into_iter()
            .map(|id| load_line(&*repo, id))
            .collect()
    }

    pub async fn line(&self, id: LineId) -> Result<Line, ServiceError> {
        let repo = self.repo.read().await;
        load_line(&*repo, id)
    }

    /// Replace a line's name, color and surcharge.
    pub async fn update_line(
        &self,
        id: LineId,
        name: &str,
        color: &str,
        extra_fare: u32,
    ) -> Result<Line, ServiceError> {
        let info = LineInfo::new(name, color, Fare::new(extra_fare))?;

        let mut repo = self.repo.write().await;
        repo.update_line(id, &info)?;
        repo.flush()?;

        info!(%id, name, "updated line");
        load_line(&*repo, id)
    }

    /// Delete a line and all of its sections.
    pub async fn delete_line(&self, id: LineId) -> Result<(), ServiceError> {
        let mut repo = self.repo.write().await;
        repo.delete_line(id)?;
        repo.flush()?;

        info!(%id, "deleted line");
        Ok(())
    }

    /// Add a section to a line, extending it or splitting an existing section.
    pub async fn add_section(
        &self,
        line_id: LineId,
        request: NewSection,
    ) -> Result<Line, ServiceError> {
        let distance = Distance::from_meters(request.distance_meters)?;

        let mut repo = self.repo.write().await;
        let mut line = load_line(&*repo, line_id)?;
        let up = repo.find_station(request.up_station_id)?;
        let down = repo.find_station(request.down_station_id)?;
        let section = Section::new(up, down, distance)?;

        debug!(line = %line_id, %section, "adding section");
        line.add_section(section)?;
        repo.save_sections(line_id, line.sections())?;
        repo.flush()?;

        info!(line = %line_id, sections = line.sections().len(), "added section");
        load_line(&*repo, line_id)
    }

    /// Take a station off a line, merging or dropping the sections around it.
    pub async fn remove_station(
        &self,
        line_id: LineId,
        station_id: StationId,
    ) -> Result<Line, ServiceError> {
        let mut repo = self.repo.write().await;
        let mut line = load_line(&*repo, line_id)?;
        let station = repo.find_station(station_id)?;

        let removed = line.delete_station(&station)?;
        repo.save_sections(line_id, line.sections())?;
        repo.flush()?;

        info!(line = %line_id, station = %station, %removed, "removed station from line");
        load_line(&*repo, line_id)
    }

    /// Quote the fare between two stations of one line.
    ///
    /// The line's surcharge is added on top of the distance fare.
    pub async fn quote_fare(
        &self,
        line_id: LineId,
        source: StationId,
        target: StationId,
    ) -> Result<FareQuote, ServiceError> {
        let repo = self.repo.read().await;
        let line = load_line(&*repo, line_id)?;
        let from = repo.find_station(source)?;
        let to = repo.find_station(target)?;

        let distance = line.distance_between(&from, &to)?;
        let fare = trip_fare(distance, [line.extra_fare()])?;

        debug!(line = %line_id, %from, %to, %distance, %fare, "quoted fare");
        Ok(FareQuote { distance, fare })
    }
}

/// Load a line and restore its path order from the stored rows.
fn load_line<R: SubwayRepository>(repo: &R, id: LineId) -> Result<Line, ServiceError> {
    let info = repo.find_line_info(id)?;
    let sections = repo.load_sections(id)?;
    Line::restore(id, info, sections).map_err(|e| {
        warn!(line = %id, error = %e, "stored sections do not form a path");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, TopologyError};
    use crate::repository::{MemoryRepository, RepositoryError};
    use crate::service::ErrorKind;

    async fn service_with_stations(names: &[&str]) -> (SubwayService<MemoryRepository>, Vec<StationId>) {
        let service = SubwayService::new(MemoryRepository::new());
        let mut ids = Vec::new();
        for name in names {
            let station = service.create_station(name).await.unwrap();
            ids.push(station.id().unwrap());
        }
        (service, ids)
    }

    fn new_line(name: &str, up: StationId, down: StationId, meters: i64) -> NewLine {
        NewLine {
            name: name.to_string(),
            color: "bg-red-600".to_string(),
            extra_fare: 900,
            up_station_id: up,
            down_station_id: down,
            distance_meters: meters,
        }
    }

    fn new_section(up: StationId, down: StationId, meters: i64) -> NewSection {
        NewSection {
            up_station_id: up,
            down_station_id: down,
            distance_meters: meters,
        }
    }

    fn names(line: &Line) -> Vec<String> {
        line.stations().iter().map(|s| s.name().to_string()).collect()
    }

    #[tokio::test]
    async fn create_line_with_first_section() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;
        let line = service
            .create_line(new_line("Line 2", ids[0], ids[1], 10))
            .await
            .unwrap();

        assert!(line.id().is_some());
        assert_eq!(names(&line), ["A", "B"]);
        assert!(line.sections()[0].id().is_some());
        assert_eq!(service.lines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_line_validates_before_storing() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;

        let err = service
            .create_line(new_line(" ", ids[0], ids[1], 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .create_line(new_line("Line 2", ids[0], ids[1], 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .create_line(new_line("Line 2", ids[0], ids[0], 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = service
            .create_line(new_line("Line 2", ids[0], StationId(999), 10))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Repository(RepositoryError::StationNotFound(StationId(999)))
        );

        assert!(service.lines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_line_name_is_conflict() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;
        service
            .create_line(new_line("Line 2", ids[0], ids[1], 10))
            .await
            .unwrap();
        let err = service
            .create_line(new_line("Line 2", ids[0], ids[1], 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn add_sections_in_any_position() {
        let (service, ids) = service_with_stations(&["A", "B", "C", "D", "E"]).await;
        let [a, b, c, d, e] = ids[..] else { unreachable!() };
        let line = service.create_line(new_line("Line 2", b, d, 10)).await.unwrap();
        let id = line.id().unwrap();

        service.add_section(id, new_section(d, e, 3)).await.unwrap();
        service.add_section(id, new_section(a, b, 2)).await.unwrap();
        let line = service.add_section(id, new_section(b, c, 4)).await.unwrap();

        assert_eq!(names(&line), ["A", "B", "C", "D", "E"]);
        assert_eq!(line.total_distance().unwrap().meters(), 15);
        let distances: Vec<_> = line.sections().iter().map(|s| s.distance().meters()).collect();
        assert_eq!(distances, [2, 4, 6, 3]);
    }

    #[tokio::test]
    async fn add_section_topology_errors() {
        let (service, ids) = service_with_stations(&["A", "B", "C", "X", "Y"]).await;
        let [a, b, c, x, y] = ids[..] else { unreachable!() };
        let line = service.create_line(new_line("Line 2", a, b, 10)).await.unwrap();
        let id = line.id().unwrap();
        service.add_section(id, new_section(b, c, 5)).await.unwrap();

        let err = service.add_section(id, new_section(x, y, 3)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Topology(TopologyError::SectionNotConnectable { .. }))
        ));

        let err = service.add_section(id, new_section(a, b, 3)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Topology(TopologyError::DuplicateSection { .. }))
        ));

        let err = service.add_section(id, new_section(a, x, 10)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Topology(TopologyError::DistanceExceedsSection { .. }))
        ));
        assert_eq!(err.kind(), ErrorKind::Topology);

        // Failed edits leave the stored line untouched
        let line = service.line(id).await.unwrap();
        assert_eq!(names(&line), ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn remove_interior_station_merges() {
        let (service, ids) = service_with_stations(&["A", "B", "C"]).await;
        let [a, b, c] = ids[..] else { unreachable!() };
        let line = service.create_line(new_line("Line 2", a, b, 10)).await.unwrap();
        let id = line.id().unwrap();
        service.add_section(id, new_section(b, c, 5)).await.unwrap();

        let line = service.remove_station(id, b).await.unwrap();
        assert_eq!(names(&line), ["A", "C"]);
        assert_eq!(line.sections()[0].distance().meters(), 15);

        // B is no longer referenced and can be deleted
        service.delete_station(b).await.unwrap();
    }

    #[tokio::test]
    async fn remove_last_section_fails() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;
        let line = service
            .create_line(new_line("Line 2", ids[0], ids[1], 10))
            .await
            .unwrap();
        let err = service
            .remove_station(line.id().unwrap(), ids[0])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Domain(DomainError::Topology(TopologyError::CannotDeleteLastSection))
        );
    }

    #[tokio::test]
    async fn station_on_line_cannot_be_deleted() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;
        service
            .create_line(new_line("Line 2", ids[0], ids[1], 10))
            .await
            .unwrap();
        let err = service.delete_station(ids[0]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn update_and_delete_line() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;
        let line = service
            .create_line(new_line("Line 2", ids[0], ids[1], 10))
            .await
            .unwrap();
        let id = line.id().unwrap();

        let line = service
            .update_line(id, "Line 9", "bg-gold-500", 300)
            .await
            .unwrap();
        assert_eq!(line.name(), "Line 9");
        assert_eq!(line.extra_fare(), Fare::new(300));
        assert_eq!(names(&line), ["A", "B"]);

        service.delete_line(id).await.unwrap();
        let err = service.line(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Stations are free again once their line is gone
        service.delete_station(ids[0]).await.unwrap();
    }

    #[tokio::test]
    async fn quote_fare_adds_line_surcharge() {
        let (service, ids) = service_with_stations(&["A", "B", "C"]).await;
        let [a, b, c] = ids[..] else { unreachable!() };
        let line = service
            .create_line(new_line("Line 2", a, b, 10_000))
            .await
            .unwrap();
        let id = line.id().unwrap();
        service.add_section(id, new_section(b, c, 1_000)).await.unwrap();

        let quote = service.quote_fare(id, c, a).await.unwrap();
        assert_eq!(quote.distance.meters(), 11_000);
        assert_eq!(quote.fare, Fare::new(1350 + 900));

        let err = service.quote_fare(id, a, a).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Topology);
    }

    #[tokio::test]
    async fn quote_fare_rejects_unrepresentable_fare() {
        let (service, ids) = service_with_stations(&["A", "B"]).await;
        let mut request = new_line("Line 2", ids[0], ids[1], 10_000);
        request.extra_fare = u32::MAX;
        let line = service.create_line(request).await.unwrap();

        let err = service
            .quote_fare(line.id().unwrap(), ids[0], ids[1])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::FareRange(_))
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn corrupt_sections_are_reported() {
        let mut repo = MemoryRepository::new();
        let a = repo.insert_station(&Station::new("A").unwrap()).unwrap();
        let b = repo.insert_station(&Station::new("B").unwrap()).unwrap();
        let c = repo.insert_station(&Station::new("C").unwrap()).unwrap();
        let info = LineInfo::new("Line 2", "bg-green-600", Fare::ZERO).unwrap();
        let id = repo.insert_line(&info).unwrap();
        let ten = Distance::from_meters(10).unwrap();
        // A branches to both B and C
        let branching = [
            Section::new(a.clone(), b, ten).unwrap(),
            Section::new(a, c, ten).unwrap(),
        ];
        repo.save_sections(id, &branching).unwrap();

        let service = SubwayService::new(repo);
        let err = service.line(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupt);
    }
}
