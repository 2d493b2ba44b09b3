//! Application state for the web layer.

use std::sync::Arc;

use crate::repository::MemoryRepository;
use crate::service::SubwayService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Stations, lines and sections
    pub subway: Arc<SubwayService<MemoryRepository>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(repo: MemoryRepository) -> Self {
        Self {
            subway: Arc::new(SubwayService::new(repo)),
        }
    }
}
