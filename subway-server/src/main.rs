use subway_server::config::ServerConfig;
use subway_server::repository::{MemoryRepository, SnapshotFile};
use subway_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Load the persisted network, or start empty
    let repo = match &config.snapshot_path {
        Some(path) => {
            info!(path = %path.display(), "using snapshot file");
            MemoryRepository::with_snapshot(SnapshotFile::new(path))
                .expect("Failed to load snapshot")
        }
        None => {
            info!("no snapshot configured, network will not be persisted");
            MemoryRepository::new()
        }
    };

    let state = AppState::new(repo);
    let app = create_router(state);

    let addr = config.bind_addr;
    info!("Subway server listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health                      - Health check");
    info!("  POST /stations, GET /stations     - Create and list stations");
    info!("  POST /lines, GET /lines           - Create and list lines");
    info!("  POST /lines/:id/sections          - Add a section to a line");
    info!("  DELETE /lines/:id/sections        - Remove a station from a line");
    info!("  GET  /lines/:id/fare              - Quote a fare");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
