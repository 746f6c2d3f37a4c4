use campus_nav::{
    AppState,
    config::{DEFAULT_LOG_FILTER, ServerConfig, init_tracing},
    create_router,
    store::RoadStore,
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(DEFAULT_LOG_FILTER);
    let config = ServerConfig::parse();

    let store = match &config.roads_file {
        Some(path) => RoadStore::open(path)?,
        None => RoadStore::new(),
    };
    tracing::info!(roads = store.len(), "road store ready");

    let app = create_router(AppState::new(store, config.graph_cache_size));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("starting campus_nav on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
