use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::models::Coordinate;

pub const DEFAULT_LOG_FILTER: &str = "campus_nav=debug,tower_http=info";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Campus navigation routing server")]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "CAMPUS_NAV_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// JSON file the roads are loaded from and saved to; roads stay in memory when unset
    #[arg(long, env = "CAMPUS_NAV_ROADS")]
    pub roads_file: Option<PathBuf>,

    /// Number of road graphs (one per road-set revision) kept in memory
    #[arg(long, env = "CAMPUS_NAV_GRAPH_CACHE", default_value_t = 8)]
    pub graph_cache_size: usize,
}

/// Installs the global fmt subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Parses `LAT,LNG`.
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got `{value}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude `{}`: {e}", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude `{}`: {e}", lng.trim()))?;

    let coord = Coordinate::new(lat, lng);
    if !coord.is_valid() {
        return Err(format!("coordinate out of range: {value}"));
    }
    Ok(coord)
}
