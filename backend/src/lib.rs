pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gpx_export;
pub mod graph;
pub mod instructions;
pub mod models;
pub mod road_handlers;
pub mod routing;
pub mod snapping;
pub mod store;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::GraphCache;
use crate::engine::RouteEngine;
use crate::error::RouteError;
use crate::gpx_export::encode_route_as_gpx;
use crate::models::{ApiError, RouteRequest, RouteResponse, RouteStatus};
use crate::road_handlers::api_error;
use crate::store::RoadStore;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RouteEngine>,
    pub store: Arc<RoadStore>,
    pub graphs: Arc<GraphCache>,
}

impl AppState {
    pub fn new(store: RoadStore, graph_cache_size: usize) -> Self {
        Self {
            engine: Arc::new(RouteEngine::new()),
            store: Arc::new(store),
            graphs: Arc::new(GraphCache::new(graph_cache_size)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/route", post(route_handler))
        .route(
            "/api/roads",
            get(road_handlers::list_roads).post(road_handlers::create_road),
        )
        .route(
            "/api/roads/:id",
            get(road_handlers::get_road).delete(road_handlers::delete_road),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn route_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, (StatusCode, Json<ApiError>)> {
    for coord in [req.start, req.end] {
        if !coord.is_valid() {
            return Err(api_error(RouteError::InvalidCoordinate(coord)));
        }
    }

    let snapshot = state.store.snapshot();
    let graph = state.graphs.get_or_build(&snapshot);
    let route = state
        .engine
        .compute_route_with_graph(req.start, req.end, &snapshot.roads, &graph);

    if route.status == RouteStatus::StraightLineFallback && !snapshot.roads.is_empty() {
        tracing::warn!(
            start = ?req.start,
            end = ?req.end,
            roads = snapshot.roads.len(),
            "endpoints not connected by roads, returning straight line"
        );
    }

    let gpx_base64 = encode_route_as_gpx(&route).map_err(api_error)?;
    tracing::info!(
        waypoints = route.waypoints.len(),
        distance_m = route.distance_m,
        status = ?route.status,
        "route computed"
    );

    Ok(Json(route.into_response(gpx_base64)))
}
