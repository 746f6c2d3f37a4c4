// Handlers for the road collection API
// Mutations go through the store on the blocking pool since they may rewrite
// the road file; the next route request picks up the new revision.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::RouteError;
use crate::models::{ApiError, NewRoadRequest, Road};
use crate::AppState;

/// GET /api/roads - List all roads in creation order
pub async fn list_roads(State(state): State<AppState>) -> Json<Vec<Road>> {
    Json(state.store.list())
}

/// GET /api/roads/:id - Get a single road
pub async fn get_road(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Road>, (StatusCode, Json<ApiError>)> {
    state
        .store
        .get(&id)
        .map(Json)
        .map_err(|e| api_error(e.into()))
}

/// POST /api/roads - Register a user-drawn road
pub async fn create_road(
    State(state): State<AppState>,
    Json(payload): Json<NewRoadRequest>,
) -> Result<(StatusCode, Json<Road>), (StatusCode, Json<ApiError>)> {
    let store = Arc::clone(&state.store);
    let road = tokio::task::spawn_blocking(move || store.create(payload))
        .await
        .map_err(|e| api_error(e.into()))?
        .map_err(|e| api_error(e.into()))?;
    tracing::info!(id = %road.id, name = %road.name, points = road.coordinates.len(), "road added");
    Ok((StatusCode::CREATED, Json(road)))
}

/// DELETE /api/roads/:id - Remove a road
pub async fn delete_road(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.delete(&id))
        .await
        .map_err(|e| api_error(e.into()))?
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| api_error(e.into()))
}

/// Convert a routing/store error to an API error response
pub fn api_error(err: RouteError) -> (StatusCode, Json<ApiError>) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("request failed: {err}");
    }
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
