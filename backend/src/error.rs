use axum::http::StatusCode;
use thiserror::Error;

use crate::{models::Coordinate, store::StoreError};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("failed to write GPX document: {0}")]
    Io(#[from] std::io::Error),
    #[error("road store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid coordinate: lat={}, lng={}", .0.lat, .0.lng)]
    InvalidCoordinate(Coordinate),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl RouteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            RouteError::Store(StoreError::InvalidRoad(_)) | RouteError::InvalidCoordinate(_) => {
                StatusCode::BAD_REQUEST
            }
            RouteError::Gpx(_) | RouteError::Io(_) | RouteError::Store(_) | RouteError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
