use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use shared::{
    ApiError, Coordinate, NewRoadRequest, RoadType, RouteRequest, RouteResponse, RouteStatus,
};

/// A user-drawn polyline that routes may follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Road {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub road_type: RoadType,
    pub coordinates: Vec<Coordinate>,
    #[serde(rename = "createdAt", alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Road {
    pub fn new(id: impl Into<String>, coordinates: Vec<Coordinate>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            road_type: RoadType::Custom,
            coordinates,
            created_at: Utc::now(),
        }
    }

    /// Consecutive vertex pairs of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.coordinates.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn segment_count(&self) -> usize {
        self.coordinates.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    pub waypoints: Vec<Coordinate>,
    pub distance_m: f64,
    pub estimated_minutes: f64,
    pub instructions: Vec<String>,
    pub status: RouteStatus,
}

impl RouteResult {
    pub fn into_response(self, gpx_base64: String) -> RouteResponse {
        RouteResponse {
            waypoints: self.waypoints,
            distance_m: self.distance_m,
            estimated_minutes: self.estimated_minutes,
            instructions: self.instructions,
            status: self.status,
            gpx_base64,
        }
    }
}
