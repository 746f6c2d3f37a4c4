use serde::{Deserialize, Serialize};

/// Serialized as `{"lat", "lng"}`; a `[lat, lng]` pair is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CoordinateRepr")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinateRepr {
    Object { lat: f64, lng: f64 },
    Pair([f64; 2]),
}

impl From<CoordinateRepr> for Coordinate {
    fn from(repr: CoordinateRepr) -> Self {
        match repr {
            CoordinateRepr::Object { lat, lng } | CoordinateRepr::Pair([lat, lng]) => {
                Self { lat, lng }
            }
        }
    }
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadType {
    Highway,
    Street,
    Path,
    #[default]
    Custom,
}

/// Payload for registering a user-drawn road.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub road_type: RoadType,
    pub coordinates: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub end: Coordinate,
}

/// How a route was obtained, so clients can warn when no road path was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    RoadRouted,
    StraightLineFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub waypoints: Vec<Coordinate>,
    pub distance_m: f64,
    pub estimated_minutes: f64,
    pub instructions: Vec<String>,
    pub status: RouteStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gpx_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
