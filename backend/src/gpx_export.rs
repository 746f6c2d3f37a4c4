use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::RouteError;
use crate::models::{Coordinate, RouteResult};

const CREATOR: &str = "campus_nav";

pub fn encode_route_as_gpx(route: &RouteResult) -> Result<String, RouteError> {
    let mut buffer = Vec::new();
    write_route_gpx(route, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

pub fn write_route_gpx(route: &RouteResult, writer: impl Write) -> Result<(), RouteError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some("campus route".into()),
        description: Some(route.instructions.join(" ")),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    segment.points.extend(route.waypoints.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    if let (Some(first), Some(last)) = (route.waypoints.first(), route.waypoints.last()) {
        gpx.waypoints.push(named_waypoint(first, "Start"));
        gpx.waypoints.push(named_waypoint(last, "Destination"));
    }

    gpx::write(&gpx, writer)?;
    Ok(())
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lng, coord.lat))
}

fn named_waypoint(coord: &Coordinate, name: &str) -> Waypoint {
    let mut waypoint = to_waypoint(coord);
    waypoint.name = Some(name.into());
    waypoint
}
