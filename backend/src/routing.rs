use crate::{
    geometry::distance_m,
    graph::NodeKey,
    instructions::straight_line_instructions,
    models::{Coordinate, RouteResult, RouteStatus},
};

/// Travel-time heuristic, not a speed model.
pub const MINUTES_PER_KM: f64 = 2.0;

pub fn estimated_minutes(distance_m: f64) -> f64 {
    distance_m / 1_000.0 * MINUTES_PER_KM
}

/// Direct two-point route used whenever the road network cannot serve a
/// request. Identical endpoints collapse to a single waypoint.
pub fn straight_line_route(start: Coordinate, dest: Coordinate) -> RouteResult {
    let waypoints = collapse_duplicates(vec![start, dest]);
    let distance = if waypoints.len() < 2 {
        0.0
    } else {
        distance_m(start, dest)
    };

    RouteResult {
        waypoints,
        distance_m: distance,
        estimated_minutes: estimated_minutes(distance),
        instructions: straight_line_instructions(start, dest),
        status: RouteStatus::StraightLineFallback,
    }
}

/// Drops consecutive waypoints that fall on the same node grid cell.
pub fn collapse_duplicates(mut waypoints: Vec<Coordinate>) -> Vec<Coordinate> {
    waypoints.dedup_by_key(|coord| NodeKey::of(*coord));
    waypoints
}
