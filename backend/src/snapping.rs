use crate::{
    geometry::project_onto_segment,
    models::{Coordinate, Road},
};

/// A query coordinate projected onto the closest road segment.
#[derive(Debug, Clone, Copy)]
pub struct SnappedPoint<'a> {
    pub road: &'a Road,
    /// Position of `road` in the slice that was searched.
    pub road_index: usize,
    pub segment_index: usize,
    pub segment: (Coordinate, Coordinate),
    pub point: Coordinate,
    pub distance_m: f64,
}

impl SnappedPoint<'_> {
    pub fn same_segment(&self, other: &SnappedPoint<'_>) -> bool {
        self.road_index == other.road_index
            && self.road.id == other.road.id
            && self.segment_index == other.segment_index
    }
}

/// Scans every segment of every road and keeps the closest projection.
///
/// Returns `None` only when no road has at least one segment. On ties the
/// first segment encountered wins.
pub fn find_nearest_road_and_segment(point: Coordinate, roads: &[Road]) -> Option<SnappedPoint<'_>> {
    let mut best: Option<SnappedPoint<'_>> = None;

    for (road_index, road) in roads.iter().enumerate() {
        for (segment_index, (a, b)) in road.segments().enumerate() {
            let projection = project_onto_segment(point, a, b);
            let closer = best
                .as_ref()
                .map_or(true, |current| projection.distance_m < current.distance_m);
            if closer {
                best = Some(SnappedPoint {
                    road,
                    road_index,
                    segment_index,
                    segment: (a, b),
                    point: projection.point,
                    distance_m: projection.distance_m,
                });
            }
        }
    }

    best
}
