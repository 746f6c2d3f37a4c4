use crate::models::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Closest point on a segment and its haversine distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub point: Coordinate,
    pub distance_m: f64,
}

/// Great-circle distance in meters.
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Initial compass bearing from `a` to `b`, in degrees within `[0, 360)`.
pub fn bearing_deg(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if bearing >= 360.0 { 0.0 } else { bearing }
}

pub fn path_length_m(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| distance_m(w[0], w[1])).sum()
}

/// Projects `p` onto the segment `[a, b]`, clamped to the segment.
///
/// The projection is computed in planar lat/lng space, which is accurate at
/// campus scale; the returned distance is the haversine distance.
pub fn project_onto_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> Projection {
    let dlat = b.lat - a.lat;
    let dlng = b.lng - a.lng;
    let len_sq = dlat * dlat + dlng * dlng;

    let point = if len_sq == 0.0 {
        a
    } else {
        let t = ((p.lat - a.lat) * dlat + (p.lng - a.lng) * dlng) / len_sq;
        if t <= 0.0 {
            a
        } else if t >= 1.0 {
            b
        } else {
            a.interpolate(b, t)
        }
    };

    Projection {
        point,
        distance_m: distance_m(p, point),
    }
}

/// Crossing point of segments `[p1, p2]` and `[p3, p4]`.
///
/// Only crossings strictly inside both segments count: parallel, collinear
/// and endpoint-touching segments yield `None`, since segments sharing a
/// vertex are already connected through that vertex.
pub fn segment_intersection(
    p1: Coordinate,
    p2: Coordinate,
    p3: Coordinate,
    p4: Coordinate,
) -> Option<Coordinate> {
    let (x1, y1) = (p1.lat, p1.lng);
    let (x2, y2) = (p2.lat, p2.lng);
    let (x3, y3) = (p3.lat, p3.lng);
    let (x4, y4) = (p4.lat, p4.lng);

    let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if den == 0.0 {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / den;
    let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / den;

    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(Coordinate {
            lat: x1 + t * (x2 - x1),
            lng: y1 + t * (y2 - y1),
        })
    } else {
        None
    }
}

/// Euclidean distance in degree space.
pub fn planar_distance(a: Coordinate, b: Coordinate) -> f64 {
    (b.lat - a.lat).hypot(b.lng - a.lng)
}

/// Whether `p` lies on `[a, b]`: the two partial lengths add up to the total
/// within `epsilon` (degrees).
pub fn lies_on_segment(p: Coordinate, a: Coordinate, b: Coordinate, epsilon: f64) -> bool {
    let partial = planar_distance(a, p) + planar_distance(p, b);
    (partial - planar_distance(a, b)).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn test_distance_same_point() {
        let point = c(45.0, 5.0);
        assert_eq!(distance_m(point, point), 0.0);
    }

    #[test]
    fn test_one_degree_on_equator() {
        let d = distance_m(c(0.0, 0.0), c(0.0, 1.0));
        assert!((d - 111_194.93).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = c(0.0, 0.0);
        assert!((bearing_deg(origin, c(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_deg(origin, c(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(origin, c(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(origin, c(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_clamps_to_segment() {
        let a = c(0.0, 0.0);
        let b = c(0.0, 1.0);

        let before = project_onto_segment(c(0.0, -0.5), a, b);
        assert_eq!(before.point, a);

        let after = project_onto_segment(c(0.0, 1.5), a, b);
        assert_eq!(after.point, b);

        let beside = project_onto_segment(c(0.1, 0.5), a, b);
        assert_eq!(beside.point, c(0.0, 0.5));
        assert!((beside.distance_m - distance_m(c(0.1, 0.5), c(0.0, 0.5))).abs() < 1e-9);
    }

    #[test]
    fn test_projection_of_point_on_segment_is_exact() {
        let a = c(0.0, 0.0);
        let b = c(0.0, 1.0);
        let projection = project_onto_segment(c(0.0, 0.25), a, b);
        assert_eq!(projection.point, c(0.0, 0.25));
        assert_eq!(projection.distance_m, 0.0);
    }

    #[test]
    fn test_projection_degenerate_segment() {
        let a = c(10.0, 10.0);
        let projection = project_onto_segment(c(10.5, 10.0), a, a);
        assert_eq!(projection.point, a);
        assert!(projection.distance_m > 0.0);
    }

    #[test]
    fn test_crossing_segments_intersect() {
        let hit = segment_intersection(c(0.0, 0.5), c(1.0, 0.5), c(0.5, 0.0), c(0.5, 1.0));
        assert_eq!(hit, Some(c(0.5, 0.5)));
    }

    #[test]
    fn test_endpoint_touch_is_not_an_intersection() {
        let hit = segment_intersection(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(1.0, 1.0));
        assert_eq!(hit, None);
        // T-junction: one segment ends on the interior of the other
        let hit = segment_intersection(c(0.0, 0.0), c(0.0, 2.0), c(0.0, 1.0), c(1.0, 1.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn test_parallel_and_collinear_segments() {
        assert_eq!(
            segment_intersection(c(0.0, 0.0), c(0.0, 1.0), c(1.0, 0.0), c(1.0, 1.0)),
            None
        );
        assert_eq!(
            segment_intersection(c(0.0, 0.0), c(0.0, 2.0), c(0.0, 1.0), c(0.0, 3.0)),
            None
        );
    }

    #[test]
    fn test_disjoint_segments() {
        let hit = segment_intersection(c(0.0, 0.0), c(1.0, 1.0), c(2.0, 0.0), c(3.0, -1.0));
        assert_eq!(hit, None);
    }

    #[test]
    fn test_lies_on_segment() {
        let a = c(0.5, 0.0);
        let b = c(0.5, 1.0);
        assert!(lies_on_segment(c(0.5, 0.5), a, b, 1e-9));
        assert!(lies_on_segment(a, a, b, 1e-9));
        assert!(!lies_on_segment(c(0.6, 0.5), a, b, 1e-9));
        assert!(!lies_on_segment(c(0.5, 1.5), a, b, 1e-9));
    }

    #[test]
    fn test_path_length_empty_and_single() {
        assert_eq!(path_length_m(&[]), 0.0);
        assert_eq!(path_length_m(&[c(45.0, 5.0)]), 0.0);
    }

    mod proptests {
        use super::*;
        use crate::graph::DEFAULT_ON_SEGMENT_EPSILON;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| Coordinate { lat, lng })
        }

        // near the equator degree space is close to isotropic
        fn campus_coord() -> impl Strategy<Value = Coordinate> {
            (0.0..0.01, 5.0..5.01).prop_map(|(lat, lng)| Coordinate { lat, lng })
        }

        proptest! {
            #[test]
            fn prop_distance_non_negative(a in valid_coord(), b in valid_coord()) {
                prop_assert!(distance_m(a, b) >= 0.0);
            }

            #[test]
            fn prop_distance_symmetric(a in valid_coord(), b in valid_coord()) {
                prop_assert!((distance_m(a, b) - distance_m(b, a)).abs() < 1e-6);
            }

            #[test]
            fn prop_distance_same_point_is_zero(coord in valid_coord()) {
                prop_assert_eq!(distance_m(coord, coord), 0.0);
            }

            #[test]
            fn prop_distance_bounded_by_half_circumference(a in valid_coord(), b in valid_coord()) {
                let max_distance = std::f64::consts::PI * EARTH_RADIUS_M;
                prop_assert!(distance_m(a, b) <= max_distance + 1.0);
            }

            #[test]
            fn prop_collinear_distances_add_up(
                lng in -180.0..180.0f64,
                lat_a in -10.0..0.0f64,
                lat_c in 0.0..10.0f64,
                t in 0.0..1.0f64,
            ) {
                // points on a meridian lie on one great circle
                let a = Coordinate { lat: lat_a, lng };
                let c = Coordinate { lat: lat_c, lng };
                let b = a.interpolate(c, t);
                let sum = distance_m(a, b) + distance_m(b, c);
                prop_assert!((sum - distance_m(a, c)).abs() < 1e-3);
            }

            #[test]
            fn prop_bearing_in_range(a in valid_coord(), b in valid_coord()) {
                let bearing = bearing_deg(a, b);
                prop_assert!((0.0..360.0).contains(&bearing));
            }

            #[test]
            fn prop_projection_no_farther_than_endpoints(
                p in campus_coord(),
                a in campus_coord(),
                b in campus_coord(),
            ) {
                let projection = project_onto_segment(p, a, b);
                let slack = 0.01;
                prop_assert!(projection.distance_m <= distance_m(p, a) + slack);
                prop_assert!(projection.distance_m <= distance_m(p, b) + slack);
            }

            #[test]
            fn prop_intersection_lies_on_both_segments(
                p1 in campus_coord(),
                p2 in campus_coord(),
                p3 in campus_coord(),
                p4 in campus_coord(),
            ) {
                if let Some(hit) = segment_intersection(p1, p2, p3, p4) {
                    prop_assert!(lies_on_segment(hit, p1, p2, DEFAULT_ON_SEGMENT_EPSILON));
                    prop_assert!(lies_on_segment(hit, p3, p4, DEFAULT_ON_SEGMENT_EPSILON));
                }
            }
        }
    }
}
