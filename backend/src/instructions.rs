use std::fmt;

use crate::{
    geometry::{bearing_deg, distance_m},
    graph::NodeKey,
    models::Coordinate,
};

pub const ARRIVAL_INSTRUCTION: &str = "You will arrive at your destination.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Rounds a bearing to the nearest of the eight 45° sectors.
    pub fn from_bearing(bearing: f64) -> Self {
        let sector = (bearing.rem_euclid(360.0) / 45.0).round() as usize % 8;
        Self::ALL[sector]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassDirection::North => "North",
            CompassDirection::NorthEast => "North-East",
            CompassDirection::East => "East",
            CompassDirection::SouthEast => "South-East",
            CompassDirection::South => "South",
            CompassDirection::SouthWest => "South-West",
            CompassDirection::West => "West",
            CompassDirection::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of the turn made at an interior waypoint.
///
/// Thresholds are inclusive toward the sharper maneuver: exactly 45° is a
/// full right turn, exactly 15° a slight right, exactly 135° a U-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Straight,
    SlightRight,
    Right,
    SlightLeft,
    Left,
    UTurn,
}

impl Maneuver {
    pub fn from_turn_angle(angle: f64) -> Self {
        if angle.abs() >= 135.0 {
            Maneuver::UTurn
        } else if angle >= 45.0 {
            Maneuver::Right
        } else if angle >= 15.0 {
            Maneuver::SlightRight
        } else if angle <= -45.0 {
            Maneuver::Left
        } else if angle <= -15.0 {
            Maneuver::SlightLeft
        } else {
            Maneuver::Straight
        }
    }

    /// Spoken phrase, or `None` when the route simply carries on.
    pub fn phrase(&self) -> Option<&'static str> {
        match self {
            Maneuver::Straight => None,
            Maneuver::SlightRight => Some("Make a slight right"),
            Maneuver::Right => Some("Turn right"),
            Maneuver::SlightLeft => Some("Make a slight left"),
            Maneuver::Left => Some("Turn left"),
            Maneuver::UTurn => Some("Make a U-turn"),
        }
    }
}

/// Signed change of heading, normalized to `(-180, 180]`; positive is a
/// clockwise (right) turn.
pub fn turn_angle(bearing_in: f64, bearing_out: f64) -> f64 {
    let mut angle = (bearing_out - bearing_in) % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// "123 m" below one kilometre, "1.2 km" above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1_000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}

enum Step {
    Depart(CompassDirection),
    Turn(&'static str),
}

impl Step {
    fn render(&self, leg_m: f64) -> String {
        let meters = leg_m.round() as i64;
        match self {
            Step::Depart(direction) => format!("Head {direction} for {meters} m."),
            Step::Turn(phrase) => format!("{phrase}, then continue for {meters} m."),
        }
    }
}

/// Turn-by-turn directions along a waypoint path.
///
/// Each instruction quotes the length of the leg that follows it: the first
/// leg for the departure, the leg after the turn for each maneuver.
/// Straight-through waypoints produce no instruction.
pub fn route_instructions(waypoints: &[Coordinate]) -> Vec<String> {
    let legs: Vec<(f64, f64)> = waypoints
        .windows(2)
        .filter(|pair| NodeKey::of(pair[0]) != NodeKey::of(pair[1]))
        .map(|pair| (bearing_deg(pair[0], pair[1]), distance_m(pair[0], pair[1])))
        .collect();

    let Some(&(first_bearing, first_length)) = legs.first() else {
        return vec![ARRIVAL_INSTRUCTION.to_string()];
    };

    let mut instructions = Vec::with_capacity(legs.len() + 1);
    instructions.push(Step::Depart(CompassDirection::from_bearing(first_bearing)).render(first_length));

    for pair in legs.windows(2) {
        let (bearing_in, _) = pair[0];
        let (bearing_out, length) = pair[1];
        if let Some(phrase) = Maneuver::from_turn_angle(turn_angle(bearing_in, bearing_out)).phrase() {
            instructions.push(Step::Turn(phrase).render(length));
        }
    }

    instructions.push(ARRIVAL_INSTRUCTION.to_string());
    instructions
}

/// Single instruction for a route that ignores the road network.
pub fn straight_line_instructions(start: Coordinate, dest: Coordinate) -> Vec<String> {
    if NodeKey::of(start) == NodeKey::of(dest) {
        return vec![ARRIVAL_INSTRUCTION.to_string()];
    }
    let direction = CompassDirection::from_bearing(bearing_deg(start, dest));
    vec![format!(
        "Head {direction} towards destination ({})",
        format_distance(distance_m(start, dest))
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn test_compass_rounding() {
        assert_eq!(CompassDirection::from_bearing(0.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(22.4), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(22.6), CompassDirection::NorthEast);
        assert_eq!(CompassDirection::from_bearing(90.0), CompassDirection::East);
        assert_eq!(CompassDirection::from_bearing(200.0), CompassDirection::South);
        assert_eq!(CompassDirection::from_bearing(337.6), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(315.0).to_string(), "North-West");
    }

    #[test]
    fn test_turn_angle_normalization() {
        assert_eq!(turn_angle(350.0, 10.0), 20.0);
        assert_eq!(turn_angle(10.0, 350.0), -20.0);
        assert_eq!(turn_angle(0.0, 180.0), 180.0);
        assert_eq!(turn_angle(180.0, 0.0), 180.0);
        assert_eq!(turn_angle(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_maneuver_thresholds_are_inclusive() {
        assert_eq!(Maneuver::from_turn_angle(45.0), Maneuver::Right);
        assert_eq!(Maneuver::from_turn_angle(44.9), Maneuver::SlightRight);
        assert_eq!(Maneuver::from_turn_angle(15.0), Maneuver::SlightRight);
        assert_eq!(Maneuver::from_turn_angle(14.9), Maneuver::Straight);
        assert_eq!(Maneuver::from_turn_angle(-45.0), Maneuver::Left);
        assert_eq!(Maneuver::from_turn_angle(-15.0), Maneuver::SlightLeft);
        assert_eq!(Maneuver::from_turn_angle(-14.9), Maneuver::Straight);
        assert_eq!(Maneuver::from_turn_angle(135.0), Maneuver::UTurn);
        assert_eq!(Maneuver::from_turn_angle(-135.0), Maneuver::UTurn);
        assert_eq!(Maneuver::from_turn_angle(134.9), Maneuver::Right);
        assert_eq!(Maneuver::from_turn_angle(180.0), Maneuver::UTurn);
    }

    #[test]
    fn test_single_leg_instructions() {
        let instructions = route_instructions(&[c(0.0, 0.0), c(0.0, 1.0)]);
        assert_eq!(
            instructions,
            vec!["Head East for 111195 m.".to_string(), ARRIVAL_INSTRUCTION.to_string()]
        );
    }

    #[test]
    fn test_left_turn_instruction() {
        // east along the equator, then north
        let instructions = route_instructions(&[c(0.0, 0.0), c(0.0, 0.001), c(0.001, 0.001)]);
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[0], "Head East for 111 m.");
        assert_eq!(instructions[1], "Turn left, then continue for 111 m.");
        assert_eq!(instructions[2], ARRIVAL_INSTRUCTION);
    }

    #[test]
    fn test_right_turn_and_u_turn() {
        let instructions = route_instructions(&[
            c(0.0, 0.0),
            c(0.001, 0.0),
            c(0.001, 0.001),
            c(0.001, 0.0),
        ]);
        assert_eq!(instructions[0], "Head North for 111 m.");
        assert_eq!(instructions[1], "Turn right, then continue for 111 m.");
        assert_eq!(instructions[2], "Make a U-turn, then continue for 111 m.");
        assert_eq!(instructions[3], ARRIVAL_INSTRUCTION);
    }

    #[test]
    fn test_straight_through_waypoints_are_silent() {
        let instructions = route_instructions(&[c(0.0, 0.0), c(0.0, 0.001), c(0.0, 0.002)]);
        assert_eq!(
            instructions,
            vec!["Head East for 111 m.".to_string(), ARRIVAL_INSTRUCTION.to_string()]
        );
    }

    #[test]
    fn test_distances_quote_the_following_leg() {
        // east 111 m, straight on 111 m, then north 222 m in one leg
        let instructions = route_instructions(&[
            c(0.0, 0.0),
            c(0.0, 0.001),
            c(0.0, 0.002),
            c(0.002, 0.002),
        ]);
        assert_eq!(
            instructions,
            vec![
                "Head East for 111 m.".to_string(),
                "Turn left, then continue for 222 m.".to_string(),
                ARRIVAL_INSTRUCTION.to_string(),
            ]
        );
    }

    #[test]
    fn test_single_waypoint_only_arrives() {
        assert_eq!(route_instructions(&[c(1.0, 1.0)]), vec![ARRIVAL_INSTRUCTION]);
        assert_eq!(route_instructions(&[]), vec![ARRIVAL_INSTRUCTION]);
    }

    #[test]
    fn test_straight_line_instruction() {
        let instructions = straight_line_instructions(c(0.0, 0.0), c(0.0, 0.001));
        assert_eq!(instructions, vec!["Head East towards destination (111 m)"]);

        let instructions = straight_line_instructions(c(0.0, 0.0), c(0.1, 0.0));
        assert_eq!(instructions, vec!["Head North towards destination (11.1 km)"]);

        let instructions = straight_line_instructions(c(3.0, 3.0), c(3.0, 3.0));
        assert_eq!(instructions, vec![ARRIVAL_INSTRUCTION]);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1_260.0), "1.3 km");
    }
}
