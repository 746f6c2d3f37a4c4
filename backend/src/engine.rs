use petgraph::{algo::astar, graph::NodeIndex};

use crate::{
    geometry::{distance_m, planar_distance},
    graph::{NodeKey, RoadGraph},
    instructions::route_instructions,
    models::{Coordinate, Road, RouteResult, RouteStatus},
    routing::{collapse_duplicates, estimated_minutes, straight_line_route},
    snapping::{SnappedPoint, find_nearest_road_and_segment},
};

/// Trait for shortest-path algorithms over a [`RoadGraph`].
///
/// Implementations must return `None` when either node is not part of the
/// graph or when `to` cannot be reached from `from`.
pub trait PathFinder: Send + Sync {
    fn find_path(&self, graph: &RoadGraph, from: NodeIndex, to: NodeIndex) -> Option<GraphPath>;
}

/// Node sequence from source to target with its total length.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    pub nodes: Vec<NodeIndex>,
    pub distance_m: f64,
}

/// Dijkstra via petgraph's A* with a zero heuristic; the search stops as soon
/// as the target is settled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl PathFinder for Dijkstra {
    fn find_path(&self, graph: &RoadGraph, from: NodeIndex, to: NodeIndex) -> Option<GraphPath> {
        let inner = graph.inner();
        inner.node_weight(from)?;
        inner.node_weight(to)?;

        let (distance_m, nodes) = astar(
            inner,
            from,
            |finish| finish == to,
            |edge| edge.weight().length_m,
            |_| 0.0,
        )?;

        Some(GraphPath { nodes, distance_m })
    }
}

pub fn shortest_path(graph: &RoadGraph, from: NodeIndex, to: NodeIndex) -> Option<GraphPath> {
    Dijkstra.find_path(graph, from, to)
}

/// Waypoints that follow the road network between two snapped points.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPath {
    pub waypoints: Vec<Coordinate>,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    node: NodeIndex,
    coord: Coordinate,
}

/// Glues snapping, graph search and instruction generation into routes.
#[derive(Debug, Clone, Default)]
pub struct RouteEngine<P = Dijkstra> {
    path_finder: P,
}

impl RouteEngine<Dijkstra> {
    pub fn new() -> Self {
        Self {
            path_finder: Dijkstra,
        }
    }
}

impl<P: PathFinder> RouteEngine<P> {
    pub fn with_path_finder(path_finder: P) -> Self {
        Self { path_finder }
    }

    /// Routes from `start` to `dest` over `roads`, building the graph for this
    /// call only. Never fails: without a usable road path the result is the
    /// straight-line fallback.
    pub fn compute_route(&self, start: Coordinate, dest: Coordinate, roads: &[Road]) -> RouteResult {
        if roads.is_empty() {
            tracing::debug!("no roads available, using straight line");
            return straight_line_route(start, dest);
        }
        let graph = RoadGraph::build(roads);
        self.compute_route_with_graph(start, dest, roads, &graph)
    }

    /// Same as [`RouteEngine::compute_route`] with a prebuilt graph, which must
    /// have been built from the same `roads` slice.
    pub fn compute_route_with_graph(
        &self,
        start: Coordinate,
        dest: Coordinate,
        roads: &[Road],
        graph: &RoadGraph,
    ) -> RouteResult {
        match self.route_along_roads(start, dest, roads, graph) {
            Some(path) if path.waypoints.len() >= 2 => {
                let instructions = route_instructions(&path.waypoints);
                RouteResult {
                    estimated_minutes: estimated_minutes(path.distance_m),
                    distance_m: path.distance_m,
                    waypoints: path.waypoints,
                    instructions,
                    status: RouteStatus::RoadRouted,
                }
            }
            _ => {
                tracing::debug!(?start, ?dest, "no road path, using straight line");
                straight_line_route(start, dest)
            }
        }
    }

    /// Cheapest road path between the snapped endpoints, or `None` when the
    /// endpoints cannot be snapped or are not connected.
    pub fn route_along_roads(
        &self,
        start: Coordinate,
        dest: Coordinate,
        roads: &[Road],
        graph: &RoadGraph,
    ) -> Option<RoadPath> {
        let start_snap = find_nearest_road_and_segment(start, roads)?;
        let dest_snap = find_nearest_road_and_segment(dest, roads)?;

        let start_candidates = candidate_nodes(graph, &start_snap);
        let dest_candidates = candidate_nodes(graph, &dest_snap);

        let mut best: Option<RoadPath> = None;
        for from in &start_candidates {
            for to in &dest_candidates {
                let Some(path) = self.path_finder.find_path(graph, from.node, to.node) else {
                    continue;
                };
                let total = distance_m(start_snap.point, from.coord)
                    + path.distance_m
                    + distance_m(to.coord, dest_snap.point);
                if best.as_ref().map_or(true, |current| total < current.distance_m) {
                    let mut waypoints = Vec::with_capacity(path.nodes.len() + 2);
                    waypoints.push(start_snap.point);
                    waypoints.extend(path.nodes.iter().filter_map(|&node| graph.coord(node)));
                    waypoints.push(dest_snap.point);
                    best = Some(RoadPath {
                        waypoints,
                        distance_m: total,
                    });
                }
            }
        }

        if start_snap.same_segment(&dest_snap) {
            let direct = distance_m(start_snap.point, dest_snap.point);
            if best.as_ref().map_or(true, |current| direct < current.distance_m) {
                best = Some(RoadPath {
                    waypoints: vec![start_snap.point, dest_snap.point],
                    distance_m: direct,
                });
            }
        }

        if let Some(path) = &best {
            tracing::debug!(
                start_road = %start_snap.road.id,
                dest_road = %dest_snap.road.id,
                distance_m = path.distance_m,
                waypoints = path.waypoints.len(),
                "road path found"
            );
        }

        best.map(|path| RoadPath {
            waypoints: collapse_duplicates(path.waypoints),
            distance_m: path.distance_m,
        })
    }
}

/// Free-function form of [`RouteEngine::compute_route`] with Dijkstra.
pub fn compute_route(start: Coordinate, dest: Coordinate, roads: &[Road]) -> RouteResult {
    RouteEngine::new().compute_route(start, dest, roads)
}

/// Graph nodes from which a snapped point enters the network.
///
/// These are the two nodes bracketing the snapped point along its original
/// segment; when the segment was never split they are its endpoints.
fn candidate_nodes(graph: &RoadGraph, snap: &SnappedPoint<'_>) -> Vec<Candidate> {
    let (segment_start, segment_end) = snap.segment;

    if let Some(chain) = graph
        .segment_nodes(snap.road_index, snap.segment_index)
        .filter(|chain| chain_matches(graph, chain, segment_start, segment_end))
    {
        let offset = planar_distance(segment_start, snap.point);
        let upper = chain
            .iter()
            .position(|&node| {
                graph
                    .coord(node)
                    .is_some_and(|coord| planar_distance(segment_start, coord) >= offset)
            })
            .unwrap_or(chain.len() - 1)
            .max(1);
        return [chain[upper - 1], chain[upper]]
            .into_iter()
            .filter_map(|node| graph.coord(node).map(|coord| Candidate { node, coord }))
            .collect();
    }

    [segment_start, segment_end]
        .into_iter()
        .filter_map(|coord| graph.node_index(NodeKey::of(coord)))
        .filter_map(|node| graph.coord(node).map(|coord| Candidate { node, coord }))
        .collect()
}

fn chain_matches(graph: &RoadGraph, chain: &[NodeIndex], start: Coordinate, end: Coordinate) -> bool {
    let key_at = |node: Option<&NodeIndex>| node.and_then(|&n| graph.node(n)).map(|n| n.key);
    chain.len() >= 2
        && key_at(chain.first()) == Some(NodeKey::of(start))
        && key_at(chain.last()) == Some(NodeKey::of(end))
}
