use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;

use crate::{
    geometry::{distance_m, lies_on_segment, planar_distance, segment_intersection},
    models::{Coordinate, Road},
};

/// Micro-degrees per degree used for node identity.
pub const NODE_KEY_SCALE: f64 = 1_000_000.0;

/// Default tolerance (in degrees) of the "node lies on segment" test, about
/// 1e-6 m of path excess. On a 500 m segment it accepts nodes within roughly
/// 2 cm of the line.
pub const DEFAULT_ON_SEGMENT_EPSILON: f64 = 1e-11;

/// Identity of a graph node: its coordinate rounded to a micro-degree grid.
///
/// Coordinates closer than half a micro-degree on both axes (about 5.6 cm of
/// latitude) share a key and therefore a node. Key equality is exact; there is
/// no proximity search beyond the rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    lat_micro: i64,
    lng_micro: i64,
}

impl NodeKey {
    pub fn of(coord: Coordinate) -> Self {
        Self {
            lat_micro: (coord.lat * NODE_KEY_SCALE).round() as i64,
            lng_micro: (coord.lng * NODE_KEY_SCALE).round() as i64,
        }
    }
}

impl From<Coordinate> for NodeKey {
    fn from(coord: Coordinate) -> Self {
        Self::of(coord)
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub key: NodeKey,
    pub coord: Coordinate,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub length_m: f64,
    /// Road the edge was cut from; the first road wins where roads overlap.
    pub road_id: String,
}

/// Routable graph synthesized from free-form road polylines.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    graph: UnGraph<GraphNode, GraphEdge>,
    index: HashMap<NodeKey, NodeIndex>,
    /// `segment_chains[road][segment]`: nodes along that original segment,
    /// ordered from its first vertex to its second.
    segment_chains: Vec<Vec<Vec<NodeIndex>>>,
}

impl RoadGraph {
    /// Builds a graph with the default configuration.
    pub fn build(roads: &[Road]) -> Self {
        GraphBuilder::default().build(roads)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_index(&self, key: NodeKey) -> Option<NodeIndex> {
        self.index.get(&key).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    pub fn coord(&self, idx: NodeIndex) -> Option<Coordinate> {
        self.node(idx).map(|node| node.coord)
    }

    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&GraphEdge> {
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Ordered nodes along segment `segment` of the `road`-th road.
    pub fn segment_nodes(&self, road: usize, segment: usize) -> Option<&[NodeIndex]> {
        self.segment_chains
            .get(road)
            .and_then(|segments| segments.get(segment))
            .map(Vec::as_slice)
    }

    pub fn inner(&self) -> &UnGraph<GraphNode, GraphEdge> {
        &self.graph
    }

    fn add_node(&mut self, coord: Coordinate) -> NodeIndex {
        let key = NodeKey::of(coord);
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode { key, coord });
        self.index.insert(key, idx);
        idx
    }

    fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, road_id: &str) {
        if a == b || self.graph.find_edge(a, b).is_some() {
            return;
        }
        let length_m = distance_m(self.graph[a].coord, self.graph[b].coord);
        self.graph.add_edge(
            a,
            b,
            GraphEdge {
                length_m,
                road_id: road_id.to_string(),
            },
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GraphBuilderConfig {
    /// Tolerance in degrees of the collinearity test used to split segments.
    pub on_segment_epsilon: f64,
}

impl Default for GraphBuilderConfig {
    fn default() -> Self {
        Self {
            on_segment_epsilon: DEFAULT_ON_SEGMENT_EPSILON,
        }
    }
}

impl GraphBuilderConfig {
    pub fn with_on_segment_epsilon(mut self, epsilon: f64) -> Self {
        self.on_segment_epsilon = epsilon;
        self
    }
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphBuilderConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphBuilderConfig) -> Self {
        Self { config }
    }

    /// Turns road polylines into a graph, splitting segments wherever two
    /// roads cross or a node of another road lies on them.
    pub fn build(&self, roads: &[Road]) -> RoadGraph {
        let mut graph = RoadGraph::default();

        for road in roads {
            for &coord in &road.coordinates {
                graph.add_node(coord);
            }
        }

        let crossings = find_crossings(roads);
        for &crossing in &crossings {
            graph.add_node(crossing);
        }

        let chains: Vec<Vec<Vec<NodeIndex>>> = roads
            .iter()
            .map(|road| {
                road.segments()
                    .map(|(start, end)| self.split_segment(&mut graph, road, start, end))
                    .collect()
            })
            .collect();
        graph.segment_chains = chains;

        tracing::debug!(
            roads = roads.len(),
            crossings = crossings.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built road graph"
        );

        graph
    }

    fn split_segment(
        &self,
        graph: &mut RoadGraph,
        road: &Road,
        start: Coordinate,
        end: Coordinate,
    ) -> Vec<NodeIndex> {
        let epsilon = self.config.on_segment_epsilon;
        let start_idx = graph.add_node(start);
        let end_idx = graph.add_node(end);

        let mut chain = vec![(0.0, start_idx)];
        chain.extend(
            graph
                .graph
                .node_indices()
                .filter(|&idx| idx != start_idx && idx != end_idx)
                .filter(|&idx| lies_on_segment(graph.graph[idx].coord, start, end, epsilon))
                .map(|idx| (planar_distance(start, graph.graph[idx].coord), idx)),
        );
        chain.push((planar_distance(start, end), end_idx));
        // stable sort keeps the start vertex first among equal offsets
        chain.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut nodes: Vec<NodeIndex> = chain.into_iter().map(|(_, idx)| idx).collect();
        nodes.dedup();

        for pair in nodes.windows(2) {
            graph.add_edge(pair[0], pair[1], &road.id);
        }
        nodes
    }
}

/// Interior crossings between segments of distinct roads, in road order.
fn find_crossings(roads: &[Road]) -> Vec<Coordinate> {
    (0..roads.len())
        .into_par_iter()
        .flat_map_iter(move |i| {
            roads[i + 1..].iter().flat_map(move |other| {
                roads[i].segments().flat_map(move |(p1, p2)| {
                    other
                        .segments()
                        .filter_map(move |(p3, p4)| segment_intersection(p1, p2, p3, p4))
                })
            })
        })
        .collect()
}
