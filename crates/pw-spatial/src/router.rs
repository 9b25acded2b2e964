//! Routing trait and the default A* implementation.
//!
//! # Pluggability
//!
//! The detection engine calls routing via the [`Router`] trait, so
//! applications can swap in custom implementations (bidirectional search,
//! contraction hierarchies, congestion-aware variants) without touching the
//! engine.  The default [`AStarRouter`] matches the established search
//! behavior exactly, tie-breaks included.
//!
//! # Outcome encoding
//!
//! `Ok(Some(route))` — path found.  `Ok(None)` — no path within the
//! iteration bound, or a disconnected graph; a normal outcome.  `Err(..)` —
//! the network itself is malformed (unknown endpoint, adjacency
//! inconsistency during reconstruction).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use pw_core::{GeoPoint, NodeId, SegmentId};

use crate::graph::RoadGraph;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a successful routing query.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Visited nodes in order, start and goal included.
    pub nodes: Vec<NodeId>,
    /// Segments connecting consecutive nodes; empty for a trivial route.
    pub segments: Vec<SegmentId>,
    /// Sum of segment lengths in metres.
    pub total_distance_m: f64,
    /// Sum of traffic-adjusted segment travel times in seconds.
    pub total_time_secs: f64,
}

impl Route {
    /// `true` if start and goal were the same node.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so an engine can move across
/// worker threads together with its router.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to` over the current traffic state.
    fn route(&self, graph: &RoadGraph, from: &NodeId, to: &NodeId)
        -> SpatialResult<Option<Route>>;

    /// Driving distance between two raw coordinates: haversine stitching
    /// from each coordinate to its projected node, plus the route distance
    /// between the nodes.  `Ok(None)` when the nodes are not connected.
    fn road_distance(
        &self,
        graph: &RoadGraph,
        from_coord: GeoPoint,
        to_coord: GeoPoint,
        from_node: &NodeId,
        to_node: &NodeId,
    ) -> SpatialResult<Option<f64>> {
        let Some(route) = self.route(graph, from_node, to_node)? else {
            return Ok(None);
        };
        let from = graph
            .node(from_node)
            .ok_or_else(|| SpatialError::UnknownNode(from_node.clone()))?;
        let to = graph
            .node(to_node)
            .ok_or_else(|| SpatialError::UnknownNode(to_node.clone()))?;
        Ok(Some(
            from_coord.distance_m(from.location)
                + route.total_distance_m
                + to.location.distance_m(to_coord),
        ))
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the node graph with [`Segment::search_cost`] edge weights and a
/// haversine straight-line heuristic.
///
/// The heuristic never overestimates straight-line distance, but the edge
/// cost is time-plus-distance, so it is not a strict lower bound on
/// remaining cost under heavy congestion.  Returned routes are therefore
/// near-optimal rather than guaranteed optimal; this is the established
/// behavior and is preserved deliberately.
///
/// Frontier ordering is `(f_score, node id)` ascending, which makes results
/// fully deterministic across runs.
///
/// [`Segment::search_cost`]: crate::Segment::search_cost
pub struct AStarRouter {
    /// Search cutoff: once this many frontier nodes have been expanded the
    /// goal is reported unreachable.
    pub max_iterations: usize,
}

impl AStarRouter {
    pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

    pub fn new() -> Self {
        Self { max_iterations: Self::DEFAULT_MAX_ITERATIONS }
    }
}

impl Default for AStarRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        from: &NodeId,
        to: &NodeId,
    ) -> SpatialResult<Option<Route>> {
        a_star(graph, from, to, self.max_iterations)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set entry.  Ordered by `f_score` with the node id as secondary key,
/// so equal-cost pops always select the smallest id first.
struct Frontier {
    f_score: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .total_cmp(&other.f_score)
            .then_with(|| self.node.cmp(&other.node))
    }
}

fn a_star(
    graph: &RoadGraph,
    from: &NodeId,
    to: &NodeId,
    max_iterations: usize,
) -> SpatialResult<Option<Route>> {
    graph
        .node(from)
        .ok_or_else(|| SpatialError::UnknownNode(from.clone()))?;
    let goal = graph
        .node(to)
        .ok_or_else(|| SpatialError::UnknownNode(to.clone()))?;

    if from == to {
        return Ok(Some(Route {
            nodes: vec![from.clone()],
            segments: vec![],
            total_distance_m: 0.0,
            total_time_secs: 0.0,
        }));
    }

    let h = |id: &NodeId| -> f64 {
        // Adjacency guarantees every reachable id exists; unreachable ids
        // never enter the frontier.
        graph.node(id).map_or(f64::INFINITY, |n| {
            n.location.distance_m(goal.location)
        })
    };

    let mut g_score: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut f_score: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut came_from: FxHashMap<NodeId, NodeId> = FxHashMap::default();

    let start_f = h(from);
    g_score.insert(from.clone(), 0.0);
    f_score.insert(from.clone(), start_f);

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    let mut open: BinaryHeap<Reverse<Frontier>> = BinaryHeap::new();
    open.push(Reverse(Frontier { f_score: start_f, node: from.clone() }));

    let mut iterations = 0usize;

    while let Some(Reverse(Frontier { f_score: f, node })) = open.pop() {
        iterations += 1;
        if iterations > max_iterations {
            return Ok(None);
        }

        if node == *to {
            return reconstruct(graph, &came_from, from, to).map(Some);
        }

        // Skip stale heap entries superseded by a cheaper path.
        if f > f_score.get(&node).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        let g = g_score.get(&node).copied().unwrap_or(f64::INFINITY);
        for segment in graph.outgoing_segments(&node) {
            let tentative = g + segment.search_cost();
            if tentative < g_score.get(&segment.to).copied().unwrap_or(f64::INFINITY) {
                let neighbor_f = tentative + h(&segment.to);
                came_from.insert(segment.to.clone(), node.clone());
                g_score.insert(segment.to.clone(), tentative);
                f_score.insert(segment.to.clone(), neighbor_f);
                open.push(Reverse(Frontier {
                    f_score: neighbor_f,
                    node: segment.to.clone(),
                }));
            }
        }
    }

    Ok(None)
}

/// Walk `came_from` backward from goal to start, then resolve the connecting
/// segment for each consecutive pair (first match in adjacency order) while
/// accumulating distance and travel time.
fn reconstruct(
    graph: &RoadGraph,
    came_from: &FxHashMap<NodeId, NodeId>,
    from: &NodeId,
    to: &NodeId,
) -> SpatialResult<Route> {
    let mut nodes = vec![to.clone()];
    let mut current = to;
    while current != from {
        let prev = came_from
            .get(current)
            .ok_or_else(|| SpatialError::Reconstruction {
                from: from.clone(),
                to: current.clone(),
            })?;
        nodes.push(prev.clone());
        current = prev;
    }
    nodes.reverse();

    let mut segments = Vec::with_capacity(nodes.len() - 1);
    let mut total_distance_m = 0.0;
    let mut total_time_secs = 0.0;
    for pair in nodes.windows(2) {
        let segment = graph
            .outgoing_segments(&pair[0])
            .find(|s| s.to == pair[1])
            .ok_or_else(|| SpatialError::Reconstruction {
                from: pair[0].clone(),
                to: pair[1].clone(),
            })?;
        segments.push(segment.id.clone());
        total_distance_m += segment.length_m;
        total_time_secs += segment.travel_time_secs();
    }

    Ok(Route { nodes, segments, total_distance_m, total_time_secs })
}
