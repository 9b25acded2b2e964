//! Road network representation and construction.
//!
//! # Data layout
//!
//! Nodes, segments, and the adjacency index all live in `BTreeMap`s keyed by
//! their string ids.  Ascending-key iteration is part of the contract:
//! nearest-node ties, pedestrian pass order, and the A* tie-break all lean on
//! it for run-to-run reproducibility.  At the scale this stack targets (a
//! city district, thousands of nodes) the tree overhead is irrelevant next
//! to the haversine math.
//!
//! # Bidirectional roads
//!
//! A segment declared two-way (and not one-way) is materialized as **two
//! independent directed segments**: construction synthesizes the reverse
//! with a `-rev`-suffixed id and the forward segment's name, length, speed
//! limit, and traffic condition at that moment.  Later traffic updates apply
//! uniformly to all segments, never per-pair.

use std::collections::BTreeMap;

use pw_core::{GeoPoint, NodeId, SegmentId, Timestamp};

use crate::traffic::TrafficCondition;
use crate::{SpatialError, SpatialResult};

// ── Node ──────────────────────────────────────────────────────────────────────

/// An intersection or point of interest.  Immutable after insertion apart
/// from the display-only `pedestrian_count`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    /// Display name ("5th & Main").
    pub name: String,
    pub location: GeoPoint,
    pub is_major_intersection: bool,
    pub has_signal: bool,
    /// Display counter maintained by UI layers; no algorithmic meaning.
    pub pedestrian_count: u32,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            is_major_intersection: false,
            has_signal: false,
            pedestrian_count: 0,
        }
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// A directed, weighted road segment.
///
/// `condition` and `vehicle_count` are the only mutable attributes; both are
/// overwritten wholesale by [`RoadGraph::update_traffic`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub id: SegmentId,
    pub from: NodeId,
    pub to: NodeId,
    /// Road name; matched against the traffic rules' major-road substrings.
    pub name: String,
    /// Physical length in metres (non-negative).
    pub length_m: f64,
    /// Free-flow speed limit in km/h (positive).
    pub speed_limit_kmh: f64,
    pub condition: TrafficCondition,
    /// Informational congestion counter set by the traffic model.
    pub vehicle_count: u32,
    /// Declared two-way: construction synthesizes the reverse segment.
    pub bidirectional: bool,
    /// Declared one-way: suppresses reverse synthesis even when
    /// `bidirectional` is set.
    pub one_way: bool,
}

impl Segment {
    /// A plain directed segment under free-flow traffic.
    pub fn new(
        id: impl Into<SegmentId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        name: impl Into<String>,
        length_m: f64,
        speed_limit_kmh: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            name: name.into(),
            length_m,
            speed_limit_kmh,
            condition: TrafficCondition::Free,
            vehicle_count: 0,
            bidirectional: false,
            one_way: false,
        }
    }

    /// Declare the segment two-way; [`RoadGraph::add_segment`] will
    /// materialize the reverse direction.
    pub fn two_way(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    /// The synthesized opposite direction: swapped endpoints, `-rev` id,
    /// everything else copied as of this moment.
    fn reversed(&self) -> Segment {
        Segment {
            id: self.id.reversed(),
            from: self.to.clone(),
            to: self.from.clone(),
            ..self.clone()
        }
    }

    // ── Cost model ────────────────────────────────────────────────────────

    /// Speed limit scaled by the current traffic condition.
    #[inline]
    pub fn effective_speed_kmh(&self) -> f64 {
        self.speed_limit_kmh * self.condition.speed_factor()
    }

    /// Seconds to traverse the segment at its effective speed.  Infinite
    /// when the effective speed is zero (fully impassable).
    pub fn travel_time_secs(&self) -> f64 {
        let speed_mps = self.effective_speed_kmh() * (1_000.0 / 3_600.0);
        if speed_mps <= 0.0 {
            f64::INFINITY
        } else {
            self.length_m / speed_mps
        }
    }

    /// A* edge weight: travel time plus a small fixed distance penalty that
    /// biases the search toward shorter routes among similar-time
    /// alternatives.
    #[inline]
    pub fn search_cost(&self) -> f64 {
        self.travel_time_secs() + self.length_m / 100.0
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// The full road network: nodes, directed segments, and an adjacency index
/// mapping each node to its ordered outgoing segment ids.
///
/// Invariants (enforced at insertion):
/// - every segment's endpoints exist as nodes;
/// - every adjacency entry under node X lists only segments whose `from` is X;
/// - ids are unique (duplicate insertion is rejected, not overwritten).
#[derive(Debug, Default)]
pub struct RoadGraph {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) segments: BTreeMap<SegmentId, Segment>,
    pub(crate) adjacency: BTreeMap<NodeId, Vec<SegmentId>>,
    pub(crate) last_traffic_update: Option<Timestamp>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Insert a node and initialize its empty outgoing-segment list.
    pub fn add_node(&mut self, node: Node) -> SpatialResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(SpatialError::DuplicateEntity {
                kind: "node",
                id: node.id.0.clone(),
            });
        }
        self.adjacency.insert(node.id.clone(), Vec::new());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert a segment, index it under its origin node, and synthesize the
    /// reverse direction for two-way roads.
    pub fn add_segment(&mut self, segment: Segment) -> SpatialResult<()> {
        let reverse = (segment.bidirectional && !segment.one_way).then(|| segment.reversed());
        self.insert_directed(segment)?;
        if let Some(rev) = reverse {
            self.insert_directed(rev)?;
        }
        Ok(())
    }

    /// Insert one directed segment without reverse synthesis.
    fn insert_directed(&mut self, segment: Segment) -> SpatialResult<()> {
        if !self.nodes.contains_key(&segment.from) {
            return Err(SpatialError::UnknownNode(segment.from.clone()));
        }
        if !self.nodes.contains_key(&segment.to) {
            return Err(SpatialError::UnknownNode(segment.to.clone()));
        }
        if self.segments.contains_key(&segment.id) {
            return Err(SpatialError::DuplicateEntity {
                kind: "segment",
                id: segment.id.0.clone(),
            });
        }

        let outgoing = self.adjacency.entry(segment.from.clone()).or_default();
        // Idempotent append: re-indexing an existing id is a no-op.
        if !outgoing.contains(&segment.id) {
            outgoing.push(segment.id.clone());
        }
        self.segments.insert(segment.id.clone(), segment);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn segment(&self, id: &SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All segments in ascending id order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Segments reachable in one hop from `node`, in adjacency order.
    /// Empty for a leaf or unknown node — never an error.
    pub fn outgoing_segments<'a>(
        &'a self,
        node: &NodeId,
    ) -> impl Iterator<Item = &'a Segment> + 'a {
        self.adjacency
            .get(node)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.segments.get(id))
    }

    /// Nearest node to `point` by haversine distance.
    ///
    /// Deterministic linear scan in ascending id order; the strict `<`
    /// comparison keeps the smallest-id node on exact ties.  Returns `None`
    /// only for an empty network.
    pub fn nearest_node(&self, point: GeoPoint) -> Option<NodeId> {
        let mut best: Option<(&NodeId, f64)> = None;
        for node in self.nodes.values() {
            let d = point.distance_m(node.location);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((&node.id, d));
            }
        }
        best.map(|(id, _)| id.clone())
    }

    /// Timestamp of the most recent [`update_traffic`](Self::update_traffic)
    /// call, if any.
    pub fn last_traffic_update(&self) -> Option<Timestamp> {
        self.last_traffic_update
    }

    // ── Display counters ──────────────────────────────────────────────────

    /// Bump the display-only pedestrian counter on `node`.  Unknown ids are
    /// ignored; the counter has no algorithmic meaning.
    pub fn bump_pedestrian_count(&mut self, node: &NodeId) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.pedestrian_count += 1;
        }
    }

    /// Zero every node's pedestrian counter.
    pub fn reset_pedestrian_counts(&mut self) {
        for n in self.nodes.values_mut() {
            n.pedestrian_count = 0;
        }
    }
}
