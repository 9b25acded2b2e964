//! The `ProximityEngine` struct and its detection pass.

use std::collections::BTreeMap;

use log::{debug, warn};

use pw_core::{GeoPoint, NodeId, PedestrianId, SpawnRng};
use pw_spatial::{RoadGraph, Router};

use crate::collaborators::{RoadSnapper, VehicleReporter};
use crate::{
    Alert, EngineConfig, EngineError, EngineResult, Pedestrian, PositionSample, PositionSlot,
    ProximityObserver,
};

/// The proximity detection engine.
///
/// `ProximityEngine<R>` owns the road graph and all pedestrian state; no
/// other component holds a mutable reference to either.  Every pass takes
/// `&mut self`, so two passes can never mutate the pedestrian collection
/// concurrently — the coalescing [`PositionSlot`] is the only buffering
/// between an async position source and the single detection worker.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct ProximityEngine<R: Router> {
    /// The road network.  Public so callers can apply
    /// [`RoadGraph::update_traffic`] between passes; `&mut` access
    /// guarantees no search is in flight during the overwrite.
    pub graph: RoadGraph,

    /// The routing algorithm.
    pub router: R,

    pub config: EngineConfig,

    /// Tracked pedestrians keyed by id; `BTreeMap` gives every pass the same
    /// ascending evaluation order.
    pub(crate) pedestrians: BTreeMap<PedestrianId, Pedestrian>,

    /// Deterministic RNG for spawn-position selection.
    pub(crate) rng: SpawnRng,

    /// Monotonic counter feeding spawned pedestrian ids.
    pub(crate) spawn_seq: u64,

    pub(crate) snapper: Option<Box<dyn RoadSnapper>>,
    pub(crate) reporter: Option<Box<dyn VehicleReporter>>,
}

impl<R: Router> ProximityEngine<R> {
    // ── Pedestrian lifecycle ──────────────────────────────────────────────

    /// Track an explicitly constructed pedestrian.
    pub fn track(&mut self, pedestrian: Pedestrian) -> EngineResult<()> {
        if self.pedestrians.contains_key(&pedestrian.id) {
            return Err(EngineError::DuplicatePedestrian(pedestrian.id));
        }
        self.pedestrians.insert(pedestrian.id.clone(), pedestrian);
        Ok(())
    }

    /// Spawn up to `count` pedestrians at randomly chosen road-node
    /// locations inside the configured spawn bounds.
    ///
    /// Returns the new ids (fewer than `count` only when the graph has no
    /// eligible nodes, in which case none are spawned).
    pub fn spawn_pedestrians(&mut self, count: usize) -> Vec<PedestrianId> {
        let candidates: Vec<(NodeId, GeoPoint)> = self
            .graph
            .nodes()
            .filter(|n| self.config.spawn_bounds.contains(n.location))
            .map(|n| (n.id.clone(), n.location))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                // Non-empty slice, so choose never returns None.
                let (node, location) =
                    self.rng.choose(&candidates).unwrap_or(&candidates[0]).clone();
                self.graph.bump_pedestrian_count(&node);
                self.spawn_at(location)
            })
            .collect()
    }

    /// Spawn up to `count` pedestrians around `anchor`: one at each
    /// destination node of the segments leaving the node nearest the anchor,
    /// cycling when `count` exceeds the out-degree.  A node with no outgoing
    /// segments hosts all of them itself.
    pub fn spawn_near(&mut self, anchor: GeoPoint, count: usize) -> Vec<PedestrianId> {
        let Some(near) = self.graph.nearest_node(anchor) else {
            return Vec::new();
        };
        let destinations: Vec<(NodeId, GeoPoint)> = self
            .graph
            .outgoing_segments(&near)
            .filter_map(|s| self.graph.node(&s.to))
            .map(|n| (n.id.clone(), n.location))
            .collect();
        let fallback = self
            .graph
            .node(&near)
            .map(|n| (n.id.clone(), n.location))
            .unwrap_or((near.clone(), anchor));

        (0..count)
            .map(|i| {
                let (node, location) = if destinations.is_empty() {
                    fallback.clone()
                } else {
                    destinations[i % destinations.len()].clone()
                };
                self.graph.bump_pedestrian_count(&node);
                self.spawn_at(location)
            })
            .collect()
    }

    fn spawn_at(&mut self, location: GeoPoint) -> PedestrianId {
        self.spawn_seq += 1;
        let id = PedestrianId::new(format!("ped-{}", self.spawn_seq));
        self.pedestrians
            .insert(id.clone(), Pedestrian::new(id.clone(), location));
        id
    }

    /// Remove every tracked pedestrian and zero the node display counters.
    pub fn clear_all(&mut self) {
        self.pedestrians.clear();
        self.graph.reset_pedestrian_counts();
    }

    // ── Snapshot queries ──────────────────────────────────────────────────

    pub fn pedestrian_count(&self) -> usize {
        self.pedestrians.len()
    }

    pub fn pedestrian(&self, id: &PedestrianId) -> Option<&Pedestrian> {
        self.pedestrians.get(id)
    }

    /// Snapshot of all tracked pedestrians in ascending id order.
    pub fn pedestrians(&self) -> Vec<Pedestrian> {
        self.pedestrians.values().cloned().collect()
    }

    /// Snapshot of the pedestrians currently within the alert threshold.
    pub fn detected_pedestrians(&self) -> Vec<Pedestrian> {
        self.pedestrians
            .values()
            .filter(|p| p.detected)
            .cloned()
            .collect()
    }

    /// Driving distance from a raw vehicle coordinate to a tracked
    /// pedestrian, stitched over nearest-node projections.  `Ok(None)` when
    /// the two are not connected by the road network.
    pub fn distance_to(
        &self,
        vehicle: GeoPoint,
        pedestrian: &PedestrianId,
    ) -> EngineResult<Option<f64>> {
        let ped = self
            .pedestrians
            .get(pedestrian)
            .ok_or_else(|| EngineError::UnknownPedestrian(pedestrian.clone()))?;
        let (Some(vehicle_node), Some(ped_node)) = (
            self.graph.nearest_node(vehicle),
            self.graph.nearest_node(ped.location),
        ) else {
            return Ok(None);
        };
        let distance = self.router.road_distance(
            &self.graph,
            vehicle,
            ped.location,
            &vehicle_node,
            &ped_node,
        )?;
        Ok(distance)
    }

    // ── Detection pass ────────────────────────────────────────────────────

    /// Run one full detection pass against `sample`.
    ///
    /// Each pedestrian's evaluation is independent: a routing error for one
    /// is logged and treated as out-of-range without aborting the rest of
    /// the pass.  Ends by publishing the full pedestrian snapshot to
    /// `observer` and reporting the vehicle position fire-and-forget.
    pub fn on_vehicle_position<O: ProximityObserver>(
        &mut self,
        sample: PositionSample,
        observer: &mut O,
    ) {
        let vehicle = self.snap(sample.position);
        let vehicle_node = self.graph.nearest_node(vehicle);

        // Explicit field borrows so the per-pedestrian loop can mutate
        // pedestrians while reading the graph and router.
        let graph = &self.graph;
        let router = &self.router;
        let threshold = self.config.alert_threshold_m;
        let reporter = &mut self.reporter;

        for ped in self.pedestrians.values_mut() {
            let route = match &vehicle_node {
                // An empty network projects nothing; treat as out of range.
                None => Ok(None),
                Some(vnode) => match graph.nearest_node(ped.location) {
                    None => Ok(None),
                    Some(pnode) => router.route(graph, vnode, &pnode),
                },
            };

            let route = match route {
                Ok(r) => r,
                Err(e) => {
                    // Graph inconsistency; isolate to this pedestrian.
                    warn!("routing failed for pedestrian {}: {e}", ped.id);
                    None
                }
            };

            match route {
                Some(route) => {
                    let distance = route.total_distance_m;
                    ped.last_distance_m = Some(distance);
                    if distance <= threshold {
                        if !ped.detected {
                            ped.detected = true;
                            let alert = Alert {
                                pedestrian: ped.id.clone(),
                                location: ped.location,
                                distance_m: distance,
                                timestamp: sample.timestamp,
                                is_first_detection: true,
                            };
                            debug!(
                                "pedestrian {} entered range at {:.0} m",
                                alert.pedestrian, alert.distance_m
                            );
                            observer.on_alert(&alert);
                            if let Some(r) = reporter.as_deref_mut() {
                                if let Err(e) = r.report_alert(&alert) {
                                    warn!("alert report failed: {e}");
                                }
                            }
                        }
                        // Already detected: no further "first" alert for
                        // this episode.
                    } else {
                        // Out of range re-arms the alert; the transition is
                        // observable via the snapshot, not a pushed event.
                        ped.detected = false;
                    }
                }
                None => {
                    // Disconnection counts as out of range, not an error.
                    ped.last_distance_m = None;
                    ped.detected = false;
                }
            }
        }

        let snapshot: Vec<Pedestrian> = self.pedestrians.values().cloned().collect();
        observer.on_pass_complete(&snapshot);

        if let Some(r) = self.reporter.as_deref_mut() {
            if let Err(e) = r.report_vehicle(vehicle) {
                warn!("vehicle report failed: {e}");
            }
        }
    }

    /// Run passes until the coalescing slot is empty; returns how many ran.
    ///
    /// A sample offered while a pass is in flight is picked up by the next
    /// loop turn, so the worker always acts on the newest position.
    pub fn drain<O: ProximityObserver>(&mut self, slot: &PositionSlot, observer: &mut O) -> usize {
        let mut passes = 0;
        while let Some(sample) = slot.take() {
            self.on_vehicle_position(sample, observer);
            passes += 1;
        }
        passes
    }

    fn snap(&self, raw: GeoPoint) -> GeoPoint {
        match &self.snapper {
            None => raw,
            Some(snapper) => match snapper.snap_to_road(raw) {
                Ok(corrected) => corrected,
                Err(e) => {
                    warn!("road snap failed, using raw coordinate: {e}");
                    raw
                }
            },
        }
    }
}
