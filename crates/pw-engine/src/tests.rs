//! Unit tests for pw-engine.
//!
//! All tests run against a hand-crafted line network:
//!
//! ```text
//! v (0,0) ──1000 m── p1 (0,0.01) ──1500 m── p2 (0,0.025)
//! ```
//!
//! With the default 2,000 m threshold, a pedestrian at p2 is out of range
//! from v (2,500 m) and in range from p1 (1,500 m), which makes the
//! enter/exit hysteresis easy to drive.

#[cfg(test)]
mod helpers {
    use pw_core::GeoPoint;
    use pw_spatial::{AStarRouter, Node, RoadGraph, Segment};

    use crate::{Alert, EngineBuilder, EngineConfig, Pedestrian, ProximityEngine,
                ProximityObserver};

    pub fn line_network() -> RoadGraph {
        let mut g = RoadGraph::new();
        g.add_node(Node::new("v", "Vehicle Start", GeoPoint::new(0.0, 0.0))).unwrap();
        g.add_node(Node::new("p1", "Mid", GeoPoint::new(0.0, 0.01))).unwrap();
        g.add_node(Node::new("p2", "Far", GeoPoint::new(0.0, 0.025))).unwrap();
        g.add_segment(Segment::new("v-p1", "v", "p1", "Main St", 1_000.0, 50.0).two_way())
            .unwrap();
        g.add_segment(Segment::new("p1-p2", "p1", "p2", "Main St", 1_500.0, 50.0).two_way())
            .unwrap();
        g
    }

    pub fn engine() -> ProximityEngine<AStarRouter> {
        engine_with_config(EngineConfig::default())
    }

    pub fn engine_with_config(config: EngineConfig) -> ProximityEngine<AStarRouter> {
        EngineBuilder::new(line_network(), AStarRouter::new(), config)
            .build()
            .unwrap()
    }

    /// Observer that records every alert and snapshot it sees.
    #[derive(Default)]
    pub struct Recorder {
        pub alerts: Vec<Alert>,
        pub snapshots: Vec<Vec<Pedestrian>>,
    }

    impl ProximityObserver for Recorder {
        fn on_alert(&mut self, alert: &Alert) {
            self.alerts.push(alert.clone());
        }

        fn on_pass_complete(&mut self, pedestrians: &[Pedestrian]) {
            self.snapshots.push(pedestrians.to_vec());
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use pw_spatial::{AStarRouter, RoadGraph};

    use crate::{EngineBuilder, EngineConfig, EngineError};

    #[test]
    fn default_config_builds() {
        let engine = EngineBuilder::new(
            RoadGraph::new(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .build()
        .unwrap();
        assert_eq!(engine.pedestrian_count(), 0);
        assert_eq!(engine.config.alert_threshold_m, 2_000.0);
    }

    #[test]
    fn non_positive_threshold_rejected() {
        let config = EngineConfig { alert_threshold_m: 0.0, ..Default::default() };
        let result = EngineBuilder::new(RoadGraph::new(), AStarRouter::new(), config).build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn nan_threshold_rejected() {
        let config = EngineConfig { alert_threshold_m: f64::NAN, ..Default::default() };
        let result = EngineBuilder::new(RoadGraph::new(), AStarRouter::new(), config).build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}

// ── Spawn protocol ────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawn {
    use pw_core::{GeoBounds, GeoPoint, NodeId, PedestrianId};
    use pw_spatial::{AStarRouter, Node, RoadGraph};

    use crate::{EngineBuilder, EngineConfig, Pedestrian};

    #[test]
    fn spawn_places_on_existing_nodes() {
        let mut engine = super::helpers::engine();
        let ids = engine.spawn_pedestrians(4);
        assert_eq!(ids.len(), 4);
        assert_eq!(engine.pedestrian_count(), 4);
        let node_locations: Vec<GeoPoint> =
            engine.graph.nodes().map(|n| n.location).collect();
        for ped in engine.pedestrians() {
            assert!(node_locations.contains(&ped.location));
            assert!(!ped.detected);
            assert!(ped.last_distance_m.is_none());
        }
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let config = EngineConfig { seed: 7, ..Default::default() };
        let mut a = super::helpers::engine_with_config(config.clone());
        let mut b = super::helpers::engine_with_config(config);
        a.spawn_pedestrians(6);
        b.spawn_pedestrians(6);
        let locs = |peds: Vec<Pedestrian>| -> Vec<GeoPoint> {
            peds.into_iter().map(|p| p.location).collect()
        };
        assert_eq!(locs(a.pedestrians()), locs(b.pedestrians()));
    }

    #[test]
    fn spawn_ids_are_sequential() {
        let mut engine = super::helpers::engine();
        let ids = engine.spawn_pedestrians(2);
        assert_eq!(ids, vec![PedestrianId::from("ped-1"), PedestrianId::from("ped-2")]);
    }

    #[test]
    fn empty_graph_spawns_none() {
        let mut engine = EngineBuilder::new(
            RoadGraph::new(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .build()
        .unwrap();
        assert!(engine.spawn_pedestrians(5).is_empty());
        assert_eq!(engine.pedestrian_count(), 0);
    }

    #[test]
    fn spawn_respects_bounds() {
        // Box containing only node v at (0, 0).
        let config = EngineConfig {
            spawn_bounds: GeoBounds::new(-0.001, 0.001, -0.001, 0.001),
            ..Default::default()
        };
        let mut engine = super::helpers::engine_with_config(config);
        engine.spawn_pedestrians(3);
        for ped in engine.pedestrians() {
            assert_eq!(ped.location, GeoPoint::new(0.0, 0.0));
        }
    }

    #[test]
    fn spawn_near_uses_outgoing_destinations() {
        let mut engine = super::helpers::engine();
        // Nearest node to the anchor is v; its only outgoing destination is p1.
        let ids = engine.spawn_near(GeoPoint::new(0.0001, 0.0), 3);
        assert_eq!(ids.len(), 3);
        for ped in engine.pedestrians() {
            assert_eq!(ped.location, GeoPoint::new(0.0, 0.01));
        }
    }

    #[test]
    fn spawn_near_leaf_falls_back_to_anchor_node() {
        let mut graph = RoadGraph::new();
        graph
            .add_node(Node::new("solo", "Solo", GeoPoint::new(1.0, 1.0)))
            .unwrap();
        let mut engine =
            EngineBuilder::new(graph, AStarRouter::new(), EngineConfig::default())
                .build()
                .unwrap();
        engine.spawn_near(GeoPoint::new(1.0, 1.0), 2);
        for ped in engine.pedestrians() {
            assert_eq!(ped.location, GeoPoint::new(1.0, 1.0));
        }
    }

    #[test]
    fn spawn_near_empty_graph_is_noop() {
        let mut engine = EngineBuilder::new(
            RoadGraph::new(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .build()
        .unwrap();
        assert!(engine.spawn_near(GeoPoint::new(0.0, 0.0), 2).is_empty());
    }

    #[test]
    fn spawn_maintains_node_display_counters() {
        let config = EngineConfig {
            spawn_bounds: GeoBounds::new(-0.001, 0.001, -0.001, 0.001),
            ..Default::default()
        };
        let mut engine = super::helpers::engine_with_config(config);
        engine.spawn_pedestrians(3);
        let v = NodeId::from("v");
        assert_eq!(engine.graph.node(&v).unwrap().pedestrian_count, 3);
        engine.clear_all();
        assert_eq!(engine.graph.node(&v).unwrap().pedestrian_count, 0);
    }

    #[test]
    fn clear_all_removes_everything() {
        let mut engine = super::helpers::engine();
        engine.spawn_pedestrians(3);
        engine.clear_all();
        assert_eq!(engine.pedestrian_count(), 0);
        assert!(engine.pedestrians().is_empty());
    }

    #[test]
    fn track_rejects_duplicate_id() {
        use crate::{EngineError, Pedestrian};
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        let err = engine.track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.02)));
        assert!(matches!(err, Err(EngineError::DuplicatePedestrian(_))));
    }
}

// ── Detection pass ────────────────────────────────────────────────────────────

#[cfg(test)]
mod detection {
    use pw_core::{GeoPoint, PedestrianId, Timestamp};
    use pw_spatial::{AStarRouter, Node, RoadGraph};

    use super::helpers::Recorder;
    use crate::{EngineBuilder, EngineConfig, Pedestrian, PositionSample};

    fn at(lon: f64) -> PositionSample {
        PositionSample::new(GeoPoint::new(0.0, lon), Timestamp::at_hour(9))
    }

    #[test]
    fn one_first_alert_per_episode_and_rearming() {
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.025)))
            .unwrap();
        let mut rec = Recorder::default();

        // 2,500 m away: out of range.
        engine.on_vehicle_position(at(0.0), &mut rec);
        assert!(rec.alerts.is_empty());

        // 1,500 m away: first detection.
        engine.on_vehicle_position(at(0.01), &mut rec);
        assert_eq!(rec.alerts.len(), 1);
        assert!(rec.alerts[0].is_first_detection);

        // Still in range: no further "first" alert.
        engine.on_vehicle_position(at(0.01), &mut rec);
        assert_eq!(rec.alerts.len(), 1);

        // Back out of range: detection clears, alert re-arms.
        engine.on_vehicle_position(at(0.0), &mut rec);
        assert_eq!(rec.alerts.len(), 1);
        assert!(engine.detected_pedestrians().is_empty());

        // Re-entry raises a fresh first alert.
        engine.on_vehicle_position(at(0.01), &mut rec);
        assert_eq!(rec.alerts.len(), 2);
        assert!(rec.alerts[1].is_first_detection);
    }

    #[test]
    fn alert_carries_sample_context() {
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        let mut rec = Recorder::default();
        let sample = PositionSample::new(GeoPoint::new(0.0, 0.0), Timestamp::at_hour(8));
        engine.on_vehicle_position(sample, &mut rec);

        let alert = &rec.alerts[0];
        assert_eq!(alert.pedestrian, PedestrianId::from("walker"));
        assert_eq!(alert.location, GeoPoint::new(0.0, 0.01));
        assert_eq!(alert.distance_m, 1_000.0);
        assert_eq!(alert.timestamp, Timestamp::at_hour(8));
        assert!(alert.is_first_detection);
    }

    #[test]
    fn last_distance_tracks_route_length() {
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.025)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(at(0.0), &mut rec);
        let ped = engine.pedestrian(&PedestrianId::from("walker")).unwrap();
        assert_eq!(ped.last_distance_m, Some(2_500.0));
        assert!(!ped.detected);
    }

    #[test]
    fn zero_pedestrians_is_a_noop_pass() {
        let mut engine = super::helpers::engine();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(at(0.0), &mut rec);
        assert!(rec.alerts.is_empty());
        assert_eq!(rec.snapshots.len(), 1);
        assert!(rec.snapshots[0].is_empty());
    }

    #[test]
    fn snapshot_published_every_pass() {
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(at(0.0), &mut rec);
        engine.on_vehicle_position(at(0.01), &mut rec);
        assert_eq!(rec.snapshots.len(), 2);
        assert_eq!(rec.snapshots[1].len(), 1);
        assert!(rec.snapshots[1][0].detected);
    }

    #[test]
    fn disconnected_pedestrian_is_out_of_range() {
        let mut graph = super::helpers::line_network();
        // An island node with no segments.
        graph
            .add_node(Node::new("island", "Island", GeoPoint::new(0.5, 0.5)))
            .unwrap();
        let mut engine =
            EngineBuilder::new(graph, AStarRouter::new(), EngineConfig::default())
                .build()
                .unwrap();
        engine
            .track(Pedestrian::new("stranded", GeoPoint::new(0.5, 0.5)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(at(0.0), &mut rec);

        let ped = engine.pedestrian(&PedestrianId::from("stranded")).unwrap();
        assert!(ped.last_distance_m.is_none());
        assert!(!ped.detected);
        assert!(rec.alerts.is_empty());
    }

    #[test]
    fn empty_network_clears_detections() {
        let mut engine = EngineBuilder::new(
            RoadGraph::new(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .build()
        .unwrap();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.0)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(at(0.0), &mut rec);
        assert!(rec.alerts.is_empty());
        assert_eq!(rec.snapshots.len(), 1);
        assert!(!rec.snapshots[0][0].detected);
        assert!(rec.snapshots[0][0].last_distance_m.is_none());
    }

    #[test]
    fn each_pedestrian_evaluated_independently() {
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("near", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        engine
            .track(Pedestrian::new("far", GeoPoint::new(0.0, 0.025)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(at(0.0), &mut rec);

        assert_eq!(rec.alerts.len(), 1);
        assert_eq!(rec.alerts[0].pedestrian, PedestrianId::from("near"));
        let detected = engine.detected_pedestrians();
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].id, PedestrianId::from("near"));
    }

    #[test]
    fn distance_to_stitches_over_projections() {
        let mut engine = super::helpers::engine();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.025)))
            .unwrap();
        let d = engine
            .distance_to(GeoPoint::new(0.0, 0.0), &PedestrianId::from("walker"))
            .unwrap()
            .unwrap();
        // Both endpoints sit exactly on nodes; pure route distance remains.
        assert!((d - 2_500.0).abs() < 1e-6);
    }

    #[test]
    fn distance_to_unknown_pedestrian_errors() {
        use crate::EngineError;
        let engine = super::helpers::engine();
        let result = engine.distance_to(GeoPoint::new(0.0, 0.0), &PedestrianId::from("ghost"));
        assert!(matches!(result, Err(EngineError::UnknownPedestrian(_))));
    }
}

// ── Collaborators ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod collaborators {
    use std::sync::{Arc, Mutex};

    use pw_core::{GeoPoint, Timestamp};
    use pw_spatial::AStarRouter;

    use super::helpers::Recorder;
    use crate::{
        Alert, CollabError, EngineBuilder, EngineConfig, Pedestrian, PositionSample,
        RoadSnapper, VehicleReporter,
    };

    struct FailingSnapper;
    impl RoadSnapper for FailingSnapper {
        fn snap_to_road(&self, _raw: GeoPoint) -> Result<GeoPoint, CollabError> {
            Err(CollabError("snapping service unavailable".into()))
        }
    }

    /// Snaps everything to node v at (0, 0).
    struct PinningSnapper;
    impl RoadSnapper for PinningSnapper {
        fn snap_to_road(&self, _raw: GeoPoint) -> Result<GeoPoint, CollabError> {
            Ok(GeoPoint::new(0.0, 0.0))
        }
    }

    struct SharedReporter {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl VehicleReporter for SharedReporter {
        fn report_vehicle(&mut self, _position: GeoPoint) -> Result<(), CollabError> {
            if self.fail {
                return Err(CollabError("backend down".into()));
            }
            self.calls.lock().unwrap().push("vehicle".into());
            Ok(())
        }

        fn report_alert(&mut self, alert: &Alert) -> Result<(), CollabError> {
            if self.fail {
                return Err(CollabError("backend down".into()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(format!("alert:{}", alert.pedestrian));
            Ok(())
        }
    }

    fn sample() -> PositionSample {
        PositionSample::new(GeoPoint::new(0.0, 0.0), Timestamp::at_hour(9))
    }

    #[test]
    fn snapper_failure_falls_back_to_raw_coordinate() {
        let mut engine = EngineBuilder::new(
            super::helpers::line_network(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .snapper(Box::new(FailingSnapper))
        .build()
        .unwrap();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(sample(), &mut rec);
        // Detection proceeded on the raw coordinate.
        assert_eq!(rec.alerts.len(), 1);
    }

    #[test]
    fn snapper_correction_moves_the_vehicle() {
        let mut engine = EngineBuilder::new(
            super::helpers::line_network(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .snapper(Box::new(PinningSnapper))
        .build()
        .unwrap();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.025)))
            .unwrap();
        let mut rec = Recorder::default();
        // Raw sample sits at p1 (1,500 m, in range) but the snapper pins the
        // vehicle back to v (2,500 m, out of range).
        let raw = PositionSample::new(GeoPoint::new(0.0, 0.01), Timestamp::at_hour(9));
        engine.on_vehicle_position(raw, &mut rec);
        assert!(rec.alerts.is_empty());
    }

    #[test]
    fn reporter_receives_alerts_and_positions() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new(
            super::helpers::line_network(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .reporter(Box::new(SharedReporter { calls: Arc::clone(&calls), fail: false }))
        .build()
        .unwrap();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        engine.on_vehicle_position(sample(), &mut Recorder::default());

        let calls = calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["alert:walker", "vehicle"]);
    }

    #[test]
    fn reporter_failure_does_not_disturb_detection() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut engine = EngineBuilder::new(
            super::helpers::line_network(),
            AStarRouter::new(),
            EngineConfig::default(),
        )
        .reporter(Box::new(SharedReporter { calls, fail: true }))
        .build()
        .unwrap();
        engine
            .track(Pedestrian::new("walker", GeoPoint::new(0.0, 0.01)))
            .unwrap();
        let mut rec = Recorder::default();
        engine.on_vehicle_position(sample(), &mut rec);
        assert_eq!(rec.alerts.len(), 1);
        assert_eq!(engine.detected_pedestrians().len(), 1);
    }
}

// ── Position feed ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod feed {
    use pw_core::{GeoPoint, Timestamp};

    use super::helpers::Recorder;
    use crate::{PositionSample, PositionSlot};

    fn sample_at(secs: i64) -> PositionSample {
        PositionSample::new(GeoPoint::new(0.0, 0.0), Timestamp(secs))
    }

    #[test]
    fn newest_sample_wins() {
        let slot = PositionSlot::new();
        assert!(slot.offer(sample_at(1)));
        assert!(slot.offer(sample_at(2)));
        assert_eq!(slot.take().unwrap().timestamp, Timestamp(2));
        assert!(slot.is_empty());
    }

    #[test]
    fn stale_offer_is_dropped() {
        let slot = PositionSlot::new();
        assert!(slot.offer(sample_at(5)));
        assert!(!slot.offer(sample_at(3)));
        assert!(!slot.offer(sample_at(5)));
        assert_eq!(slot.take().unwrap().timestamp, Timestamp(5));
    }

    #[test]
    fn take_on_empty_is_none() {
        let slot = PositionSlot::new();
        assert!(slot.take().is_none());
    }

    #[test]
    fn drain_coalesces_to_one_pass() {
        let mut engine = super::helpers::engine();
        let slot = PositionSlot::new();
        // Three samples arrive before the worker gets a turn; only the
        // newest is ever processed.
        slot.offer(sample_at(1));
        slot.offer(sample_at(2));
        slot.offer(sample_at(3));

        let mut rec = Recorder::default();
        let passes = engine.drain(&slot, &mut rec);
        assert_eq!(passes, 1);
        assert_eq!(rec.snapshots.len(), 1);
        assert!(slot.is_empty());
    }

    #[test]
    fn drain_on_empty_slot_runs_nothing() {
        let mut engine = super::helpers::engine();
        let slot = PositionSlot::new();
        assert_eq!(engine.drain(&slot, &mut Recorder::default()), 0);
    }
}
