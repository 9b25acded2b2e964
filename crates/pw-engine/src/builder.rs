//! Fluent builder for constructing a [`ProximityEngine`].

use std::collections::BTreeMap;

use pw_core::SpawnRng;
use pw_spatial::{RoadGraph, Router};

use crate::collaborators::{RoadSnapper, VehicleReporter};
use crate::{EngineConfig, EngineError, EngineResult, ProximityEngine};

/// Fluent builder for [`ProximityEngine<R>`].
///
/// # Required inputs
///
/// - [`RoadGraph`] — the network to detect over
/// - `R: Router` — the routing algorithm (e.g. [`pw_spatial::AStarRouter`])
/// - [`EngineConfig`] — threshold, spawn bounds, seed
///
/// # Optional inputs
///
/// | Method         | Default                              |
/// |----------------|--------------------------------------|
/// | `.snapper(s)`  | No snapping; raw coordinates used    |
/// | `.reporter(r)` | No backend reporting                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(graph, AStarRouter::new(), EngineConfig::default())
///     .reporter(Box::new(http_reporter))
///     .build()?;
/// engine.spawn_pedestrians(10);
/// engine.on_vehicle_position(sample, &mut NoopObserver);
/// ```
pub struct EngineBuilder<R: Router> {
    graph: RoadGraph,
    router: R,
    config: EngineConfig,
    snapper: Option<Box<dyn RoadSnapper>>,
    reporter: Option<Box<dyn VehicleReporter>>,
}

impl<R: Router> EngineBuilder<R> {
    /// Create a builder with all required inputs.
    pub fn new(graph: RoadGraph, router: R, config: EngineConfig) -> Self {
        Self {
            graph,
            router,
            config,
            snapper: None,
            reporter: None,
        }
    }

    /// Supply the coordinate-correction collaborator.
    pub fn snapper(mut self, snapper: Box<dyn RoadSnapper>) -> Self {
        self.snapper = Some(snapper);
        self
    }

    /// Supply the backend reporting collaborator.
    pub fn reporter(mut self, reporter: Box<dyn VehicleReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Validate the configuration and return a ready engine with no
    /// pedestrians tracked.
    pub fn build(self) -> EngineResult<ProximityEngine<R>> {
        if !self.config.alert_threshold_m.is_finite() || self.config.alert_threshold_m <= 0.0 {
            return Err(EngineError::Config(format!(
                "alert threshold must be positive and finite, got {}",
                self.config.alert_threshold_m
            )));
        }

        let rng = SpawnRng::new(self.config.seed);
        Ok(ProximityEngine {
            graph: self.graph,
            router: self.router,
            config: self.config,
            pedestrians: BTreeMap::new(),
            rng,
            spawn_seq: 0,
            snapper: self.snapper,
            reporter: self.reporter,
        })
    }
}
