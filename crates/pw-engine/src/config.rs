//! Engine configuration.

use pw_core::GeoBounds;

/// Tuning knobs for [`ProximityEngine`][crate::ProximityEngine].
///
/// Typically loaded from a TOML/JSON file by the application crate (enable
/// the `serde` feature) and passed to [`EngineBuilder`][crate::EngineBuilder].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Driving distance at or below which a pedestrian counts as detected.
    /// Default: 2,000 m.
    pub alert_threshold_m: f64,

    /// Map area eligible for non-anchored pedestrian spawns.  Default: the
    /// whole globe.
    pub spawn_bounds: GeoBounds,

    /// Seed for spawn-position selection.  The same seed always produces
    /// identical spawn placements.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alert_threshold_m: 2_000.0,
            spawn_bounds: GeoBounds::WORLD,
            seed: 0,
        }
    }
}
