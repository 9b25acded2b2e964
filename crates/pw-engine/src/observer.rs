//! Detection observer trait for alert delivery and snapshot consumption.

use crate::{Alert, Pedestrian};

/// Callbacks invoked by
/// [`ProximityEngine::on_vehicle_position`][crate::ProximityEngine::on_vehicle_position]
/// during a detection pass.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — alert counter
///
/// ```rust,ignore
/// struct AlertCounter { alerts: usize }
///
/// impl ProximityObserver for AlertCounter {
///     fn on_alert(&mut self, alert: &Alert) {
///         self.alerts += 1;
///         println!("pedestrian {} at {:.0} m", alert.pedestrian, alert.distance_m);
///     }
/// }
/// ```
pub trait ProximityObserver {
    /// Called once per pedestrian entering the alert threshold.
    fn on_alert(&mut self, _alert: &Alert) {}

    /// Called at the end of every detection pass with the full updated
    /// pedestrian snapshot, including passes that raised no alert.
    fn on_pass_complete(&mut self, _pedestrians: &[Pedestrian]) {}
}

/// A [`ProximityObserver`] that does nothing.  Use when you need to run a
/// pass but don't care about the callbacks.
pub struct NoopObserver;

impl ProximityObserver for NoopObserver {}
