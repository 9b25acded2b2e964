//! Alert event record.

use pw_core::{GeoPoint, PedestrianId, Timestamp};

/// An immutable proximity event: the vehicle's driving distance to a
/// pedestrian crossed into the alert threshold.
///
/// Alerts are emitted through [`ProximityObserver::on_alert`] and not stored
/// by the engine; bounded history is a consumer concern.
///
/// [`ProximityObserver::on_alert`]: crate::ProximityObserver::on_alert
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    pub pedestrian: PedestrianId,
    /// Pedestrian location at detection time.
    pub location: GeoPoint,
    /// Driving distance to collision in metres.
    pub distance_m: f64,
    /// Timestamp of the position sample that triggered the detection.
    pub timestamp: Timestamp,
    /// `true` for the first detection of a continuous within-threshold
    /// episode; the flag re-arms once the distance leaves the threshold.
    pub is_first_detection: bool,
}
