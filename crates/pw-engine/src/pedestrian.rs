//! Tracked pedestrian state.

use pw_core::{GeoPoint, PedestrianId};

/// A stationary detection target, assumed to be on or very near a road.
///
/// `detected` and `last_distance_m` are owned and mutated exclusively by the
/// detection engine; everything else is fixed at spawn time.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pedestrian {
    pub id: PedestrianId,
    pub location: GeoPoint,

    /// `true` while the most recent pass put the vehicle within the alert
    /// threshold.
    pub detected: bool,

    /// Driving distance from the last pass, `None` before the first pass or
    /// when no route was found.
    pub last_distance_m: Option<f64>,
}

impl Pedestrian {
    /// A freshly spawned, not-yet-detected pedestrian.
    pub fn new(id: impl Into<PedestrianId>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            location,
            detected: false,
            last_distance_m: None,
        }
    }
}
