//! External collaborator seams.
//!
//! Road snapping and backend reporting are remote services in production.
//! They sit behind traits so the engine stays testable offline, and their
//! failures are isolated per call: the engine logs and falls back, never
//! letting a collaborator abort a detection pass.

use thiserror::Error;

use pw_core::GeoPoint;

use crate::Alert;

/// A collaborator call failed.  Carries the remote error text only; the
/// engine treats every collaborator failure the same way (log and degrade).
#[derive(Debug, Error)]
#[error("collaborator call failed: {0}")]
pub struct CollabError(pub String);

/// Corrects a raw coordinate onto the nearest road.
///
/// On error the engine uses the raw coordinate unchanged.
pub trait RoadSnapper: Send + Sync {
    fn snap_to_road(&self, raw: GeoPoint) -> Result<GeoPoint, CollabError>;
}

/// Sink for vehicle positions and alert notifications.
///
/// Both calls are fire-and-forget: errors are logged and detection
/// correctness is unaffected.
pub trait VehicleReporter: Send + Sync {
    fn report_vehicle(&mut self, position: GeoPoint) -> Result<(), CollabError>;

    fn report_alert(&mut self, alert: &Alert) -> Result<(), CollabError>;
}
