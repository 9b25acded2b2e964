//! Engine error type.
//!
//! Note the asymmetry with what a detection pass does internally: per-
//! pedestrian routing failures are isolated and logged, never surfaced here.
//! These variants cover construction-time and query-time problems only.

use thiserror::Error;

use pw_core::PedestrianId;
use pw_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("pedestrian {0} is already tracked")]
    DuplicatePedestrian(PedestrianId),

    #[error("pedestrian {0} is not tracked")]
    UnknownPedestrian(PedestrianId),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type EngineResult<T> = Result<T, EngineError>;
