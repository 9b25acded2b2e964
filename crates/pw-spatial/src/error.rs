//! Spatial-subsystem error type.
//!
//! Route-not-found is deliberately *not* in this enum: an unreachable goal
//! is a normal search outcome (`Ok(None)` from [`Router::route`]), while
//! these variants signal a malformed network or a broken graph invariant.
//!
//! [`Router::route`]: crate::Router::route

use thiserror::Error;

use pw_core::NodeId;

/// Errors produced by `pw-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A segment references a node that was never added.  Fatal at network
    /// construction time.
    #[error("node {0} not found in network")]
    UnknownNode(NodeId),

    /// A node or segment id was inserted twice.
    #[error("duplicate {kind} id {id}")]
    DuplicateEntity { kind: &'static str, id: String },

    /// Path reconstruction found consecutive nodes with no connecting
    /// segment.  Indicates an adjacency-index inconsistency, never a normal
    /// "no route" outcome.
    #[error("no segment connects {from} to {to} during path reconstruction")]
    Reconstruction { from: NodeId, to: NodeId },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
