//! Position feed with newest-only coalescing.
//!
//! A live location stream delivers samples at unbounded, possibly
//! sub-second intervals, while a detection pass runs to completion on a
//! single worker.  `PositionSlot` sits between the two: producers `offer`
//! from any thread, and only the newest sample survives until the worker
//! `take`s it.  A superseded sample is simply discarded, never half-applied.

use std::sync::{Mutex, MutexGuard, PoisonError};

use pw_core::{GeoPoint, Timestamp};

/// One vehicle position sample from the location source.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionSample {
    pub position: GeoPoint,
    pub timestamp: Timestamp,
}

impl PositionSample {
    pub fn new(position: GeoPoint, timestamp: Timestamp) -> Self {
        Self { position, timestamp }
    }
}

/// Latest-only mailbox between the position source and the detection worker.
#[derive(Debug, Default)]
pub struct PositionSlot {
    latest: Mutex<Option<PositionSample>>,
}

impl PositionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock only means a producer panicked mid-`offer`; the slot
    /// holds a plain `Option`, so the stored value is still coherent.
    fn lock(&self) -> MutexGuard<'_, Option<PositionSample>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `sample` unless an equal-or-newer sample is already waiting.
    ///
    /// Returns `true` if the sample was stored, `false` if it was dropped as
    /// stale (the source guarantees monotonic timestamps, so a stale offer
    /// means reordered delivery).
    pub fn offer(&self, sample: PositionSample) -> bool {
        let mut slot = self.lock();
        match *slot {
            Some(waiting) if waiting.timestamp >= sample.timestamp => false,
            _ => {
                *slot = Some(sample);
                true
            }
        }
    }

    /// Drain the newest waiting sample, leaving the slot empty.
    pub fn take(&self) -> Option<PositionSample> {
        self.lock().take()
    }

    /// `true` when no sample is waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}
