//! `pw-core` — foundational types for the pedwatch proximity-detection stack.
//!
//! This crate is a dependency of every other `pw-*` crate.  It intentionally
//! has no `pw-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                          |
//! |----------|---------------------------------------------------|
//! | [`ids`]  | `NodeId`, `SegmentId`, `PedestrianId`             |
//! | [`geo`]  | `GeoPoint`, haversine distance, `GeoBounds`       |
//! | [`time`] | `Timestamp` (unix seconds, hour-of-day helper)    |
//! | [`rng`]  | `SpawnRng` (deterministic seeded RNG)             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{GeoBounds, GeoPoint};
pub use ids::{NodeId, PedestrianId, SegmentId};
pub use rng::SpawnRng;
pub use time::Timestamp;
