//! `pw-spatial` — road-network graph, traffic model, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`graph`]   | `RoadGraph`, `Node`, `Segment`, segment cost model        |
//! | [`traffic`] | `TrafficCondition`, `TrafficRules`, time-of-day overwrite |
//! | [`router`]  | `Router` trait, `Route`, `AStarRouter`                    |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types. |

pub mod error;
pub mod graph;
pub mod router;
pub mod traffic;


pub use error::{SpatialError, SpatialResult};
pub use graph::{Node, RoadGraph, Segment};
pub use router::{AStarRouter, Route, Router};
pub use traffic::{TrafficCondition, TrafficRules};
