//! `pw-engine` — the vehicle-to-pedestrian proximity detection engine.
//!
//! # Detection pass
//!
//! ```text
//! on_vehicle_position(sample):
//!   ① Snap     — correct the raw coordinate via the optional RoadSnapper.
//!   ② Project  — nearest road node for the vehicle and for each pedestrian.
//!   ③ Route    — A* driving distance vehicle → pedestrian.
//!   ④ Compare  — distance ≤ threshold raises an edge-triggered alert
//!                (one per continuous in-range episode); crossing back out
//!                re-arms it.
//!   ⑤ Publish  — full pedestrian snapshot to the observer; fire-and-forget
//!                reports to the backend collaborator.
//! ```
//!
//! Position samples from an uncontrolled async source go through
//! [`PositionSlot`], which keeps only the newest sample; the engine's
//! `&mut self` passes make interleaved detection impossible by construction.
//!
//! # Crate layout
//!
//! | Module            | Contents                                         |
//! |-------------------|--------------------------------------------------|
//! | [`engine`]        | `ProximityEngine`, the detection pass            |
//! | [`builder`]       | `EngineBuilder`                                  |
//! | [`config`]        | `EngineConfig`                                   |
//! | [`pedestrian`]    | `Pedestrian`                                     |
//! | [`alert`]         | `Alert`                                          |
//! | [`observer`]      | `ProximityObserver`, `NoopObserver`              |
//! | [`collaborators`] | `RoadSnapper`, `VehicleReporter`, `CollabError`  |
//! | [`feed`]          | `PositionSample`, coalescing `PositionSlot`      |
//! | [`error`]         | `EngineError`, `EngineResult<T>`                 |

pub mod alert;
pub mod builder;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod observer;
pub mod pedestrian;

#[cfg(test)]
mod tests;

pub use alert::Alert;
pub use builder::EngineBuilder;
pub use collaborators::{CollabError, RoadSnapper, VehicleReporter};
pub use config::EngineConfig;
pub use engine::ProximityEngine;
pub use error::{EngineError, EngineResult};
pub use feed::{PositionSample, PositionSlot};
pub use observer::{NoopObserver, ProximityObserver};
pub use pedestrian::Pedestrian;
