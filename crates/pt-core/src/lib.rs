//! `pt-core`: foundational types for the paratransit fleet simulator.
//!
//! This crate is a dependency of every other `pt-*` crate.  It has no `pt-*`
//! dependencies and few external ones (`rand`, `thiserror`, `serde`,
//! `serde_json`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `CenterId`, `NodeId`, `EdgeId`                            |
//! | [`geo`]       | `GeoPoint`, haversine distance                            |
//! | [`time`]      | `SlotTime`, `HH:MM` parsing                               |
//! | [`rng`]       | `StreamRng`, `RngStream`, group seed mixing               |
//! | [`request`]   | `Request`, `Center`, `VehicleClass`                       |
//! | [`config`]    | `SimConfig` tree, JSON layering helpers                   |
//! | [`error`]     | `PtError`, `PtResult`                                     |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod request;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{PtError, PtResult};
pub use geo::GeoPoint;
pub use ids::{CenterId, EdgeId, NodeId};
pub use request::{Center, Request, VehicleClass};
pub use rng::{RngStream, StreamRng};
pub use time::SlotTime;
