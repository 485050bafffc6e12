//! `pt-travel`: travel-time models.
//!
//! Every component that needs a trip duration asks a [`TravelTimeModel`] for
//! it.  Two backends are provided:
//!
//! | Model             | Mean                                    | Sample                        |
//! |-------------------|-----------------------------------------|-------------------------------|
//! | [`GeometricModel`]| haversine × detour ÷ speed              | mean × log-normal noise       |
//! | [`RoadTimeModel`] | snapped shortest path, cached           | identical to mean             |
//!
//! [`build_time_model`] selects one from configuration and returns it as a
//! [`TimeModel`].
//!
//! # Sharing
//!
//! One model instance serves every group of a run.  Models hold no per-group
//! state: the noise RNG is passed in by the caller, and the only interior
//! mutability is the road model's [`BoundedCache`]s, whose entries are pure
//! functions of their keys.
//!
//! # Crate layout
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`model`]     | `TravelTimeModel` trait, `TimeModel`, `build_time_model` |
//! | [`geometric`] | `GeometricModel`                                    |
//! | [`road`]      | `RoadTimeModel`, `RoadParams`                       |
//! | [`cache`]     | `BoundedCache`, `CacheStats`                        |
//! | [`error`]     | `TravelError`, `TravelResult<T>`                    |

pub mod cache;
pub mod error;
pub mod geometric;
pub mod model;
pub mod road;


pub use cache::{BoundedCache, CacheStats};
pub use error::{TravelError, TravelResult};
pub use geometric::GeometricModel;
pub use model::{build_time_model, TimeModel, TravelTimeModel};
pub use road::{RoadParams, RoadTimeModel};
