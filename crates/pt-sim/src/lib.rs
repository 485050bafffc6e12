//! `pt-sim`: group loop orchestrator for the paratransit fleet simulator.
//!
//! # Group loop
//!
//! ```text
//! for (center, slot, class) in sorted group keys:
//!   ① Partition : split the group into ≤ max_vehicles loads of ≤ capacity
//!                 (overflow is dropped).
//!   ② Plan      : per load: point set [center, pickups…] → mean/actual
//!                 matrices → tour → promised timeline (ends at the slot)
//!                 and actual timeline (starts at the promised start).
//!   ③ Report    : events and route summary, in key order, to the observer.
//! KPIs over all events.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                          |
//! |------------|-------------------------------------------------|
//! | `parallel` | Runs the plan step on Rayon's thread pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pt_sim::{demand, NoopObserver, SimBuilder};
//!
//! let centers = demand::load_centers(&cfg.service.centers_path, &cfg.service.districts)?;
//! let requests = demand::generate_requests(&centers, &cfg.service.slots, &cfg.demand)?;
//! let sim = SimBuilder::from_config(cfg)?.requests(requests).build()?;
//! let out = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod demand;
pub mod error;
pub mod kpi;
pub mod observer;
pub mod partition;
pub mod plan;
pub mod sim;
pub mod timeline;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use kpi::{compute_kpis, KpiSummary, RunKpis, Stats};
pub use observer::{NoopObserver, SimObserver};
pub use plan::{Event, EventTimes, GroupKey, Stop, StopKind, VehicleGroupPlan, VehicleRoute};
pub use sim::{RunOutput, Sim};
pub use timeline::{simulate_timeline, Timeline, TimelineAnchor};
