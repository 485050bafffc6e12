//! Run observer trait for progress reporting and artifact collection.

use crate::kpi::RunKpis;
use crate::plan::{Event, VehicleRoute};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Vehicles are reported in group-key
/// order, then vehicle index, with or without the `parallel` feature.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_vehicle(&mut self, route: &VehicleRoute, events: &[Event]) {
///         println!("{}: {} pickups", route.vehicle_id, events.len());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before any vehicle is reported.
    fn on_run_start(&mut self, _groups: usize, _requests: usize) {}

    /// Called once per planned vehicle with its summary and passenger events.
    fn on_vehicle(&mut self, _route: &VehicleRoute, _events: &[Event]) {}

    /// Called once after KPIs are computed.
    fn on_run_end(&mut self, _kpis: &RunKpis) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
