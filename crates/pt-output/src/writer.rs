//! The `OutputWriter` trait implemented by all artifact writers.

use pt_sim::{Event, RunKpis, VehicleRoute};

use crate::OutputResult;

/// Trait implemented by the CSV and map-data writers.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored and retrieved with
/// [`RunOutputObserver::take_error`][crate::RunOutputObserver::take_error].
pub trait OutputWriter {
    /// Record one vehicle's route and its passenger events.
    fn write_vehicle(&mut self, route: &VehicleRoute, events: &[Event]) -> OutputResult<()>;

    /// Record the run-level metrics row.
    fn write_metrics(&mut self, kpis: &RunKpis) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Optional writers, e.g. map data disabled by configuration.
impl<W: OutputWriter> OutputWriter for Option<W> {
    fn write_vehicle(&mut self, route: &VehicleRoute, events: &[Event]) -> OutputResult<()> {
        match self {
            Some(w) => w.write_vehicle(route, events),
            None => Ok(()),
        }
    }

    fn write_metrics(&mut self, kpis: &RunKpis) -> OutputResult<()> {
        match self {
            Some(w) => w.write_metrics(kpis),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> OutputResult<()> {
        match self {
            Some(w) => w.finish(),
            None => Ok(()),
        }
    }
}

/// Fan out to two writers; the first error wins.
impl<A: OutputWriter, B: OutputWriter> OutputWriter for (A, B) {
    fn write_vehicle(&mut self, route: &VehicleRoute, events: &[Event]) -> OutputResult<()> {
        self.0.write_vehicle(route, events)?;
        self.1.write_vehicle(route, events)
    }

    fn write_metrics(&mut self, kpis: &RunKpis) -> OutputResult<()> {
        self.0.write_metrics(kpis)?;
        self.1.write_metrics(kpis)
    }

    fn finish(&mut self) -> OutputResult<()> {
        let a = self.0.finish();
        let b = self.1.finish();
        a.and(b)
    }
}
