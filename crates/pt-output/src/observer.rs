//! `RunOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use pt_sim::{Event, RunKpis, SimObserver, VehicleRoute};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that streams vehicles and metrics to any
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct RunOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RunOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect collected map data).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for RunOutputObserver<W> {
    fn on_vehicle(&mut self, route: &VehicleRoute, events: &[Event]) {
        let result = self.writer.write_vehicle(route, events);
        self.store_err(result);
    }

    fn on_run_end(&mut self, kpis: &RunKpis) {
        let result = self.writer.write_metrics(kpis);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
