//! CSV output backend.
//!
//! Creates four files in the run directory:
//! - `events.csv`: one row per passenger
//! - `routes.csv`: one row per vehicle
//! - `routes_stops.csv`: one row per tour position
//! - `metrics.csv`: one row of run KPIs
//!
//! Headers are written on creation, so an empty run still leaves readable
//! tables behind.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use pt_sim::{Event, RunKpis, VehicleRoute};

use crate::row::{StopRow, EVENT_COLUMNS, ROUTE_COLUMNS, ROUTE_STOP_COLUMNS};
use crate::writer::OutputWriter;
use crate::OutputResult;

pub const EVENTS_FILE: &str = "events.csv";
pub const ROUTES_FILE: &str = "routes.csv";
pub const ROUTE_STOPS_FILE: &str = "routes_stops.csv";
pub const METRICS_FILE: &str = "metrics.csv";

/// Writes run output to four CSV files.
pub struct CsvWriter {
    events:   Writer<File>,
    routes:   Writer<File>,
    stops:    Writer<File>,
    metrics:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(EVENT_COLUMNS)?;

        let mut routes = Writer::from_path(dir.join(ROUTES_FILE))?;
        routes.write_record(ROUTE_COLUMNS)?;

        let mut stops = Writer::from_path(dir.join(ROUTE_STOPS_FILE))?;
        stops.write_record(ROUTE_STOP_COLUMNS)?;

        let metrics = Writer::from_path(dir.join(METRICS_FILE))?;

        Ok(Self {
            events,
            routes,
            stops,
            metrics,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_vehicle(&mut self, route: &VehicleRoute, events: &[Event]) -> OutputResult<()> {
        let key = &route.key;

        for e in events {
            self.events.write_record(&[
                key.center.to_string(),
                key.slot.to_string(),
                key.class.to_string(),
                e.vehicle_id.clone(),
                e.request_id.clone(),
                e.node.to_string(),
                e.stop_seq.to_string(),
                e.pickup.lat.to_string(),
                e.pickup.lon.to_string(),
                e.center.lat.to_string(),
                e.center.lon.to_string(),
                e.times.pickup_promise.to_string(),
                e.times.pickup_actual.to_string(),
                e.times.center_promise.to_string(),
                e.times.center_actual.to_string(),
                e.times.ride_time.to_string(),
            ])?;
        }

        let stop_rows: Vec<StopRow> = route.stops.iter().map(StopRow::from).collect();
        let order: Vec<String> = route.tour.as_slice().iter().map(usize::to_string).collect();
        self.routes.write_record(&[
            route.vehicle_id.clone(),
            key.center.to_string(),
            key.slot.to_string(),
            key.class.to_string(),
            order.join(","),
            route.center_location.lat.to_string(),
            route.center_location.lon.to_string(),
            serde_json::to_string(&stop_rows)?,
            route.promise_start.to_string(),
            route.promise_end.to_string(),
            route.actual_start.to_string(),
            route.actual_end.to_string(),
            route.actual_duration().to_string(),
        ])?;

        for s in &route.stops {
            self.stops.write_record(&[
                route.vehicle_id.clone(),
                key.center.to_string(),
                key.slot.to_string(),
                key.class.to_string(),
                s.seq.to_string(),
                s.node.to_string(),
                s.kind.to_string(),
                s.request_id.clone().unwrap_or_default(),
                s.location.lat.to_string(),
                s.location.lon.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_metrics(&mut self, kpis: &RunKpis) -> OutputResult<()> {
        let columns = kpis.columns();
        self.metrics.write_record(columns.iter().map(|(name, _)| *name))?;
        self.metrics.write_record(columns.iter().map(|(_, v)| v.to_string()))?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.routes.flush()?;
        self.stops.flush()?;
        self.metrics.flush()?;
        Ok(())
    }
}
