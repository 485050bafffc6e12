//! KPI aggregation over a run's events.
//!
//! Lateness is `actual − promised` and keeps its sign: early arrivals pull
//! the mean down rather than being floored at zero.  A stop is on time when
//! its lateness is at most the configured threshold (inclusive).
//!
//! Percentiles interpolate linearly between the two closest ranks.

use std::path::Path;

use serde::Serialize;

use pt_core::PtError;

use crate::plan::EventTimes;
use crate::SimResult;

/// Columns an events table must carry for KPI computation.
pub const REQUIRED_EVENT_COLUMNS: [&str; 5] = [
    "pickup_promise_min",
    "pickup_actual_min",
    "center_promise_min",
    "center_actual_min",
    "ride_time_min",
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub p95:  f64,
    pub max:  f64,
}

impl Stats {
    /// Zero for an empty sample.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
            p95:  percentile(&sorted, 95.0),
            max:  sorted[sorted.len() - 1],
        }
    }
}

/// `p`th percentile of an ascending, non-empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct KpiSummary {
    pub pickup_late:         Stats,
    pub center_late:         Stats,
    pub pickup_on_time_rate: f64,
    pub center_on_time_rate: f64,
    pub ride_time:           Stats,
}

impl KpiSummary {
    /// All lateness zero, everyone on time.
    pub fn empty() -> Self {
        Self {
            pickup_late:         Stats::default(),
            center_late:         Stats::default(),
            pickup_on_time_rate: 1.0,
            center_on_time_rate: 1.0,
            ride_time:           Stats::default(),
        }
    }
}

/// Reduce `events` to a [`KpiSummary`].
///
/// An empty event set needs no threshold.  Otherwise a missing threshold is a
/// configuration error.
pub fn compute_kpis<'a, I>(events: I, on_time_threshold_min: Option<f64>) -> SimResult<KpiSummary>
where
    I: IntoIterator<Item = &'a EventTimes>,
{
    let events: Vec<&EventTimes> = events.into_iter().collect();
    if events.is_empty() {
        return Ok(KpiSummary::empty());
    }
    let thr = on_time_threshold_min
        .ok_or_else(|| PtError::Config("missing kpi.on_time_threshold_min".into()))?;

    let pickup: Vec<f64> = events.iter().map(|e| e.pickup_lateness()).collect();
    let center: Vec<f64> = events.iter().map(|e| e.center_lateness()).collect();
    let ride: Vec<f64> = events.iter().map(|e| e.ride_time).collect();

    let on_time = |xs: &[f64]| xs.iter().filter(|&&x| x <= thr).count() as f64 / xs.len() as f64;

    Ok(KpiSummary {
        pickup_late:         Stats::of(&pickup),
        center_late:         Stats::of(&center),
        pickup_on_time_rate: on_time(&pickup),
        center_on_time_rate: on_time(&center),
        ride_time:           Stats::of(&ride),
    })
}

/// Read the KPI columns of an events CSV.  Other columns are ignored.
pub fn read_event_times(path: &Path) -> SimResult<Vec<EventTimes>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim_start_matches('\u{feff}').to_string()).collect();
    if let Some(err) = PtError::check_columns("events table", &REQUIRED_EVENT_COLUMNS, &headers) {
        return Err(err.into());
    }
    rdr.set_headers(csv::StringRecord::from(headers));
    let mut out = Vec::new();
    for row in rdr.deserialize() {
        out.push(row?);
    }
    Ok(out)
}

// ── RunKpis ───────────────────────────────────────────────────────────────────

/// Run-level metrics: the KPI summary plus fleet totals.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RunKpis {
    pub summary:               KpiSummary,
    pub vehicles_used:         usize,
    /// Sum of actual route durations.
    pub total_travel_time_min: f64,
    pub runtime_total_sec:     f64,
}

impl RunKpis {
    /// Flat `(column, value)` pairs in metrics-table order.
    pub fn columns(&self) -> Vec<(&'static str, f64)> {
        let s = &self.summary;
        vec![
            ("pickup_late_mean",      s.pickup_late.mean),
            ("pickup_late_p95",       s.pickup_late.p95),
            ("pickup_late_max",       s.pickup_late.max),
            ("center_late_mean",      s.center_late.mean),
            ("center_late_p95",       s.center_late.p95),
            ("center_late_max",       s.center_late.max),
            ("pickup_on_time_rate",   s.pickup_on_time_rate),
            ("center_on_time_rate",   s.center_on_time_rate),
            ("ride_time_mean",        s.ride_time.mean),
            ("ride_time_p95",         s.ride_time.p95),
            ("ride_time_max",         s.ride_time.max),
            ("vehicles_used",         self.vehicles_used as f64),
            ("total_travel_time_min", self.total_travel_time_min),
            ("total_travel_time",     self.total_travel_time_min),
            ("runtime_total_sec",     self.runtime_total_sec),
        ]
    }
}
