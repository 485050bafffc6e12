//! The travel-time capability and backend selection.

use pt_core::config::{TimeModelConfig, TimeModelKind};
use pt_core::{GeoPoint, StreamRng};

use crate::geometric::GeometricModel;
use crate::road::RoadTimeModel;
use crate::TravelResult;

/// Trip durations between two coordinates, in minutes.
///
/// Implementations must be `Send + Sync` so one instance can serve groups
/// planned on several threads.  Neither method may return a negative value.
pub trait TravelTimeModel: Send + Sync {
    /// Deterministic expected duration.
    fn mean_minutes(&self, a: GeoPoint, b: GeoPoint) -> f64;

    /// One realized duration.  Randomness, if any, comes from `rng` only.
    fn sample_minutes(&self, a: GeoPoint, b: GeoPoint, rng: &mut StreamRng) -> f64;

    /// Short backend name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Log internal statistics (cache hit rates and the like).  Called once
    /// at the end of a run.
    fn report_stats(&self) {}
}

/// The backend chosen by configuration.
#[derive(Debug)]
pub enum TimeModel {
    Geometric(GeometricModel),
    Road(RoadTimeModel),
}

impl TravelTimeModel for TimeModel {
    #[inline]
    fn mean_minutes(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        match self {
            TimeModel::Geometric(m) => m.mean_minutes(a, b),
            TimeModel::Road(m) => m.mean_minutes(a, b),
        }
    }

    #[inline]
    fn sample_minutes(&self, a: GeoPoint, b: GeoPoint, rng: &mut StreamRng) -> f64 {
        match self {
            TimeModel::Geometric(m) => m.sample_minutes(a, b, rng),
            TimeModel::Road(m) => m.sample_minutes(a, b, rng),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TimeModel::Geometric(m) => m.name(),
            TimeModel::Road(m) => m.name(),
        }
    }

    fn report_stats(&self) {
        match self {
            TimeModel::Geometric(m) => m.report_stats(),
            TimeModel::Road(m) => m.report_stats(),
        }
    }
}

/// Construct the configured travel-time backend.
///
/// Loading the road graph is the expensive part of a run; build once and
/// share the result across all groups.
pub fn build_time_model(cfg: &TimeModelConfig) -> TravelResult<TimeModel> {
    Ok(match cfg.kind {
        TimeModelKind::Geometric => TimeModel::Geometric(GeometricModel::from_config(cfg)?),
        TimeModelKind::Road => TimeModel::Road(RoadTimeModel::from_config(cfg)?),
    })
}
