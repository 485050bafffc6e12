//! Geometric travel-time model.
//!
//! ```text
//! mean   = haversine_km(a, b) × detour_factor ÷ (speed_kmh × speed_multiplier) × 60
//! sample = mean × X,   X ~ LogNormal(−σ²/2, σ)
//! ```
//!
//! The log-normal location is chosen so `E[X] = 1`: noise spreads samples
//! around the mean without biasing it.  With `σ = 0` no noise is drawn and
//! `sample == mean` exactly.

use rand_distr::{Distribution, LogNormal};

use pt_core::config::TimeModelConfig;
use pt_core::{GeoPoint, PtError, StreamRng};

use crate::model::TravelTimeModel;
use crate::TravelResult;

#[derive(Clone, Debug)]
pub struct GeometricModel {
    speed_kmh:        f64,
    speed_multiplier: f64,
    detour_factor:    f64,
    noise_sigma:      f64,
    noise:            Option<LogNormal<f64>>,
}

fn positive(name: &str, v: f64) -> Result<(), PtError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(PtError::Config(format!("{name} must be > 0 (got {v})")))
    }
}

impl GeometricModel {
    pub fn new(
        speed_kmh: f64,
        speed_multiplier: f64,
        detour_factor: f64,
        noise_sigma: f64,
    ) -> TravelResult<Self> {
        positive("speed_kmh", speed_kmh)?;
        positive("speed_multiplier", speed_multiplier)?;
        positive("detour_factor", detour_factor)?;
        if !(noise_sigma.is_finite() && noise_sigma >= 0.0) {
            return Err(PtError::Config(format!("noise_sigma must be >= 0 (got {noise_sigma})")).into());
        }

        let noise = if noise_sigma > 0.0 {
            let mu = -0.5 * noise_sigma * noise_sigma;
            let dist = LogNormal::new(mu, noise_sigma)
                .map_err(|e| PtError::Config(format!("noise_sigma {noise_sigma}: {e}")))?;
            Some(dist)
        } else {
            None
        };

        Ok(Self { speed_kmh, speed_multiplier, detour_factor, noise_sigma, noise })
    }

    pub fn from_config(cfg: &TimeModelConfig) -> TravelResult<Self> {
        Self::new(cfg.speed_kmh, cfg.speed_multiplier, cfg.detour_factor, cfg.noise_sigma)
    }

    /// Speed actually used for the estimate.
    #[inline]
    pub fn effective_speed_kmh(&self) -> f64 {
        self.speed_kmh * self.speed_multiplier
    }

    pub fn noise_sigma(&self) -> f64 {
        self.noise_sigma
    }
}

impl TravelTimeModel for GeometricModel {
    fn mean_minutes(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let km = a.distance_km(b) * self.detour_factor;
        km / self.effective_speed_kmh() * 60.0
    }

    fn sample_minutes(&self, a: GeoPoint, b: GeoPoint, rng: &mut StreamRng) -> f64 {
        let mean = self.mean_minutes(a, b);
        match &self.noise {
            Some(dist) => mean * dist.sample(rng.inner()),
            None => mean,
        }
    }

    fn name(&self) -> &'static str {
        "geometric"
    }
}
