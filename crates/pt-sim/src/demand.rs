//! Service centers and synthetic demand.
//!
//! Centers come from a CSV table with `district,name,lat,lon` columns.
//! Requests are sampled per slot around uniformly chosen centers, each
//! pickup uniform in radius over an annulus `[radius_min_km, radius_max_km]`
//! and uniform in bearing.  Kilometres convert to degrees with 1° of latitude
//! ≈ 111 km and longitude scaled by `cos(lat)`.
//!
//! All draws come from the `Demand` stream of `demand.seed`, so a sweep that
//! only changes routing parameters sees identical requests.

use std::f64::consts::TAU;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use pt_core::config::DemandConfig;
use pt_core::{Center, CenterId, GeoPoint, PtError, Request, RngStream, SlotTime, StreamRng, VehicleClass};

use crate::SimResult;

/// Columns a center table must carry.
pub const REQUIRED_CENTER_COLUMNS: [&str; 4] = ["district", "name", "lat", "lon"];

/// District filter value that keeps every center.
pub const ALL_DISTRICTS: &str = "ALL";

const KM_PER_DEG_LAT: f64 = 111.0;

#[derive(Deserialize)]
struct CenterRow {
    district: String,
    name:     String,
    lat:      Option<f64>,
    lon:      Option<f64>,
}

/// Load centers, keeping those in `districts` (or all for `["ALL"]`).
///
/// Rows without coordinates are skipped.  Ids are assigned densely in file
/// order after filtering.
pub fn load_centers(path: &Path, districts: &[String]) -> SimResult<Vec<Center>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if let Some(err) = PtError::check_columns("center table", &REQUIRED_CENTER_COLUMNS, &headers) {
        return Err(err.into());
    }

    let keep_all = districts.len() == 1 && districts[0] == ALL_DISTRICTS;
    let mut centers = Vec::new();
    for row in rdr.deserialize() {
        let row: CenterRow = row?;
        if !keep_all && !districts.iter().any(|d| *d == row.district) {
            continue;
        }
        let (Some(lat), Some(lon)) = (row.lat, row.lon) else { continue };
        centers.push(Center {
            id:       CenterId(centers.len() as u32),
            name:     row.name,
            district: row.district,
            location: GeoPoint::new(lat, lon),
        });
    }

    info!(path = %path.display(), centers = centers.len(), "centers loaded");
    Ok(centers)
}

/// Uniform point in an annulus around `center`.
pub fn sample_point_near(center: GeoPoint, rmin_km: f64, rmax_km: f64, rng: &mut StreamRng) -> GeoPoint {
    let r = rng.gen_range(rmin_km..=rmax_km) / KM_PER_DEG_LAT;
    let theta = rng.gen_range(0.0..TAU);
    let dlat = r * theta.cos();
    let dlon = r * theta.sin() / center.lat.to_radians().cos().max(1e-8);
    GeoPoint::new(center.lat + dlat, center.lon + dlon)
}

/// `requests_per_slot` requests for every slot, ids `to_center_{slot}_{i}`.
pub fn generate_requests(
    centers: &[Center],
    slots: &[SlotTime],
    cfg: &DemandConfig,
) -> SimResult<Vec<Request>> {
    if cfg.requests_per_slot == 0 {
        return Err(PtError::Config("demand.requests_per_slot must be > 0 (got 0)".into()).into());
    }
    if !(0.0..=1.0).contains(&cfg.wheelchair_ratio) {
        return Err(PtError::Config(format!(
            "demand.wheelchair_ratio must be in [0,1] (got {})",
            cfg.wheelchair_ratio
        ))
        .into());
    }
    if cfg.radius_min_km < 0.0 || cfg.radius_max_km <= 0.0 || cfg.radius_min_km > cfg.radius_max_km {
        return Err(PtError::Config(format!(
            "invalid demand radius range: radius_min_km={}, radius_max_km={}",
            cfg.radius_min_km, cfg.radius_max_km
        ))
        .into());
    }
    if centers.is_empty() {
        return Ok(Vec::new());
    }

    let mut rng = StreamRng::new(cfg.seed, RngStream::Demand);
    let mut requests = Vec::with_capacity(slots.len() * cfg.requests_per_slot);
    for &slot in slots {
        for i in 0..cfg.requests_per_slot {
            let center = &centers[rng.gen_range(0..centers.len())];
            let pickup = sample_point_near(center.location, cfg.radius_min_km, cfg.radius_max_km, &mut rng);
            let class = if rng.random::<f64>() < cfg.wheelchair_ratio {
                VehicleClass::Wheelchair
            } else {
                VehicleClass::General
            };
            requests.push(Request {
                id: format!("to_center_{slot}_{i}"),
                pickup,
                center: center.id,
                center_location: center.location,
                slot,
                class,
            });
        }
    }

    info!(requests = requests.len(), slots = slots.len(), "demand sampled");
    Ok(requests)
}
