//! Column layouts and plain row types written by output backends.

use serde::Serialize;

use pt_sim::{Stop, VehicleRoute};

pub const EVENT_COLUMNS: [&str; 16] = [
    "center_id",
    "timeslot",
    "bus_type",
    "vehicle_id",
    "request_id",
    "node_idx",
    "stop_seq",
    "pickup_lat",
    "pickup_lon",
    "center_lat",
    "center_lon",
    "pickup_promise_min",
    "pickup_actual_min",
    "center_promise_min",
    "center_actual_min",
    "ride_time_min",
];

pub const ROUTE_COLUMNS: [&str; 13] = [
    "vehicle_id",
    "center_id",
    "timeslot",
    "bus_type",
    "route",
    "center_lat",
    "center_lon",
    "stops_json",
    "start_promise_min",
    "end_promise_min",
    "start_actual_min",
    "end_actual_min",
    "route_duration_actual_min",
];

pub const ROUTE_STOP_COLUMNS: [&str; 10] = [
    "vehicle_id",
    "center_id",
    "timeslot",
    "bus_type",
    "stop_seq",
    "node_idx",
    "stop_type",
    "request_ids",
    "lat",
    "lon",
];

/// Leaderboard columns that always come first, in this order.  Any other
/// metric follows.
pub const LEADERBOARD_KEY_COLUMNS: [&str; 18] = [
    "variant",
    "param_path",
    "param_value",
    "pickup_late_mean",
    "pickup_late_p95",
    "pickup_on_time_rate",
    "center_late_mean",
    "center_late_p95",
    "center_on_time_rate",
    "ride_time_mean",
    "ride_time_p95",
    "vehicles_used",
    "total_travel_time",
    "runtime_total_sec",
    "pickup_late_max",
    "center_late_max",
    "ride_time_max",
    "total_travel_time_min",
];

/// One stop as embedded in `routes.csv` and `map_data.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRow {
    pub stop_seq: usize,
    pub node_idx: usize,
    pub lat:      f64,
    pub lon:      f64,
    pub kind:     &'static str,
}

impl From<&Stop> for StopRow {
    fn from(s: &Stop) -> Self {
        Self {
            stop_seq: s.seq,
            node_idx: s.node,
            lat:      s.location.lat,
            lon:      s.location.lon,
            kind:     s.kind.as_str(),
        }
    }
}

/// One vehicle in `map_data.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapVehicle {
    pub vehicle_id: String,
    pub center_id:  u32,
    pub timeslot:   String,
    pub bus_type:   String,
    /// `[lat, lon]` per stop, in visiting order.
    pub coords:     Vec<[f64; 2]>,
    pub stops:      Vec<StopRow>,
}

impl From<&VehicleRoute> for MapVehicle {
    fn from(r: &VehicleRoute) -> Self {
        Self {
            vehicle_id: r.vehicle_id.clone(),
            center_id:  r.key.center.0,
            timeslot:   r.key.slot.to_string(),
            bus_type:   r.key.class.to_string(),
            coords:     r.stops.iter().map(|s| [s.location.lat, s.location.lon]).collect(),
            stops:      r.stops.iter().map(StopRow::from).collect(),
        }
    }
}

/// Root object of `map_data.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapData {
    pub vehicles: Vec<MapVehicle>,
}
