//! Run configuration.
//!
//! # Layering
//!
//! Configuration files are JSON objects.  A run's configuration is built by
//! deep-merging a list of base files and a scenario file with
//! [`merge_values`], then optionally overriding one dotted path per sweep
//! variant with [`deep_set`].  The merged document is deserialized into
//! [`SimConfig`] and checked with [`SimConfig::validate`] before any group is
//! simulated.
//!
//! ```json
//! {
//!   "seed": 123,
//!   "fleet":      { "capacity_general": 10, "capacity_wheelchair": 4,
//!                   "max_vehicles_per_center_slot": 3 },
//!   "routing":    { "partition": "center_distance", "distance": "travel_time",
//!                   "strategy": "two_opt" },
//!   "time_model": { "kind": "geometric", "speed_kmh": 18.0, "noise_sigma": 0.25 },
//!   "kpi":        { "on_time_threshold_min": 10.0 }
//! }
//! ```
//!
//! Every selector (`partition`, `distance`, `strategy`, `kind`) rejects
//! unknown values with [`PtError::UnknownSelector`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{PtError, PtResult, SlotTime, VehicleClass};

// ── Selector enums ────────────────────────────────────────────────────────────

/// Generate a string-selected enum with `FromStr`, `Display`, and serde
/// string conversion that fails with [`PtError::UnknownSelector`].
macro_rules! selector {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident : $what:literal {
            $( $(#[$vattr:meta])* $variant:ident = $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        $vis enum $name {
            $( $(#[$vattr])* $variant ),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = PtError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $label $(| $alias)* => Ok($name::$variant), )+
                    _ => Err(PtError::UnknownSelector {
                        what:     $what,
                        value:    s.to_string(),
                        expected: concat!($( $label, " " ),+),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = PtError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

selector! {
    /// How a (center, slot, class) group is split into vehicle groups.
    pub enum PartitionPolicy: "partition policy" {
        /// Consecutive blocks in arrival order.
        Chunk = "chunk",
        /// Sort by great-circle distance to the center, then chunk.
        CenterDistance = "center_distance" | "center_dist",
    }
}

selector! {
    /// Cost used by the tour sequencer.
    pub enum DistanceKind: "distance source" {
        /// Planar distance between raw coordinates.
        Euclidean = "euclidean" | "euclid",
        /// The mean travel-time matrix.
        TravelTime = "travel_time" | "time",
    }
}

selector! {
    /// Tour sequencing heuristic.
    pub enum Strategy: "sequencing strategy" {
        NearestNeighbor = "nearest_neighbor" | "nn",
        TwoOpt = "two_opt" | "2opt",
        Tabu = "tabu",
        /// Regret-2 insertion → 2-opt → tabu → genetic refinement.
        RegretHybrid = "regret_hybrid" | "hybrid",
    }
}

selector! {
    /// Travel-time backend.
    pub enum TimeModelKind: "travel-time model kind" {
        Geometric = "geometric" | "euclid",
        Road = "road",
    }
}

// ── Config tree ───────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed:       u64,
    pub fleet:      FleetConfig,
    pub routing:    RoutingConfig,
    pub time_model: TimeModelConfig,
    pub kpi:        KpiConfig,
    pub demand:     DemandConfig,
    pub service:    ServiceConfig,
    pub outputs:    OutputConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:       123,
            fleet:      FleetConfig::default(),
            routing:    RoutingConfig::default(),
            time_model: TimeModelConfig::default(),
            kpi:        KpiConfig::default(),
            demand:     DemandConfig::default(),
            service:    ServiceConfig::default(),
            outputs:    OutputConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub capacity_general:             usize,
    pub capacity_wheelchair:          usize,
    pub max_vehicles_per_center_slot: usize,
}

impl FleetConfig {
    /// Seats per vehicle for the given class.
    pub fn capacity_for(&self, class: VehicleClass) -> usize {
        match class {
            VehicleClass::General    => self.capacity_general,
            VehicleClass::Wheelchair => self.capacity_wheelchair,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            capacity_general:             10,
            capacity_wheelchair:          4,
            max_vehicles_per_center_slot: 3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub partition:          PartitionPolicy,
    pub distance:           DistanceKind,
    pub strategy:           Strategy,
    /// Pass cap that guarantees 2-opt terminates.
    pub two_opt_max_passes: usize,
    pub tabu:               TabuConfig,
    pub genetic:            GeneticConfig,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            partition:          PartitionPolicy::Chunk,
            distance:           DistanceKind::TravelTime,
            strategy:           Strategy::NearestNeighbor,
            two_opt_max_passes: 30,
            tabu:               TabuConfig::default(),
            genetic:            GeneticConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuConfig {
    pub iterations: usize,
    /// Iterations a used swap stays forbidden.
    pub tenure:     usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self { iterations: 200, tenure: 20 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population:    usize,
    pub generations:   usize,
    pub mutation_rate: f64,
    /// Individuals copied unchanged into the next generation.
    pub elite:         usize,
    /// Parents are drawn from this many best individuals.
    pub parent_pool:   usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population:    20,
            generations:   30,
            mutation_rate: 0.1,
            elite:         5,
            parent_pool:   10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeModelConfig {
    pub kind:             TimeModelKind,
    /// Base vehicle speed of the geometric model.
    pub speed_kmh:        f64,
    /// Global congestion multiplier applied to every speed.
    pub speed_multiplier: f64,
    /// Ratio of road distance to great-circle distance.
    pub detour_factor:    f64,
    /// Log-normal shape parameter of the geometric model's noise.
    pub noise_sigma:      f64,
    pub road:             RoadConfig,
}

impl Default for TimeModelConfig {
    fn default() -> Self {
        Self {
            kind:             TimeModelKind::Geometric,
            speed_kmh:        18.0,
            speed_multiplier: 1.0,
            detour_factor:    1.25,
            noise_sigma:      0.25,
            road:             RoadConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Directory holding `nodes.csv` and `edges.csv`.
    pub graph_dir:           PathBuf,
    /// Speed for unknown road classes and the geometric last-resort estimate.
    pub fallback_speed_kmh:  f64,
    /// Use a parseable posted `maxspeed` before the class table.
    pub prefer_maxspeed:     bool,
    pub min_speed_kmh:       f64,
    pub speed_kmh_by_class:  BTreeMap<String, f64>,
    pub multiplier_by_class: BTreeMap<String, f64>,
    pub node_cache_capacity: usize,
    pub path_cache_capacity: usize,
}

/// Default speeds (km/h) per normalized road class.
pub fn default_speed_table() -> BTreeMap<String, f64> {
    [
        ("motorway", 80.0),
        ("trunk", 70.0),
        ("primary", 50.0),
        ("secondary", 40.0),
        ("tertiary", 30.0),
        ("residential", 25.0),
        ("living_street", 15.0),
        ("service", 15.0),
        ("unclassified", 30.0),
        ("road", 30.0),
        ("unknown", 25.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            graph_dir:           PathBuf::from("data/graph"),
            fallback_speed_kmh:  25.0,
            prefer_maxspeed:     false,
            min_speed_kmh:       3.0,
            speed_kmh_by_class:  default_speed_table(),
            multiplier_by_class: BTreeMap::new(),
            node_cache_capacity: 200_000,
            path_cache_capacity: 400_000,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Lateness (minutes) at or below which a stop counts as on time.
    /// Required whenever there is at least one event.
    pub on_time_threshold_min: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandConfig {
    pub requests_per_slot: usize,
    pub wheelchair_ratio:  f64,
    pub radius_min_km:     f64,
    pub radius_max_km:     f64,
    pub seed:              u64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            requests_per_slot: 40,
            wheelchair_ratio:  0.2,
            radius_min_km:     0.5,
            radius_max_km:     5.0,
            seed:              42,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// CSV with `district,name,lat,lon` columns.
    pub centers_path: PathBuf,
    /// District filter; `["ALL"]` keeps every center.
    pub districts:    Vec<String>,
    /// Required center-arrival slots.
    pub slots:        Vec<SlotTime>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            centers_path: PathBuf::from("data/centers.csv"),
            districts:    vec!["ALL".to_string()],
            slots:        Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub write_map_data: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { write_map_data: true }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

fn require(ok: bool, msg: impl FnOnce() -> String) -> PtResult<()> {
    if ok { Ok(()) } else { Err(PtError::Config(msg())) }
}

fn require_positive(name: &str, v: f64) -> PtResult<()> {
    require(v.is_finite() && v > 0.0, || format!("{name} must be > 0 (got {v})"))
}

impl SimConfig {
    /// Deserialize a merged JSON document and validate it.
    pub fn from_value(value: Value) -> PtResult<Self> {
        let cfg: SimConfig =
            serde_json::from_value(value).map_err(|e| PtError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fail fast on parameters no simulation step can work with.
    pub fn validate(&self) -> PtResult<()> {
        let f = &self.fleet;
        require(f.capacity_general > 0, || {
            format!("fleet.capacity_general must be > 0 (got {})", f.capacity_general)
        })?;
        require(f.capacity_wheelchair > 0, || {
            format!("fleet.capacity_wheelchair must be > 0 (got {})", f.capacity_wheelchair)
        })?;
        require(f.max_vehicles_per_center_slot > 0, || {
            format!(
                "fleet.max_vehicles_per_center_slot must be > 0 (got {})",
                f.max_vehicles_per_center_slot
            )
        })?;

        let tm = &self.time_model;
        require_positive("time_model.speed_kmh", tm.speed_kmh)?;
        require_positive("time_model.speed_multiplier", tm.speed_multiplier)?;
        require_positive("time_model.detour_factor", tm.detour_factor)?;
        require(tm.noise_sigma.is_finite() && tm.noise_sigma >= 0.0, || {
            format!("time_model.noise_sigma must be >= 0 (got {})", tm.noise_sigma)
        })?;
        require_positive("time_model.road.fallback_speed_kmh", tm.road.fallback_speed_kmh)?;
        require_positive("time_model.road.min_speed_kmh", tm.road.min_speed_kmh)?;
        for (class, v) in &tm.road.speed_kmh_by_class {
            require_positive(&format!("time_model.road.speed_kmh_by_class.{class}"), *v)?;
        }
        for (class, v) in &tm.road.multiplier_by_class {
            require_positive(&format!("time_model.road.multiplier_by_class.{class}"), *v)?;
        }

        let g = &self.routing.genetic;
        require(g.population >= 2, || {
            format!("routing.genetic.population must be >= 2 (got {})", g.population)
        })?;
        require(g.elite >= 1 && g.elite <= g.population, || {
            format!(
                "routing.genetic.elite must be in 1..={} (got {})",
                g.population, g.elite
            )
        })?;
        require(g.parent_pool >= 2, || {
            format!("routing.genetic.parent_pool must be >= 2 (got {})", g.parent_pool)
        })?;
        require((0.0..=1.0).contains(&g.mutation_rate), || {
            format!("routing.genetic.mutation_rate must be in [0,1] (got {})", g.mutation_rate)
        })?;

        let d = &self.demand;
        require((0.0..=1.0).contains(&d.wheelchair_ratio), || {
            format!("demand.wheelchair_ratio must be in [0,1] (got {})", d.wheelchair_ratio)
        })?;
        require(
            d.radius_min_km >= 0.0 && d.radius_max_km > 0.0 && d.radius_min_km <= d.radius_max_km,
            || {
                format!(
                    "invalid demand radius range: radius_min_km={}, radius_max_km={}",
                    d.radius_min_km, d.radius_max_km
                )
            },
        )?;

        if let Some(thr) = self.kpi.on_time_threshold_min {
            require(thr.is_finite(), || {
                format!("kpi.on_time_threshold_min must be finite (got {thr})")
            })?;
        }
        Ok(())
    }
}

// ── JSON layering ─────────────────────────────────────────────────────────────

/// Read a JSON configuration document.  The root must be an object.
pub fn load_json(path: &Path) -> PtResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PtError::Config(format!("cannot read config file {}: {e}", path.display()))
    })?;
    let value: Value = serde_json::from_str(&text)?;
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        other => Err(PtError::Config(format!(
            "config root must be an object, got {} @ {}",
            json_kind(&other),
            path.display()
        ))),
    }
}

/// Deep-merge `overlay` into a copy of `base`.  Objects merge key by key;
/// anything else in `overlay` replaces the base value.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    let mut out = base.clone();
    merge_into(&mut out, overlay);
    out
}

fn merge_into(dst: &mut Value, src: &Value) {
    match (dst, src) {
        (Value::Object(d), Value::Object(s)) => {
            for (k, v) in s {
                match d.get_mut(k) {
                    Some(existing) if existing.is_object() && v.is_object() => {
                        merge_into(existing, v)
                    }
                    _ => {
                        d.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (dst, src) => *dst = src.clone(),
    }
}

/// Set `dotted_path` (e.g. `"time_model.speed_multiplier"`) to `value`,
/// creating missing intermediate objects.
pub fn deep_set(doc: &mut Value, dotted_path: &str, value: Value) -> PtResult<()> {
    let keys: Vec<&str> = dotted_path.split('.').collect();
    let (last, parents) = keys
        .split_last()
        .filter(|(last, _)| !last.is_empty())
        .ok_or_else(|| PtError::Config(format!("invalid parameter path {dotted_path:?}")))?;

    let mut cur = doc;
    for k in parents {
        let obj = cur.as_object_mut().ok_or_else(|| {
            PtError::Config(format!("cannot deep-set {dotted_path:?}: parent of {k:?} is not an object"))
        })?;
        cur = obj
            .entry(k.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !cur.is_object() {
            return Err(PtError::Config(format!(
                "cannot deep-set {dotted_path:?}: {k:?} is not an object (got {})",
                json_kind(cur)
            )));
        }
    }
    let obj = cur.as_object_mut().ok_or_else(|| {
        PtError::Config(format!("cannot deep-set {dotted_path:?}: root is not an object"))
    })?;
    obj.insert(last.to_string(), value);
    Ok(())
}

/// Interpret a sweep value given as a string: `none`/`null`/`~` → null,
/// `true`/`false` → bool, numeric text → number, anything else stays text.
pub fn coerce_scalar(value: &Value) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };
    let t = s.trim();
    let lower = t.to_ascii_lowercase();
    match lower.as_str() {
        "none" | "null" | "~" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if !(t.contains('.') || lower.contains('e')) {
        if let Ok(i) = t.parse::<i64>() {
            return Value::from(i);
        }
    } else if let Ok(f) = t.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    value.clone()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
