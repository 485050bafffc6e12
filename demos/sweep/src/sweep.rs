//! Sweep spec, per-variant runs, and the leaderboard.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use pt_core::config::{coerce_scalar, deep_set, load_json, merge_values};
use pt_core::{PtError, PtResult, SimConfig};
use pt_output::leaderboard::LEADERBOARD_FILE;
use pt_output::{CsvWriter, LeaderboardRow, MapDataWriter, RunOutputObserver, write_leaderboard};
use pt_sim::demand::{generate_requests, load_centers};
use pt_sim::{RunKpis, SimBuilder};

pub const RESOLVED_CONFIG_FILE: &str = "config_resolved.json";
const DEFAULT_RUN_ROOT: &str = "runs";

// ── Sweep spec ────────────────────────────────────────────────────────────────

/// One parameter and the values to try for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSpec {
    pub exp_name:   String,
    /// Dotted configuration path, e.g. `time_model.speed_multiplier`.
    pub param_path: String,
    /// Never empty.  String values are already coerced.
    pub values:     Vec<Value>,
}

impl SweepSpec {
    pub fn from_value(doc: &Value, source: &str) -> PtResult<Self> {
        let exp_name = match doc.get("exp_name") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | None => "exp".to_string(),
            Some(other) => other.to_string(),
        };

        let param_path = doc
            .get("param_path")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| PtError::Config(format!("missing 'param_path' in sweep spec {source}")))?
            .to_string();

        let values: Vec<Value> = match doc.get("values") {
            Some(Value::Array(vs)) if !vs.is_empty() => vs.iter().map(coerce_scalar).collect(),
            _ => {
                return Err(PtError::Config(format!(
                    "missing or invalid 'values' in sweep spec {source}"
                )));
            }
        };

        Ok(Self { exp_name, param_path, values })
    }

    pub fn load(path: &Path) -> PtResult<Self> {
        Self::from_value(&load_json(path)?, &path.display().to_string())
    }
}

// ── Variant naming ────────────────────────────────────────────────────────────

/// Lowercase, runs of anything outside `[a-z0-9_-]` become one `_`, no
/// leading or trailing `_`.  Empty input gives `"x"`.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() { "x".to_string() } else { trimmed.to_string() }
}

/// Directory name of one variant: `v_none`, `v_true`, `v_3`, `v_0.90`, or
/// `v_<slug>`.
pub fn variant_id(value: &Value) -> String {
    match value {
        Value::Null => "v_none".to_string(),
        Value::Bool(b) => format!("v_{b}"),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("v_{f:.2}"),
            _ => format!("v_{n}"),
        },
        Value::String(s) => format!("v_{}", slug(s)),
        other => format!("v_{}", slug(&other.to_string())),
    }
}

/// Leaderboard `param_value` cell.  `null` is written as an empty cell.
pub fn param_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn now_tag() -> String {
    jiff::Zoned::now().strftime("%Y%m%d_%H%M%S").to_string()
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Merged base configuration plus the sweep spec.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub base: Value,
    pub spec: SweepSpec,
}

impl SweepPlan {
    /// Merge `bases` in order, then `scenario` over them.
    pub fn load(bases: &[PathBuf], scenario: &Path, sweep: &Path) -> PtResult<Self> {
        let mut base = Value::Object(Default::default());
        for path in bases.iter().map(PathBuf::as_path).chain([scenario]) {
            base = merge_values(&base, &load_json(path)?);
            debug!(path = %path.display(), "merged config layer");
        }
        let spec = SweepSpec::load(sweep)?;
        Ok(Self { base, spec })
    }

    /// `<run_root>/<exp_tag>`.  The run root falls back to `paths.run_root`
    /// in the merged config, then `runs`.
    pub fn exp_dir(&self, run_root: Option<PathBuf>, exp_tag: Option<String>) -> PathBuf {
        let root = run_root
            .or_else(|| self.base.pointer("/paths/run_root").and_then(Value::as_str).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUN_ROOT));
        let tag = exp_tag.unwrap_or_else(|| format!("{}_{}", self.spec.exp_name, now_tag()));
        root.join(tag)
    }

    /// The configuration document of one variant.
    pub fn variant_doc(&self, value: &Value) -> PtResult<Value> {
        let mut doc = self.base.clone();
        deep_set(&mut doc, &self.spec.param_path, value.clone())?;
        Ok(doc)
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

/// Run one configuration end to end and write its artifacts to `out_dir`.
pub fn run_variant(doc: Value, out_dir: &Path) -> Result<RunKpis> {
    fs::create_dir_all(out_dir)?;
    let cfg = SimConfig::from_value(doc)?;

    let file = BufWriter::new(File::create(out_dir.join(RESOLVED_CONFIG_FILE))?);
    serde_json::to_writer_pretty(file, &cfg)?;

    let centers = load_centers(&cfg.service.centers_path, &cfg.service.districts)?;
    let requests = generate_requests(&centers, &cfg.service.slots, &cfg.demand)?;
    debug!(centers = centers.len(), requests = requests.len(), "demand generated");

    let map = cfg.outputs.write_map_data.then(|| MapDataWriter::new(out_dir));
    let mut obs = RunOutputObserver::new((CsvWriter::new(out_dir)?, map));

    let sim = SimBuilder::from_config(cfg)?.requests(requests).build()?;
    let out = sim.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        return Err(e.into());
    }
    Ok(out.kpis)
}

/// Run every variant of `plan` under `exp_dir` and write the leaderboard.
/// The first failing variant aborts the sweep.
pub fn run_sweep(plan: &SweepPlan, exp_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(exp_dir)
        .with_context(|| format!("cannot create experiment dir {}", exp_dir.display()))?;

    let mut rows = Vec::with_capacity(plan.spec.values.len());
    for value in &plan.spec.values {
        let variant = variant_id(value);
        let out_dir = exp_dir.join(&variant);
        info!(%variant, param = %plan.spec.param_path, %value, "running variant");

        let doc = plan.variant_doc(value)?;
        let kpis = run_variant(doc, &out_dir).with_context(|| format!("variant {variant} failed"))?;

        rows.push(LeaderboardRow {
            variant,
            param_path: plan.spec.param_path.clone(),
            param_value: param_value(value),
            kpis,
        });
    }

    write_leaderboard(exp_dir, &rows)?;
    Ok(exp_dir.join(LEADERBOARD_FILE))
}
