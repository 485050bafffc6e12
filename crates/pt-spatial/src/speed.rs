//! Road-class speed resolution and speed profiles.
//!
//! An edge's travel time is computed in two steps:
//!
//! 1. **Base speed**: a parseable posted `maxspeed` when
//!    `prefer_maxspeed` is set, else the per-class table entry, else the
//!    global fallback speed.  Never below 1 km/h.
//! 2. **Profile**: `effective = max(min_speed, base × global × class_mult)`;
//!    travel time is `length / effective`, with `length` floored at 1 m.
//!
//! Road-class tags are normalized first: lowercase, trimmed, `_link` stripped,
//! multi-valued tags keep their first value, empty means `unknown`.

use std::collections::BTreeMap;

use pt_core::config::RoadConfig;

/// Shortest edge length used for weighting.
pub const MIN_EDGE_LENGTH_M: f64 = 1.0;

const MPH_TO_KPH: f64 = 1.609_34;

/// Canonical road class for a raw `highway` tag.
pub fn normalize_highway(raw: &str) -> String {
    let first = raw.split([';', '|']).next().unwrap_or("");
    let hw = first.trim().to_ascii_lowercase();
    let hw = hw.strip_suffix("_link").unwrap_or(&hw);
    if hw.is_empty() { "unknown".to_string() } else { hw.to_string() }
}

/// Parse a posted speed limit into km/h.
///
/// Takes the first numeric token of the first `;` / `,` / `|` separated
/// value; `mph` converts.  Non-numeric values such as `"signals"` yield
/// `None`.
pub fn parse_maxspeed_kph(raw: &str) -> Option<f64> {
    let lower = raw.trim().to_ascii_lowercase();
    let first = lower.split([';', ',', '|']).next().unwrap_or("").trim();

    let num: String = first
        .chars()
        .skip_while(|c| !(c.is_ascii_digit() || *c == '.'))
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let v: f64 = num.parse().ok()?;
    if !v.is_finite() || v <= 0.0 {
        return None;
    }
    Some(if first.contains("mph") { v * MPH_TO_KPH } else { v })
}

// ── SpeedProfile ──────────────────────────────────────────────────────────────

/// Resolved per-class speeds plus the multipliers of one run.
#[derive(Clone, Debug)]
pub struct SpeedProfile {
    pub speed_kmh_by_class:  BTreeMap<String, f64>,
    pub fallback_speed_kmh:  f64,
    pub prefer_maxspeed:     bool,
    pub min_speed_kmh:       f64,
    pub global_multiplier:   f64,
    pub multiplier_by_class: BTreeMap<String, f64>,
}

impl SpeedProfile {
    /// Build from the road section of the configuration and the global
    /// congestion multiplier.
    pub fn from_config(road: &RoadConfig, global_multiplier: f64) -> Self {
        Self {
            speed_kmh_by_class:  road.speed_kmh_by_class.clone(),
            fallback_speed_kmh:  road.fallback_speed_kmh,
            prefer_maxspeed:     road.prefer_maxspeed,
            min_speed_kmh:       road.min_speed_kmh,
            global_multiplier,
            multiplier_by_class: road.multiplier_by_class.clone(),
        }
    }

    /// Base speed before multipliers.
    pub fn base_speed_kmh(&self, class: &str, maxspeed: Option<&str>) -> f64 {
        let posted = if self.prefer_maxspeed {
            maxspeed.and_then(parse_maxspeed_kph)
        } else {
            None
        };
        let base = posted.unwrap_or_else(|| {
            self.speed_kmh_by_class
                .get(class)
                .copied()
                .unwrap_or(self.fallback_speed_kmh)
        });
        base.max(1.0)
    }

    /// Speed after the global and per-class multipliers, floored at the
    /// minimum speed.
    pub fn effective_speed_kmh(&self, class: &str, maxspeed: Option<&str>) -> f64 {
        let class_mult = self.multiplier_by_class.get(class).copied().unwrap_or(1.0);
        let v = self.base_speed_kmh(class, maxspeed) * self.global_multiplier * class_mult;
        v.max(self.min_speed_kmh)
    }

    /// Edge travel time in milliseconds.  `class` must already be normalized.
    pub fn travel_ms(&self, length_m: f64, class: &str, maxspeed: Option<&str>) -> u32 {
        let length = length_m.max(MIN_EDGE_LENGTH_M);
        let mps = self.effective_speed_kmh(class, maxspeed) / 3.6;
        let ms = (length / mps * 1_000.0).round();
        ms.min(u32::MAX as f64) as u32
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::from_config(&RoadConfig::default(), 1.0)
    }
}
