//! Passenger requests, service centers, and the vehicle class split.
//!
//! Requests are produced by demand sampling and consumed read-only by the
//! routing core.  Each request belongs to exactly one (center, slot, class)
//! group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CenterId, GeoPoint, PtError, SlotTime};

// ── VehicleClass ──────────────────────────────────────────────────────────────

/// Which vehicle fleet serves a request.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VehicleClass {
    /// Standard vehicle.
    #[default]
    General,
    /// Wheelchair-accessible vehicle (usually lower seat capacity).
    Wheelchair,
}

impl VehicleClass {
    /// Short tag used in vehicle ids and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::General    => "GEN",
            VehicleClass::Wheelchair => "WC",
        }
    }

    /// Stable small integer for seed mixing.
    #[inline]
    pub fn ordinal(self) -> u64 {
        match self {
            VehicleClass::General    => 0,
            VehicleClass::Wheelchair => 1,
        }
    }
}

impl FromStr for VehicleClass {
    type Err = PtError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GEN" | "GENERAL"     => Ok(VehicleClass::General),
            "WC" | "WHEELCHAIR"   => Ok(VehicleClass::Wheelchair),
            _ => Err(PtError::UnknownSelector {
                what:     "vehicle class",
                value:    s.to_string(),
                expected: "GEN, WC",
            }),
        }
    }
}

impl TryFrom<String> for VehicleClass {
    type Error = PtError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VehicleClass> for String {
    fn from(c: VehicleClass) -> String {
        c.as_str().to_string()
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Center ────────────────────────────────────────────────────────────────────

/// A service center: the depot every vehicle group starts from and returns to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub id:       CenterId,
    pub name:     String,
    pub district: String,
    pub location: GeoPoint,
}

// ── Request ───────────────────────────────────────────────────────────────────

/// One passenger trip to a center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id:       String,
    pub pickup:   GeoPoint,
    pub center:   CenterId,
    /// Center coordinate, carried so a group never needs the center table.
    pub center_location: GeoPoint,
    pub slot:     SlotTime,
    pub class:    VehicleClass,
}
