//! Service-slot time model.
//!
//! All simulation times are `f64` minutes since midnight of the service day.
//! A time slot is the center's required arrival time, written `HH:MM` in
//! configuration and request tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PtError;

/// A slot label parsed to whole minutes since midnight.
///
/// Ordering follows the time of day, so grouping by slot iterates the day in
/// chronological order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u16);

impl SlotTime {
    /// Build from hours and minutes.  `None` if either is out of range.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(SlotTime(hour * 60 + minute))
    }

    /// Minutes since midnight as the simulation's float time unit.
    #[inline]
    pub fn minutes(self) -> f64 {
        self.0 as f64
    }

    #[inline]
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    #[inline]
    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

/// Parse `HH:MM` into minutes since midnight.
pub fn parse_slot(s: &str) -> Result<SlotTime, PtError> {
    let invalid = || PtError::Parse(format!("invalid HH:MM time slot {s:?}"));
    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u16 = h.trim().parse().map_err(|_| invalid())?;
    let minute: u16 = m.trim().parse().map_err(|_| invalid())?;
    SlotTime::from_hm(hour, minute).ok_or_else(invalid)
}

impl FromStr for SlotTime {
    type Err = PtError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_slot(s)
    }
}

impl TryFrom<String> for SlotTime {
    type Error = PtError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_slot(&s)
    }
}

impl From<SlotTime> for String {
    fn from(t: SlotTime) -> String {
        t.to_string()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
