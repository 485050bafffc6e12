//! `pt-output`: run artifact writers for the paratransit fleet simulator.
//!
//! | Writer            | Files created                                                     |
//! |-------------------|-------------------------------------------------------------------|
//! | [`CsvWriter`]     | `events.csv`, `routes.csv`, `routes_stops.csv`, `metrics.csv`     |
//! | [`MapDataWriter`] | `map_data.json`                                                   |
//! | [`write_leaderboard`] | `leaderboard.csv` (one row per sweep variant)                 |
//!
//! Per-run writers implement [`OutputWriter`] and are driven by
//! [`RunOutputObserver`], which implements `pt_sim::SimObserver`.  Pairs and
//! `Option`s of writers are writers too.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pt_output::{CsvWriter, MapDataWriter, RunOutputObserver};
//!
//! let map = cfg.outputs.write_map_data.then(|| MapDataWriter::new(dir));
//! let mut obs = RunOutputObserver::new((CsvWriter::new(dir)?, map));
//! let out = sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod leaderboard;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::MapDataWriter;
pub use leaderboard::{write_leaderboard, LeaderboardRow};
pub use observer::RunOutputObserver;
pub use row::{MapData, MapVehicle, StopRow};
pub use writer::OutputWriter;
