//! `map_data.json` backend.
//!
//! Collects one entry per vehicle (stop coordinates in visiting order plus
//! stop kinds) and writes the file on [`finish`][OutputWriter::finish].

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use pt_sim::{Event, RunKpis, VehicleRoute};

use crate::row::{MapData, MapVehicle};
use crate::writer::OutputWriter;
use crate::OutputResult;

pub const MAP_DATA_FILE: &str = "map_data.json";

pub struct MapDataWriter {
    path:     PathBuf,
    data:     MapData,
    finished: bool,
}

impl MapDataWriter {
    pub fn new(dir: &Path) -> Self {
        Self {
            path:     dir.join(MAP_DATA_FILE),
            data:     MapData::default(),
            finished: false,
        }
    }

    pub fn data(&self) -> &MapData {
        &self.data
    }
}

impl OutputWriter for MapDataWriter {
    fn write_vehicle(&mut self, route: &VehicleRoute, _events: &[Event]) -> OutputResult<()> {
        self.data.vehicles.push(MapVehicle::from(route));
        Ok(())
    }

    fn write_metrics(&mut self, _kpis: &RunKpis) -> OutputResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let file = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(file, &self.data)?;
        Ok(())
    }
}
