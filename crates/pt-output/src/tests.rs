//! Integration tests for pt-output.

// ── Helpers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod helpers {
    use tempfile::TempDir;

    use pt_core::{CenterId, GeoPoint, Request, SimConfig, VehicleClass};
    use pt_sim::{NoopObserver, RunOutput, SimBuilder};
    use pt_travel::GeometricModel;

    pub fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn requests(n: usize) -> Vec<Request> {
        (0..n)
            .map(|i| Request {
                id:              format!("r{i}"),
                pickup:          GeoPoint::new(37.50 + 0.003 * (i + 1) as f64, 127.00 + 0.001 * i as f64),
                center:          CenterId(0),
                center_location: GeoPoint::new(37.50, 127.00),
                slot:            "09:00".parse().unwrap(),
                class:           VehicleClass::General,
            })
            .collect()
    }

    pub fn config() -> SimConfig {
        let mut cfg = SimConfig::default();
        cfg.kpi.on_time_threshold_min = Some(10.0);
        cfg.fleet.capacity_general = 3;
        cfg
    }

    pub fn model() -> GeometricModel {
        GeometricModel::new(18.0, 1.0, 1.25, 0.2).unwrap()
    }

    /// A finished run with three vehicles (3 + 3 + 1 pickups).
    pub fn run() -> RunOutput {
        SimBuilder::new(config(), model())
            .requests(requests(7))
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap()
    }

    pub fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    pub fn records(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::helpers::{headers, records, run, tmp};
    use crate::csv::{CsvWriter, EVENTS_FILE, METRICS_FILE, ROUTES_FILE, ROUTE_STOPS_FILE};
    use crate::row::{EVENT_COLUMNS, ROUTE_COLUMNS, ROUTE_STOP_COLUMNS};
    use crate::writer::OutputWriter;

    #[test]
    fn files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir.path().join(EVENTS_FILE)), EVENT_COLUMNS);
        assert_eq!(headers(&dir.path().join(ROUTES_FILE)), ROUTE_COLUMNS);
        assert_eq!(headers(&dir.path().join(ROUTE_STOPS_FILE)), ROUTE_STOP_COLUMNS);
        assert!(dir.path().join(METRICS_FILE).exists());
    }

    #[test]
    fn vehicle_rows() {
        let out = run();
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let route = &out.routes[0];
        let events: Vec<_> = out.events.iter().filter(|e| e.vehicle_id == route.vehicle_id).cloned().collect();
        w.write_vehicle(route, &events).unwrap();
        w.finish().unwrap();

        let ev = records(&dir.path().join(EVENTS_FILE));
        assert_eq!(ev.len(), 3);
        assert_eq!(&ev[0][0], "0");
        assert_eq!(&ev[0][1], "09:00");
        assert_eq!(&ev[0][2], "GEN");
        assert_eq!(&ev[0][3], "v0_09:00_GEN_0");

        let routes = records(&dir.path().join(ROUTES_FILE));
        assert_eq!(routes.len(), 1);
        assert!(routes[0][4].starts_with("0,") && routes[0][4].ends_with(",0"));
        let stops: serde_json::Value = serde_json::from_str(&routes[0][7]).unwrap();
        assert_eq!(stops.as_array().unwrap().len(), 5);
        assert_eq!(stops[0]["kind"], "depot");
        assert_eq!(stops[4]["kind"], "center");

        let stop_rows = records(&dir.path().join(ROUTE_STOPS_FILE));
        assert_eq!(stop_rows.len(), 5);
        assert_eq!(&stop_rows[0][6], "depot");
        assert_eq!(&stop_rows[0][7], "");
        assert_eq!(&stop_rows[1][6], "pickup");
        assert!(stop_rows[1][7].starts_with('r'));
    }

    #[test]
    fn metrics_row() {
        let out = run();
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_metrics(&out.kpis).unwrap();
        w.finish().unwrap();

        let path = dir.path().join(METRICS_FILE);
        let h = headers(&path);
        assert_eq!(h[0], "pickup_late_mean");
        let vehicles = h.iter().position(|c| c == "vehicles_used").unwrap();
        let rows = records(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][vehicles], "3");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Map data ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod map_tests {
    use super::helpers::{run, tmp};
    use crate::json::{MapDataWriter, MAP_DATA_FILE};
    use crate::writer::OutputWriter;

    #[test]
    fn map_data_written_on_finish() {
        let out = run();
        let dir = tmp();
        let mut w = MapDataWriter::new(dir.path());
        for r in &out.routes {
            w.write_vehicle(r, &[]).unwrap();
        }
        assert!(!dir.path().join(MAP_DATA_FILE).exists());
        w.finish().unwrap();

        let text = std::fs::read_to_string(dir.path().join(MAP_DATA_FILE)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        let vehicles = v["vehicles"].as_array().unwrap();
        assert_eq!(vehicles.len(), 3);
        assert_eq!(vehicles[2]["vehicle_id"], "v0_09:00_GEN_2");
        // One pickup: depot, pickup, center.
        assert_eq!(vehicles[2]["coords"].as_array().unwrap().len(), 3);
        assert_eq!(vehicles[0]["coords"][0][0], 37.5);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use pt_sim::SimBuilder;

    use super::helpers::{config, model, records, requests, tmp};
    use crate::csv::{CsvWriter, EVENTS_FILE, ROUTES_FILE};
    use crate::json::{MapDataWriter, MAP_DATA_FILE};
    use crate::observer::RunOutputObserver;

    #[test]
    fn integration_csv_and_map() {
        let dir = tmp();
        let sim = SimBuilder::new(config(), model()).requests(requests(7)).build().unwrap();
        let writer = (CsvWriter::new(dir.path()).unwrap(), Some(MapDataWriter::new(dir.path())));
        let mut obs = RunOutputObserver::new(writer);
        let out = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        assert_eq!(records(&dir.path().join(EVENTS_FILE)).len(), out.events.len());
        assert_eq!(records(&dir.path().join(ROUTES_FILE)).len(), 3);
        assert!(dir.path().join(MAP_DATA_FILE).exists());

        let (_, map) = obs.into_writer();
        assert_eq!(map.map(|m| m.data().vehicles.len()), Some(3));
    }

    #[test]
    fn map_data_can_be_disabled() {
        let dir = tmp();
        let sim = SimBuilder::new(config(), model()).requests(requests(2)).build().unwrap();
        let writer = (CsvWriter::new(dir.path()).unwrap(), None::<MapDataWriter>);
        let mut obs = RunOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());
        assert!(!dir.path().join(MAP_DATA_FILE).exists());
    }
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod leaderboard_tests {
    use super::helpers::{headers, records, run, tmp};
    use crate::leaderboard::{write_leaderboard, LeaderboardRow, LEADERBOARD_FILE};
    use crate::row::LEADERBOARD_KEY_COLUMNS;

    #[test]
    fn key_columns_first() {
        let kpis = run().kpis;
        let rows = vec![
            LeaderboardRow {
                variant:     "v_0.90".into(),
                param_path:  "time_model.speed_multiplier".into(),
                param_value: "0.9".into(),
                kpis,
            },
            LeaderboardRow {
                variant:     "v_none".into(),
                param_path:  "time_model.speed_multiplier".into(),
                param_value: String::new(),
                kpis,
            },
        ];
        let dir = tmp();
        write_leaderboard(dir.path(), &rows).unwrap();

        let path = dir.path().join(LEADERBOARD_FILE);
        let h = headers(&path);
        assert_eq!(&h[..LEADERBOARD_KEY_COLUMNS.len()], LEADERBOARD_KEY_COLUMNS);
        let recs = records(&path);
        assert_eq!(recs.len(), 2);
        assert_eq!(&recs[0][0], "v_0.90");
        assert_eq!(&recs[1][2], "");
        assert_eq!(&recs[0][11], "3");
        // Every column is filled.
        assert!(recs[0].iter().skip(3).all(|c| !c.is_empty()));
    }

    #[test]
    fn empty_sweep_writes_header_only() {
        let dir = tmp();
        write_leaderboard(dir.path(), &[]).unwrap();
        let path = dir.path().join(LEADERBOARD_FILE);
        assert_eq!(headers(&path), LEADERBOARD_KEY_COLUMNS);
        assert!(records(&path).is_empty());
    }
}
