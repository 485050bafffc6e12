//! Tests for the sweep driver.

#[cfg(test)]
mod helpers {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use serde_json::{Value, json};

    pub fn write_json(path: &Path, value: &Value) -> PathBuf {
        std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path.to_path_buf()
    }

    pub fn write_centers(dir: &Path) -> PathBuf {
        let path = dir.join("centers.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "district,name,lat,lon").unwrap();
        writeln!(f, "Gangnam,Gangnam Welfare Center,37.4979,127.0276").unwrap();
        writeln!(f, "Mapo,Mapo Welfare Center,37.5663,126.9019").unwrap();
        path
    }

    /// A small, fast base configuration pointing at `centers`.
    pub fn base(centers: &Path) -> Value {
        json!({
            "seed": 7,
            "fleet": { "capacity_general": 4, "capacity_wheelchair": 2,
                       "max_vehicles_per_center_slot": 8 },
            "kpi": { "on_time_threshold_min": 10.0 },
            "demand": { "requests_per_slot": 12, "seed": 3 },
            "service": { "centers_path": centers, "districts": ["ALL"],
                         "slots": ["09:00", "10:00"] },
            "outputs": { "write_map_data": false }
        })
    }
}

// ── Spec ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::sweep::SweepSpec;

    #[test]
    fn values_are_coerced() {
        let doc = json!({
            "exp_name": "time_mult",
            "param_path": "time_model.speed_multiplier",
            "values": ["0.9", 1.1, "none", "true"]
        });
        let spec = SweepSpec::from_value(&doc, "test").unwrap();
        assert_eq!(spec.exp_name, "time_mult");
        assert_eq!(spec.values, vec![json!(0.9), json!(1.1), json!(null), json!(true)]);
    }

    #[test]
    fn exp_name_defaults() {
        let doc = json!({ "param_path": "seed", "values": [1] });
        assert_eq!(SweepSpec::from_value(&doc, "test").unwrap().exp_name, "exp");
    }

    #[test]
    fn missing_param_path_is_config_error() {
        let doc = json!({ "values": [1] });
        assert!(SweepSpec::from_value(&doc, "test").is_err());
    }

    #[test]
    fn empty_values_is_config_error() {
        let doc = json!({ "param_path": "seed", "values": [] });
        assert!(SweepSpec::from_value(&doc, "test").is_err());
        let doc = json!({ "param_path": "seed", "values": 3 });
        assert!(SweepSpec::from_value(&doc, "test").is_err());
    }
}

// ── Variant naming ────────────────────────────────────────────────────────────

#[cfg(test)]
mod naming {
    use serde_json::json;

    use crate::sweep::{param_value, slug, variant_id};

    #[test]
    fn variant_ids() {
        assert_eq!(variant_id(&json!(null)), "v_none");
        assert_eq!(variant_id(&json!(true)), "v_true");
        assert_eq!(variant_id(&json!(false)), "v_false");
        assert_eq!(variant_id(&json!(3)), "v_3");
        assert_eq!(variant_id(&json!(0.9)), "v_0.90");
        assert_eq!(variant_id(&json!(1.0)), "v_1.00");
        assert_eq!(variant_id(&json!("Center Distance")), "v_center_distance");
    }

    #[test]
    fn slugs() {
        assert_eq!(slug("  Two-Opt!! v2 "), "two-opt_v2");
        assert_eq!(slug("__a__b__"), "a_b");
        assert_eq!(slug("!!!"), "x");
        assert_eq!(slug(""), "x");
    }

    #[test]
    fn param_values() {
        assert_eq!(param_value(&json!(null)), "");
        assert_eq!(param_value(&json!("tabu")), "tabu");
        assert_eq!(param_value(&json!(0.9)), "0.9");
        assert_eq!(param_value(&json!(true)), "true");
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod plan {
    use std::path::PathBuf;

    use serde_json::json;

    use super::helpers::write_json;
    use crate::sweep::SweepPlan;

    #[test]
    fn layers_merge_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_json(&dir.path().join("a.json"), &json!({ "seed": 1, "fleet": { "capacity_general": 8 } }));
        let b = write_json(&dir.path().join("b.json"), &json!({ "seed": 2 }));
        let scen = write_json(&dir.path().join("s.json"), &json!({ "fleet": { "capacity_wheelchair": 3 } }));
        let sweep = write_json(
            &dir.path().join("sw.json"),
            &json!({ "exp_name": "e", "param_path": "seed", "values": [5] }),
        );

        let plan = SweepPlan::load(&[a, b], &scen, &sweep).unwrap();
        assert_eq!(plan.base["seed"], 2);
        assert_eq!(plan.base["fleet"]["capacity_general"], 8);
        assert_eq!(plan.base["fleet"]["capacity_wheelchair"], 3);

        let doc = plan.variant_doc(&json!(5)).unwrap();
        assert_eq!(doc["seed"], 5);
        assert_eq!(plan.base["seed"], 2);
    }

    #[test]
    fn exp_dir_resolution() {
        let spec = crate::sweep::SweepSpec {
            exp_name:   "e".into(),
            param_path: "seed".into(),
            values:     vec![json!(1)],
        };
        let plan = SweepPlan { base: json!({ "paths": { "run_root": "out" } }), spec };

        assert_eq!(plan.exp_dir(None, Some("t".into())), PathBuf::from("out/t"));
        assert_eq!(plan.exp_dir(Some("r".into()), Some("t".into())), PathBuf::from("r/t"));

        let tagged = plan.exp_dir(None, None);
        let name = tagged.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("e_"));
        assert_eq!(name.len(), "e_YYYYmmdd_HHMMSS".len());
    }
}

// ── End to end ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod end_to_end {
    use serde_json::json;

    use super::helpers::{base, write_centers};
    use crate::sweep::{RESOLVED_CONFIG_FILE, SweepPlan, SweepSpec, run_sweep};

    #[test]
    fn sweep_writes_variants_and_leaderboard() {
        let dir = tempfile::tempdir().unwrap();
        let centers = write_centers(dir.path());
        let plan = SweepPlan {
            base: base(&centers),
            spec: SweepSpec {
                exp_name:   "time_mult".into(),
                param_path: "time_model.speed_multiplier".into(),
                values:     vec![json!(0.9), json!(1.1)],
            },
        };
        let exp_dir = dir.path().join("runs/test");

        let leaderboard = run_sweep(&plan, &exp_dir).unwrap();
        assert_eq!(leaderboard, exp_dir.join("leaderboard.csv"));

        for variant in ["v_0.90", "v_1.10"] {
            let out = exp_dir.join(variant);
            assert!(out.join(RESOLVED_CONFIG_FILE).exists(), "{variant}");
            assert!(out.join("events.csv").exists(), "{variant}");
            assert!(out.join("metrics.csv").exists(), "{variant}");
            assert!(!out.join("map_data.json").exists(), "{variant}");
        }

        let resolved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(exp_dir.join("v_0.90").join(RESOLVED_CONFIG_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(resolved["time_model"]["speed_multiplier"], 0.9);

        let mut rdr = csv::Reader::from_path(&leaderboard).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "v_0.90");
        assert_eq!(&rows[0][1], "time_model.speed_multiplier");
        assert_eq!(&rows[1][2], "1.1");

        // Both variants see the same demand, so both place every request.
        let events = |v: &str| {
            csv::Reader::from_path(exp_dir.join(v).join("events.csv")).unwrap().records().count()
        };
        assert_eq!(events("v_0.90"), 24);
        assert_eq!(events("v_1.10"), 24);
    }

    #[test]
    fn invalid_variant_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let centers = write_centers(dir.path());
        let plan = SweepPlan {
            base: base(&centers),
            spec: SweepSpec {
                exp_name:   "bad".into(),
                param_path: "routing.strategy".into(),
                values:     vec![json!("simulated_annealing")],
            },
        };
        assert!(run_sweep(&plan, &dir.path().join("runs/bad")).is_err());
    }
}
