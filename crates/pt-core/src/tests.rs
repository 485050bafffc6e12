//! Unit tests for pt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CenterId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(CenterId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(CenterId(7).to_string(), "7");
        assert_eq!(NodeId(7).to_string(), "node 7");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(37.5665, 126.9780);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(37.0, 127.0);
        let b = GeoPoint::new(38.0, 127.0);
        let d = a.distance_km(b);
        assert!((d - 111.195).abs() < 0.5, "got {d}");
    }

    #[test]
    fn planar_distance_is_degree_euclid() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert!((a.planar_distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rounded_key_collapses_metre_scale_jitter() {
        let a = GeoPoint::new(37.566_501, 126.978_001);
        let b = GeoPoint::new(37.566_502, 126.978_002);
        assert_eq!(a.rounded_key(), b.rounded_key());
    }
}

#[cfg(test)]
mod time {
    use crate::time::parse_slot;
    use crate::{PtError, SlotTime};

    #[test]
    fn parses_hh_mm() {
        let t = parse_slot("09:30").unwrap();
        assert_eq!(t.minutes(), 570.0);
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_slot("25:00"), Err(PtError::Parse(_))));
        assert!(matches!(parse_slot("0930"), Err(PtError::Parse(_))));
        assert!(matches!(parse_slot("aa:bb"), Err(PtError::Parse(_))));
    }

    #[test]
    fn slots_order_by_time_of_day() {
        let a: SlotTime = "08:00".parse().unwrap();
        let b: SlotTime = "13:15".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn serde_uses_label() {
        let t = SlotTime::from_hm(7, 5).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"07:05\"");
        let back: SlotTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}

#[cfg(test)]
mod rng {
    use crate::rng::mix_key;
    use crate::{RngStream, StreamRng};

    #[test]
    fn same_key_same_sequence() {
        let mut a = StreamRng::for_key(123, RngStream::TravelTime, 9);
        let mut b = StreamRng::for_key(123, RngStream::TravelTime, 9);
        let xa: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let xb: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xa, xb);
    }

    #[test]
    fn streams_are_independent() {
        let mut a = StreamRng::for_key(123, RngStream::TravelTime, 9);
        let mut b = StreamRng::for_key(123, RngStream::Heuristic, 9);
        let xa: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let xb: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xa, xb);
    }

    #[test]
    fn mix_key_is_order_sensitive() {
        assert_eq!(mix_key(&[1, 2, 3]), mix_key(&[1, 2, 3]));
        assert_ne!(mix_key(&[1, 2, 3]), mix_key(&[3, 2, 1]));
    }

    #[test]
    fn distinct_pair_is_sorted_and_in_range() {
        let mut rng = StreamRng::new(7, RngStream::Heuristic);
        for _ in 0..500 {
            let (i, j) = rng.distinct_pair(1..4);
            assert!(i < j);
            assert!(i >= 1 && j < 4);
        }
    }
}

#[cfg(test)]
mod request {
    use crate::{PtError, VehicleClass};

    #[test]
    fn class_parse_and_display() {
        assert_eq!("wc".parse::<VehicleClass>().unwrap(), VehicleClass::Wheelchair);
        assert_eq!("GENERAL".parse::<VehicleClass>().unwrap(), VehicleClass::General);
        assert_eq!(VehicleClass::Wheelchair.to_string(), "WC");
    }

    #[test]
    fn unknown_class_is_selector_error() {
        let err = "bus".parse::<VehicleClass>().unwrap_err();
        assert!(matches!(err, PtError::UnknownSelector { .. }));
    }
}

#[cfg(test)]
mod config {
    use serde_json::json;

    use crate::config::{coerce_scalar, deep_set, merge_values, Strategy, TimeModelKind};
    use crate::{PtError, SimConfig, VehicleClass};

    #[test]
    fn defaults_validate() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.routing.two_opt_max_passes, 30);
        assert_eq!(cfg.routing.tabu.iterations, 200);
        assert_eq!(cfg.routing.tabu.tenure, 20);
        assert_eq!(cfg.fleet.capacity_for(VehicleClass::Wheelchair), 4);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg = SimConfig::from_value(json!({
            "seed": 9,
            "routing": { "strategy": "tabu" },
            "time_model": { "kind": "road" }
        }))
        .unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.routing.strategy, Strategy::Tabu);
        assert_eq!(cfg.time_model.kind, TimeModelKind::Road);
        assert_eq!(cfg.time_model.speed_kmh, 18.0);
        assert_eq!(cfg.time_model.road.speed_kmh_by_class["motorway"], 80.0);
    }

    #[test]
    fn unknown_strategy_fails() {
        let err = SimConfig::from_value(json!({ "routing": { "strategy": "simulated_annealing" } }))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("simulated_annealing"), "{msg}");

        let direct = "simulated_annealing".parse::<Strategy>().unwrap_err();
        assert!(matches!(direct, PtError::UnknownSelector { .. }));
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut cfg = SimConfig::default();
        cfg.fleet.capacity_general = 0;
        assert!(matches!(cfg.validate(), Err(PtError::Config(_))));
    }

    #[test]
    fn non_positive_speed_rejected() {
        let mut cfg = SimConfig::default();
        cfg.time_model.speed_kmh = 0.0;
        assert!(matches!(cfg.validate(), Err(PtError::Config(_))));
    }

    #[test]
    fn merge_is_deep() {
        let base = json!({ "fleet": { "capacity_general": 10, "capacity_wheelchair": 4 }, "seed": 1 });
        let over = json!({ "fleet": { "capacity_general": 6 }, "seed": 2 });
        let merged = merge_values(&base, &over);
        assert_eq!(merged["fleet"]["capacity_general"], 6);
        assert_eq!(merged["fleet"]["capacity_wheelchair"], 4);
        assert_eq!(merged["seed"], 2);
    }

    #[test]
    fn deep_set_creates_parents() {
        let mut doc = json!({});
        deep_set(&mut doc, "time_model.speed_multiplier", json!(0.9)).unwrap();
        assert_eq!(doc["time_model"]["speed_multiplier"], 0.9);
    }

    #[test]
    fn deep_set_refuses_scalar_parent() {
        let mut doc = json!({ "seed": 3 });
        assert!(deep_set(&mut doc, "seed.inner", json!(1)).is_err());
    }

    #[test]
    fn coerce_scalar_cases() {
        assert_eq!(coerce_scalar(&json!("none")), json!(null));
        assert_eq!(coerce_scalar(&json!("True")), json!(true));
        assert_eq!(coerce_scalar(&json!("3")), json!(3));
        assert_eq!(coerce_scalar(&json!("0.90")), json!(0.9));
        assert_eq!(coerce_scalar(&json!("tabu")), json!("tabu"));
        assert_eq!(coerce_scalar(&json!(5)), json!(5));
    }
}
