//! Unit tests for pt-spatial.
//!
//! All tests use hand-crafted networks so they run without any OSM file.

#[cfg(test)]
mod helpers {
    use pt_core::{GeoPoint, NodeId};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Undirected edges: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Path via 0→1→2→4: 30 s.  Path via 0→3→4: 60 s.
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_road(n0, n1, 100.0, 10_000);
        b.add_road(n1, n2, 100.0, 10_000);
        b.add_road(n2, n4, 100.0, 10_000);
        b.add_road(n0, n3, 500.0, 50_000); // long slow road
        b.add_road(n3, n4, 100.0, 10_000);

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// Directed triangle 0→1→2→0 plus a dangling one-way spur 2→3 and an
    /// isolated node 4.
    pub fn triangle_with_spur() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n: Vec<NodeId> = (0..5)
            .map(|i| b.add_node(GeoPoint::new(0.0, i as f64 * 0.01)))
            .collect();
        b.add_directed_edge(n[0], n[1], 100.0, 1_000);
        b.add_directed_edge(n[1], n[2], 100.0, 1_000);
        b.add_directed_edge(n[2], n[0], 100.0, 1_000);
        b.add_directed_edge(n[2], n[3], 100.0, 1_000);
        b.build()
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use pt_core::GeoPoint;
    use crate::RoadNetworkBuilder;

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 10_000);
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn mirror_adds_reverse_edges() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 10_000);
        let net = b.build();

        let mirror = net.undirected_mirror();
        assert_eq!(mirror.edge_count(), 2);
        assert_eq!(mirror.out_degree(c), 1);
        // Source untouched.
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn induced_subgraph_renumbers() {
        let (net, _) = super::helpers::grid_network();
        // Drop node 3 → edges 0-3 and 3-4 disappear.
        let keep = [true, true, true, false, true];
        let sub = net.induced_subgraph(&keep);
        assert_eq!(sub.node_count(), 4);
        assert_eq!(sub.edge_count(), 6);
        assert_eq!(sub.node_pos[3], GeoPoint::new(1.0, 2.0));
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use pt_core::GeoPoint;
    use crate::RoadNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.4)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build();
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use pt_core::GeoPoint;
    use crate::{DijkstraRouter, RoadNetworkBuilder, Router, SpatialError};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let r = DijkstraRouter.route(&net, n0, n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.total_travel_ms, 0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let route = DijkstraRouter.route(&net, n0, n4).unwrap();

        assert_eq!(route.total_travel_ms, 30_000);
        assert_eq!(route.minutes(), 0.5);
        assert_eq!(route.edges.len(), 3);
        assert_eq!(net.edge_from[route.edges[0].index()], n0);
        assert_eq!(net.edge_to[route.edges[0].index()], n1);
        assert_eq!(net.edge_to[route.edges[1].index()], n2);
        assert_eq!(net.edge_to[route.edges[2].index()], n4);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build();
        let result = DijkstraRouter.route(&net, a, c);
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0, 10_000);
        let net = b.build();

        assert!(DijkstraRouter.route(&net, a, c).is_ok());
        assert!(DijkstraRouter.route(&net, c, a).is_err());
        // The mirror has the return path.
        let back = DijkstraRouter.route(&net.undirected_mirror(), c, a).unwrap();
        assert_eq!(back.total_travel_ms, 10_000);
    }

    #[test]
    fn cost_only_query_matches_route() {
        let (net, [n0, n1, _, n3, n4]) = super::helpers::grid_network();
        for (a, b) in [(n0, n4), (n1, n3), (n4, n0), (n0, n0)] {
            let full = DijkstraRouter.route(&net, a, b).unwrap();
            assert_eq!(DijkstraRouter.travel_ms(&net, a, b).unwrap(), full.total_travel_ms);
        }
    }

    #[test]
    fn cost_only_query_errors() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build();
        assert!(matches!(DijkstraRouter.travel_ms(&net, a, c), Err(SpatialError::NoRoute { .. })));
        assert!(matches!(
            DijkstraRouter.travel_ms(&net, a, pt_core::NodeId(5)),
            Err(SpatialError::NodeNotFound(_))
        ));
    }

    #[test]
    fn out_of_range_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let result = DijkstraRouter.route(&net, n0, pt_core::NodeId(99));
        assert!(matches!(result, Err(SpatialError::NodeNotFound(_))));
    }
}

// ── Speed resolution ──────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use crate::speed::{normalize_highway, parse_maxspeed_kph};
    use crate::SpeedProfile;

    #[test]
    fn normalize_strips_link_and_case() {
        assert_eq!(normalize_highway("Primary_link"), "primary");
        assert_eq!(normalize_highway(" residential "), "residential");
        assert_eq!(normalize_highway("secondary;tertiary"), "secondary");
        assert_eq!(normalize_highway(""), "unknown");
    }

    #[test]
    fn maxspeed_forms() {
        assert_eq!(parse_maxspeed_kph("50"), Some(50.0));
        assert_eq!(parse_maxspeed_kph("50;60"), Some(50.0));
        assert_eq!(parse_maxspeed_kph("signals"), None);
        let mph = parse_maxspeed_kph("30 mph").unwrap();
        assert!((mph - 48.2802).abs() < 1e-9);
    }

    #[test]
    fn class_table_then_fallback() {
        let p = SpeedProfile::default();
        assert_eq!(p.base_speed_kmh("motorway", None), 80.0);
        assert_eq!(p.base_speed_kmh("bogus_class", None), 25.0);
        // maxspeed ignored unless preferred.
        assert_eq!(p.base_speed_kmh("primary", Some("70")), 50.0);

        let mut p = SpeedProfile::default();
        p.prefer_maxspeed = true;
        assert_eq!(p.base_speed_kmh("primary", Some("70")), 70.0);
        assert_eq!(p.base_speed_kmh("primary", Some("none")), 50.0);
    }

    #[test]
    fn effective_speed_floors_at_minimum() {
        let mut p = SpeedProfile::default();
        p.global_multiplier = 0.01;
        assert_eq!(p.effective_speed_kmh("motorway", None), 3.0);
    }

    #[test]
    fn travel_ms_is_length_over_speed() {
        let p = SpeedProfile::default();
        // 1 km at 30 km/h (tertiary) = 120 s.
        assert_eq!(p.travel_ms(1_000.0, "tertiary", None), 120_000);
        // Zero-length edges still cost 1 m.
        assert_eq!(p.travel_ms(0.0, "tertiary", None), 120);
    }

    #[test]
    fn slower_multiplier_means_longer_time() {
        let mut p = SpeedProfile::default();
        let base = p.travel_ms(1_000.0, "primary", None);
        p.multiplier_by_class.insert("primary".into(), 0.5);
        assert_eq!(p.travel_ms(1_000.0, "primary", None), base * 2);
    }
}

// ── Connectivity repair ───────────────────────────────────────────────────────

#[cfg(test)]
mod components {
    use crate::components::{
        keep_largest_component, keep_largest_component_with, strongly_connected_components,
        weakly_connected_components,
    };
    use crate::ComponentKind;

    #[test]
    fn scc_finds_triangle() {
        let net = super::helpers::triangle_with_spur();
        let scc = strongly_connected_components(&net);
        // {0,1,2}, {3}, {4}
        assert_eq!(scc.count(), 3);
        let big = scc.largest().unwrap();
        assert_eq!(scc.sizes[big as usize], 3);
        assert_eq!(scc.label[0], scc.label[1]);
        assert_eq!(scc.label[1], scc.label[2]);
        assert_ne!(scc.label[2], scc.label[3]);
    }

    #[test]
    fn wcc_ignores_direction() {
        let net = super::helpers::triangle_with_spur();
        let wcc = weakly_connected_components(&net);
        assert_eq!(wcc.count(), 2);
        assert_eq!(wcc.sizes[wcc.largest().unwrap() as usize], 4);
    }

    #[test]
    fn small_graph_falls_back_to_weak() {
        let net = super::helpers::triangle_with_spur();
        let (kept, kind) = keep_largest_component(&net);
        assert_eq!(kind, ComponentKind::Weak);
        assert_eq!(kept.node_count(), 4);
        assert_eq!(kept.edge_count(), 4);
    }

    #[test]
    fn strong_component_kept_above_threshold() {
        let net = super::helpers::triangle_with_spur();
        let (kept, kind) = keep_largest_component_with(&net, 3);
        assert_eq!(kind, ComponentKind::Strong);
        assert_eq!(kept.node_count(), 3);
        assert_eq!(kept.edge_count(), 3);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        use pt_core::GeoPoint;
        use crate::RoadNetworkBuilder;

        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<_> = (0..200_000)
            .map(|i| b.add_node(GeoPoint::new(0.0, i as f64 * 1e-4)))
            .collect();
        for w in ids.windows(2) {
            b.add_road(w[0], w[1], 10.0, 1_000);
        }
        let net = b.build();
        let scc = strongly_connected_components(&net);
        assert_eq!(scc.count(), 1);
    }
}

// ── Artifact I/O ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod artifact {
    use pt_core::PtError;
    use crate::{ArtifactEdge, ArtifactNode, RoadGraphArtifact, SpatialError, SpeedProfile};

    fn sample() -> RoadGraphArtifact {
        RoadGraphArtifact {
            nodes: vec![
                ArtifactNode { node_id: 1001, lat: 37.50, lon: 127.00 },
                ArtifactNode { node_id: 1002, lat: 37.51, lon: 127.00 },
            ],
            edges: vec![ArtifactEdge {
                from: 1001,
                to: 1002,
                length_m: 1_000.0,
                highway: "tertiary_link".into(),
                maxspeed: None,
            }],
        }
    }

    #[test]
    fn write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        sample().write_dir(dir.path()).unwrap();
        let loaded = RoadGraphArtifact::load_dir(dir.path()).unwrap();
        assert_eq!(loaded.nodes, sample().nodes);
        assert_eq!(loaded.edges, sample().edges);
    }

    #[test]
    fn build_applies_profile() {
        let net = sample().build_network(&SpeedProfile::default()).unwrap();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.edge_travel_ms[0], 120_000);
    }

    #[test]
    fn unknown_node_reference() {
        let mut a = sample();
        a.edges[0].to = 9;
        let err = a.build_network(&SpeedProfile::default()).unwrap_err();
        assert!(matches!(err, SpatialError::UnknownArtifactNode(9)));
    }

    #[test]
    fn missing_columns_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nodes.csv"), "node_id,lat\n1,37.5\n").unwrap();
        std::fs::write(dir.path().join("edges.csv"), "from,to,length_m\n").unwrap();
        let err = RoadGraphArtifact::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SpatialError::Core(PtError::MissingColumns { .. })));
    }
}
