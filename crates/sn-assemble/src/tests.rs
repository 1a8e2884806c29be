//! Integration tests for sn-assemble.

use std::io::Cursor;

use sn_core::{CancellationToken, EdgeId, GeoPoint, NodeId, RoutingModus, ScenarioId, Settings, TravelBudget};
use sn_network::{load_edges_reader, Edge, EdgeQuery, EdgeQueryPort, MemoryEdgeStore, NetworkError, NetworkResult};

use crate::{AssemblerBuilder, AssemblyRequest, NetworkAssembler};

// ── Helpers ───────────────────────────────────────────────────────────────────

const WALK: &str = "walking_standard";
const ID_BASE: i64 = -1_000_000_000;

/// Street block around the query point.
///
/// ```text
///   4 ────3──── 5        edge 5: dead-end spur
///   │     │
///   │     │  edge 2 deleted in scenario 3; edge 7 (2→4) added by it
///   │  ·  │              · = query point, ~8 m south of edge 1
///   1 ────2
/// ```
const BLOCK_CSV: &str = "\
id,source,target,length_m,cost,reverse_cost,profiles,scenario_id,deleted_in,geometry
1,1,2,520.0,,,walking_standard,,,\"LINESTRING(11.5400 48.1956, 11.5470 48.1956)\"
2,2,3,,,,walking_standard,,3,\"LINESTRING(11.5470 48.1956, 11.5470 48.2000)\"
3,3,4,,,,walking_standard,,,\"LINESTRING(11.5470 48.2000, 11.5400 48.2000)\"
4,4,1,,,,walking_standard,,,\"LINESTRING(11.5400 48.2000, 11.5400 48.1956)\"
5,3,5,,,,walking_standard,,,\"LINESTRING(11.5470 48.2000, 11.5500 48.2010)\"
7,2,4,,,,walking_standard,3,,\"LINESTRING(11.5470 48.1956, 11.5400 48.2000)\"
9,90,91,,,,walking_standard,,,\"LINESTRING(11.6000 48.1956, 11.6050 48.1956)\"
";

fn block_store() -> MemoryEdgeStore {
    load_edges_reader(Cursor::new(BLOCK_CSV)).unwrap()
}

fn munich() -> GeoPoint {
    GeoPoint::new(11.543274, 48.195524)
}

fn assembler(tolerance_m: f64) -> NetworkAssembler<MemoryEdgeStore, sn_network::ProjectionSplicer> {
    AssemblerBuilder::new(block_store())
        .settings(Settings::single("snap_tolerance_m", tolerance_m))
        .build()
        .unwrap()
}

fn request(point: GeoPoint, max_cutoff_secs: f64) -> AssemblyRequest<'static> {
    AssemblyRequest {
        point,
        budget:      TravelBudget::new(max_cutoff_secs, 1.33).unwrap(),
        modus:       RoutingModus::Default,
        scenario_id: ScenarioId(1),
        profile:     WALK,
    }
}

fn sorted_ids(sg: &crate::RoutingSubgraph) -> Vec<i64> {
    let mut ids: Vec<i64> = sg.edge_ids().map(EdgeId::get).collect();
    ids.sort_unstable();
    ids
}

/// Store wrapper that fails the narrow or the wide query.
struct FailingStore {
    inner:     MemoryEdgeStore,
    fail_wide: bool,
}

impl EdgeQueryPort for FailingStore {
    fn query_edges(&self, query: &EdgeQuery<'_>, cancel: &CancellationToken) -> NetworkResult<Vec<Edge>> {
        if query.dead_end_logic == self.fail_wide {
            return Err(NetworkError::Backend("connection reset".into()));
        }
        self.inner.query_edges(query, cancel)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::AssembleError;

    #[test]
    fn missing_configuration_fails_at_build() {
        let err = AssemblerBuilder::new(block_store()).build().err().unwrap();
        assert!(matches!(err, AssembleError::ConfigurationMissing(ref k) if k == "snap_tolerance_m"));
    }

    #[test]
    fn settings_without_tolerance_fail() {
        let err = AssemblerBuilder::new(block_store())
            .settings(Settings::single("unrelated", 1))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, AssembleError::ConfigurationMissing(_)));
    }

    #[test]
    fn non_positive_tolerance_is_config_error() {
        let err = AssemblerBuilder::new(block_store())
            .settings(Settings::single("snap_tolerance_m", 0.0))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, AssembleError::Config(_)));
    }

    #[test]
    fn layered_settings_resolved_once() {
        let settings = Settings::from_toml_str(
            "[defaults]\nsnap_tolerance_m = 10\n[user]\nsnap_tolerance_m = 30.5\nartificial_id_base = -500\n",
        )
        .unwrap();
        let asm = AssemblerBuilder::new(block_store()).settings(settings).build().unwrap();
        assert_eq!(asm.snap_settings().snap_tolerance_m, 30.5);
        assert_eq!(asm.snap_settings().artificial_id_base, -500);
    }

    #[test]
    fn typed_settings_take_precedence() {
        let asm = AssemblerBuilder::new(block_store())
            .settings(Settings::single("snap_tolerance_m", 10.0))
            .snap_settings(sn_core::SnapSettings { snap_tolerance_m: 40.0, artificial_id_base: -7 })
            .build()
            .unwrap();
        assert_eq!(asm.snap_settings().snap_tolerance_m, 40.0);
    }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assemble_tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn munich_walking_request() {
        let asm = assembler(25.0);
        let sg = asm.assemble(&request(munich(), 1200.0), &CancellationToken::new()).unwrap();

        assert_eq!(sg.start_node, Some(NodeId(ID_BASE)));
        assert_eq!(sg.superseded, [EdgeId(1)]);
        assert_eq!(sg.artificial.len(), 2);
        assert!(sg.artificial.iter().all(|a| a.supersedes == [EdgeId(1)]));
        assert!(sg.edge_ids().all(|id| !sg.superseded.contains(&id)));
        assert_eq!(sorted_ids(&sg), [ID_BASE - 1, ID_BASE, 2, 3, 4, 5]);
        sg.check_invariants().unwrap();
    }

    #[test]
    fn dead_end_flags_kept_for_originals_only() {
        let sg = assembler(25.0)
            .assemble(&request(munich(), 1200.0), &CancellationToken::new())
            .unwrap();
        for e in &sg.originals {
            assert!(e.dead_end.is_some(), "original {} lost its flag", e.id);
        }
        let spur = sg.originals.iter().find(|e| e.id == EdgeId(5)).unwrap();
        assert_eq!(spur.dead_end, Some(true));
        assert!(sg.artificial.iter().all(|a| a.edge.dead_end.is_none()));
    }

    #[test]
    fn length_is_conserved() {
        let sg = assembler(25.0)
            .assemble(&request(munich(), 1200.0), &CancellationToken::new())
            .unwrap();
        let total: f64 = sg.artificial.iter().map(|a| a.edge.length_m).sum();
        assert_relative_eq!(total, 520.0, max_relative = 1e-6);
    }

    #[test]
    fn edge_tangent_between_ring_vertices_is_spliced() {
        use geo::{Destination, Geodesic};
        use sn_network::{EdgeSpec, MemoryEdgeStoreBuilder};

        // 24.95 m out at a bearing halfway between two ring vertices, the
        // street running perpendicular to that bearing.
        let centre = munich().to_point();
        let foot = Geodesic.destination(centre, 5.625, 24.95);
        let a = GeoPoint::from(Geodesic.destination(foot, 95.625, 10.0));
        let b = GeoPoint::from(Geodesic.destination(foot, 275.625, 10.0));

        let mut builder = MemoryEdgeStoreBuilder::new();
        builder.add_edge(EdgeSpec::new(1, 1, 2, &[a, b]).profiles([WALK])).unwrap();
        let asm = AssemblerBuilder::new(builder.build())
            .settings(Settings::single("snap_tolerance_m", 25.0))
            .build()
            .unwrap();

        let sg = asm.assemble(&request(munich(), 1200.0), &CancellationToken::new()).unwrap();
        assert_eq!(sg.artificial.len(), 2);
        assert_eq!(sg.superseded, [EdgeId(1)]);
        assert!(sg.originals.is_empty());
    }

    #[test]
    fn degenerate_narrow_returns_raw_wide() {
        // Middle of the block: more than 200 m from every street.
        let inside = GeoPoint::new(11.5435, 48.1978);
        let asm = assembler(25.0);
        let sg = asm.assemble(&request(inside, 1200.0), &CancellationToken::new()).unwrap();

        assert!(sg.artificial.is_empty());
        assert!(sg.superseded.is_empty());
        assert_eq!(sg.start_node, None);
        assert_eq!(sorted_ids(&sg), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn snap_buffer_larger_than_search_buffer() {
        // 10 s × 1.33 m/s = 13.3 m search radius against a 50 m snap radius.
        let sg = assembler(50.0)
            .assemble(&request(munich(), 10.0), &CancellationToken::new())
            .unwrap();
        assert_eq!(sg.superseded, [EdgeId(1)]);
        assert!(sg.originals.is_empty());
        assert_eq!(sg.artificial.len(), 2);
        sg.check_invariants().unwrap();
    }

    #[test]
    fn idempotent() {
        let asm = assembler(25.0);
        let a = asm.assemble(&request(munich(), 1200.0), &CancellationToken::new()).unwrap();
        let b = asm.assemble(&request(munich(), 1200.0), &CancellationToken::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn shared_across_threads() {
        let asm = assembler(25.0);
        let expected = asm.assemble(&request(munich(), 1200.0), &CancellationToken::new()).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| asm.assemble(&request(munich(), 1200.0), &CancellationToken::new())))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap().unwrap(), expected);
            }
        });
    }

    #[test]
    fn scenario_modus_sees_edits() {
        let asm = assembler(25.0);
        let mut req = request(munich(), 1200.0);
        req.modus = RoutingModus::Scenario;
        req.scenario_id = ScenarioId(3);
        let sg = asm.assemble(&req, &CancellationToken::new()).unwrap();
        let ids = sorted_ids(&sg);
        assert!(ids.contains(&7));
        assert!(!ids.contains(&2));
        sg.check_invariants().unwrap();
    }

    #[test]
    fn far_edges_excluded() {
        let sg = assembler(25.0)
            .assemble(&request(munich(), 1200.0), &CancellationToken::new())
            .unwrap();
        assert!(sg.edge_ids().all(|id| id != EdgeId(9)));
    }

    #[test]
    fn random_points_keep_invariants() {
        use std::collections::HashMap;

        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let everything = sn_core::Buffer::new(munich(), 5_000.0).unwrap();
        let lengths: HashMap<EdgeId, f64> = block_store()
            .query_edges(
                &EdgeQuery {
                    region:         everything.polygon(),
                    modus:          RoutingModus::Default,
                    scenario_id:    ScenarioId(1),
                    speed_mps:      1.33,
                    profile:        WALK,
                    dead_end_logic: false,
                },
                &CancellationToken::new(),
            )
            .unwrap()
            .into_iter()
            .map(|e| (e.id, e.length_m))
            .collect();

        let asm = assembler(40.0);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let p = GeoPoint::new(rng.gen_range(11.539..11.548), rng.gen_range(48.195..48.2005));
            let sg = asm.assemble(&request(p, 600.0), &CancellationToken::new()).unwrap();
            sg.check_invariants().unwrap();
            for original in &sg.superseded {
                let parts: Vec<f64> = sg
                    .artificial
                    .iter()
                    .filter(|a| a.supersedes.contains(original))
                    .map(|a| a.edge.length_m)
                    .collect();
                assert_eq!(parts.len(), 2);
                assert_relative_eq!(parts.iter().sum::<f64>(), lengths[original], max_relative = 1e-6);
            }
        }
    }
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod failure_tests {
    use super::*;
    use crate::{AssembleError, Stage};

    fn failing(fail_wide: bool) -> NetworkAssembler<FailingStore, sn_network::ProjectionSplicer> {
        AssemblerBuilder::new(FailingStore { inner: block_store(), fail_wide })
            .settings(Settings::single("snap_tolerance_m", 25.0))
            .build()
            .unwrap()
    }

    #[test]
    fn narrow_failure_names_stage() {
        let err = failing(false)
            .assemble(&request(munich(), 1200.0), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, AssembleError::UpstreamQueryFailure { stage: Stage::NarrowQuery, .. }));
        assert!(err.to_string().starts_with("narrow query failed"));
    }

    #[test]
    fn wide_failure_names_stage() {
        let err = failing(true)
            .assemble(&request(munich(), 1200.0), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, AssembleError::UpstreamQueryFailure { stage: Stage::WideQuery, .. }));
    }

    #[test]
    fn splice_failure_names_stage() {
        struct Broken;
        impl sn_network::ArtificialEdgeSplicer for Broken {
            fn splice(
                &self,
                _: &[Edge],
                _: GeoPoint,
                _: f64,
                _: &CancellationToken,
            ) -> NetworkResult<sn_network::Splice> {
                Err(NetworkError::Backend("splitter offline".into()))
            }
        }
        let asm = AssemblerBuilder::new(block_store())
            .settings(Settings::single("snap_tolerance_m", 25.0))
            .build_with_splicer(Broken)
            .unwrap();
        let err = asm.assemble(&request(munich(), 1200.0), &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, AssembleError::UpstreamQueryFailure { stage: Stage::Splice, .. }));
    }

    #[test]
    fn unknown_profile_is_invalid_input() {
        let mut req = request(munich(), 1200.0);
        req.profile = "hovercraft";
        let err = assembler(25.0).assemble(&req, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, AssembleError::InvalidInput(_)));
    }

    #[test]
    fn cancelled_request_fails() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = assembler(25.0).assemble(&request(munich(), 1200.0), &cancel).unwrap_err();
        assert!(matches!(err, AssembleError::Cancelled));
    }

    #[test]
    fn out_of_range_point_is_geometry_error() {
        let err = assembler(25.0)
            .assemble(&request(GeoPoint::new(200.0, 48.0), 1200.0), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, AssembleError::Geometry(_)));
    }

    #[test]
    fn non_finite_point_is_geometry_error() {
        let store = FailingStore { inner: block_store(), fail_wide: false };
        let asm = AssemblerBuilder::new(store)
            .settings(Settings::single("snap_tolerance_m", 25.0))
            .build()
            .unwrap();
        // The store fails every narrow query, so reaching it would surface
        // as an upstream failure instead.
        let err = asm
            .assemble(&request(GeoPoint::new(f64::NAN, 48.195524), 1200.0), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, AssembleError::Geometry(_)), "{err}");
    }

    #[test]
    fn check_invariants_catches_leftover_original() {
        let mut sg = assembler(25.0)
            .assemble(&request(munich(), 1200.0), &CancellationToken::new())
            .unwrap();
        let leftover = block_store()
            .query_edges(
                &EdgeQuery {
                    region:         sn_core::Buffer::new(munich(), 25.0).unwrap().polygon(),
                    modus:          RoutingModus::Default,
                    scenario_id:    ScenarioId(1),
                    speed_mps:      1.33,
                    profile:        WALK,
                    dead_end_logic: false,
                },
                &CancellationToken::new(),
            )
            .unwrap();
        sg.originals.extend(leftover);
        assert!(matches!(sg.check_invariants(), Err(AssembleError::Invariant(_))));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use crate::{AssemblyObserver, RoutingSubgraph};

    #[derive(Default)]
    struct Counts {
        narrow:     usize,
        artificial: usize,
        superseded: usize,
        wide:       usize,
        assembled:  usize,
    }

    impl AssemblyObserver for Counts {
        fn on_narrow_query(&mut self, edges: usize) {
            self.narrow = edges;
        }
        fn on_splice(&mut self, artificial: usize, superseded: usize) {
            self.artificial = artificial;
            self.superseded = superseded;
        }
        fn on_wide_query(&mut self, edges: usize) {
            self.wide = edges;
        }
        fn on_assembled(&mut self, subgraph: &RoutingSubgraph) {
            self.assembled = subgraph.len();
        }
    }

    #[test]
    fn stage_counts_reported() {
        let mut counts = Counts::default();
        assembler(25.0)
            .assemble_with(&request(munich(), 1200.0), &CancellationToken::new(), &mut counts)
            .unwrap();
        assert_eq!(counts.narrow, 1);
        assert_eq!(counts.artificial, 2);
        assert_eq!(counts.superseded, 1);
        assert_eq!(counts.wide, 5);
        assert_eq!(counts.assembled, 6);
    }
}

// ── External request ──────────────────────────────────────────────────────────

#[cfg(test)]
mod request_tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{fetch_network_routing, AssembleError, RoutingRequest};

    fn routing_request() -> RoutingRequest {
        RoutingRequest {
            x:               vec![11.543274],
            y:               vec![48.195524],
            max_cutoff:      1200.0,
            speed:           1.33,
            modus:           "default".into(),
            scenario_id:     1,
            routing_profile: WALK.into(),
        }
    }

    #[test]
    fn fetch_returns_mercator_rows() {
        let asm = assembler(25.0);
        let rows = fetch_network_routing(&asm, &routing_request(), &CancellationToken::new()).unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.id != EdgeId(1)));

        let artificial: Vec<_> = rows.iter().filter(|r| r.is_artificial()).collect();
        assert_eq!(artificial.len(), 2);
        assert!(artificial.iter().all(|r| r.dead_end.is_none()));

        // Head edge ends at the projection of the point onto edge 1.
        let cut = artificial
            .iter()
            .find(|r| r.id == EdgeId(ID_BASE))
            .and_then(|r| r.coordinates.last())
            .copied()
            .unwrap();
        let expected = sn_core::to_web_mercator(GeoPoint::new(11.543274, 48.1956));
        assert_abs_diff_eq!(cut.x, expected.x, epsilon = 1e-3);
        assert_abs_diff_eq!(cut.y, expected.y, epsilon = 1e-3);
    }

    #[test]
    fn multi_point_rejected() {
        let mut req = routing_request();
        req.x.push(11.55);
        req.y.push(48.20);
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));
    }

    #[test]
    fn empty_or_mismatched_coordinates_rejected() {
        let mut req = routing_request();
        req.x.clear();
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));

        let mut req = routing_request();
        req.y.push(48.20);
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));
    }

    #[test]
    fn nan_coordinate_is_geometry_error() {
        let mut req = routing_request();
        req.x = vec![f64::NAN];
        assert!(matches!(req.validate(), Err(AssembleError::Geometry(_))));

        let mut req = routing_request();
        req.y = vec![f64::INFINITY];
        assert!(matches!(req.validate(), Err(AssembleError::Geometry(_))));
    }

    #[test]
    fn non_positive_budget_rejected() {
        let mut req = routing_request();
        req.max_cutoff = 0.0;
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));

        let mut req = routing_request();
        req.speed = -1.33;
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));
    }

    #[test]
    fn modus_tokens() {
        let mut req = routing_request();
        req.modus = "comparision".into();
        assert_eq!(req.validate().unwrap().modus, RoutingModus::Comparison);

        req.modus = "sideways".into();
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));
    }

    #[test]
    fn empty_profile_rejected() {
        let mut req = routing_request();
        req.routing_profile = "  ".into();
        assert!(matches!(req.validate(), Err(AssembleError::InvalidInput(_))));
    }
}
