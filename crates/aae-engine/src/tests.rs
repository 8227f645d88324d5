//! End-to-end scenario tests covering each pipeline stage's interaction
//! with the others (S1-S6), plus a handful of boundary and determinism
//! checks.

use aae_core::input::{AggregatedReport, Anchor, Confidence, OverpassElement, OverpassQueryVersion};
use aae_core::{AaeError, BoundingBox, EngineProfile};

use crate::engine::{AnalysisEngine, AnalysisRequest};

fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OverpassElement {
    OverpassElement::Node { id, lat, lon, tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
}

fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OverpassElement {
    OverpassElement::Way { id, nodes: nodes.to_vec(), tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
}

fn anchor_at(lon: f64, lat: f64) -> Anchor {
    Anchor { point: Some([lon, lat]), poi_id: None }
}

fn bbox() -> BoundingBox {
    BoundingBox::new(-0.01, -0.01, 0.01, 0.01)
}

fn empty_reports() -> Vec<AggregatedReport> {
    Vec::new()
}

fn qversion() -> OverpassQueryVersion {
    OverpassQueryVersion("v1".to_string())
}

/// S1 — trivial stairs blocker.
#[test]
fn s1_trivial_stairs_blocker() {
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        way(10, &[1, 2], &[("highway", "footway")]),
        way(11, &[2, 3], &[("highway", "steps")]),
    ];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.meta.counts.components, 2, "expected {{1,2}} and {{3}}");
    assert_eq!(payload.rankings.len(), 1);
    let c = &payload.rankings[0];
    assert_eq!(c.blocker_kind, Some("stairs"));
    assert_eq!(c.confidence, "high");
    assert_eq!(c.delta_oas_points, 0.0, "no POIs in this scenario");
    assert!(c.rank_score > 0.0);
    assert!(c.unlock_m > 0);
}

/// S2 — raised-kerb override isolates node 4.
#[test]
fn s2_raised_kerb_override() {
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        node(4, 0.0015, 0.0, &[("barrier", "kerb"), ("kerb", "raised")]),
        way(10, &[1, 2], &[("highway", "footway")]),
        way(11, &[2, 3], &[("highway", "steps")]),
        way(12, &[2, 4], &[("highway", "footway")]),
    ];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.rankings.len(), 2, "one stairs candidate, one raised-kerb candidate");
    assert!(payload.rankings.iter().any(|c| c.blocker_kind == Some("raised_kerb")));
    assert!(payload.rankings.iter().any(|c| c.blocker_kind == Some("stairs")));
}

/// S3 — a community report fuses onto way 10's edge.
///
/// Fusing way 10 to BLOCKED means nodes 1 and 2 no longer union, so the
/// graph becomes three singleton components ({1}, {2}, {3}); way 11 (the
/// stairs edge between 2 and 3) no longer touches the base component {1}
/// and so yields no candidate of its own — a crossing edge only becomes a
/// candidate when one endpoint lies in the base component and the other in
/// some different component. Only the newly-fused edge on way 10 qualifies.
#[test]
fn s3_report_fused_edge() {
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        way(10, &[1, 2], &[("highway", "footway")]),
        way(11, &[2, 3], &[("highway", "steps")]),
    ];
    let reports = vec![AggregatedReport {
        report_id: "r1".to_string(),
        category: "Blocked sidewalk".to_string(),
        confidence: Confidence::High,
        reports_count: 3,
        renouncements: 0,
        effective_reports: 3,
        coordinates: Some([0.001, 0.0]),
    }];
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.rankings.len(), 1);
    let report_candidate = &payload.rankings[0];
    assert_eq!(report_candidate.blocker_kind, Some("report"));
    assert_eq!(report_candidate.osm_id, "10-0", "edge-based candidate keeps the way's external id, unlike a synthetic one");
    assert!(report_candidate.source_report_ids.contains(&"r1".to_string()));
}

/// S4 — wheelchair=limited classifies LIMITED, not PASS, and still yields a candidate.
#[test]
fn s4_wheelchair_limited_does_not_union() {
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        way(10, &[1, 2], &[("highway", "footway"), ("wheelchair", "limited")]),
    ];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.meta.counts.limited_edges, 1);
    assert_eq!(payload.meta.counts.pass_edges, 0);
    assert_eq!(payload.rankings.len(), 1);
    assert_eq!(payload.rankings[0].blocker_kind, Some("wheelchair_limited"));
}

/// S5 — an anchor far outside the network falls back to the largest PASS component.
#[test]
fn s5_anchor_fallback_to_largest_component() {
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        way(10, &[1, 2], &[("highway", "footway")]),
        way(11, &[2, 3], &[("highway", "steps")]),
    ];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(10.0, 10.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert!(payload.meta.warnings.iter().any(|w| w.contains("Anchor POI could not be snapped")), "got {:?}", payload.meta.warnings);
    assert!(!payload.rankings.is_empty());
}

/// S6 — exceeding the edge cap fails fatally with `TooLarge`. Exercised with
/// a tiny cap override; the full-scale cap is exercised in
/// `ingest::tests::too_many_edges_is_fatal`.
#[test]
fn s6_graph_cap_exceeded() {
    let mut profile = EngineProfile::default();
    profile.caps.max_edges = 1;
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        way(10, &[1, 2, 3], &[("highway", "footway")]),
    ];

    let reports = empty_reports();
    let engine = AnalysisEngine::new(profile);
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let err = engine.analyze(&req).unwrap_err();
    assert!(matches!(err, AaeError::TooLarge { .. }));
    assert!(format!("{err}").contains("Area too large for analysis"));
}

/// Boundary: empty OSM input yields an empty, non-fatal payload.
#[test]
fn empty_input_is_non_fatal() {
    let elements: Vec<OverpassElement> = Vec::new();
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: Anchor::default(), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.rankings.len(), 0);
    assert_eq!(payload.meta.accessibility.nas, 0.0);
    assert!(payload.meta.warnings.iter().any(|w| w.contains("No mapped pedestrian network found")));
}

/// Boundary: a single disconnected edge forms one component and no candidates.
#[test]
fn single_disconnected_edge_has_no_candidates() {
    let elements = vec![node(1, 0.0, 0.0, &[]), node(2, 0.001, 0.0, &[]), way(10, &[1, 2], &[("highway", "footway")])];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.meta.counts.components, 1);
    assert_eq!(payload.rankings.len(), 0);
}

/// Boundary: two components joined by exactly one non-PASS edge yields exactly
/// one candidate whose `unlock_m` equals the other component's PASS length.
#[test]
fn two_components_one_blocker_unlock_m_matches_other_component_length() {
    // Base component: 1-2 (PASS). Other component: 3-4-5 (PASS), joined to
    // the base only via the blocked edge 2-3 (steps).
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        node(4, 0.003, 0.0, &[]),
        node(5, 0.004, 0.0, &[]),
        way(10, &[1, 2], &[("highway", "footway")]),
        way(11, &[2, 3], &[("highway", "steps")]),
        way(12, &[3, 4], &[("highway", "footway")]),
        way(13, &[4, 5], &[("highway", "footway")]),
    ];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(payload.rankings.len(), 1);
    // other component is 3-4-5: two footway hops, each ~111m at this latitude.
    let hop_m = aae_core::GeoPoint::new(0.002, 0.0).distance_m(aae_core::GeoPoint::new(0.003, 0.0));
    let expected_unlock_m = (2.0 * hop_m).round() as i64;
    assert!((payload.rankings[0].unlock_m - expected_unlock_m).abs() <= 1, "unlock_m={} expected~{}", payload.rankings[0].unlock_m, expected_unlock_m);
}

/// Idempotence: running the same inputs twice yields byte-identical rankings.
#[test]
fn idempotent_across_runs() {
    let elements = vec![
        node(1, 0.0, 0.0, &[]),
        node(2, 0.001, 0.0, &[]),
        node(3, 0.002, 0.0, &[]),
        way(10, &[1, 2], &[("highway", "footway")]),
        way(11, &[2, 3], &[("highway", "steps")]),
    ];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };

    let a = engine.analyze(&req).unwrap();
    let b = engine.analyze(&req).unwrap();

    let a_json = serde_json::to_string(&a).unwrap();
    let b_json = serde_json::to_string(&b).unwrap();
    assert_eq!(a_json, b_json);
}

/// `meta.calculation_method` is the literal, verbatim description string.
#[test]
fn calculation_method_is_literal() {
    let elements = vec![node(1, 0.0, 0.0, &[]), node(2, 0.001, 0.0, &[]), way(10, &[1, 2], &[("highway", "footway")])];
    let reports = empty_reports();
    let engine = AnalysisEngine::new(EngineProfile::default());
    let req = AnalysisRequest { bbox: bbox(), elements: &elements, anchor: anchor_at(0.0, 0.0), reports: &reports, overpass_query_version: qversion() };
    let payload = engine.analyze(&req).unwrap();

    assert_eq!(
        payload.meta.calculation_method,
        "General Accessibility Index = 0.7 * Network Accessibility Score + 0.3 * Opportunity Accessibility Score. Blockers are ranked by simulated post-fix score delta and unlocked passable meters."
    );
}
