//! The Output Assembler.
//!
//! Materializes the five GeoJSON layers, the rounded rankings list, and the
//! meta block from a fully-quiesced pipeline run. Takes borrowed references
//! to everything upstream stages produced; performs no further mutation.

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use serde_json::json;

use aae_core::rounding::{round_coord, round_meters, round_ratio, round_score};
use aae_core::{BoundingBox, Confidence, EngineProfile};
use aae_graph::{AnchorResolution, AnchorSource, Components, Edge, EdgeStatus};
use aae_scoring::{nas, Candidate, NetworkMetrics};

use crate::payload::{
    bbox_array, AccessibilityBlock, AccessibilityMetrics, AnalysisResultPayload, Counts, DebugBlock, Meta, ProfileAssumptions, RankedCandidate,
    CALCULATION_METHOD,
};

fn confidence_str(c: Confidence) -> &'static str {
    match c {
        Confidence::Low => "low",
        Confidence::Medium => "medium",
        Confidence::High => "high",
    }
}

fn anchor_source_str(s: AnchorSource) -> &'static str {
    match s {
        AnchorSource::CallerSnapped => "caller_snapped",
        AnchorSource::BruteForceNearest => "brute_force_nearest",
        AnchorSource::LargestComponentFallback => "largest_component_fallback",
    }
}

fn status_str(s: EdgeStatus) -> &'static str {
    match s {
        EdgeStatus::Pass => "pass",
        EdgeStatus::Limited => "limited",
        EdgeStatus::Blocked => "blocked",
    }
}

fn props(obj: serde_json::Value) -> Option<JsonObject> {
    obj.as_object().cloned()
}

fn edge_feature(edge: &Edge, extra: serde_json::Value) -> Feature {
    let geometry = Geometry::new(GeoValue::LineString(vec![
        vec![round_coord(edge.from_pos.lon), round_coord(edge.from_pos.lat)],
        vec![round_coord(edge.to_pos.lon), round_coord(edge.to_pos.lat)],
    ]));

    let mut properties = json!({
        "id": edge.external_id(),
        "way_osm_id": edge.way_osm_id,
        "status": status_str(edge.classification.status),
        "blocker_kind": edge.classification.kind.map(aae_graph::BlockerKind::as_str),
        "confidence": confidence_str(edge.classification.confidence),
        "quality": edge.classification.quality,
        "length_m": round_meters(edge.length_m),
        "location_label": edge.location_label,
        "signals": edge.classification.signals,
    });
    if let serde_json::Value::Object(ref mut map) = properties {
        if let serde_json::Value::Object(extra_map) = extra {
            map.extend(extra_map);
        }
    }

    Feature { bbox: None, geometry: Some(geometry), id: None, properties: props(properties), foreign_members: None }
}

/// `streams_geojson`: every pedestrian edge.
pub fn build_streams_geojson(edges: &[Edge]) -> FeatureCollection {
    let features = edges.iter().map(|e| edge_feature(e, json!({}))).collect();
    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// `accessible_streams_geojson`: PASS edges tagged with component membership.
pub fn build_accessible_streams_geojson(edges: &[Edge], components: &Components, base_component: aae_core::ComponentId) -> FeatureCollection {
    let features = edges
        .iter()
        .filter(|e| e.classification.status == EdgeStatus::Pass)
        .map(|e| {
            let comp = components.comp_of(e.from);
            edge_feature(e, json!({ "component_id": comp.index(), "is_base_component": comp == base_component }))
        })
        .collect();
    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// `blocked_segments_geojson`: every non-PASS edge.
pub fn build_blocked_segments_geojson(edges: &[Edge]) -> FeatureCollection {
    let features = edges.iter().filter(|e| e.classification.status != EdgeStatus::Pass).map(|e| edge_feature(e, json!({}))).collect();
    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// `barriers_geojson`: one point per ranked candidate.
pub fn build_barriers_geojson(rankings: &[RankedCandidate]) -> FeatureCollection {
    let features = rankings
        .iter()
        .map(|c| {
            let geometry = Geometry::new(GeoValue::Point(vec![c.lon, c.lat]));
            let properties = json!({
                "id": c.id,
                "osm_id": c.osm_id,
                "blocker_kind": c.blocker_kind,
                "rank_score": c.rank_score,
                "delta_general_points": c.delta_general_points,
                "confidence": c.confidence,
                "report_signal_count": c.report_signal_count,
            });
            Feature { bbox: None, geometry: Some(geometry), id: None, properties: props(properties), foreign_members: None }
        })
        .collect();
    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// `score_grid_geojson`: uniform `grid_size x grid_size` grid over the
/// bounding box; each non-empty cell carries the local NAS computed from
/// edges whose midpoint falls in the cell.
///
/// Per-cell continuity/blocker-pressure would require a per-cell component
/// decomposition, which is overkill for a coarse visual grid; the local
/// PASS length itself stands in as the local "largest component" figure
/// (documented judgment call, see DESIGN.md).
pub fn build_score_grid_geojson(bbox: BoundingBox, edges: &[Edge], grid_size: usize, profile: &EngineProfile) -> FeatureCollection {
    let cell_w = bbox.width() / grid_size as f64;
    let cell_h = bbox.height() / grid_size as f64;
    let mut cells: HashMap<(usize, usize), NetworkMetrics> = HashMap::new();

    for edge in edges {
        if !bbox.contains(edge.midpoint) {
            continue;
        }
        let cx = (((edge.midpoint.lon - bbox.min_lon) / cell_w) as usize).min(grid_size - 1);
        let cy = (((edge.midpoint.lat - bbox.min_lat) / cell_h) as usize).min(grid_size - 1);
        let m = cells.entry((cx, cy)).or_default();
        m.total_length_m += edge.length_m;
        match edge.classification.status {
            EdgeStatus::Pass => m.pass_length_m += edge.length_m,
            EdgeStatus::Limited => m.limited_length_m += edge.length_m,
            EdgeStatus::Blocked => m.blocked_edge_count += 1,
        }
    }

    let mut features = Vec::with_capacity(cells.len());
    for cy in 0..grid_size {
        for cx in 0..grid_size {
            let Some(mut m) = cells.get(&(cx, cy)).copied() else { continue };
            m.largest_component_length_m = m.pass_length_m;
            let local_nas = nas(&m, &profile.weights);

            let min_lon = bbox.min_lon + cx as f64 * cell_w;
            let min_lat = bbox.min_lat + cy as f64 * cell_h;
            let max_lon = min_lon + cell_w;
            let max_lat = min_lat + cell_h;
            let ring = vec![
                vec![round_coord(min_lon), round_coord(min_lat)],
                vec![round_coord(max_lon), round_coord(min_lat)],
                vec![round_coord(max_lon), round_coord(max_lat)],
                vec![round_coord(min_lon), round_coord(max_lat)],
                vec![round_coord(min_lon), round_coord(min_lat)],
            ];
            let geometry = Geometry::new(GeoValue::Polygon(vec![ring]));
            let properties = json!({ "cell_x": cx, "cell_y": cy, "local_nas": round_score(local_nas) });
            features.push(Feature { bbox: None, geometry: Some(geometry), id: None, properties: props(properties), foreign_members: None });
        }
    }

    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// Round a candidate's numeric fields into its final ranking representation.
/// The one point in the pipeline where scores are rounded.
pub fn round_candidate(c: &Candidate) -> RankedCandidate {
    RankedCandidate {
        id: c.id.0,
        osm_id: c.osm_id.clone(),
        blocker_kind: c.blocker_kind.map(aae_graph::BlockerKind::as_str),
        base_component: c.base_component.0,
        other_component: c.other_component.0,
        baseline_nas: round_score(c.baseline_nas),
        baseline_oas: round_score(c.baseline_oas),
        baseline_general_index: round_score(c.baseline_general),
        post_fix_nas: round_score(c.post_fix_nas),
        post_fix_oas: round_score(c.post_fix_oas),
        post_fix_general_index: round_score(c.post_fix_general),
        delta_nas_points: round_score(c.delta_nas),
        delta_oas_points: round_score(c.delta_oas),
        delta_general_points: round_score(c.delta_general),
        unlock_m: round_meters(c.unlock_m),
        gain_km: round_score(c.unlock_m / 1000.0),
        unlocked_poi_count: c.unlocked_poi_count,
        unlocked_destinations: c.unlocked_destinations.clone(),
        anchor_distance_m: round_meters(c.anchor_distance_m),
        confidence: confidence_str(c.confidence),
        fix_cost_penalty: round_score(c.fix_cost_penalty),
        confidence_bonus: round_score(c.confidence_bonus),
        rank_score: round_score(c.rank_score),
        report_signal_count: c.report_signal_count,
        source_report_ids: c.source_report_ids.clone(),
        tags: c.tags.clone(),
        signals: c.signals.clone(),
        reason: c.reason.clone(),
        group_key: [c.base_component.0, c.other_component.0],
        lon: round_coord(c.lon),
        lat: round_coord(c.lat),
        is_synthetic: c.is_synthetic,
    }
}

/// Inputs the meta block's `counts` section needs beyond what `Components`
/// and the edge list already expose.
pub struct CountsInput {
    pub pedestrian_ways: usize,
    pub snapped_pois: usize,
    pub unsnapped_pois: usize,
    pub reports_used: usize,
}

/// Inputs needed to assemble the final payload once every pipeline stage
/// has run.
pub struct AssembleInput<'a> {
    pub bbox: BoundingBox,
    pub edges: &'a [Edge],
    pub components: &'a Components,
    pub anchor: &'a AnchorResolution,
    pub candidates: Vec<Candidate>,
    pub baseline_metrics: NetworkMetrics,
    pub baseline_nas: f64,
    pub baseline_oas: f64,
    pub baseline_general: f64,
    pub counts_input: CountsInput,
    pub warnings: Vec<String>,
    pub overpass_query_version: String,
    pub raw_candidate_count: usize,
    pub synthetic_candidate_count: usize,
    pub profile: &'a EngineProfile,
}

/// Assemble the complete payload.
pub fn assemble(input: AssembleInput) -> AnalysisResultPayload {
    let rankings: Vec<RankedCandidate> = input.candidates.iter().map(round_candidate).collect();

    let pass_edges = input.edges.iter().filter(|e| e.classification.status == EdgeStatus::Pass).count();
    let limited_edges = input.edges.iter().filter(|e| e.classification.status == EdgeStatus::Limited).count();
    let blocked_edges = input.edges.iter().filter(|e| e.classification.status == EdgeStatus::Blocked).count();

    let total_km = input.baseline_metrics.total_length_m / 1000.0;
    let coverage_ratio = if input.baseline_metrics.total_length_m > 0.0 {
        (input.baseline_metrics.pass_length_m / input.baseline_metrics.total_length_m).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let continuity_ratio = if input.baseline_metrics.pass_length_m == 0.0 {
        0.0
    } else {
        (input.baseline_metrics.largest_component_length_m / input.baseline_metrics.pass_length_m).clamp(0.0, 1.0)
    };
    let quality_ratio = if input.baseline_metrics.total_length_m > 0.0 {
        ((input.baseline_metrics.pass_length_m + input.profile.weights.quality_limited_weight * input.baseline_metrics.limited_length_m)
            / input.baseline_metrics.total_length_m)
            .clamp(0.0, 1.0)
    } else {
        0.0
    };
    let blocker_pressure = ((input.baseline_metrics.blocked_edge_count as f64
        / total_km.max(input.profile.weights.blocker_pressure_min_km))
        / input.profile.weights.blocker_pressure_divisor)
        .clamp(0.0, 1.0);

    let meta = Meta {
        bounding_box: bbox_array(input.bbox),
        warnings: input.warnings,
        calculation_method: CALCULATION_METHOD,
        overpass_query_version: input.overpass_query_version,
        profile_assumptions: ProfileAssumptions {
            steep_incline_threshold_pct: input.profile.steep_incline_threshold * 100.0,
            nas_weights: [
                input.profile.weights.nas_coverage,
                input.profile.weights.nas_continuity,
                input.profile.weights.nas_quality,
                input.profile.weights.nas_blocker_pressure_complement,
            ],
            gai_weights: [input.profile.weights.gai_nas, input.profile.weights.gai_oas],
            max_candidates: input.profile.ranking.max_candidates,
        },
        accessibility: AccessibilityBlock {
            nas: round_score(input.baseline_nas),
            oas: round_score(input.baseline_oas),
            gai: round_score(input.baseline_general),
            metrics: AccessibilityMetrics {
                coverage_ratio: round_ratio(coverage_ratio),
                continuity_ratio: round_ratio(continuity_ratio),
                quality_ratio: round_ratio(quality_ratio),
                blocker_pressure: round_ratio(blocker_pressure),
            },
        },
        counts: Counts {
            pedestrian_ways: input.counts_input.pedestrian_ways,
            graph_nodes: input.components.node_count(),
            pass_edges,
            limited_edges,
            blocked_edges,
            components: input.components.component_count(),
            snapped_pois: input.counts_input.snapped_pois,
            unsnapped_pois: input.counts_input.unsnapped_pois,
            reports_used: input.counts_input.reports_used,
        },
        debug: DebugBlock {
            anchor_source: anchor_source_str(input.anchor.source),
            anchor_snapped_node: input.anchor.snapped_node.map(|n| n.0),
            anchor_warning: input.anchor.warning.clone(),
            raw_candidate_count: input.raw_candidate_count,
            grouped_candidate_count: rankings.len(),
            synthetic_candidate_count: input.synthetic_candidate_count,
        },
    };

    AnalysisResultPayload {
        streams_geojson: build_streams_geojson(input.edges),
        accessible_streams_geojson: build_accessible_streams_geojson(input.edges, input.components, input.anchor.base_component),
        blocked_segments_geojson: build_blocked_segments_geojson(input.edges),
        barriers_geojson: build_barriers_geojson(&rankings),
        score_grid_geojson: build_score_grid_geojson(input.bbox, input.edges, input.profile.ranking.score_grid_size, input.profile),
        rankings,
        meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aae_core::OverpassElement;
    use aae_graph::{build_components, build_edges};
    use aae_ingest::ingest;

    fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Node { id, lat, lon, tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
    }
    fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Way { id, nodes: nodes.to_vec(), tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
    }

    #[test]
    fn pass_edges_land_in_accessible_not_blocked() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(3, 0.002, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
            way(11, &[2, 3], &[("highway", "steps")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let components = build_components(ingested.node_count(), &edges);
        let base = components.comp_of(aae_core::NodeId(0));

        let accessible = build_accessible_streams_geojson(&edges, &components, base);
        let blocked = build_blocked_segments_geojson(&edges);
        assert_eq!(accessible.features.len(), 1);
        assert_eq!(blocked.features.len(), 1);
    }

    #[test]
    fn streams_geojson_covers_every_edge() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let all = build_streams_geojson(&edges);
        assert_eq!(all.features.len(), edges.len());
    }
}
