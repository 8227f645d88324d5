//! The `AnalysisResultPayload` and its nested meta/ranking types.
//!
//! These are the one part of the pipeline that genuinely needs `serde` and
//! `geojson` — every upstream stage works in plain typed Rust structs; only
//! here does the engine materialize the wire format the host serializes to
//! the result cache.

use std::collections::HashMap;

use geojson::FeatureCollection;
use serde::Serialize;

use aae_core::BoundingBox;

/// The literal calculation-method string surfaced in `meta.calculation_method`.
pub const CALCULATION_METHOD: &str = "General Accessibility Index = 0.7 * Network Accessibility Score + 0.3 * Opportunity Accessibility Score. Blockers are ranked by simulated post-fix score delta and unlocked passable meters.";

/// One ranked candidate as it appears in `rankings`, with every numeric
/// field already rounded for output.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub id: u32,
    pub osm_id: String,
    pub blocker_kind: Option<&'static str>,
    pub base_component: u32,
    pub other_component: u32,
    pub baseline_nas: f64,
    pub baseline_oas: f64,
    pub baseline_general_index: f64,
    pub post_fix_nas: f64,
    pub post_fix_oas: f64,
    pub post_fix_general_index: f64,
    pub delta_nas_points: f64,
    pub delta_oas_points: f64,
    pub delta_general_points: f64,
    pub unlock_m: i64,
    /// Legacy alias for older clients: `unlock_m / 1000`.
    pub gain_km: f64,
    pub unlocked_poi_count: usize,
    pub unlocked_destinations: HashMap<String, u32>,
    pub anchor_distance_m: i64,
    pub confidence: &'static str,
    pub fix_cost_penalty: f64,
    pub confidence_bonus: f64,
    pub rank_score: f64,
    pub report_signal_count: f64,
    pub source_report_ids: Vec<String>,
    pub tags: HashMap<String, String>,
    pub signals: Vec<String>,
    pub reason: String,
    pub group_key: [u32; 2],
    pub lon: f64,
    pub lat: f64,
    pub is_synthetic: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AccessibilityMetrics {
    pub coverage_ratio: f64,
    pub continuity_ratio: f64,
    pub quality_ratio: f64,
    pub blocker_pressure: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AccessibilityBlock {
    pub nas: f64,
    pub oas: f64,
    pub gai: f64,
    pub metrics: AccessibilityMetrics,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Counts {
    pub pedestrian_ways: usize,
    pub graph_nodes: usize,
    pub pass_edges: usize,
    pub limited_edges: usize,
    pub blocked_edges: usize,
    pub components: usize,
    pub snapped_pois: usize,
    pub unsnapped_pois: usize,
    pub reports_used: usize,
}

/// The fixed constants, hard-coded rather than tunable,
/// surfaced for transparency rather than as a tuning surface.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProfileAssumptions {
    pub steep_incline_threshold_pct: f64,
    pub nas_weights: [f64; 4],
    pub gai_weights: [f64; 2],
    pub max_candidates: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugBlock {
    pub anchor_source: &'static str,
    pub anchor_snapped_node: Option<u32>,
    pub anchor_warning: Option<String>,
    pub raw_candidate_count: usize,
    pub grouped_candidate_count: usize,
    pub synthetic_candidate_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub bounding_box: [f64; 4],
    pub warnings: Vec<String>,
    pub calculation_method: &'static str,
    pub overpass_query_version: String,
    pub profile_assumptions: ProfileAssumptions,
    pub accessibility: AccessibilityBlock,
    pub counts: Counts,
    pub debug: DebugBlock,
}

/// The complete engine output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResultPayload {
    pub streams_geojson: FeatureCollection,
    pub accessible_streams_geojson: FeatureCollection,
    pub blocked_segments_geojson: FeatureCollection,
    pub barriers_geojson: FeatureCollection,
    pub score_grid_geojson: FeatureCollection,
    pub rankings: Vec<RankedCandidate>,
    pub meta: Meta,
}

pub(crate) fn bbox_array(bbox: BoundingBox) -> [f64; 4] {
    bbox.as_array()
}
