//! `AnalysisEngine` — the top-level facade wiring every pipeline stage
//! together in a fixed order: ingest, classify, fuse reports, build
//! components, snap POIs, resolve the anchor, score, generate and rank
//! candidates, assemble output. The engine is single-threaded and
//! synchronous; there are no suspension points within it.

use aae_core::input::{AggregatedReport, Anchor, OverpassElement, OverpassQueryVersion};
use aae_core::{AaeResult, BoundingBox, ComponentId, EngineProfile};
use aae_graph::{build_components, build_edge_index, build_edges, build_node_index, fuse_reports, resolve_anchor, snap_pois};
use aae_ingest::ingest;
use aae_output::{assemble, AnalysisResultPayload, AssembleInput, CountsInput};
use aae_scoring::{apply_report_bonus, build_report_index, compute_network_metrics, gai, generate_edge_candidates, generate_synthetic_candidates, group_and_rank, nas, oas, ScoringContext};

/// Everything one analysis job needs, borrowed for the duration of the call.
pub struct AnalysisRequest<'a> {
    pub bbox: BoundingBox,
    pub elements: &'a [OverpassElement],
    pub anchor: Anchor,
    pub reports: &'a [AggregatedReport],
    pub overpass_query_version: OverpassQueryVersion,
}

/// The top-level engine facade. Owns nothing but its tunable profile; every
/// other data structure is scoped to a single `analyze` call; each job
/// owns all its data structures exclusively.
pub struct AnalysisEngine {
    profile: EngineProfile,
}

impl AnalysisEngine {
    pub fn new(profile: EngineProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    /// Run one analysis job to completion.
    ///
    /// # Errors
    /// Returns `AaeError::TooLarge` if the ingested graph exceeds the
    /// configured node/edge caps. All other degraded conditions (unsnappable
    /// anchor, empty network, missing POIs) are soft-degrade warnings folded
    /// into the returned payload's `meta.warnings`, not errors.
    pub fn analyze(&self, request: &AnalysisRequest) -> AaeResult<AnalysisResultPayload> {
        let profile = &self.profile;
        let mut warnings = Vec::new();

        let ingested = ingest(request.elements, profile)?;
        let mut edges = build_edges(&ingested, profile);

        if edges.is_empty() {
            warnings.push("No mapped pedestrian network found".to_string());
        }

        let edge_index = build_edge_index(&edges, profile);
        let fusion_outcome = fuse_reports(&mut edges, request.reports, &edge_index, profile);

        let mut components = build_components(ingested.node_count(), &edges);
        let node_index = build_node_index(&ingested.node_pos, profile);
        let (_snapped_pois, poi_totals) = snap_pois(&ingested.pois, &ingested.node_pos, &node_index, &mut components, profile);

        let anchor_resolution = resolve_anchor(&request.anchor, &ingested.node_pos, &node_index, &components, profile);
        if let Some(w) = &anchor_resolution.warning {
            warnings.push(w.clone());
        }

        let baseline_metrics = compute_network_metrics(&edges, &components);
        let baseline_nas = nas(&baseline_metrics, &profile.weights);

        let (ranked, raw_candidate_count, synthetic_candidate_count, baseline_oas, baseline_general) = if components.component_count() == 0 {
            // Zero graph nodes: nothing to anchor on, no components to index
            // into. Short-circuits the whole scoring/candidate pipeline
            // rather than indexing `components.stats[0]` on an empty Vec.
            let baseline_oas = oas(0, poi_totals.total_snapped, &profile.weights);
            let baseline_general = gai(baseline_nas, baseline_oas, &profile.weights);
            (Vec::new(), 0, 0, baseline_oas, baseline_general)
        } else {
            let base_component: ComponentId = anchor_resolution.base_component;
            let base_poi_count = components.stats[base_component.index()].poi_count;
            let baseline_oas = oas(base_poi_count, poi_totals.total_snapped, &profile.weights);
            let baseline_general = gai(baseline_nas, baseline_oas, &profile.weights);

            let ctx = ScoringContext {
                components: &components,
                baseline_metrics,
                baseline_nas,
                baseline_oas,
                baseline_general,
                base_component,
                total_snapped_pois: poi_totals.total_snapped,
                anchor_point: request.anchor.geo_point(),
                weights: &profile.weights,
                fix_costs: &profile.fix_costs,
                confidence_bonuses: &profile.confidence_bonuses,
                ranking: &profile.ranking,
            };

            let mut candidates = generate_edge_candidates(&edges, &ctx);
            let unmatched = fusion_outcome.unmatched_hard_report_indices(request.reports);
            let synthetic = generate_synthetic_candidates(&unmatched, request.reports, &ingested.node_pos, &node_index, &edges, &edge_index, &ctx, profile);
            let synthetic_candidate_count = synthetic.len();
            candidates.extend(synthetic);
            let raw_candidate_count = candidates.len();

            let report_index = build_report_index(request.reports, profile);
            apply_report_bonus(&mut candidates, request.reports, &report_index, profile);

            let ranked = group_and_rank(candidates, profile.ranking.max_candidates);
            (ranked, raw_candidate_count, synthetic_candidate_count, baseline_oas, baseline_general)
        };

        let reports_used = request.reports.iter().filter(|r| r.is_actionable()).count();

        let payload = assemble(AssembleInput {
            bbox: request.bbox,
            edges: &edges,
            components: &components,
            anchor: &anchor_resolution,
            candidates: ranked,
            baseline_metrics,
            baseline_nas,
            baseline_oas,
            baseline_general,
            counts_input: CountsInput {
                pedestrian_ways: ingested.ways.len(),
                snapped_pois: poi_totals.total_snapped,
                unsnapped_pois: poi_totals.total_unsnapped,
                reports_used,
            },
            warnings,
            overpass_query_version: request.overpass_query_version.0.clone(),
            raw_candidate_count,
            synthetic_candidate_count,
            profile,
        });

        Ok(payload)
    }
}
