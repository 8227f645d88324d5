//! The Candidate Generator.
//!
//! For every non-PASS edge incident to the base component, simulates fixing
//! it and scores the counterfactual network. Additionally synthesizes
//! candidates for hard-category reports that Report Fusion could not match
//! to any edge.

use std::collections::HashMap;

use aae_core::input::{AggregatedReport, Confidence};
use aae_core::profile::{ConfidenceBonuses, FixCostPenalties, RankingConfig, ScoringWeights};
use aae_core::{CandidateId, ComponentId, EdgeId, EngineProfile, GeoPoint, NodeId};
use aae_graph::{BlockerKind, Components, Edge, EdgeStatus};
use aae_spatial::GridIndex;

use crate::scoring::{gai, nas, oas, NetworkMetrics};

/// A proposed fix: either a real blocked/limited edge, or a synthetic
/// candidate standing in for an unmatched community report.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub id: CandidateId,
    pub osm_id: String,
    pub blocker_kind: Option<BlockerKind>,
    pub base_component: ComponentId,
    pub other_component: ComponentId,
    pub baseline_nas: f64,
    pub baseline_oas: f64,
    pub baseline_general: f64,
    pub post_fix_nas: f64,
    pub post_fix_oas: f64,
    pub post_fix_general: f64,
    pub delta_nas: f64,
    pub delta_oas: f64,
    pub delta_general: f64,
    pub unlock_m: f64,
    pub unlocked_poi_count: usize,
    pub unlocked_destinations: HashMap<String, u32>,
    pub anchor_distance_m: f64,
    pub confidence: Confidence,
    pub fix_cost_penalty: f64,
    pub confidence_bonus: f64,
    pub rank_score: f64,
    pub report_signal_count: f64,
    pub source_report_ids: Vec<String>,
    pub tags: HashMap<String, String>,
    pub signals: Vec<String>,
    pub reason: String,
    pub lon: f64,
    pub lat: f64,
    pub is_synthetic: bool,
}

impl Candidate {
    /// `(baseComponent -> otherComponent)` dedup key.
    pub fn group_key(&self) -> (ComponentId, ComponentId) {
        (self.base_component, self.other_component)
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

fn fix_cost_penalty(kind: Option<BlockerKind>, penalties: &FixCostPenalties) -> f64 {
    match kind {
        Some(BlockerKind::Stairs) => penalties.stairs,
        Some(BlockerKind::AccessNo) => penalties.access_no,
        Some(BlockerKind::WheelchairNo) => penalties.wheelchair_no,
        Some(BlockerKind::SteepIncline) => penalties.steep_incline,
        Some(BlockerKind::RaisedKerb) => penalties.raised_kerb,
        Some(BlockerKind::Report) => penalties.report,
        Some(BlockerKind::RoughSurface) => penalties.rough_surface,
        Some(BlockerKind::WheelchairLimited) => penalties.wheelchair_limited,
        Some(BlockerKind::Other) | None => penalties.other,
    }
}

fn confidence_bonus_for(confidence: Confidence, bonuses: &ConfidenceBonuses) -> f64 {
    match confidence {
        Confidence::High => bonuses.high,
        Confidence::Medium => bonuses.medium,
        Confidence::Low => bonuses.low,
    }
}

/// Recompute network metrics as if `edge_length_m` flipped to PASS, merging
/// `base_comp` and `other_comp`.
fn counterfactual_metrics(baseline: &NetworkMetrics, components: &Components, base_comp: ComponentId, other_comp: ComponentId, edge_length_m: f64, edge_was_blocked: bool) -> NetworkMetrics {
    let merged_len = components.stats[base_comp.index()].length_m + components.stats[other_comp.index()].length_m + edge_length_m;
    let other_max = components
        .stats
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != base_comp.index() && *i != other_comp.index())
        .map(|(_, s)| s.length_m)
        .fold(0.0, f64::max);

    NetworkMetrics {
        total_length_m: baseline.total_length_m,
        pass_length_m: baseline.pass_length_m + edge_length_m,
        limited_length_m: if edge_was_blocked { baseline.limited_length_m } else { (baseline.limited_length_m - edge_length_m).max(0.0) },
        largest_component_length_m: merged_len.max(other_max),
        blocked_edge_count: if edge_was_blocked { baseline.blocked_edge_count.saturating_sub(1) } else { baseline.blocked_edge_count },
    }
}

fn top_destination_kinds(destinations: &HashMap<String, u32>, n: usize) -> Vec<(String, u32)> {
    let mut v: Vec<(String, u32)> = destinations.iter().map(|(k, c)| (k.clone(), *c)).collect();
    v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    v.truncate(n);
    v
}

fn build_reason(unlock_m: f64, unlocked_poi_count: usize, destinations: &HashMap<String, u32>, report_note: Option<&str>) -> String {
    let mut reason = format!("Fixing this would reconnect ~{:.0}m of passable network", unlock_m);
    if unlocked_poi_count > 0 {
        let top = top_destination_kinds(destinations, 2);
        let kinds: Vec<String> = top.iter().map(|(k, c)| format!("{c} {k}")).collect();
        reason.push_str(&format!(" and unlock {unlocked_poi_count} destination(s) ({})", kinds.join(", ")));
    }
    if let Some(note) = report_note {
        reason.push_str(&format!("; {note}"));
    }
    reason.push('.');
    reason
}

/// Shared inputs every candidate needs to compute a delta against.
pub struct ScoringContext<'a> {
    pub components: &'a Components,
    pub baseline_metrics: NetworkMetrics,
    pub baseline_nas: f64,
    pub baseline_oas: f64,
    pub baseline_general: f64,
    pub base_component: ComponentId,
    pub total_snapped_pois: usize,
    pub anchor_point: Option<GeoPoint>,
    pub weights: &'a ScoringWeights,
    pub fix_costs: &'a FixCostPenalties,
    pub confidence_bonuses: &'a ConfidenceBonuses,
    pub ranking: &'a RankingConfig,
}

/// Generate one candidate per non-PASS edge incident to the base component
/// and exactly one other component.
pub fn generate_edge_candidates(edges: &[Edge], ctx: &ScoringContext) -> Vec<Candidate> {
    let mut out = Vec::new();
    let base_poi_count = ctx.components.stats[ctx.base_component.index()].poi_count;

    for edge in edges {
        if edge.classification.status == EdgeStatus::Pass {
            continue;
        }
        let comp_from = ctx.components.comp_of(edge.from);
        let comp_to = ctx.components.comp_of(edge.to);

        let other_comp = if comp_from == ctx.base_component && comp_to != ctx.base_component {
            comp_to
        } else if comp_to == ctx.base_component && comp_from != ctx.base_component {
            comp_from
        } else {
            continue;
        };

        let edge_was_blocked = edge.classification.status == EdgeStatus::Blocked;
        let post_metrics = counterfactual_metrics(&ctx.baseline_metrics, ctx.components, ctx.base_component, other_comp, edge.length_m, edge_was_blocked);
        let post_nas = nas(&post_metrics, ctx.weights);

        let other_stats = &ctx.components.stats[other_comp.index()];
        let post_reachable = base_poi_count + other_stats.poi_count;
        let post_oas = oas(post_reachable, ctx.total_snapped_pois, ctx.weights);
        let post_general = gai(post_nas, post_oas, ctx.weights);

        let delta_nas = post_nas - ctx.baseline_nas;
        let delta_oas = post_oas - ctx.baseline_oas;
        let delta_general = post_general - ctx.baseline_general;

        let fix_cost = fix_cost_penalty(edge.classification.kind, ctx.fix_costs);
        let conf_bonus = confidence_bonus_for(edge.classification.confidence, ctx.confidence_bonuses);
        let unlock_m = other_stats.length_m;
        let rank_score = ctx.ranking.delta_general_weight * delta_general + unlock_m / ctx.ranking.unlock_m_divisor + conf_bonus - fix_cost;

        let anchor_distance_m = ctx.anchor_point.map(|a| a.distance_m(edge.midpoint)).unwrap_or(0.0);

        let report_note = edge.report_evidence.as_ref().map(|ev| format!("{} community report(s) corroborate this location", ev.report_ids.len()));
        let reason = build_reason(unlock_m, other_stats.poi_count, &other_stats.destinations, report_note.as_deref());

        out.push(Candidate {
            id: CandidateId(0), // assigned by the Ranker after truncation
            osm_id: edge.external_id(),
            blocker_kind: edge.classification.kind,
            base_component: ctx.base_component,
            other_component: other_comp,
            baseline_nas: ctx.baseline_nas,
            baseline_oas: ctx.baseline_oas,
            baseline_general: ctx.baseline_general,
            post_fix_nas: post_nas,
            post_fix_oas: post_oas,
            post_fix_general: post_general,
            delta_nas,
            delta_oas,
            delta_general,
            unlock_m,
            unlocked_poi_count: other_stats.poi_count,
            unlocked_destinations: other_stats.destinations.clone(),
            anchor_distance_m,
            confidence: edge.classification.confidence,
            fix_cost_penalty: fix_cost,
            confidence_bonus: conf_bonus,
            rank_score,
            report_signal_count: edge.report_evidence.as_ref().map(|e| e.effective_reports as f64).unwrap_or(0.0),
            source_report_ids: edge.report_evidence.as_ref().map(|e| e.report_ids.clone()).unwrap_or_default(),
            tags: edge.tags.clone(),
            signals: edge.classification.signals.clone(),
            reason,
            lon: edge.midpoint.lon,
            lat: edge.midpoint.lat,
            is_synthetic: false,
        });
    }

    out
}

/// Synthesize a candidate for each unmatched hard-category report whose
/// nearest graph node lies outside the base component.
pub fn generate_synthetic_candidates(
    unmatched_report_indices: &[usize],
    reports: &[AggregatedReport],
    node_pos: &[GeoPoint],
    node_index: &GridIndex<NodeId>,
    edges: &[Edge],
    edge_index: &GridIndex<EdgeId>,
    ctx: &ScoringContext,
    profile: &EngineProfile,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    let base_poi_count = ctx.components.stats[ctx.base_component.index()].poi_count;
    let node_margin = (profile.radii.synthetic_report_m / 100_000.0).max(0.006);

    for &i in unmatched_report_indices {
        let report = &reports[i];
        let Some(pt) = report.geo_point() else { continue };

        let nearest_node = node_index
            .query_radius(pt, node_margin)
            .into_iter()
            .map(|n| (n, pt.distance_m(node_pos[n.index()])))
            .filter(|&(_, d)| d <= profile.radii.synthetic_report_m)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

        let Some((node, _)) = nearest_node else { continue };
        let comp = ctx.components.comp_of(node);
        if comp == ctx.base_component {
            continue;
        }

        let nearest_edge_len = edge_index
            .query_radius(pt, node_margin)
            .into_iter()
            .map(|e| (e, pt.distance_m(edges[e.index()].midpoint)))
            .filter(|&(_, d)| d <= profile.radii.synthetic_report_m)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .map(|(e, _)| edges[e.index()].length_m);
        let unlock_m = nearest_edge_len.unwrap_or(profile.ranking.synthetic_fallback_blocked_m);

        let comp_stats = &ctx.components.stats[comp.index()];
        let post_reachable = base_poi_count + comp_stats.poi_count;
        let post_oas = oas(post_reachable, ctx.total_snapped_pois, ctx.weights);
        let post_general = gai(ctx.baseline_nas, post_oas, ctx.weights);

        let delta_oas = post_oas - ctx.baseline_oas;
        let delta_general = post_general - ctx.baseline_general;

        let extra = (profile.ranking.synthetic_bonus_per_report * report.effective_reports as f64).min(profile.ranking.synthetic_bonus_cap);
        let confidence_bonus = confidence_bonus_for(report.confidence, ctx.confidence_bonuses) + extra;
        let fix_cost = fix_cost_penalty(Some(BlockerKind::Report), ctx.fix_costs);
        let rank_score = ctx.ranking.delta_general_weight * delta_general + unlock_m / ctx.ranking.unlock_m_divisor + confidence_bonus - fix_cost;

        let anchor_distance_m = ctx.anchor_point.map(|a| a.distance_m(pt)).unwrap_or(0.0);
        let reason = build_reason(
            unlock_m,
            comp_stats.poi_count,
            &comp_stats.destinations,
            Some(&format!("unresolved community report ({} effective)", report.effective_reports)),
        );

        out.push(Candidate {
            id: CandidateId(0),
            osm_id: "N/A".to_string(),
            blocker_kind: Some(BlockerKind::Report),
            base_component: ctx.base_component,
            other_component: comp,
            baseline_nas: ctx.baseline_nas,
            baseline_oas: ctx.baseline_oas,
            baseline_general: ctx.baseline_general,
            post_fix_nas: ctx.baseline_nas,
            post_fix_oas: post_oas,
            post_fix_general: post_general,
            delta_nas: 0.0,
            delta_oas,
            delta_general,
            unlock_m,
            unlocked_poi_count: comp_stats.poi_count,
            unlocked_destinations: comp_stats.destinations.clone(),
            anchor_distance_m,
            confidence: report.confidence,
            fix_cost_penalty: fix_cost,
            confidence_bonus,
            rank_score,
            report_signal_count: report.effective_reports as f64,
            source_report_ids: vec![report.report_id.clone()],
            tags: HashMap::new(),
            signals: vec![format!("{} community report(s), no matching mapped edge", report.reports_count)],
            reason,
            lon: pt.lon,
            lat: pt.lat,
            is_synthetic: true,
        });
    }

    out
}
