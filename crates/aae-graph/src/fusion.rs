//! Report Fusion.
//!
//! Snaps each actionable hard-category report to its nearest non-BLOCKED
//! edge within a radius and overrides that edge's classification to
//! BLOCKED/`report`, accumulating evidence. Runs strictly before the Graph &
//! Components stage, so no component ever contains an edge later
//! reclassified as BLOCKED.

use aae_core::input::AggregatedReport;
use aae_core::{EdgeId, EngineProfile};
use aae_spatial::GridIndex;

use crate::classify::{BlockerKind, EdgeStatus};
use crate::edges::Edge;

/// Accumulated community-report evidence on one edge.
#[derive(Clone, Debug, Default)]
pub struct ReportEvidence {
    pub reports_count: u32,
    pub renouncements: u32,
    pub effective_reports: i64,
    pub categories: Vec<String>,
    pub report_ids: Vec<String>,
}

impl ReportEvidence {
    fn accumulate(&mut self, report: &AggregatedReport) {
        self.reports_count += report.reports_count;
        self.renouncements += report.renouncements;
        self.effective_reports += report.effective_reports;
        if !self.categories.iter().any(|c| c == &report.category) {
            self.categories.push(report.category.clone());
        }
        self.report_ids.push(report.report_id.clone());
    }
}

/// Outcome of running fusion: which reports (by index into the caller's
/// report slice) were matched to an edge.
pub struct FusionOutcome {
    matched: Vec<bool>,
}

impl FusionOutcome {
    /// Indices of hard-category, actionable reports that no edge matched —
    /// carried forward to the Candidate Generator as synthetic candidates.
    pub fn unmatched_hard_report_indices(&self, reports: &[AggregatedReport]) -> Vec<usize> {
        reports
            .iter()
            .enumerate()
            .filter(|(i, r)| r.is_actionable() && r.is_hard_category() && !self.matched[*i])
            .map(|(i, _)| i)
            .collect()
    }
}

/// Run Report Fusion over `edges` in place.
///
/// `edge_index` must be built from each edge's midpoint with
/// `EdgeId` values matching `edges`'s positions. Processes reports in
/// caller order (journal chronological order), which keeps fusion
/// deterministic given the same report ordering.
pub fn fuse_reports(edges: &mut [Edge], reports: &[AggregatedReport], edge_index: &GridIndex<EdgeId>, profile: &EngineProfile) -> FusionOutcome {
    let radius_m = profile.radii.report_fusion_m;
    // Degree margin comfortably larger than the metric radius at city latitudes.
    let margin_deg = (radius_m / 100_000.0).max(0.005);

    let mut matched = vec![false; reports.len()];

    for (i, report) in reports.iter().enumerate() {
        if !report.is_actionable() || !report.is_hard_category() {
            continue;
        }
        let Some(pt) = report.geo_point() else { continue };

        let candidates = edge_index.query_radius(pt, margin_deg);
        let mut best: Option<(usize, f64, f64)> = None; // (edge idx, midpoint dist, min endpoint dist)
        for candidate in candidates {
            let idx = candidate.index();
            let edge = &edges[idx];
            if edge.classification.status == EdgeStatus::Blocked {
                continue;
            }
            let mid_dist = pt.distance_m(edge.midpoint);
            if mid_dist > radius_m {
                continue;
            }
            let endpoint_dist = pt.distance_m(edge.from_pos).min(pt.distance_m(edge.to_pos));
            let better = match &best {
                None => true,
                Some((_, bm, be)) => (mid_dist, endpoint_dist) < (*bm, *be),
            };
            if better {
                best = Some((idx, mid_dist, endpoint_dist));
            }
        }

        if let Some((idx, _, _)) = best {
            let edge = &mut edges[idx];
            let new_confidence = edge.classification.confidence.at_least(report.confidence);
            let evidence = edge.report_evidence.get_or_insert_with(ReportEvidence::default);
            evidence.accumulate(report);

            let mut top_categories = evidence.categories.clone();
            top_categories.truncate(2);
            let signal = format!(
                "{} community reports ({} effective) — {}",
                evidence.reports_count,
                evidence.effective_reports,
                top_categories.join(", ")
            );

            edge.classification.status = EdgeStatus::Blocked;
            edge.classification.kind = Some(BlockerKind::Report);
            edge.classification.confidence = new_confidence;
            edge.classification.quality = profile.quality_scores.blocked;
            edge.classification.signals.push(signal);

            matched[i] = true;
        }
    }

    FusionOutcome { matched }
}

/// Build the edge-midpoint spatial index used for fusion lookups.
pub fn build_edge_index(edges: &[Edge], profile: &EngineProfile) -> GridIndex<EdgeId> {
    let mut idx = GridIndex::new(profile.grid.edge_cell_deg, profile.grid.edge_cell_deg);
    for edge in edges {
        idx.insert_point(edge.midpoint, edge.id);
    }
    idx
}
