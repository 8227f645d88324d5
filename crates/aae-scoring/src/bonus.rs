//! The Report Bonus Applier.
//!
//! Looks up community reports near each non-synthetic candidate's location
//! and, if any are found, bumps the candidate's confidence, `rank_score`,
//! and `confidence_bonus`. Synthetic candidates already carry their report
//! signal from generation and are left untouched here.

use aae_core::input::AggregatedReport;
use aae_core::{EngineProfile, ReportIdx};
use aae_spatial::GridIndex;

use crate::candidates::Candidate;

/// Build the report spatial index used for proximity bonus lookups.
pub fn build_report_index(reports: &[AggregatedReport], profile: &EngineProfile) -> GridIndex<ReportIdx> {
    let mut idx = GridIndex::new(profile.grid.report_cell_deg, profile.grid.report_cell_deg);
    for (i, report) in reports.iter().enumerate() {
        if let Some(pt) = report.geo_point() {
            idx.insert_point(pt, ReportIdx(i as u32));
        }
    }
    idx
}

/// Apply the proximity bonus to every non-synthetic candidate in place.
pub fn apply_report_bonus(candidates: &mut [Candidate], reports: &[AggregatedReport], report_index: &GridIndex<ReportIdx>, profile: &EngineProfile) {
    let radius_m = profile.radii.report_bonus_m;
    let margin_deg = (radius_m / 100_000.0).max(0.002);

    for candidate in candidates.iter_mut() {
        if candidate.is_synthetic {
            continue;
        }
        let pt = candidate.position();

        let mut total_effective = 0i64;
        let mut strongest = None;
        for ridx in report_index.query_radius(pt, margin_deg) {
            let report = &reports[ridx.index()];
            let Some(rpt) = report.geo_point() else { continue };
            if pt.distance_m(rpt) > radius_m {
                continue;
            }
            if report.effective_reports <= 0 {
                continue;
            }
            total_effective += report.effective_reports;
            strongest = Some(strongest.map_or(report.confidence, |s| std::cmp::max(s, report.confidence)));
        }

        if total_effective <= 0 {
            continue;
        }

        if let Some(s) = strongest {
            candidate.confidence = candidate.confidence.at_least(s);
        }
        let bump = (total_effective as f64 * profile.ranking.report_bonus_per_report).min(profile.ranking.report_bonus_cap);
        candidate.rank_score += bump;
        candidate.confidence_bonus += bump;
        candidate.report_signal_count += total_effective as f64;
        candidate.signals.push(format!("{total_effective} nearby community report(s) reinforce this finding"));
    }
}
