//! The Scoring Core.
//!
//! Computes the Network Accessibility Score (NAS), Opportunity Accessibility
//! Score (OAS), and General Accessibility Index (GAI) from primitive
//! network ratios. NAS is a property of the whole mapped network (coverage,
//! continuity, quality, blocker pressure); only OAS depends on which
//! component is "reachable" from the anchor.

use aae_core::profile::ScoringWeights;
use aae_graph::{Components, Edge, EdgeStatus};

/// The raw network quantities NAS is derived from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NetworkMetrics {
    pub total_length_m: f64,
    pub pass_length_m: f64,
    pub limited_length_m: f64,
    pub largest_component_length_m: f64,
    pub blocked_edge_count: usize,
}

/// Tally global network metrics over every edge plus the components' own
/// largest-PASS-length figure.
pub fn compute_network_metrics(edges: &[Edge], components: &Components) -> NetworkMetrics {
    let mut m = NetworkMetrics::default();
    for edge in edges {
        m.total_length_m += edge.length_m;
        match edge.classification.status {
            EdgeStatus::Pass => m.pass_length_m += edge.length_m,
            EdgeStatus::Limited => m.limited_length_m += edge.length_m,
            EdgeStatus::Blocked => m.blocked_edge_count += 1,
        }
    }
    m.largest_component_length_m = components.largest().map(|(_, len)| len).unwrap_or(0.0);
    m
}

#[inline]
fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Network Accessibility Score, 0–100.
pub fn nas(m: &NetworkMetrics, weights: &ScoringWeights) -> f64 {
    let coverage = if m.total_length_m > 0.0 { clamp01(m.pass_length_m / m.total_length_m) } else { 0.0 };
    let continuity = if m.pass_length_m == 0.0 { 0.0 } else { clamp01(m.largest_component_length_m / m.pass_length_m) };
    let quality = if m.total_length_m > 0.0 {
        clamp01((m.pass_length_m + weights.quality_limited_weight * m.limited_length_m) / m.total_length_m)
    } else {
        0.0
    };
    let total_km = m.total_length_m / 1000.0;
    let pressure = clamp01((m.blocked_edge_count as f64 / total_km.max(weights.blocker_pressure_min_km)) / weights.blocker_pressure_divisor);

    100.0
        * (weights.nas_coverage * coverage
            + weights.nas_continuity * continuity
            + weights.nas_quality * quality
            + weights.nas_blocker_pressure_complement * (1.0 - pressure))
}

/// Opportunity Accessibility Score, 0–100.
pub fn oas(reachable_pois: usize, total_pois: usize, weights: &ScoringWeights) -> f64 {
    if total_pois == 0 {
        weights.oas_fallback
    } else {
        100.0 * reachable_pois as f64 / total_pois as f64
    }
}

/// General Accessibility Index.
pub fn gai(nas: f64, oas: f64, weights: &ScoringWeights) -> f64 {
    weights.gai_nas * nas + weights.gai_oas * oas
}

#[cfg(test)]
mod tests {
    use super::*;
    use aae_core::profile::ScoringWeights;

    #[test]
    fn empty_network_scores_zero_nas() {
        let m = NetworkMetrics::default();
        assert_eq!(nas(&m, &ScoringWeights::default()), 0.0);
    }

    #[test]
    fn fully_passable_single_component_scores_high() {
        let m = NetworkMetrics { total_length_m: 1000.0, pass_length_m: 1000.0, limited_length_m: 0.0, largest_component_length_m: 1000.0, blocked_edge_count: 0 };
        let score = nas(&m, &ScoringWeights::default());
        assert!(score > 95.0, "got {score}");
    }

    #[test]
    fn oas_fallback_when_no_pois() {
        assert_eq!(oas(0, 0, &ScoringWeights::default()), 50.0);
    }

    #[test]
    fn oas_ratio_when_pois_present() {
        assert_eq!(oas(3, 6, &ScoringWeights::default()), 50.0);
        assert_eq!(oas(6, 6, &ScoringWeights::default()), 100.0);
    }

    #[test]
    fn gai_matches_weighted_sum() {
        let weights = ScoringWeights::default();
        let g = gai(80.0, 40.0, &weights);
        assert!((g - (0.7 * 80.0 + 0.3 * 40.0)).abs() < 1e-9);
    }
}
