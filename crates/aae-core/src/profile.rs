//! Engine profile — every magic number the pipeline uses, gathered into one struct.
//!
//! These weights and thresholds are hard-coded, not user-configurable;
//! `EngineProfile::default()` reproduces them exactly. The struct exists so
//! tests can construct a profile with a tighter snap radius or a smaller
//! graph cap without the constants becoming a public tuning surface —
//! `AnalysisEngine::analyze` takes `&EngineProfile` by reference rather than
//! baking the numbers into each function signature.

/// Grid-bucket cell sizes for the three spatial indices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridCellSizes {
    pub node_cell_deg: f64,
    pub edge_cell_deg: f64,
    pub report_cell_deg: f64,
}

impl Default for GridCellSizes {
    fn default() -> Self {
        Self { node_cell_deg: 0.01, edge_cell_deg: 0.01, report_cell_deg: 0.015 }
    }
}

/// Graph size caps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphCaps {
    pub max_nodes: usize,
    pub max_edges: usize,
}

impl Default for GraphCaps {
    fn default() -> Self {
        Self { max_nodes: 220_000, max_edges: 360_000 }
    }
}

/// Snap/match radii used across the pipeline, all in meters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Radii {
    /// Report Fusion: nearest non-BLOCKED edge search radius.
    pub report_fusion_m: f64,
    /// POI Snapper: nearest graph node search radius.
    pub poi_snap_m: f64,
    /// Anchor Resolver: caller anchor snap radius.
    pub anchor_snap_m: f64,
    /// Candidate Generator: unmatched hard-report nearest-node radius.
    pub synthetic_report_m: f64,
    /// Report Bonus Applier: community-report proximity radius.
    pub report_bonus_m: f64,
}

impl Default for Radii {
    fn default() -> Self {
        Self {
            report_fusion_m: 260.0,
            poi_snap_m: 220.0,
            anchor_snap_m: 450.0,
            synthetic_report_m: 260.0,
            report_bonus_m: 70.0,
        }
    }
}

/// Weights for NAS, OAS, and GAI.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoringWeights {
    pub nas_coverage: f64,
    pub nas_continuity: f64,
    pub nas_quality: f64,
    pub nas_blocker_pressure_complement: f64,
    /// Weight of LIMITED-edge length in the quality ratio numerator.
    pub quality_limited_weight: f64,
    pub gai_nas: f64,
    pub gai_oas: f64,
    /// OAS value used when there are zero total snapped POIs.
    pub oas_fallback: f64,
    /// Divisor in `blocker_pressure = clamp01((blocked_count / max(min_km, total_km)) / divisor)`.
    pub blocker_pressure_divisor: f64,
    /// Floor for `total_length_km` in the blocker-pressure ratio.
    pub blocker_pressure_min_km: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            nas_coverage: 0.35,
            nas_continuity: 0.30,
            nas_quality: 0.20,
            nas_blocker_pressure_complement: 0.15,
            quality_limited_weight: 0.6,
            gai_nas: 0.70,
            gai_oas: 0.30,
            oas_fallback: 50.0,
            blocker_pressure_divisor: 3.0,
            blocker_pressure_min_km: 0.5,
        }
    }
}

/// Per-blocker-kind fix-cost penalty.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixCostPenalties {
    pub stairs: f64,
    pub access_no: f64,
    pub wheelchair_no: f64,
    pub steep_incline: f64,
    pub raised_kerb: f64,
    pub report: f64,
    pub rough_surface: f64,
    pub wheelchair_limited: f64,
    pub other: f64,
}

impl Default for FixCostPenalties {
    fn default() -> Self {
        Self {
            stairs: 1.2,
            access_no: 1.1,
            wheelchair_no: 0.95,
            steep_incline: 0.75,
            raised_kerb: 0.55,
            report: 0.55,
            rough_surface: 0.45,
            wheelchair_limited: 0.40,
            other: 0.60,
        }
    }
}

/// Confidence-level bonuses used by both the Candidate Generator and the
/// Report Bonus Applier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConfidenceBonuses {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceBonuses {
    fn default() -> Self {
        Self { high: 0.6, medium: 0.3, low: 0.05 }
    }
}

/// Ranking tunables.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RankingConfig {
    /// Divisor applied to `unlock_m` in `rank_score`.
    pub unlock_m_divisor: f64,
    /// Multiplier applied to `delta_general` in `rank_score`.
    pub delta_general_weight: f64,
    /// Cap on the report-bonus contribution to `rank_score`/`confidence_bonus`.
    pub report_bonus_cap: f64,
    /// Per-effective-report multiplier feeding the report-bonus cap.
    pub report_bonus_per_report: f64,
    /// Cap on the synthetic candidate's extra confidence bonus.
    pub synthetic_bonus_cap: f64,
    /// Per-effective-report multiplier feeding the synthetic bonus cap.
    pub synthetic_bonus_per_report: f64,
    /// Fallback `blocked_m` for a synthetic candidate with no snappable edge.
    pub synthetic_fallback_blocked_m: f64,
    /// Max candidates retained after grouping.
    pub max_candidates: usize,
    /// Score-grid resolution: `grid_size x grid_size`.
    pub score_grid_size: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            unlock_m_divisor: 750.0,
            delta_general_weight: 3.0,
            report_bonus_cap: 2.0,
            report_bonus_per_report: 0.4,
            synthetic_bonus_cap: 1.2,
            synthetic_bonus_per_report: 0.2,
            synthetic_fallback_blocked_m: 30.0,
            max_candidates: 240,
            score_grid_size: 8,
        }
    }
}

/// Per-classification quality scores.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QualityScores {
    pub pass: f64,
    pub limited: f64,
    pub blocked: f64,
}

impl Default for QualityScores {
    fn default() -> Self {
        Self { pass: 1.0, limited: 0.55, blocked: 0.0 }
    }
}

/// The complete set of tunables the engine's pipeline stages consult.
///
/// `EngineProfile::default()` reproduces the engine's hard-coded numbers
/// exactly; tests may construct a modified profile to exercise edge
/// behavior (e.g. a tiny `anchor_snap_m` to force the brute-force fallback).
#[derive(Clone, Debug)]
pub struct EngineProfile {
    pub grid: GridCellSizes,
    pub caps: GraphCaps,
    pub radii: Radii,
    pub weights: ScoringWeights,
    pub fix_costs: FixCostPenalties,
    pub confidence_bonuses: ConfidenceBonuses,
    pub ranking: RankingConfig,
    pub quality_scores: QualityScores,
    /// Incline magnitude (as a fraction, e.g. `0.08` for 8%) at or above
    /// which an edge is classified `steep_incline`.
    pub steep_incline_threshold: f64,
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self {
            grid: GridCellSizes::default(),
            caps: GraphCaps::default(),
            radii: Radii::default(),
            weights: ScoringWeights::default(),
            fix_costs: FixCostPenalties::default(),
            confidence_bonuses: ConfidenceBonuses::default(),
            ranking: RankingConfig::default(),
            quality_scores: QualityScores::default(),
            steep_incline_threshold: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_constants() {
        let p = EngineProfile::default();
        assert_eq!(p.caps.max_nodes, 220_000);
        assert_eq!(p.caps.max_edges, 360_000);
        assert_eq!(p.radii.report_fusion_m, 260.0);
        assert_eq!(p.radii.poi_snap_m, 220.0);
        assert_eq!(p.radii.anchor_snap_m, 450.0);
        assert_eq!(p.ranking.max_candidates, 240);
        assert_eq!(p.steep_incline_threshold, 0.08);
    }

    #[test]
    fn gai_weights_sum_to_one() {
        let w = ScoringWeights::default();
        assert!((w.gai_nas + w.gai_oas - 1.0).abs() < 1e-9);
    }

    #[test]
    fn nas_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let sum = w.nas_coverage + w.nas_continuity + w.nas_quality + w.nas_blocker_pressure_complement;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
