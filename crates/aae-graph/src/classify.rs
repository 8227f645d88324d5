//! The Edge Classifier.
//!
//! A single ordered `if`/`else if` chain, one arm per rule, in the style of
//! a plain speed- or access-lookup function rather than a list of predicate
//! closures with dynamic dispatch — the rule set is closed and small enough
//! that a flat chain stays readable and auditable.

use std::collections::HashMap;

use aae_core::input::Confidence;
use aae_core::EngineProfile;

/// Edge accessibility status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeStatus {
    Pass,
    Limited,
    Blocked,
}

/// The reason an edge is not (fully) passable, or `None` for a PASS edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockerKind {
    Stairs,
    RaisedKerb,
    SteepIncline,
    RoughSurface,
    WheelchairNo,
    WheelchairLimited,
    AccessNo,
    Report,
    Other,
}

impl BlockerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockerKind::Stairs => "stairs",
            BlockerKind::RaisedKerb => "raised_kerb",
            BlockerKind::SteepIncline => "steep_incline",
            BlockerKind::RoughSurface => "rough_surface",
            BlockerKind::WheelchairNo => "wheelchair_no",
            BlockerKind::WheelchairLimited => "wheelchair_limited",
            BlockerKind::AccessNo => "access_no",
            BlockerKind::Report => "report",
            BlockerKind::Other => "other",
        }
    }
}

/// The full classification outcome for one edge.
#[derive(Clone, Debug)]
pub struct EdgeClassification {
    pub status: EdgeStatus,
    pub kind: Option<BlockerKind>,
    pub confidence: Confidence,
    pub signals: Vec<String>,
    pub quality: f64,
}

const ROUGH_SURFACES: &[&str] =
    &["unpaved", "gravel", "dirt", "grass", "ground", "sand", "mud", "cobblestone", "sett", "unhewn_cobblestone"];

const POOR_SMOOTHNESS: &[&str] = &["bad", "very_bad", "horrible", "very_horrible", "impassable"];

/// Classify one edge from its effective tags and whether either endpoint
/// carries a raised kerb, applying the rule table in order; the first
/// matching rule wins.
pub fn classify_edge(tags: &HashMap<String, String>, from_raised_kerb: bool, to_raised_kerb: bool, profile: &EngineProfile) -> EdgeClassification {
    let q = &profile.quality_scores;

    if tags.get("highway").map(String::as_str) == Some("steps") {
        return blocked(BlockerKind::Stairs, "Stairs present (highway=steps)", q.blocked);
    }

    if tags.get("wheelchair").map(String::as_str) == Some("no") {
        return blocked(BlockerKind::WheelchairNo, "Marked not wheelchair accessible (wheelchair=no)", q.blocked);
    }

    if is_access_denied(tags) {
        return blocked(BlockerKind::AccessNo, "Access restricted (access/foot tag)", q.blocked);
    }

    if from_raised_kerb || to_raised_kerb {
        return blocked(BlockerKind::RaisedKerb, "Raised kerb at an endpoint", q.blocked);
    }

    if tags.get("wheelchair").map(String::as_str) == Some("limited") {
        return limited(BlockerKind::WheelchairLimited, Confidence::High, "Wheelchair access marked limited", q.limited);
    }

    if let Some(incline) = tags.get("incline").and_then(|s| parse_incline(s)) {
        if incline >= profile.steep_incline_threshold {
            let pct = (incline * 100.0).round() as i64;
            return limited(
                BlockerKind::SteepIncline,
                Confidence::Medium,
                &format!("Steep incline (~{pct}%)"),
                q.limited,
            );
        }
    }

    if let Some(surface) = tags.get("surface") {
        if ROUGH_SURFACES.contains(&surface.to_lowercase().as_str()) {
            return limited(BlockerKind::RoughSurface, Confidence::Medium, &format!("Rough surface (surface={surface})"), q.limited);
        }
    }

    if let Some(smoothness) = tags.get("smoothness") {
        if POOR_SMOOTHNESS.contains(&smoothness.to_lowercase().as_str()) {
            return limited(
                BlockerKind::RoughSurface,
                Confidence::Medium,
                &format!("Poor smoothness (smoothness={smoothness})"),
                q.limited,
            );
        }
    }

    EdgeClassification { status: EdgeStatus::Pass, kind: None, confidence: Confidence::Medium, signals: Vec::new(), quality: q.pass }
}

fn blocked(kind: BlockerKind, signal: &str, quality: f64) -> EdgeClassification {
    EdgeClassification { status: EdgeStatus::Blocked, kind: Some(kind), confidence: Confidence::High, signals: vec![signal.to_string()], quality }
}

fn limited(kind: BlockerKind, confidence: Confidence, signal: &str, quality: f64) -> EdgeClassification {
    EdgeClassification { status: EdgeStatus::Limited, kind: Some(kind), confidence, signals: vec![signal.to_string()], quality }
}

fn is_access_denied(tags: &HashMap<String, String>) -> bool {
    const DENY: &[&str] = &["no", "private", "military"];
    let access_denied = tags.get("access").map(|v| DENY.contains(&v.to_lowercase().as_str())).unwrap_or(false);
    let foot_denied = tags.get("foot").map(|v| DENY.contains(&v.to_lowercase().as_str())).unwrap_or(false);
    access_denied || foot_denied
}

/// Parse an OSM `incline` tag value into a unitless fraction (e.g. `"8%"`,
/// `"-8%"`, and `"8"` all yield `0.08`). Returns `None` for unparseable
/// input rather than a default.
///
/// Handles:
/// - Percentages: `"8%"` → `0.08`.
/// - Degrees: `"8°"` → `tan(8°)` ≈ `0.1405`.
/// - Plain numbers: magnitudes `<= 1` are unit fractions (`"0.08"` → `0.08`);
///   larger magnitudes are treated as already-percent (`"8"` → `0.08`).
pub fn parse_incline(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(body) = s.strip_suffix('%') {
        return body.trim().parse::<f64>().ok().map(|v| (v / 100.0).abs());
    }

    if let Some(body) = s.strip_suffix('°').or_else(|| s.strip_suffix("deg")) {
        return body.trim().parse::<f64>().ok().map(|deg| deg.to_radians().tan().abs());
    }

    let n: f64 = s.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(if n.abs() <= 1.0 { n.abs() } else { (n / 100.0).abs() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn steps_are_blocked_stairs() {
        let c = classify_edge(&tags(&[("highway", "steps")]), false, false, &EngineProfile::default());
        assert_eq!(c.status, EdgeStatus::Blocked);
        assert_eq!(c.kind, Some(BlockerKind::Stairs));
        assert_eq!(c.confidence, Confidence::High);
    }

    #[test]
    fn wheelchair_no_beats_steep_incline() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("wheelchair", "no"), ("incline", "15%")]), false, false, &EngineProfile::default());
        assert_eq!(c.kind, Some(BlockerKind::WheelchairNo));
    }

    #[test]
    fn access_no_is_blocked() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("access", "private")]), false, false, &EngineProfile::default());
        assert_eq!(c.status, EdgeStatus::Blocked);
        assert_eq!(c.kind, Some(BlockerKind::AccessNo));
    }

    #[test]
    fn raised_kerb_endpoint_blocks() {
        let c = classify_edge(&tags(&[("highway", "footway")]), false, true, &EngineProfile::default());
        assert_eq!(c.kind, Some(BlockerKind::RaisedKerb));
    }

    #[test]
    fn wheelchair_limited_is_limited_high_confidence() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("wheelchair", "limited")]), false, false, &EngineProfile::default());
        assert_eq!(c.status, EdgeStatus::Limited);
        assert_eq!(c.confidence, Confidence::High);
    }

    #[test]
    fn steep_incline_trips_limited() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("incline", "9%")]), false, false, &EngineProfile::default());
        assert_eq!(c.kind, Some(BlockerKind::SteepIncline));
        assert_eq!(c.status, EdgeStatus::Limited);
    }

    #[test]
    fn mild_incline_is_pass() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("incline", "3%")]), false, false, &EngineProfile::default());
        assert_eq!(c.status, EdgeStatus::Pass);
    }

    #[test]
    fn rough_surface_is_limited() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("surface", "gravel")]), false, false, &EngineProfile::default());
        assert_eq!(c.kind, Some(BlockerKind::RoughSurface));
    }

    #[test]
    fn poor_smoothness_is_limited() {
        let c = classify_edge(&tags(&[("highway", "footway"), ("smoothness", "very_bad")]), false, false, &EngineProfile::default());
        assert_eq!(c.kind, Some(BlockerKind::RoughSurface));
    }

    #[test]
    fn plain_footway_passes() {
        let c = classify_edge(&tags(&[("highway", "footway")]), false, false, &EngineProfile::default());
        assert_eq!(c.status, EdgeStatus::Pass);
        assert_eq!(c.kind, None);
        assert_eq!(c.quality, 1.0);
    }

    #[test]
    fn incline_parsing_variants() {
        assert!((parse_incline("8%").unwrap() - 0.08).abs() < 1e-9);
        assert!((parse_incline("-8%").unwrap() - 0.08).abs() < 1e-9);
        assert!((parse_incline("8").unwrap() - 0.08).abs() < 1e-9);
        assert!((parse_incline("0.08").unwrap() - 0.08).abs() < 1e-9);
        assert!(parse_incline("8°").unwrap() > 0.1);
        assert!(parse_incline("not a number").is_none());
    }
}
