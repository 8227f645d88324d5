//! Borrowed external input types.
//!
//! All types here are produced by collaborators out of scope for this
//! engine (the OSM fetcher, the reports journal, the job queue) and are
//! only ever read, never mutated, by the pipeline.

use std::collections::HashMap;

use serde::Deserialize;

use crate::geo::{BoundingBox as CoreBoundingBox, GeoPoint};

/// `[minLon, minLat, maxLon, maxLat]`, already normalized and validated by
/// the host. Deserializes from the bare four-element JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "[f64; 4]")]
pub struct BoundingBoxInput(pub CoreBoundingBox);

impl TryFrom<[f64; 4]> for BoundingBoxInput {
    type Error = String;

    fn try_from(v: [f64; 4]) -> Result<Self, Self::Error> {
        let [min_lon, min_lat, max_lon, max_lat] = v;
        if !v.iter().all(|x| x.is_finite()) {
            return Err("bounding box contains a non-finite coordinate".to_string());
        }
        if min_lon >= max_lon || min_lat >= max_lat {
            return Err("bounding box min must be strictly less than max".to_string());
        }
        Ok(BoundingBoxInput(CoreBoundingBox::new(min_lon, min_lat, max_lon, max_lat)))
    }
}

/// A single OSM element from the Overpass-shaped response.
///
/// Unknown `type` values are ignored (captured by the `Unknown` variant via
/// `#[serde(other)]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Way {
        id: i64,
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Unknown,
}

/// Caller-supplied anchor: an optional coordinate plus an optional opaque
/// POI id carried through to debug output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Anchor {
    pub point: Option<[f64; 2]>,
    pub poi_id: Option<String>,
}

impl Anchor {
    pub fn geo_point(&self) -> Option<GeoPoint> {
        self.point.map(|[lon, lat]| GeoPoint::new(lon, lat))
    }
}

/// Confidence level shared by edge classifications and community reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// `max(self, other)` — used when Report Fusion "bumps confidence to at
    /// least the report's confidence".
    pub fn at_least(self, other: Confidence) -> Confidence {
        self.max(other)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        })
    }
}

/// One aggregated crowdsourced report.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatedReport {
    pub report_id: String,
    pub category: String,
    pub confidence: Confidence,
    pub reports_count: u32,
    pub renouncements: u32,
    pub effective_reports: i64,
    pub coordinates: Option<[f64; 2]>,
}

impl AggregatedReport {
    pub fn geo_point(&self) -> Option<GeoPoint> {
        self.coordinates.map(|[lon, lat]| GeoPoint::new(lon, lat))
    }

    /// Only reports with `effective_reports > 0` and coordinates present
    /// participate in fusion/bonus/synthetic-candidate logic.
    pub fn is_actionable(&self) -> bool {
        self.effective_reports > 0 && self.coordinates.is_some()
    }

    /// The fixed "hard report" category set. Matching is
    /// case-insensitive since the journal's category strings are
    /// human-authored (e.g. "Blocked sidewalk").
    pub fn is_hard_category(&self) -> bool {
        const HARD: &[&str] = &[
            "blocked sidewalk",
            "broken curb ramp",
            "no curb ramp",
            "elevator out of service",
            "construction detour",
            "flooded path",
            "unsafe crossing",
            "accessibility issue",
        ];
        let lower = self.category.to_lowercase();
        HARD.iter().any(|h| *h == lower)
    }
}

/// Opaque version string stamped into `meta.overpass_query_version`.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct OverpassQueryVersion(pub String);

impl std::fmt::Display for OverpassQueryVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
