//! OSM tag helpers: pedestrian-way classification and POI tag mapping.
//!
//! Kept as small, closed pattern-match functions
//! against dynamic dispatch for closed rule sets — the same shape as the
//! teacher's `car_speed_mps`/`is_oneway` helpers.

use std::collections::HashMap;

use crate::PoiTheme;

/// `true` if `tags` describes a way this engine treats as pedestrian
/// infrastructure.
pub fn is_pedestrian_way(tags: &HashMap<String, String>) -> bool {
    match tags.get("highway").map(String::as_str) {
        Some("footway") | Some("path") | Some("pedestrian") | Some("steps") | Some("living_street") => true,
        Some("service") => tags.get("service").map(String::as_str) == Some("alley"),
        _ => false,
    }
}

/// Map a node's tags to a POI `(kind, theme)` pair, or `None` if the node
/// isn't a destination feature this engine tracks.
///
/// POIs are not part of the external input — they are derived from the
/// same OSM element stream as the pedestrian ways. This mapping is a
/// deliberate, documented extension: see `DESIGN.md`.
pub fn poi_kind_theme(tags: &HashMap<String, String>) -> Option<(String, PoiTheme)> {
    if let Some(v) = tags.get("amenity") {
        let theme = match v.as_str() {
            "hospital" | "clinic" | "doctors" | "dentist" | "pharmacy" | "nursing_home" => Some(PoiTheme::Healthcare),
            "supermarket" | "bank" | "post_office" | "school" | "social_facility" | "community_centre"
            | "marketplace" | "pharmacy_counter" => Some(PoiTheme::Essential),
            _ => None,
        };
        if let Some(theme) = theme {
            return Some((v.clone(), theme));
        }
    }

    if let Some(v) = tags.get("healthcare") {
        return Some((v.clone(), PoiTheme::Healthcare));
    }

    if let Some(v) = tags.get("shop") {
        let essential = matches!(v.as_str(), "supermarket" | "convenience" | "grocery" | "chemist");
        if essential {
            return Some((v.clone(), PoiTheme::Essential));
        }
    }

    None
}
