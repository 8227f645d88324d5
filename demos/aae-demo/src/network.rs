//! Synthetic downtown Mobile, AL pedestrian network.
//!
//! A small hand-built OSM extract: a six-node footway grid around a transit
//! plaza, one stairway shortcut, one raised-kerb cul-de-sac, a hospital POI,
//! and a single crowdsourced accessibility report. Large enough to exercise
//! every pipeline stage without needing a real Overpass payload on disk.

use aae_core::OverpassElement;

/// Node ids, in the order `build_elements` defines them.
pub const PLAZA: i64 = 1;
pub const LIBRARY_CORNER: i64 = 2;
pub const TRANSIT_CENTER: i64 = 3;
pub const CUL_DE_SAC_GATE: i64 = 4;
pub const CUL_DE_SAC_END: i64 = 5;
pub const HOSPITAL_CORNER: i64 = 6;

pub fn build_elements() -> Vec<OverpassElement> {
    vec![
        node(PLAZA, -88.0431, 30.6944, &[]),
        node(LIBRARY_CORNER, -88.0421, 30.6944, &[]),
        node(TRANSIT_CENTER, -88.0411, 30.6944, &[]),
        node(CUL_DE_SAC_GATE, -88.0421, 30.6954, &[("barrier", "kerb"), ("kerb", "raised")]),
        node(CUL_DE_SAC_END, -88.0421, 30.6964, &[]),
        node(HOSPITAL_CORNER, -88.0411, 30.6954, &[("amenity", "hospital"), ("wheelchair", "yes")]),
        way(100, &[PLAZA, LIBRARY_CORNER], &[("highway", "footway"), ("name", "Plaza Walk")]),
        way(101, &[LIBRARY_CORNER, TRANSIT_CENTER], &[("highway", "steps"), ("name", "Transit Steps")]),
        way(102, &[LIBRARY_CORNER, CUL_DE_SAC_GATE], &[("highway", "footway"), ("name", "Archive Lane")]),
        way(103, &[CUL_DE_SAC_GATE, CUL_DE_SAC_END], &[("highway", "footway"), ("name", "Archive Court")]),
        way(104, &[TRANSIT_CENTER, HOSPITAL_CORNER], &[("highway", "footway"), ("surface", "gravel"), ("name", "Clinic Row")]),
    ]
}

fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OverpassElement {
    OverpassElement::Node { id, lat, lon, tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
}

fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OverpassElement {
    OverpassElement::Way { id, nodes: nodes.to_vec(), tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
}
