//! The Ingestor.
//!
//! Partitions a raw OSM element stream into a dense node table, a list of
//! pedestrian ways, a raised-kerb membership array, and a list of snappable
//! POI features. Buffers OSM-id-keyed scratch maps only for this one pass;
//! downstream stages never see an OSM id again except through `IngestedWay`'s
//! `osm_id` (needed to compose the `"<wayId>-<segmentIndex>"` edge id) and
//! `IngestedPoi`'s `osm_id` (carried through for debug/provenance only).

use std::collections::{HashMap, HashSet};

use aae_core::{EngineProfile, GeoPoint, NodeId, OverpassElement, PoiId};

use crate::error::{IngestError, IngestResult};
use crate::tags::{is_pedestrian_way, poi_kind_theme};

/// Whether a POI serves a healthcare or a general "essential services" role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiTheme {
    Healthcare,
    Essential,
}

impl PoiTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            PoiTheme::Healthcare => "healthcare",
            PoiTheme::Essential => "essential",
        }
    }
}

/// A pedestrian way surviving the highway-tag filter, with OSM node
/// references resolved to internal `NodeId`s.
#[derive(Debug, Clone)]
pub struct IngestedWay {
    pub osm_id: i64,
    pub node_ids: Vec<NodeId>,
    pub tags: HashMap<String, String>,
}

/// A POI feature extracted from a tagged OSM node, not yet snapped to the graph.
#[derive(Debug, Clone)]
pub struct IngestedPoi {
    pub id: PoiId,
    pub osm_id: i64,
    pub pos: GeoPoint,
    pub kind: String,
    pub theme: PoiTheme,
    pub wheelchair: Option<String>,
    pub toilets_wheelchair: Option<String>,
}

/// The output of the Ingestor stage.
pub struct IngestedGraph {
    /// Geographic position of each node, indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,
    /// `true` at index `n` if node `n` carries `barrier=kerb, kerb=raised`.
    pub raised_kerb: Vec<bool>,
    pub ways: Vec<IngestedWay>,
    pub pois: Vec<IngestedPoi>,
}

impl IngestedGraph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count_estimate(&self) -> usize {
        self.ways.iter().map(|w| w.node_ids.len().saturating_sub(1)).sum()
    }
}

struct RawWay {
    osm_id: i64,
    node_refs: Vec<i64>,
    tags: HashMap<String, String>,
}

struct RawPoi {
    osm_id: i64,
    pos: GeoPoint,
    kind: String,
    theme: PoiTheme,
    wheelchair: Option<String>,
    toilets_wheelchair: Option<String>,
}

/// Partition `elements` into a pedestrian graph.
///
/// # Errors
/// Returns [`IngestError::TooLarge`] if the resolved graph would exceed
/// `profile.caps.max_nodes` or `profile.caps.max_edges`.
pub fn ingest(elements: &[OverpassElement], profile: &EngineProfile) -> IngestResult<IngestedGraph> {
    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut raised_kerb_osm: HashSet<i64> = HashSet::new();
    let mut poi_candidates: Vec<RawPoi> = Vec::new();
    let mut raw_ways: Vec<RawWay> = Vec::new();

    // ── Pass 1: classify every element ────────────────────────────────────
    for el in elements {
        match el {
            OverpassElement::Node { id, lat, lon, tags } => {
                if !lat.is_finite() || !lon.is_finite() {
                    continue; // silent skip: malformed coordinate
                }
                let pos = GeoPoint::new(*lon, *lat);
                all_nodes.insert(*id, pos);

                let is_raised_kerb = tags.get("barrier").map(String::as_str) == Some("kerb")
                    && tags.get("kerb").map(String::as_str) == Some("raised");
                if is_raised_kerb {
                    raised_kerb_osm.insert(*id);
                }

                if let Some((kind, theme)) = poi_kind_theme(tags) {
                    poi_candidates.push(RawPoi {
                        osm_id: *id,
                        pos,
                        kind,
                        theme,
                        wheelchair: tags.get("wheelchair").cloned(),
                        toilets_wheelchair: tags.get("toilets:wheelchair").cloned(),
                    });
                }
            }
            OverpassElement::Way { id, nodes, tags } => {
                if nodes.len() < 2 {
                    continue; // silent skip: malformed way
                }
                if is_pedestrian_way(tags) {
                    raw_ways.push(RawWay { osm_id: *id, node_refs: nodes.clone(), tags: tags.clone() });
                }
            }
            OverpassElement::Unknown => {}
        }
    }

    // ── Pass 2: assign dense NodeIds in first-reference order ─────────────
    // Iterating ways (not a HashSet of referenced ids) keeps NodeId
    // assignment deterministic given the same element ordering.
    let ref_count_estimate: usize = raw_ways.iter().map(|w| w.node_refs.len()).sum();
    let mut osm_to_node: HashMap<i64, NodeId> = HashMap::with_capacity(ref_count_estimate);
    let mut node_pos: Vec<GeoPoint> = Vec::with_capacity(ref_count_estimate);

    for w in &raw_ways {
        for &osm_id in &w.node_refs {
            if osm_to_node.contains_key(&osm_id) {
                continue;
            }
            if let Some(&pos) = all_nodes.get(&osm_id) {
                let id = NodeId(node_pos.len() as u32);
                node_pos.push(pos);
                osm_to_node.insert(osm_id, id);
            }
            // else: orphan node reference -> silent skip
        }
    }
    drop(all_nodes);

    let node_count = node_pos.len();
    if node_count > profile.caps.max_nodes {
        return Err(IngestError::TooLarge { node_count, edge_count: 0 });
    }

    let mut raised_kerb = vec![false; node_count];
    for osm_id in &raised_kerb_osm {
        if let Some(&nid) = osm_to_node.get(osm_id) {
            raised_kerb[nid.index()] = true;
        }
    }

    // ── Pass 3: resolve way node references, dedup, tally edges ───────────
    let mut ways = Vec::with_capacity(raw_ways.len());
    let mut edge_count = 0usize;
    for w in raw_ways {
        let mut node_ids: Vec<NodeId> = Vec::with_capacity(w.node_refs.len());
        for osm_id in &w.node_refs {
            if let Some(&nid) = osm_to_node.get(osm_id) {
                node_ids.push(nid);
            }
            // orphan ref silently dropped; the way may shorten or vanish
        }
        node_ids.dedup(); // avoid zero-length edges from a repeated node ref
        if node_ids.len() < 2 {
            continue;
        }
        edge_count += node_ids.len() - 1;
        ways.push(IngestedWay { osm_id: w.osm_id, node_ids, tags: w.tags });
    }

    if edge_count > profile.caps.max_edges {
        return Err(IngestError::TooLarge { node_count, edge_count });
    }

    let pois = poi_candidates
        .into_iter()
        .enumerate()
        .map(|(i, p)| IngestedPoi {
            id: PoiId(i as u32),
            osm_id: p.osm_id,
            pos: p.pos,
            kind: p.kind,
            theme: p.theme,
            wheelchair: p.wheelchair,
            toilets_wheelchair: p.toilets_wheelchair,
        })
        .collect();

    Ok(IngestedGraph { node_pos, raised_kerb, ways, pois })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Node {
            id,
            lat,
            lon,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Way {
            id,
            nodes: nodes.to_vec(),
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn basic_footway_ingest() {
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(3, 0.002, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
            way(11, &[2, 3], &[("highway", "steps")]),
        ];
        let g = ingest(&elements, &EngineProfile::default()).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.ways.len(), 2);
        assert_eq!(g.edge_count_estimate(), 2);
    }

    #[test]
    fn non_pedestrian_way_is_dropped() {
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "motorway")]),
        ];
        let g = ingest(&elements, &EngineProfile::default()).unwrap();
        assert_eq!(g.ways.len(), 0);
        assert_eq!(g.node_count(), 0);
    }

    #[test]
    fn raised_kerb_node_is_flagged() {
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[("barrier", "kerb"), ("kerb", "raised")]),
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let g = ingest(&elements, &EngineProfile::default()).unwrap();
        assert!(!g.raised_kerb[0]);
        assert!(g.raised_kerb[1]);
    }

    #[test]
    fn orphan_node_reference_is_silently_skipped() {
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            // node 2 never defined
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let g = ingest(&elements, &EngineProfile::default()).unwrap();
        // Only node 1 resolved; the way shrank to a single node and was dropped.
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.ways.len(), 0);
    }

    #[test]
    fn too_many_nodes_is_fatal() {
        let mut profile = EngineProfile::default();
        profile.caps.max_nodes = 1;
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let err = ingest(&elements, &profile).unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { .. }));
    }

    #[test]
    fn too_many_edges_is_fatal() {
        let mut profile = EngineProfile::default();
        profile.caps.max_edges = 1;
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(3, 0.002, 0.0, &[]),
            way(10, &[1, 2, 3], &[("highway", "footway")]),
        ];
        let err = ingest(&elements, &profile).unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { .. }));
    }

    #[test]
    fn poi_node_is_extracted() {
        let elements = vec![node(5, 0.0, 0.0, &[("amenity", "hospital"), ("wheelchair", "yes")])];
        let g = ingest(&elements, &EngineProfile::default()).unwrap();
        assert_eq!(g.pois.len(), 1);
        assert_eq!(g.pois[0].kind, "hospital");
        assert_eq!(g.pois[0].theme, PoiTheme::Healthcare);
        assert_eq!(g.pois[0].wheelchair.as_deref(), Some("yes"));
    }
}
