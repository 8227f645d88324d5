//! Edge construction: segments ingested ways into the dense `Edge` table and
//! runs the Edge Classifier over each segment.

use std::collections::HashMap;

use aae_core::{EdgeId, EngineProfile, GeoPoint, NodeId};
use aae_ingest::IngestedGraph;

use crate::classify::{classify_edge, EdgeClassification};
use crate::fusion::ReportEvidence;

/// One pedestrian edge: a consecutive node pair within a way.
///
/// Identity is `"<wayId>-<segmentIndex>"`, reconstructed on
/// demand via [`Edge::external_id`] rather than stored, since it is needed
/// only at the output boundary.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub way_osm_id: i64,
    pub segment_index: u32,
    pub from: NodeId,
    pub to: NodeId,
    pub from_pos: GeoPoint,
    pub to_pos: GeoPoint,
    pub midpoint: GeoPoint,
    pub length_m: f64,
    pub tags: HashMap<String, String>,
    pub classification: EdgeClassification,
    pub location_label: String,
    /// Accumulated community-report evidence, populated by Report Fusion
    /// when this edge is the nearest match for one or more
    /// hard-category reports. `None` until fusion runs, or forever for
    /// edges no report ever matched.
    pub report_evidence: Option<ReportEvidence>,
}

impl Edge {
    pub fn external_id(&self) -> String {
        format!("{}-{}", self.way_osm_id, self.segment_index)
    }
}

/// Segment every ingested way into edges and classify each one.
///
/// `NodeId`s are trusted to already be members of the ingested node set
///; `node_pos` is indexed directly by `NodeId`.
pub fn build_edges(ingested: &IngestedGraph, profile: &EngineProfile) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(ingested.edge_count_estimate());

    for way in &ingested.ways {
        let label = way
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| format!("unnamed way {}", way.osm_id));

        for (seg_idx, pair) in way.node_ids.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let from_pos = ingested.node_pos[from.index()];
            let to_pos = ingested.node_pos[to.index()];
            let from_raised = ingested.raised_kerb[from.index()];
            let to_raised = ingested.raised_kerb[to.index()];

            let classification = classify_edge(&way.tags, from_raised, to_raised, profile);

            edges.push(Edge {
                id: EdgeId(edges.len() as u32),
                way_osm_id: way.osm_id,
                segment_index: seg_idx as u32,
                from,
                to,
                from_pos,
                to_pos,
                midpoint: from_pos.midpoint(to_pos),
                length_m: from_pos.distance_m(to_pos),
                tags: way.tags.clone(),
                classification,
                location_label: label.clone(),
                report_evidence: None,
            });
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use aae_ingest::{ingest, IngestedWay};
    use std::collections::HashMap as Map;

    fn mk_ingested() -> IngestedGraph {
        IngestedGraph {
            node_pos: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.0), GeoPoint::new(0.002, 0.0)],
            raised_kerb: vec![false, false, false],
            ways: vec![IngestedWay {
                osm_id: 10,
                node_ids: vec![NodeId(0), NodeId(1), NodeId(2)],
                tags: [("highway".to_string(), "footway".to_string())].into_iter().collect::<Map<_, _>>(),
            }],
            pois: vec![],
        }
    }

    #[test]
    fn one_way_with_three_nodes_yields_two_edges() {
        let ingested = mk_ingested();
        let edges = build_edges(&ingested, &EngineProfile::default());
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].external_id(), "10-0");
        assert_eq!(edges[1].external_id(), "10-1");
        assert!(edges[0].length_m > 0.0);
    }

    #[test]
    fn ingest_then_build_edges_roundtrip() {
        let elements = vec![];
        let g = ingest(&elements, &EngineProfile::default()).unwrap();
        assert!(build_edges(&g, &EngineProfile::default()).is_empty());
    }
}
