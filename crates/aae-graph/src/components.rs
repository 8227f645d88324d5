//! Graph & Components.
//!
//! Builds an undirected PASS-edge graph over the node set, computes
//! connected components via [`UnionFind`], and accumulates per-component
//! PASS length. POI counts and destination histograms are filled in later by
//! the POI Snapper, which borrows this structure mutably.

use std::collections::HashMap;

use aae_core::{ComponentId, NodeId};

use crate::classify::EdgeStatus;
use crate::edges::Edge;
use crate::unionfind::UnionFind;

/// Per-component accumulated statistics.
#[derive(Clone, Debug, Default)]
pub struct ComponentStats {
    pub length_m: f64,
    pub poi_count: usize,
    pub destinations: HashMap<String, u32>,
}

/// The PASS-connected component structure over the full node set.
pub struct Components {
    /// Compacted component id for every graph node, dense `0..components.len()`.
    comp_of_node: Vec<ComponentId>,
    pub stats: Vec<ComponentStats>,
}

impl Components {
    pub fn comp_of(&self, node: NodeId) -> ComponentId {
        self.comp_of_node[node.index()]
    }

    pub fn component_count(&self) -> usize {
        self.stats.len()
    }

    pub fn node_count(&self) -> usize {
        self.comp_of_node.len()
    }

    /// The component with the greatest PASS length, or `None` if there are
    /// no nodes at all.
    pub fn largest(&self) -> Option<(ComponentId, f64)> {
        self.stats
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.length_m.partial_cmp(&b.length_m).unwrap())
            .map(|(i, s)| (ComponentId(i as u32), s.length_m))
    }
}

/// Build PASS-connected components over `node_count` nodes from `edges`.
/// Only edges with status PASS participate in union-find.
pub fn build_components(node_count: usize, edges: &[Edge]) -> Components {
    let mut uf = UnionFind::new(node_count);
    for edge in edges {
        if edge.classification.status == EdgeStatus::Pass {
            uf.union(edge.from.index(), edge.to.index());
        }
    }

    // Compact union-find roots into dense ComponentIds, assigned in node
    // iteration order for determinism.
    let mut root_to_comp: HashMap<usize, ComponentId> = HashMap::new();
    let mut comp_of_node = Vec::with_capacity(node_count);
    for n in 0..node_count {
        let root = uf.find(n);
        let next_id = root_to_comp.len() as u32;
        let comp = *root_to_comp.entry(root).or_insert(ComponentId(next_id));
        comp_of_node.push(comp);
    }

    let mut stats = vec![ComponentStats::default(); root_to_comp.len()];
    for edge in edges {
        if edge.classification.status == EdgeStatus::Pass {
            let comp = comp_of_node[edge.from.index()];
            stats[comp.index()].length_m += edge.length_m;
        }
    }

    Components { comp_of_node, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::build_edges;
    use aae_core::EngineProfile;
    use aae_ingest::{ingest, OverpassElement};

    fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Node { id, lat, lon, tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
    }
    fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Way { id, nodes: nodes.to_vec(), tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
    }

    #[test]
    fn stairs_edge_isolates_its_far_endpoint() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(3, 0.002, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
            way(11, &[2, 3], &[("highway", "steps")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let components = build_components(ingested.node_count(), &edges);

        assert_eq!(components.component_count(), 2);
        assert_eq!(components.comp_of(NodeId(0)), components.comp_of(NodeId(1)));
        assert_ne!(components.comp_of(NodeId(1)), components.comp_of(NodeId(2)));
    }

    #[test]
    fn component_length_sums_only_pass_edges() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let components = build_components(ingested.node_count(), &edges);
        let comp = components.comp_of(NodeId(0));
        assert!((components.stats[comp.index()].length_m - edges[0].length_m).abs() < 1e-9);
    }

    #[test]
    fn largest_picks_max_pass_length() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(3, 10.0, 10.0, &[]),
            node(4, 10.01, 10.0, &[]),
            way(10, &[1, 2], &[("highway", "footway")]),
            way(11, &[3, 4], &[("highway", "footway"), ("incline", "12%")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let components = build_components(ingested.node_count(), &edges);
        let (largest, len) = components.largest().unwrap();
        assert_eq!(largest, components.comp_of(NodeId(0)));
        assert!(len > 0.0);
    }
}
