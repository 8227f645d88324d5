//! The POI Snapper.
//!
//! Snaps every POI feature to the nearest graph node within a radius,
//! enriching each with snap metadata and contributing to its owning
//! component's POI count and destination-kind histogram.

use aae_core::{EngineProfile, GeoPoint, NodeId, PoiId};
use aae_ingest::{IngestedPoi, PoiTheme};
use aae_spatial::GridIndex;

use crate::components::Components;

/// A POI feature after the snap attempt.
#[derive(Clone, Debug)]
pub struct SnappedPoi {
    pub id: PoiId,
    pub osm_id: i64,
    pub pos: GeoPoint,
    pub kind: String,
    pub theme: PoiTheme,
    pub wheelchair: Option<String>,
    pub toilets_wheelchair: Option<String>,
    pub snapped_node: Option<NodeId>,
    pub snap_distance_m: Option<f64>,
}

/// Global POI snap counts, feeding the OAS denominator.
#[derive(Copy, Clone, Debug, Default)]
pub struct PoiTotals {
    pub total_snapped: usize,
    pub total_unsnapped: usize,
}

/// Build the node spatial index used both by the POI Snapper and the
/// Anchor Resolver.
pub fn build_node_index(node_pos: &[GeoPoint], profile: &EngineProfile) -> GridIndex<NodeId> {
    let mut idx = GridIndex::new(profile.grid.node_cell_deg, profile.grid.node_cell_deg);
    for (i, &pos) in node_pos.iter().enumerate() {
        idx.insert_point(pos, NodeId(i as u32));
    }
    idx
}

/// Snap every POI to its nearest graph node within `profile.radii.poi_snap_m`,
/// updating `components`'s per-component POI counts and destination
/// histograms for every successful snap.
pub fn snap_pois(
    pois: &[IngestedPoi],
    node_pos: &[GeoPoint],
    node_index: &GridIndex<NodeId>,
    components: &mut Components,
    profile: &EngineProfile,
) -> (Vec<SnappedPoi>, PoiTotals) {
    let radius_m = profile.radii.poi_snap_m;
    let margin_deg = (radius_m / 100_000.0).max(0.003);

    let mut out = Vec::with_capacity(pois.len());
    let mut totals = PoiTotals::default();

    for poi in pois {
        let mut nearest: Option<(NodeId, f64)> = None;
        for node in node_index.query_radius(poi.pos, margin_deg) {
            let d = poi.pos.distance_m(node_pos[node.index()]);
            if d <= radius_m && nearest.map(|(_, nd)| d < nd).unwrap_or(true) {
                nearest = Some((node, d));
            }
        }

        let (snapped_node, snap_distance_m) = match nearest {
            Some((node, d)) => {
                let comp = components.comp_of(node);
                let stats = &mut components.stats[comp.index()];
                stats.poi_count += 1;
                *stats.destinations.entry(poi.kind.clone()).or_insert(0) += 1;
                totals.total_snapped += 1;
                (Some(node), Some(d))
            }
            None => {
                totals.total_unsnapped += 1;
                (None, None)
            }
        };

        out.push(SnappedPoi {
            id: poi.id,
            osm_id: poi.osm_id,
            pos: poi.pos,
            kind: poi.kind.clone(),
            theme: poi.theme,
            wheelchair: poi.wheelchair.clone(),
            toilets_wheelchair: poi.toilets_wheelchair.clone(),
            snapped_node,
            snap_distance_m,
        });
    }

    (out, totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::build_components;
    use crate::edges::build_edges;
    use aae_ingest::{ingest, OverpassElement};

    fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Node { id, lat, lon, tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
    }
    fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement::Way { id, nodes: nodes.to_vec(), tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() }
    }

    #[test]
    fn poi_within_radius_snaps_and_increments_component() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(5, 0.0005, 0.0001, &[("amenity", "hospital")]),
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let mut components = build_components(ingested.node_count(), &edges);
        let node_index = build_node_index(&ingested.node_pos, &profile);

        let (snapped, totals) = snap_pois(&ingested.pois, &ingested.node_pos, &node_index, &mut components, &profile);

        assert_eq!(totals.total_snapped, 1);
        assert_eq!(totals.total_unsnapped, 0);
        assert!(snapped[0].snapped_node.is_some());
        let comp = components.comp_of(snapped[0].snapped_node.unwrap());
        assert_eq!(components.stats[comp.index()].poi_count, 1);
        assert_eq!(*components.stats[comp.index()].destinations.get("hospital").unwrap(), 1);
    }

    #[test]
    fn poi_far_from_any_node_is_unsnapped() {
        let profile = EngineProfile::default();
        let elements = vec![
            node(1, 0.0, 0.0, &[]),
            node(2, 0.001, 0.0, &[]),
            node(5, 10.0, 10.0, &[("amenity", "hospital")]),
            way(10, &[1, 2], &[("highway", "footway")]),
        ];
        let ingested = ingest(&elements, &profile).unwrap();
        let edges = build_edges(&ingested, &profile);
        let mut components = build_components(ingested.node_count(), &edges);
        let node_index = build_node_index(&ingested.node_pos, &profile);

        let (snapped, totals) = snap_pois(&ingested.pois, &ingested.node_pos, &node_index, &mut components, &profile);
        assert_eq!(totals.total_unsnapped, 1);
        assert!(snapped[0].snapped_node.is_none());
    }
}
