//! The Anchor Resolver.
//!
//! Selects the baseline component by snapping the caller-supplied anchor to
//! the graph, falling back to a brute-force nearest node, and finally to
//! the largest PASS component if the graph has no nodes at all.

use aae_core::input::Anchor;
use aae_core::{ComponentId, EngineProfile, GeoPoint, NodeId};
use aae_spatial::GridIndex;

use crate::components::Components;

/// Which rung of the anchor priority ladder produced the result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnchorSource {
    CallerSnapped,
    BruteForceNearest,
    LargestComponentFallback,
}

/// The resolved anchor: a base component to treat as "reachable" for scoring,
/// plus diagnostics for `meta.debug`.
pub struct AnchorResolution {
    pub base_component: ComponentId,
    pub snapped_node: Option<NodeId>,
    pub source: AnchorSource,
    /// Soft-degrade warning to append to `meta.warnings`, if any.
    pub warning: Option<String>,
}

/// Resolve the baseline component by walking the anchor priority ladder.
///
/// `node_pos` and `node_index` must be non-empty together or both empty;
/// `components` must already reflect the PASS-edge union-find over the same
/// node set.
pub fn resolve_anchor(anchor: &Anchor, node_pos: &[GeoPoint], node_index: &GridIndex<NodeId>, components: &Components, profile: &EngineProfile) -> AnchorResolution {
    if let Some(pt) = anchor.geo_point() {
        let radius_m = profile.radii.anchor_snap_m;
        let margin_deg = (radius_m / 100_000.0).max(0.006);

        let mut nearest: Option<(NodeId, f64)> = None;
        for node in node_index.query_radius(pt, margin_deg) {
            let d = pt.distance_m(node_pos[node.index()]);
            if d <= radius_m && nearest.map(|(_, nd)| d < nd).unwrap_or(true) {
                nearest = Some((node, d));
            }
        }

        if let Some((node, _)) = nearest {
            return AnchorResolution {
                base_component: components.comp_of(node),
                snapped_node: Some(node),
                source: AnchorSource::CallerSnapped,
                warning: None,
            };
        }

        if let Some(node) = brute_force_nearest(pt, node_pos) {
            return AnchorResolution {
                base_component: components.comp_of(node),
                snapped_node: Some(node),
                source: AnchorSource::BruteForceNearest,
                warning: Some("Anchor POI could not be snapped within range; using the nearest available node.".to_string()),
            };
        }
    }

    match components.largest() {
        Some((comp, _)) => AnchorResolution {
            base_component: comp,
            snapped_node: None,
            source: AnchorSource::LargestComponentFallback,
            warning: Some("No anchor could be resolved; using the largest connected component.".to_string()),
        },
        None => AnchorResolution {
            base_component: ComponentId(0),
            snapped_node: None,
            source: AnchorSource::LargestComponentFallback,
            warning: Some("No pedestrian network nodes available to anchor on.".to_string()),
        },
    }
}

fn brute_force_nearest(pt: GeoPoint, node_pos: &[GeoPoint]) -> Option<NodeId> {
    node_pos
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| pt.distance_m(**a).partial_cmp(&pt.distance_m(**b)).unwrap())
        .map(|(i, _)| NodeId(i as u32))
}
