//! `aae-graph` — classification, fusion, components, POI snapping, and
//! anchor resolution for the Accessibility Analysis Engine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-------------------------------------------------------------|
//! | [`classify`]   | `classify_edge`, `EdgeStatus`, `BlockerKind`, `EdgeClassification` |
//! | [`edges`]      | `Edge`, `build_edges`                                      |
//! | [`fusion`]     | `fuse_reports`, `build_edge_index`, `ReportEvidence`, `FusionOutcome` |
//! | [`components`] | `build_components`, `Components`, `ComponentStats`          |
//! | [`poi`]        | `snap_pois`, `build_node_index`, `SnappedPoi`, `PoiTotals` |
//! | [`anchor`]     | `resolve_anchor`, `AnchorResolution`, `AnchorSource`         |
//! | [`unionfind`]  | `UnionFind` — iterative, path-compressed, union-by-size     |

pub mod anchor;
pub mod classify;
pub mod components;
pub mod edges;
pub mod fusion;
pub mod poi;
pub mod unionfind;

pub use anchor::{resolve_anchor, AnchorResolution, AnchorSource};
pub use classify::{classify_edge, BlockerKind, EdgeClassification, EdgeStatus};
pub use components::{build_components, ComponentStats, Components};
pub use edges::{build_edges, Edge};
pub use fusion::{build_edge_index, fuse_reports, FusionOutcome, ReportEvidence};
pub use poi::{build_node_index, snap_pois, PoiTotals, SnappedPoi};
pub use unionfind::UnionFind;
