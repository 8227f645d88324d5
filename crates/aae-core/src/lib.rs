//! `aae-core` — foundational types for the Accessibility Analysis Engine.
//!
//! This crate is a dependency of every other `aae-*` crate. It intentionally
//! has no `aae-*` dependencies and minimal external ones (`serde`,
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module      | Contents                                               |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `ComponentId`, `CandidateId`, `PoiId`, `ReportIdx` |
//! | [`geo`]     | `GeoPoint`, `BoundingBox`, haversine distance            |
//! | [`input`]   | Borrowed external wire types                |
//! | [`profile`] | `EngineProfile` — every tunable constant the engine uses |
//! | [`rounding`]| Centralized output-rounding helpers          |
//! | [`error`]   | `AaeError`, `AaeResult`                                  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod input;
pub mod profile;
pub mod rounding;

pub use error::{AaeError, AaeResult};
pub use geo::{BoundingBox, GeoPoint};
pub use ids::{CandidateId, ComponentId, EdgeId, NodeId, PoiId, ReportIdx};
pub use input::{Anchor, AggregatedReport, BoundingBoxInput, Confidence, OverpassElement, OverpassQueryVersion};
pub use profile::EngineProfile;
