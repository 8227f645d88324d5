//! `aae-ingest` — the Ingestor stage.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                 |
//! |------------|-----------------------------------------------------------|
//! | [`ingest`] | `ingest()`, `IngestedGraph`, `IngestedWay`, `IngestedPoi` |
//! | [`tags`]   | Pedestrian-way and POI tag-matching helpers               |
//! | [`error`]  | `IngestError`, `IngestResult`                             |

pub mod error;
pub mod ingest;
pub mod tags;

pub use error::{IngestError, IngestResult};
pub use ingest::{ingest, IngestedGraph, IngestedPoi, IngestedWay, PoiTheme};

// Re-exported for callers' convenience: every `ingest()` caller needs this
// input type, and downstream test modules construct it directly.
pub use aae_core::OverpassElement;
