//! `aae-engine` — the top-level `AnalysisEngine` facade for the
//! Accessibility Analysis Engine. Wires ingestion, classification, fusion,
//! components, scoring, candidate generation, and output assembly into one
//! synchronous pipeline.

pub mod engine;

pub use aae_core::{AaeError, AaeResult};
pub use aae_output::AnalysisResultPayload;
pub use engine::{AnalysisEngine, AnalysisRequest};

#[cfg(test)]
mod tests;
