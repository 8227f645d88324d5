//! Ingest-subsystem error type.

use aae_core::AaeError;
use thiserror::Error;

/// Errors produced while partitioning an OSM element stream into a
/// pedestrian graph.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The resulting graph would exceed the node/edge caps.
    #[error("Area too large for analysis: {node_count} nodes, {edge_count} edges")]
    TooLarge { node_count: usize, edge_count: usize },
}

pub type IngestResult<T> = Result<T, IngestError>;

impl From<IngestError> for AaeError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::TooLarge { node_count, edge_count } => AaeError::too_large(format!(
                "Area too large for analysis: {node_count} nodes, {edge_count} edges exceed the configured graph caps"
            )),
        }
    }
}
