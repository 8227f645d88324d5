//! `aae-output` — the Output Assembler for the Accessibility Analysis Engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|--------------------------------------------------------------------|
//! | [`payload`]  | `AnalysisResultPayload`, `RankedCandidate`, `Meta` and its nested types |
//! | [`assembler`]| `assemble`, the five `build_*_geojson` layer builders, `round_candidate` |

pub mod assembler;
pub mod payload;

pub use assembler::{
    assemble, build_accessible_streams_geojson, build_barriers_geojson, build_blocked_segments_geojson, build_score_grid_geojson, build_streams_geojson,
    round_candidate, AssembleInput, CountsInput,
};
pub use payload::{AnalysisResultPayload, Meta, RankedCandidate, CALCULATION_METHOD};
