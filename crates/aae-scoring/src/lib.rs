//! `aae-scoring` — the Scoring Core, Candidate Generator, Report Bonus
//! Applier, and Grouper & Ranker for the Accessibility Analysis Engine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|--------------------------------------------------------------|
//! | [`scoring`]    | `NetworkMetrics`, `compute_network_metrics`, `nas`, `oas`, `gai` |
//! | [`candidates`] | `Candidate`, `ScoringContext`, `generate_edge_candidates`, `generate_synthetic_candidates` |
//! | [`bonus`]      | `build_report_index`, `apply_report_bonus`                  |
//! | [`rank`]       | `group_and_rank`                                            |

pub mod bonus;
pub mod candidates;
pub mod rank;
pub mod scoring;

pub use bonus::{apply_report_bonus, build_report_index};
pub use candidates::{generate_edge_candidates, generate_synthetic_candidates, Candidate, ScoringContext};
pub use rank::group_and_rank;
pub use scoring::{compute_network_metrics, gai, nas, oas, NetworkMetrics};
