//! The Grouper & Ranker.
//!
//! Collapses candidates to at most one per `(base_component, other_component)`
//! pair — keeping the highest `rank_score` — then sorts the survivors by
//! `rank_score` descending (ties broken by `unlock_m`, then by the stable
//! insertion order `Vec::sort_by` already preserves) and assigns final
//! sequential `CandidateId`s.

use std::collections::HashMap;

use aae_core::{CandidateId, ComponentId};

use crate::candidates::Candidate;

/// Group candidates by `(base_component, other_component)`, keep the
/// highest-`rank_score` survivor per group, sort, truncate to
/// `max_candidates`, and assign final ids.
pub fn group_and_rank(candidates: Vec<Candidate>, max_candidates: usize) -> Vec<Candidate> {
    let mut best_index: HashMap<(ComponentId, ComponentId), usize> = HashMap::new();
    let mut kept: Vec<Candidate> = Vec::new();

    for candidate in candidates {
        let key = candidate.group_key();
        match best_index.get(&key) {
            Some(&idx) => {
                if candidate.rank_score > kept[idx].rank_score {
                    kept[idx] = candidate;
                }
            }
            None => {
                best_index.insert(key, kept.len());
                kept.push(candidate);
            }
        }
    }

    kept.sort_by(|a, b| b.rank_score.partial_cmp(&a.rank_score).unwrap().then_with(|| b.unlock_m.partial_cmp(&a.unlock_m).unwrap()));
    kept.truncate(max_candidates);

    for (i, candidate) in kept.iter_mut().enumerate() {
        candidate.id = CandidateId(i as u32);
    }

    kept
}
