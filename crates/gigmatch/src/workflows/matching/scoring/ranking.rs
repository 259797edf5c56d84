use std::cmp::Ordering;
use std::collections::HashMap;

use super::super::domain::FreelancerId;
use super::ScoredCandidate;

/// Highest score first; equal scores fall back to ascending freelancer id.
pub(crate) fn by_rank(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    right
        .score
        .cmp(&left.score)
        .then_with(|| left.freelancer_id.cmp(&right.freelancer_id))
}

/// Keep one entry per freelancer, order, and cut to `cap`.
pub(crate) fn select_top(scored: Vec<ScoredCandidate>, cap: usize) -> Vec<ScoredCandidate> {
    let mut best: HashMap<FreelancerId, ScoredCandidate> = HashMap::with_capacity(scored.len());
    for candidate in scored {
        let outranked = best
            .get(&candidate.freelancer_id)
            .is_some_and(|existing| existing.score >= candidate.score);
        if !outranked {
            best.insert(candidate.freelancer_id.clone(), candidate);
        }
    }

    let mut ranked: Vec<ScoredCandidate> = best.into_values().collect();
    ranked.sort_by(by_rank);
    ranked.truncate(cap);
    ranked
}
