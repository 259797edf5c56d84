use std::collections::BTreeMap;

use super::super::domain::{FreelancerCandidate, Job, SkillId};
use super::config::ScoringWeights;
use super::{MatchSignal, ScoreComponent};

/// Collapse repeated claims for one skill; a verified claim wins.
fn claimed_skills(candidate: &FreelancerCandidate) -> BTreeMap<&SkillId, bool> {
    let mut claims = BTreeMap::new();
    for claim in &candidate.skills {
        let verified = claims.entry(&claim.skill_id).or_insert(false);
        *verified |= claim.verified;
    }
    claims
}

pub(crate) fn score_candidate(
    job: &Job,
    candidate: &FreelancerCandidate,
    weights: &ScoringWeights,
) -> (Vec<ScoreComponent>, u32) {
    let mut components = Vec::new();
    let mut total: u32 = 0;

    for (skill_id, verified) in claimed_skills(candidate) {
        if !job.required_skill_ids.contains(skill_id) {
            continue;
        }

        let points = weights.skill_points(verified);
        let (signal, notes) = if verified {
            (
                MatchSignal::VerifiedSkill(skill_id.clone()),
                format!("verified skill {skill_id} required by job"),
            )
        } else {
            (
                MatchSignal::UnverifiedSkill(skill_id.clone()),
                format!("unverified skill {skill_id} required by job"),
            )
        };
        components.push(ScoreComponent {
            signal,
            points,
            notes,
        });
        total = total.saturating_add(points);
    }

    if candidate.tone == job.preferred_tone {
        components.push(ScoreComponent {
            signal: MatchSignal::ToneAligned,
            points: weights.tone_match,
            notes: format!("tone '{}' matches job preference", candidate.tone),
        });
        total = total.saturating_add(weights.tone_match);
    }

    if candidate.language == job.language {
        components.push(ScoreComponent {
            signal: MatchSignal::LanguageAligned,
            points: weights.language_match,
            notes: format!("works in {}", candidate.language),
        });
        total = total.saturating_add(weights.language_match);
    }

    (components, total)
}
