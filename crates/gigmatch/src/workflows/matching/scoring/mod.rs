mod config;
mod ranking;
mod rules;

pub use config::ScoringWeights;

use super::domain::{FreelancerCandidate, FreelancerId, Job, MatchEntry, SkillId};
use serde::{Deserialize, Serialize};

/// Stateless scorer that turns a job and a candidate pool into a ranked shortlist.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, job: &Job, candidate: &FreelancerCandidate) -> ScoredCandidate {
        let (components, score) = rules::score_candidate(job, candidate, &self.weights);
        ScoredCandidate {
            freelancer_id: candidate.id.clone(),
            score,
            components,
        }
    }

    /// Score every available candidate and return at most `cap` of them, best first.
    ///
    /// Unavailable candidates are skipped even when the pool was already filtered
    /// upstream. A freelancer listed twice is ranked once, using the higher score.
    pub fn rank<'a, I>(&self, job: &Job, pool: I, cap: usize) -> Vec<ScoredCandidate>
    where
        I: IntoIterator<Item = &'a FreelancerCandidate>,
    {
        let scored = pool
            .into_iter()
            .filter(|candidate| candidate.available)
            .map(|candidate| self.score(job, candidate))
            .collect();
        ranking::select_top(scored, cap)
    }
}

/// What earned a candidate points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "skill_id", rename_all = "snake_case")]
pub enum MatchSignal {
    VerifiedSkill(SkillId),
    UnverifiedSkill(SkillId),
    ToneAligned,
    LanguageAligned,
}

/// Single contribution to a candidate's score, kept for moderator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub signal: MatchSignal,
    pub points: u32,
    pub notes: String,
}

/// Candidate score together with the breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub freelancer_id: FreelancerId,
    pub score: u32,
    pub components: Vec<ScoreComponent>,
}

impl ScoredCandidate {
    pub fn entry(&self) -> MatchEntry {
        MatchEntry {
            freelancer_id: self.freelancer_id.clone(),
            score: self.score,
        }
    }

    pub fn skill_points(&self) -> u32 {
        self.components
            .iter()
            .filter(|component| {
                matches!(
                    component.signal,
                    MatchSignal::VerifiedSkill(_) | MatchSignal::UnverifiedSkill(_)
                )
            })
            .fold(0, |total: u32, component| total.saturating_add(component.points))
    }
}
