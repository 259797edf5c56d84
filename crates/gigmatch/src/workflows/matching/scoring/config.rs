use serde::{Deserialize, Serialize};

/// Points awarded per matching signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub verified_skill: u32,
    pub unverified_skill: u32,
    pub tone_match: u32,
    pub language_match: u32,
}

impl ScoringWeights {
    pub const STANDARD: ScoringWeights = ScoringWeights {
        verified_skill: 20,
        unverified_skill: 5,
        tone_match: 3,
        language_match: 2,
    };

    pub const fn skill_points(&self, verified: bool) -> u32 {
        if verified {
            self.verified_skill
        } else {
            self.unverified_skill
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_skills_weigh_four_times_unverified() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.skill_points(true), 4 * weights.skill_points(false));
    }

    #[test]
    fn soft_signals_stay_below_a_single_skill() {
        let weights = ScoringWeights::default();
        assert!(weights.tone_match < weights.unverified_skill);
        assert!(weights.language_match < weights.unverified_skill);
    }
}
