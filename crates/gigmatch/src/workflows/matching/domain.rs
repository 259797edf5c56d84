use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

/// Identifier wrapper for freelancer accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreelancerId(pub String);

/// Identifier from the shared skill catalogue.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

display_id!(JobId, FreelancerId, SkillId);

/// Posted work request as seen by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required_skill_ids: BTreeSet<SkillId>,
    pub preferred_tone: String,
    pub language: String,
    #[serde(default)]
    pub approved: bool,
}

/// A skill listed on a freelancer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillClaim {
    pub skill_id: SkillId,
    #[serde(default)]
    pub verified: bool,
}

/// Freelancer profile considered for a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerCandidate {
    pub id: FreelancerId,
    #[serde(default)]
    pub skills: Vec<SkillClaim>,
    pub tone: String,
    pub language: String,
    #[serde(default)]
    pub available: bool,
}

/// Persisted pairing of a job and a freelancer awaiting moderation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: JobId,
    pub freelancer_id: FreelancerId,
    pub score: u32,
    pub approved: bool,
}

impl MatchResult {
    /// New records always start unapproved.
    pub fn pending(job_id: JobId, freelancer_id: FreelancerId, score: u32) -> Self {
        Self {
            job_id,
            freelancer_id,
            score,
            approved: false,
        }
    }

    pub fn key(&self) -> MatchKey {
        MatchKey {
            job_id: self.job_id.clone(),
            freelancer_id: self.freelancer_id.clone(),
        }
    }

    pub const fn status_label(&self) -> &'static str {
        if self.approved {
            "approved"
        } else {
            "pending_review"
        }
    }
}

/// Upsert key for match records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchKey {
    pub job_id: JobId,
    pub freelancer_id: FreelancerId,
}

/// One emitted match in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub freelancer_id: FreelancerId,
    pub score: u32,
}

/// Result of a matching run, ordered by descending score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBatch {
    pub job_id: JobId,
    pub matches: Vec<MatchEntry>,
}

impl MatchBatch {
    pub fn empty(job_id: JobId) -> Self {
        Self {
            job_id,
            matches: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Outbound events for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchNotification {
    /// New candidates are waiting for moderator review.
    MatchesReady { job_id: JobId, count: usize },
    /// A moderator confirmed a match; the freelancer and client can be told.
    MatchApproved {
        job_id: JobId,
        freelancer_id: FreelancerId,
        score: u32,
    },
}

impl MatchNotification {
    pub const fn template(&self) -> &'static str {
        match self {
            MatchNotification::MatchesReady { .. } => "matches_ready",
            MatchNotification::MatchApproved { .. } => "match_approved",
        }
    }
}
