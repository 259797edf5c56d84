//! Job-to-freelancer matching and the moderation steps around it.
//!
//! An approved job is scored against the available freelancer pool, the best
//! candidates are stored as unapproved matches, and moderators then approve or
//! reject each one. Storage and notification are supplied by the caller through the
//! traits in [`repository`].

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    FreelancerCandidate, FreelancerId, Job, JobId, MatchBatch, MatchEntry, MatchKey,
    MatchNotification, MatchResult, SkillClaim, SkillId,
};
pub use memory::{
    InMemoryFreelancerDirectory, InMemoryJobDirectory, InMemoryMatchRepository,
    RecordingNotifier,
};
pub use repository::{
    FreelancerDirectory, JobDirectory, MatchRepository, NotificationError,
    NotificationPublisher, RepositoryError,
};
pub use router::{matching_router, MatchView};
pub use scoring::{MatchSignal, ScoreComponent, ScoredCandidate, ScoringEngine, ScoringWeights};
pub use service::{
    CallError, FailedMatchWrite, MatchingError, MatchingService, ReviewError, UpstreamSource,
};
