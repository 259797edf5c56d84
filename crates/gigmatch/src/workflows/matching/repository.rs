//! Collaborator contracts for the matching workflow.
//!
//! Each entity gets its own narrow trait so storage details (table names, join syntax,
//! hosted query builders) never reach the scoring code.

use std::future::Future;

use super::domain::{
    FreelancerCandidate, FreelancerId, Job, JobId, MatchKey, MatchNotification, MatchResult,
};

/// Read access to posted jobs plus the moderator approval flag.
pub trait JobDirectory: Send + Sync {
    fn get_job(
        &self,
        id: &JobId,
    ) -> impl Future<Output = Result<Option<Job>, RepositoryError>> + Send;

    /// Flip `approved` to true and return the updated job.
    fn mark_approved(&self, id: &JobId)
        -> impl Future<Output = Result<Job, RepositoryError>> + Send;

    fn pending_jobs(&self) -> impl Future<Output = Result<Vec<Job>, RepositoryError>> + Send;
}

/// User-directory lookup for freelancers open to new work.
pub trait FreelancerDirectory: Send + Sync {
    fn list_available_freelancers(
        &self,
    ) -> impl Future<Output = Result<Vec<FreelancerCandidate>, RepositoryError>> + Send;
}

/// Storage for match records keyed by `(job_id, freelancer_id)`.
pub trait MatchRepository: Send + Sync {
    /// Insert or replace the record for the pair. How an existing row is reconciled
    /// (for example keeping its approval flag) is up to the implementation.
    fn upsert_match(
        &self,
        record: MatchResult,
    ) -> impl Future<Output = Result<MatchResult, RepositoryError>> + Send;

    fn pending(&self) -> impl Future<Output = Result<Vec<MatchResult>, RepositoryError>> + Send;

    fn set_approved(
        &self,
        key: &MatchKey,
    ) -> impl Future<Output = Result<MatchResult, RepositoryError>> + Send;

    fn remove(
        &self,
        key: &MatchKey,
    ) -> impl Future<Output = Result<MatchResult, RepositoryError>> + Send;

    fn for_job(
        &self,
        job_id: &JobId,
    ) -> impl Future<Output = Result<Vec<MatchResult>, RepositoryError>> + Send;

    fn for_freelancer(
        &self,
        freelancer_id: &FreelancerId,
    ) -> impl Future<Output = Result<Vec<MatchResult>, RepositoryError>> + Send;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (e-mail, in-app inbox, chat bot).
pub trait NotificationPublisher: Send + Sync {
    fn publish(
        &self,
        notification: MatchNotification,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Notification dispatch error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
