use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    FreelancerCandidate, FreelancerId, Job, JobId, MatchBatch, MatchEntry, MatchKey,
    MatchNotification, MatchResult,
};
use super::repository::{
    FreelancerDirectory, JobDirectory, MatchRepository, NotificationError,
    NotificationPublisher, RepositoryError,
};
use super::scoring::{ScoredCandidate, ScoringEngine};
use crate::config::MatchingConfig;

/// Service composing the scoring engine with the job, freelancer, match, and
/// notification collaborators.
pub struct MatchingService<J, F, M, N> {
    jobs: Arc<J>,
    freelancers: Arc<F>,
    matches: Arc<M>,
    notifier: Arc<N>,
    engine: ScoringEngine,
    config: MatchingConfig,
}

impl<J, F, M, N> MatchingService<J, F, M, N>
where
    J: JobDirectory + 'static,
    F: FreelancerDirectory + 'static,
    M: MatchRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        freelancers: Arc<F>,
        matches: Arc<M>,
        notifier: Arc<N>,
        config: MatchingConfig,
    ) -> Self {
        Self::with_engine(
            jobs,
            freelancers,
            matches,
            notifier,
            ScoringEngine::default(),
            config,
        )
    }

    pub fn with_engine(
        jobs: Arc<J>,
        freelancers: Arc<F>,
        matches: Arc<M>,
        notifier: Arc<N>,
        engine: ScoringEngine,
        config: MatchingConfig,
    ) -> Self {
        Self {
            jobs,
            freelancers,
            matches,
            notifier,
            engine,
            config,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score the available freelancers for `job_id` and persist the shortlist.
    ///
    /// The job is expected to be approved already; an unapproved job is still matched
    /// but the call is logged. Every write settles before this returns.
    pub async fn run_matching(&self, job_id: &JobId) -> Result<MatchBatch, MatchingError> {
        let job = self.load_job(job_id).await?;
        let pool = self.load_pool(job_id).await?;

        let ranked = self.shortlist(&job, &pool);
        if ranked.is_empty() {
            info!(job_id = %job.id, "no available freelancers for job");
            return Ok(MatchBatch::empty(job.id));
        }

        let mut written = Vec::with_capacity(ranked.len());
        let mut failed = Vec::new();
        for candidate in &ranked {
            let record = MatchResult::pending(
                job.id.clone(),
                candidate.freelancer_id.clone(),
                candidate.score,
            );
            match call_with_timeout(self.config.call_timeout, self.matches.upsert_match(record))
                .await
            {
                Ok(_) => written.push(candidate.entry()),
                Err(reason) => {
                    warn!(
                        job_id = %job.id,
                        freelancer_id = %candidate.freelancer_id,
                        %reason,
                        "failed to store match"
                    );
                    failed.push(FailedMatchWrite {
                        freelancer_id: candidate.freelancer_id.clone(),
                        score: candidate.score,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        if !failed.is_empty() {
            return Err(MatchingError::PartialWriteFailure {
                job_id: job.id,
                written,
                failed,
            });
        }

        info!(
            job_id = %job.id,
            title = %job.title,
            stored = written.len(),
            "stored matches for job"
        );
        let batch = MatchBatch {
            job_id: job.id,
            matches: written,
        };
        self.announce(MatchNotification::MatchesReady {
            job_id: batch.job_id.clone(),
            count: batch.len(),
        })
        .await;

        Ok(batch)
    }

    /// Rank without persisting anything; used for previews and audits.
    pub async fn preview(&self, job_id: &JobId) -> Result<Vec<ScoredCandidate>, MatchingError> {
        let job = self.load_job(job_id).await?;
        let pool = self.load_pool(job_id).await?;
        Ok(self.shortlist(&job, &pool))
    }

    /// Moderator approval of a job, followed by a matching run.
    pub async fn approve_job(&self, job_id: &JobId) -> Result<MatchBatch, ReviewError> {
        let approval = self.jobs.mark_approved(job_id);
        let job = match call_with_timeout(self.config.call_timeout, approval).await {
            Ok(job) => job,
            Err(CallError::Repository(RepositoryError::NotFound)) => {
                return Err(MatchingError::NotFound {
                    job_id: job_id.clone(),
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(job_id = %job.id, "job approved, running matching");
        Ok(self.run_matching(&job.id).await?)
    }

    pub async fn pending_jobs(&self) -> Result<Vec<Job>, ReviewError> {
        let mut jobs =
            call_with_timeout(self.config.call_timeout, self.jobs.pending_jobs()).await?;
        jobs.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(jobs)
    }

    /// Unapproved match records, grouped by job and best score first.
    pub async fn pending_matches(&self) -> Result<Vec<MatchResult>, ReviewError> {
        let mut records =
            call_with_timeout(self.config.call_timeout, self.matches.pending()).await?;
        records.sort_by(|left, right| {
            left.job_id
                .cmp(&right.job_id)
                .then_with(|| right.score.cmp(&left.score))
                .then_with(|| left.freelancer_id.cmp(&right.freelancer_id))
        });
        Ok(records)
    }

    pub async fn approve_match(
        &self,
        job_id: &JobId,
        freelancer_id: &FreelancerId,
    ) -> Result<MatchResult, ReviewError> {
        let key = match_key(job_id, freelancer_id);
        let record =
            call_with_timeout(self.config.call_timeout, self.matches.set_approved(&key)).await?;

        info!(job_id = %record.job_id, freelancer_id = %record.freelancer_id, "match approved");
        let notification = MatchNotification::MatchApproved {
            job_id: record.job_id.clone(),
            freelancer_id: record.freelancer_id.clone(),
            score: record.score,
        };
        call_with_timeout(self.config.call_timeout, self.notifier.publish(notification)).await?;

        Ok(record)
    }

    /// Rejected matches are deleted rather than flagged.
    pub async fn reject_match(
        &self,
        job_id: &JobId,
        freelancer_id: &FreelancerId,
    ) -> Result<MatchResult, ReviewError> {
        let key = match_key(job_id, freelancer_id);
        let record = call_with_timeout(self.config.call_timeout, self.matches.remove(&key)).await?;
        info!(job_id = %record.job_id, freelancer_id = %record.freelancer_id, "match rejected");
        Ok(record)
    }

    /// Client-facing list: approved matches only.
    pub async fn approved_matches_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<MatchResult>, ReviewError> {
        let mut records =
            call_with_timeout(self.config.call_timeout, self.matches.for_job(job_id)).await?;
        records.retain(|record| record.approved);
        records.sort_by(by_score);
        Ok(records)
    }

    pub async fn matches_for_freelancer(
        &self,
        freelancer_id: &FreelancerId,
    ) -> Result<Vec<MatchResult>, ReviewError> {
        let mut records = call_with_timeout(
            self.config.call_timeout,
            self.matches.for_freelancer(freelancer_id),
        )
        .await?;
        records.sort_by(|left, right| {
            right
                .score
                .cmp(&left.score)
                .then_with(|| left.job_id.cmp(&right.job_id))
        });
        Ok(records)
    }

    async fn load_job(&self, job_id: &JobId) -> Result<Job, MatchingError> {
        let lookup = call_with_timeout(self.config.call_timeout, self.jobs.get_job(job_id)).await;
        let job = match lookup {
            Ok(Some(job)) => job,
            Ok(None) | Err(CallError::Repository(RepositoryError::NotFound)) => {
                warn!(%job_id, "job not found, skipping matching");
                return Err(MatchingError::NotFound {
                    job_id: job_id.clone(),
                });
            }
            Err(err) => {
                warn!(%job_id, error = %err, "job lookup failed");
                return Err(MatchingError::UpstreamUnavailable {
                    upstream: UpstreamSource::JobLookup,
                    detail: err.to_string(),
                });
            }
        };

        if !job.approved {
            warn!(%job_id, "matching invoked for a job that is not approved");
        }
        Ok(job)
    }

    async fn load_pool(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<FreelancerCandidate>, MatchingError> {
        call_with_timeout(
            self.config.call_timeout,
            self.freelancers.list_available_freelancers(),
        )
        .await
        .map_err(|err| {
            warn!(%job_id, error = %err, "freelancer lookup failed");
            MatchingError::UpstreamUnavailable {
                upstream: UpstreamSource::CandidatePool,
                detail: err.to_string(),
            }
        })
    }

    fn shortlist(
        &self,
        job: &Job,
        pool: &[FreelancerCandidate],
    ) -> Vec<ScoredCandidate> {
        let ranked = self.engine.rank(job, pool, self.config.max_matches);
        for candidate in &ranked {
            debug!(
                job_id = %job.id,
                freelancer_id = %candidate.freelancer_id,
                score = candidate.score,
                "scored candidate"
            );
        }
        ranked
    }

    async fn announce(&self, notification: MatchNotification) {
        let template = notification.template();
        let dispatch = self.notifier.publish(notification);
        if let Err(err) = call_with_timeout(self.config.call_timeout, dispatch).await {
            warn!(template, error = %err, "notification dispatch failed");
        }
    }
}

fn match_key(job_id: &JobId, freelancer_id: &FreelancerId) -> MatchKey {
    MatchKey {
        job_id: job_id.clone(),
        freelancer_id: freelancer_id.clone(),
    }
}

fn by_score(left: &MatchResult, right: &MatchResult) -> std::cmp::Ordering {
    right
        .score
        .cmp(&left.score)
        .then_with(|| left.freelancer_id.cmp(&right.freelancer_id))
}

async fn call_with_timeout<T, E, Fut>(limit: Duration, call: Fut) -> Result<T, CallError>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<CallError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(CallError::TimedOut(limit)),
    }
}

/// Failure of a single collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("call timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

/// Which read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSource {
    JobLookup,
    CandidatePool,
}

/// A match record that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMatchWrite {
    pub freelancer_id: FreelancerId,
    pub score: u32,
    pub reason: String,
}

/// Errors returned by [`MatchingService::run_matching`]. An empty pool is not one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchingError {
    #[error("job {job_id} not found")]
    NotFound { job_id: JobId },
    #[error("upstream {upstream:?} unavailable: {detail}")]
    UpstreamUnavailable {
        upstream: UpstreamSource,
        detail: String,
    },
    #[error(
        "stored {} of {} matches for job {job_id}",
        .written.len(),
        .written.len() + .failed.len()
    )]
    PartialWriteFailure {
        job_id: JobId,
        written: Vec<MatchEntry>,
        failed: Vec<FailedMatchWrite>,
    },
}

/// Errors raised by the moderation operations around matching.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Matching(#[from] MatchingError),
    #[error(transparent)]
    Call(#[from] CallError),
}

impl ReviewError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReviewError::Matching(MatchingError::NotFound { .. })
                | ReviewError::Call(CallError::Repository(RepositoryError::NotFound))
        )
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, ReviewError::Call(CallError::TimedOut(_)))
    }
}
