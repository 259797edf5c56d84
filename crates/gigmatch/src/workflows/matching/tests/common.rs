use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::config::MatchingConfig;
use crate::workflows::matching::domain::{
    FreelancerCandidate, FreelancerId, Job, JobId, MatchKey, MatchNotification, MatchResult,
    SkillClaim, SkillId,
};
use crate::workflows::matching::memory::{
    InMemoryFreelancerDirectory, InMemoryJobDirectory, InMemoryMatchRepository,
    RecordingNotifier,
};
use crate::workflows::matching::repository::{
    FreelancerDirectory, JobDirectory, MatchRepository, NotificationError,
    NotificationPublisher, RepositoryError,
};
use crate::workflows::matching::{matching_router, MatchingService};

pub(super) type MemoryService = MatchingService<
    InMemoryJobDirectory,
    InMemoryFreelancerDirectory,
    InMemoryMatchRepository,
    RecordingNotifier,
>;

pub(super) fn skill(id: &str) -> SkillId {
    SkillId(id.to_string())
}

pub(super) fn job_id(id: &str) -> JobId {
    JobId(id.to_string())
}

pub(super) fn freelancer_id(id: &str) -> FreelancerId {
    FreelancerId(id.to_string())
}

/// Approved job requiring skills A and B, formal tone, English.
pub(super) fn copywriting_job() -> Job {
    Job {
        id: job_id("job-100"),
        title: "Product launch copy".to_string(),
        required_skill_ids: [skill("A"), skill("B")].into_iter().collect::<BTreeSet<_>>(),
        preferred_tone: "formal".to_string(),
        language: "English".to_string(),
        approved: true,
    }
}

pub(super) fn candidate(
    id: &str,
    skills: &[(&str, bool)],
    tone: &str,
    language: &str,
) -> FreelancerCandidate {
    FreelancerCandidate {
        id: freelancer_id(id),
        skills: skills
            .iter()
            .map(|(skill_id, verified)| SkillClaim {
                skill_id: skill(skill_id),
                verified: *verified,
            })
            .collect(),
        tone: tone.to_string(),
        language: language.to_string(),
        available: true,
    }
}

/// Scores 20 + 5 + 3 + 2 = 30 against [`copywriting_job`].
pub(super) fn candidate_x() -> FreelancerCandidate {
    candidate("fl-x", &[("A", true), ("B", false)], "formal", "English")
}

/// Scores 5 against [`copywriting_job`].
pub(super) fn candidate_y() -> FreelancerCandidate {
    candidate("fl-y", &[("A", false)], "casual", "French")
}

pub(super) fn test_config() -> MatchingConfig {
    MatchingConfig {
        max_matches: 3,
        call_timeout: Duration::from_millis(200),
    }
}

pub(super) struct Fixture {
    pub(super) service: MemoryService,
    pub(super) jobs: Arc<InMemoryJobDirectory>,
    pub(super) matches: Arc<InMemoryMatchRepository>,
    pub(super) notifier: Arc<RecordingNotifier>,
}

pub(super) fn build_service(jobs: Vec<Job>, freelancers: Vec<FreelancerCandidate>) -> Fixture {
    let jobs = Arc::new(InMemoryJobDirectory::with_jobs(jobs));
    let freelancers = Arc::new(InMemoryFreelancerDirectory::with_freelancers(freelancers));
    let matches = Arc::new(InMemoryMatchRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = MatchingService::new(
        jobs.clone(),
        freelancers,
        matches.clone(),
        notifier.clone(),
        test_config(),
    );
    Fixture {
        service,
        jobs,
        matches,
        notifier,
    }
}

pub(super) fn stored(matches: &InMemoryMatchRepository) -> Vec<MatchResult> {
    matches.snapshot().expect("snapshot")
}

/// Job directory whose backend is down.
pub(super) struct UnavailableJobs;

impl JobDirectory for UnavailableJobs {
    async fn get_job(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn mark_approved(&self, _id: &JobId) -> Result<Job, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn pending_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Freelancer directory whose backend is down.
pub(super) struct UnavailableFreelancers;

impl FreelancerDirectory for UnavailableFreelancers {
    async fn list_available_freelancers(
        &self,
    ) -> Result<Vec<FreelancerCandidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("user directory offline".to_string()))
    }
}

/// Freelancer directory that never answers within the test deadline.
pub(super) struct StalledFreelancers;

impl FreelancerDirectory for StalledFreelancers {
    async fn list_available_freelancers(
        &self,
    ) -> Result<Vec<FreelancerCandidate>, RepositoryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

/// Job directory that never answers within the test deadline.
pub(super) struct StalledJobs;

impl JobDirectory for StalledJobs {
    async fn get_job(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn mark_approved(&self, _id: &JobId) -> Result<Job, RepositoryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(RepositoryError::NotFound)
    }

    async fn pending_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

/// Match store that hangs on writes for one freelancer.
#[derive(Default)]
pub(super) struct StalledMatches {
    pub(super) inner: InMemoryMatchRepository,
    pub(super) stalled: Option<FreelancerId>,
}

impl MatchRepository for StalledMatches {
    async fn upsert_match(&self, record: MatchResult) -> Result<MatchResult, RepositoryError> {
        if self.stalled.as_ref() == Some(&record.freelancer_id) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.upsert_match(record).await
    }

    async fn pending(&self) -> Result<Vec<MatchResult>, RepositoryError> {
        self.inner.pending().await
    }

    async fn set_approved(&self, key: &MatchKey) -> Result<MatchResult, RepositoryError> {
        self.inner.set_approved(key).await
    }

    async fn remove(&self, key: &MatchKey) -> Result<MatchResult, RepositoryError> {
        self.inner.remove(key).await
    }

    async fn for_job(&self, job_id: &JobId) -> Result<Vec<MatchResult>, RepositoryError> {
        self.inner.for_job(job_id).await
    }

    async fn for_freelancer(
        &self,
        freelancer_id: &FreelancerId,
    ) -> Result<Vec<MatchResult>, RepositoryError> {
        self.inner.for_freelancer(freelancer_id).await
    }
}

/// Match store that refuses writes for the listed freelancers.
#[derive(Default)]
pub(super) struct FlakyMatches {
    pub(super) inner: InMemoryMatchRepository,
    pub(super) rejected: Vec<FreelancerId>,
}

impl MatchRepository for FlakyMatches {
    async fn upsert_match(&self, record: MatchResult) -> Result<MatchResult, RepositoryError> {
        if self.rejected.contains(&record.freelancer_id) {
            return Err(RepositoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.upsert_match(record).await
    }

    async fn pending(&self) -> Result<Vec<MatchResult>, RepositoryError> {
        self.inner.pending().await
    }

    async fn set_approved(&self, key: &MatchKey) -> Result<MatchResult, RepositoryError> {
        self.inner.set_approved(key).await
    }

    async fn remove(&self, key: &MatchKey) -> Result<MatchResult, RepositoryError> {
        self.inner.remove(key).await
    }

    async fn for_job(&self, job_id: &JobId) -> Result<Vec<MatchResult>, RepositoryError> {
        self.inner.for_job(job_id).await
    }

    async fn for_freelancer(
        &self,
        freelancer_id: &FreelancerId,
    ) -> Result<Vec<MatchResult>, RepositoryError> {
        self.inner.for_freelancer(freelancer_id).await
    }
}

/// Notifier whose transport is down.
pub(super) struct OfflineNotifier;

impl NotificationPublisher for OfflineNotifier {
    async fn publish(&self, _notification: MatchNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

/// Notifier that accepts the message but never finishes sending it.
pub(super) struct StalledNotifier;

impl NotificationPublisher for StalledNotifier {
    async fn publish(&self, _notification: MatchNotification) -> Result<(), NotificationError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

pub(super) fn router_for(fixture: Fixture) -> axum::Router {
    matching_router(Arc::new(fixture.service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
