//! Process-local collaborators used by the API binary, the demo command, and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    FreelancerCandidate, FreelancerId, Job, JobId, MatchKey, MatchNotification, MatchResult,
};
use super::repository::{
    FreelancerDirectory, JobDirectory, MatchRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryJobDirectory {
    jobs: Arc<Mutex<BTreeMap<JobId, Job>>>,
}

impl InMemoryJobDirectory {
    pub fn with_jobs(jobs: impl IntoIterator<Item = Job>) -> Self {
        let jobs = jobs.into_iter().map(|job| (job.id.clone(), job)).collect();
        Self {
            jobs: Arc::new(Mutex::new(jobs)),
        }
    }

    pub fn insert(&self, job: Job) -> Result<(), RepositoryError> {
        lock(&self.jobs)?.insert(job.id.clone(), job);
        Ok(())
    }
}

impl JobDirectory for InMemoryJobDirectory {
    async fn get_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(lock(&self.jobs)?.get(id).cloned())
    }

    async fn mark_approved(&self, id: &JobId) -> Result<Job, RepositoryError> {
        let mut jobs = lock(&self.jobs)?;
        let job = jobs.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.approved = true;
        Ok(job.clone())
    }

    async fn pending_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(lock(&self.jobs)?
            .values()
            .filter(|job| !job.approved)
            .cloned()
            .collect())
    }
}

/// Freelancer directory that, like the hosted query it stands in for, only returns
/// profiles flagged as available.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFreelancerDirectory {
    freelancers: Arc<Mutex<Vec<FreelancerCandidate>>>,
}

impl InMemoryFreelancerDirectory {
    pub fn with_freelancers(freelancers: impl IntoIterator<Item = FreelancerCandidate>) -> Self {
        Self {
            freelancers: Arc::new(Mutex::new(freelancers.into_iter().collect())),
        }
    }

    pub fn insert(&self, freelancer: FreelancerCandidate) -> Result<(), RepositoryError> {
        let mut freelancers = lock(&self.freelancers)?;
        freelancers.retain(|existing| existing.id != freelancer.id);
        freelancers.push(freelancer);
        Ok(())
    }
}

impl FreelancerDirectory for InMemoryFreelancerDirectory {
    async fn list_available_freelancers(
        &self,
    ) -> Result<Vec<FreelancerCandidate>, RepositoryError> {
        Ok(lock(&self.freelancers)?
            .iter()
            .filter(|freelancer| freelancer.available)
            .cloned()
            .collect())
    }
}

/// Match store keyed by `(job_id, freelancer_id)`.
///
/// Re-running a job replaces the stored score but keeps an approval a moderator has
/// already granted.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMatchRepository {
    records: Arc<Mutex<BTreeMap<MatchKey, MatchResult>>>,
}

impl InMemoryMatchRepository {
    pub fn snapshot(&self) -> Result<Vec<MatchResult>, RepositoryError> {
        Ok(lock(&self.records)?.values().cloned().collect())
    }
}

impl MatchRepository for InMemoryMatchRepository {
    async fn upsert_match(&self, record: MatchResult) -> Result<MatchResult, RepositoryError> {
        let mut records = lock(&self.records)?;
        let stored = records
            .entry(record.key())
            .and_modify(|existing| existing.score = record.score)
            .or_insert(record);
        Ok(stored.clone())
    }

    async fn pending(&self) -> Result<Vec<MatchResult>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|record| !record.approved)
            .cloned()
            .collect())
    }

    async fn set_approved(&self, key: &MatchKey) -> Result<MatchResult, RepositoryError> {
        let mut records = lock(&self.records)?;
        let record = records.get_mut(key).ok_or(RepositoryError::NotFound)?;
        record.approved = true;
        Ok(record.clone())
    }

    async fn remove(&self, key: &MatchKey) -> Result<MatchResult, RepositoryError> {
        lock(&self.records)?
            .remove(key)
            .ok_or(RepositoryError::NotFound)
    }

    async fn for_job(&self, job_id: &JobId) -> Result<Vec<MatchResult>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|record| &record.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn for_freelancer(
        &self,
        freelancer_id: &FreelancerId,
    ) -> Result<Vec<MatchResult>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|record| &record.freelancer_id == freelancer_id)
            .cloned()
            .collect())
    }
}

/// Notification sink that keeps everything it was asked to send.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<MatchNotification>>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<MatchNotification> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationPublisher for RecordingNotifier {
    async fn publish(&self, notification: MatchNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .map_err(|_| NotificationError::Transport("notifier poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}
