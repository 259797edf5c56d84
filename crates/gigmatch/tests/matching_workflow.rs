//! End-to-end scenarios for job matching driven through the public service facade and
//! HTTP router, using collaborators defined outside the crate.

mod common {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use gigmatch::config::MatchingConfig;
    use gigmatch::workflows::matching::{
        FreelancerCandidate, FreelancerId, InMemoryFreelancerDirectory, InMemoryJobDirectory,
        InMemoryMatchRepository, Job, JobId, MatchKey, MatchRepository, MatchResult,
        MatchingService, RecordingNotifier, RepositoryError, SkillClaim, SkillId,
    };

    pub(super) type Service = MatchingService<
        InMemoryJobDirectory,
        InMemoryFreelancerDirectory,
        CountingMatches,
        RecordingNotifier,
    >;

    /// Wraps the in-memory store and counts write attempts.
    #[derive(Default)]
    pub(super) struct CountingMatches {
        inner: InMemoryMatchRepository,
        writes: AtomicUsize,
    }

    impl CountingMatches {
        pub(super) fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub(super) fn rows(&self) -> Vec<MatchResult> {
            self.inner.snapshot().expect("snapshot")
        }
    }

    impl MatchRepository for CountingMatches {
        async fn upsert_match(&self, record: MatchResult) -> Result<MatchResult, RepositoryError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
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

    pub(super) fn job(id: &str, skills: &[&str], tone: &str, language: &str) -> Job {
        Job {
            id: JobId(id.to_string()),
            title: format!("Job {id}"),
            required_skill_ids: skills
                .iter()
                .map(|skill| SkillId(skill.to_string()))
                .collect::<BTreeSet<_>>(),
            preferred_tone: tone.to_string(),
            language: language.to_string(),
            approved: false,
        }
    }

    pub(super) fn freelancer(
        id: &str,
        skills: &[(&str, bool)],
        tone: &str,
        language: &str,
        available: bool,
    ) -> FreelancerCandidate {
        FreelancerCandidate {
            id: FreelancerId(id.to_string()),
            skills: skills
                .iter()
                .map(|(skill, verified)| SkillClaim {
                    skill_id: SkillId(skill.to_string()),
                    verified: *verified,
                })
                .collect(),
            tone: tone.to_string(),
            language: language.to_string(),
            available,
        }
    }

    pub(super) fn marketplace() -> (Vec<Job>, Vec<FreelancerCandidate>) {
        let jobs = vec![
            job("job-brand", &["copy", "seo"], "formal", "English"),
            job("job-empty", &[], "playful", "Spanish"),
        ];
        let freelancers = vec![
            freelancer(
                "fl-ana",
                &[("copy", true), ("seo", false)],
                "formal",
                "English",
                true,
            ),
            freelancer("fl-ben", &[("copy", false)], "casual", "French", true),
            freelancer("fl-cy", &[("seo", true)], "playful", "Spanish", true),
            freelancer("fl-dee", &[("copy", false)], "formal", "German", true),
            freelancer(
                "fl-eve",
                &[("copy", true), ("seo", true)],
                "formal",
                "English",
                false,
            ),
        ];
        (jobs, freelancers)
    }

    pub(super) struct Harness {
        pub(super) service: Arc<Service>,
        pub(super) matches: Arc<CountingMatches>,
        pub(super) notifier: Arc<RecordingNotifier>,
    }

    pub(super) fn harness() -> Harness {
        let (jobs, freelancers) = marketplace();
        let matches = Arc::new(CountingMatches::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(MatchingService::new(
            Arc::new(InMemoryJobDirectory::with_jobs(jobs)),
            Arc::new(InMemoryFreelancerDirectory::with_freelancers(freelancers)),
            matches.clone(),
            notifier.clone(),
            MatchingConfig {
                max_matches: 3,
                call_timeout: Duration::from_secs(1),
            },
        ));
        Harness {
            service,
            matches,
            notifier,
        }
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use gigmatch::workflows::matching::{
    matching_router, FreelancerId, JobId, MatchNotification, MatchingError,
};
use tower::ServiceExt;

#[tokio::test]
async fn approval_flow_produces_capped_ranked_matches() {
    let harness = harness();

    let batch = harness
        .service
        .approve_job(&JobId("job-brand".into()))
        .await
        .expect("approve and match");

    let ranked: Vec<(&str, u32)> = batch
        .matches
        .iter()
        .map(|entry| (entry.freelancer_id.0.as_str(), entry.score))
        .collect();
    assert_eq!(
        ranked,
        vec![("fl-ana", 30), ("fl-cy", 20), ("fl-dee", 8)],
        "unavailable fl-eve is skipped and the list is capped at three"
    );
    assert_eq!(harness.matches.writes(), 3);
    assert!(harness.matches.rows().iter().all(|row| !row.approved));
}

#[tokio::test]
async fn job_without_required_skills_ranks_on_soft_signals_only() {
    let harness = harness();

    let batch = harness
        .service
        .approve_job(&JobId("job-empty".into()))
        .await
        .expect("approve and match");

    assert_eq!(batch.matches[0].freelancer_id, FreelancerId("fl-cy".into()));
    assert_eq!(batch.matches[0].score, 5);
    assert!(batch.matches[1..].iter().all(|entry| entry.score == 0));
}

#[tokio::test]
async fn unknown_job_performs_no_writes() {
    let harness = harness();

    let err = harness
        .service
        .run_matching(&JobId("job-ghost".into()))
        .await
        .expect_err("unknown job");

    assert!(matches!(err, MatchingError::NotFound { .. }));
    assert_eq!(harness.matches.writes(), 0);
}

#[tokio::test]
async fn rerun_is_idempotent_in_rows() {
    let harness = harness();
    let job_id = JobId("job-brand".into());

    let first = harness.service.approve_job(&job_id).await.expect("first");
    let second = harness.service.run_matching(&job_id).await.expect("second");

    assert_eq!(first.matches, second.matches);
    assert_eq!(harness.matches.writes(), 6);
    assert_eq!(harness.matches.rows().len(), 3);
}

#[tokio::test]
async fn moderation_over_http_approves_and_notifies() {
    let harness = harness();
    let router = matching_router(harness.service.clone());

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/jobs/job-brand/approve")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/matches/job-brand/fl-ana/approve")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/v1/jobs/job-brand/matches")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["freelancer_id"], "fl-ana");

    let events = harness.notifier.events();
    assert!(events.contains(&MatchNotification::MatchesReady {
        job_id: JobId("job-brand".into()),
        count: 3,
    }));
    assert!(events
        .iter()
        .any(|event| matches!(event, MatchNotification::MatchApproved { score: 30, .. })));
}
