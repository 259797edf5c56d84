use gigmatch::config::MatchingConfig;
use gigmatch::error::AppError;
use gigmatch::workflows::matching::{
    FreelancerCandidate, FreelancerId, InMemoryFreelancerDirectory, InMemoryJobDirectory,
    InMemoryMatchRepository, Job, JobId, MatchingService, RecordingNotifier, SkillClaim, SkillId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryMatchingService = MatchingService<
    InMemoryJobDirectory,
    InMemoryFreelancerDirectory,
    InMemoryMatchRepository,
    RecordingNotifier,
>;

/// Jobs and freelancers used to hydrate the in-memory collaborators.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MarketplaceSeed {
    #[serde(default)]
    pub(crate) jobs: Vec<Job>,
    #[serde(default)]
    pub(crate) freelancers: Vec<FreelancerCandidate>,
}

impl MarketplaceSeed {
    pub(crate) fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?),
            None => Ok(sample_marketplace()),
        }
    }

    pub(crate) fn into_service(self, config: MatchingConfig) -> Arc<InMemoryMatchingService> {
        Arc::new(MatchingService::new(
            Arc::new(InMemoryJobDirectory::with_jobs(self.jobs)),
            Arc::new(InMemoryFreelancerDirectory::with_freelancers(
                self.freelancers,
            )),
            Arc::new(InMemoryMatchRepository::default()),
            Arc::new(RecordingNotifier::default()),
            config,
        ))
    }
}

fn claims(skills: &[(&str, bool)]) -> Vec<SkillClaim> {
    skills
        .iter()
        .map(|(skill_id, verified)| SkillClaim {
            skill_id: SkillId(skill_id.to_string()),
            verified: *verified,
        })
        .collect()
}

fn profile(id: &str, skills: &[(&str, bool)], tone: &str, language: &str) -> FreelancerCandidate {
    FreelancerCandidate {
        id: FreelancerId(id.to_string()),
        skills: claims(skills),
        tone: tone.to_string(),
        language: language.to_string(),
        available: true,
    }
}

/// Small marketplace used when no seed file is supplied.
pub(crate) fn sample_marketplace() -> MarketplaceSeed {
    let mut on_leave = profile("fl-omar", &[("copywriting", true)], "formal", "English");
    on_leave.available = false;

    MarketplaceSeed {
        jobs: vec![Job {
            id: JobId("job-launch-copy".to_string()),
            title: "Launch announcement copy".to_string(),
            required_skill_ids: ["copywriting", "seo"]
                .into_iter()
                .map(|skill| SkillId(skill.to_string()))
                .collect(),
            preferred_tone: "formal".to_string(),
            language: "English".to_string(),
            approved: false,
        }],
        freelancers: vec![
            profile(
                "fl-amara",
                &[("copywriting", true), ("seo", false)],
                "formal",
                "English",
            ),
            profile("fl-bruno", &[("copywriting", false)], "casual", "French"),
            profile("fl-chen", &[("seo", true)], "casual", "English"),
            profile("fl-dana", &[("illustration", true)], "formal", "English"),
            on_leave,
        ],
    }
}
