use crate::infra::MarketplaceSeed;
use clap::builder::RangedU64ValueParser;
use clap::Args;
use gigmatch::config::MatchingConfig;
use gigmatch::error::AppError;
use gigmatch::workflows::matching::JobId;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Job to approve and match. Defaults to the first job in the seed.
    #[arg(long)]
    pub(crate) job: Option<String>,
    /// JSON file with `jobs` and `freelancers` (defaults to a built-in sample).
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    /// Number of matches to keep for the job.
    #[arg(
        long,
        default_value_t = MatchingConfig::DEFAULT_MAX_MATCHES,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub(crate) max_matches: usize,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        job,
        seed,
        max_matches,
    } = args;

    let seed = MarketplaceSeed::load(seed.as_deref())?;
    let job_id = match job.map(JobId).or_else(|| seed.jobs.first().map(|j| j.id.clone())) {
        Some(job_id) => job_id,
        None => {
            println!("Seed contains no jobs; nothing to match.");
            return Ok(());
        }
    };

    let config = MatchingConfig {
        max_matches,
        ..MatchingConfig::default()
    };
    let service = seed.into_service(config);

    println!("Approving job {job_id} and running matching");
    let batch = service.approve_job(&job_id).await?;

    if batch.is_empty() {
        println!("- No available freelancers for this job.");
        return Ok(());
    }

    let preview = service.preview(&job_id).await?;
    for (rank, scored) in preview.iter().enumerate() {
        println!(
            "{}. {} -> score {}",
            rank + 1,
            scored.freelancer_id,
            scored.score
        );
        for component in &scored.components {
            println!("     +{:>2}  {}", component.points, component.notes);
        }
    }

    let pending = service.pending_matches().await?;
    println!(
        "\n{} match(es) stored for job {} awaiting moderator approval",
        pending.len(),
        batch.job_id
    );

    Ok(())
}
