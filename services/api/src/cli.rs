use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gigmatch::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gigmatch",
    about = "Score freelancers against approved jobs and review the resulting matches",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Approve a job from the seed marketplace and print its ranked matches
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON file with `jobs` and `freelancers` to preload (defaults to a sample marketplace)
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["gigmatch"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_job_and_seed() {
        let cli = Cli::try_parse_from([
            "gigmatch",
            "demo",
            "--job",
            "job-7",
            "--seed",
            "marketplace.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.job.as_deref(), Some("job-7"));
                assert_eq!(args.seed, Some(PathBuf::from("marketplace.json")));
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn demo_rejects_zero_max_matches() {
        let err = Cli::try_parse_from(["gigmatch", "demo", "--max-matches", "0"])
            .expect_err("zero matches is not a valid cap");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["gigmatch", "demo"]).expect("parses");
        match cli.command {
            Some(Command::Demo(args)) => assert_eq!(args.max_matches, 3),
            other => panic!("expected demo command, got {other:?}"),
        }
    }
}
