use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use review_sentiment_lib::pipeline::{self, DEFAULT_CHARTS_DIR, DEFAULT_OUTPUT_CSV};
use review_sentiment_lib::{input_loader, logger};
use review_sentiment_lib::{FetchMode, HttpFetcher, PolitenessDelay, RunConfig, VaderScorer};

#[derive(Parser)]
#[command(name = "review-sentiment")]
#[command(about = "Scrape product reviews, score their sentiment, export CSV and charts")]
#[command(version)]
struct Cli {
    /// CSV or Excel file with Model and URL columns (built-in iPhone list if omitted)
    #[arg(short, long)]
    targets: Option<PathBuf>,

    /// Where to write the scored reviews
    #[arg(short, long, default_value = DEFAULT_OUTPUT_CSV)]
    output: PathBuf,

    /// Directory for the bar chart and word clouds
    #[arg(long, default_value = DEFAULT_CHARTS_DIR)]
    charts_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Fetch all targets concurrently
    #[arg(long)]
    parallel: bool,

    /// User-Agent header sent with every request
    #[arg(long, default_value = review_sentiment_lib::fetcher::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Minimum pause between targets, in seconds
    #[arg(long, default_value_t = 0)]
    delay_min: u64,

    /// Maximum pause between targets, in seconds (0 disables the pause)
    #[arg(long, default_value_t = 0)]
    delay_max: u64,
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();
    info!("Starting review sentiment scraper...");

    let targets = match &cli.targets {
        Some(path) => input_loader::load_targets(path)
            .with_context(|| format!("loading targets from {:?}", path))?,
        None => input_loader::default_targets(),
    };
    if targets.is_empty() {
        anyhow::bail!("no targets to scrape");
    }

    let config = RunConfig {
        targets,
        output_csv: cli.output,
        charts_dir: (!cli.no_charts).then_some(cli.charts_dir),
        mode: if cli.parallel {
            FetchMode::Parallel
        } else {
            FetchMode::Sequential
        },
        delay: PolitenessDelay::new(cli.delay_min, cli.delay_max),
    };

    let fetcher = HttpFetcher::with_user_agent(&cli.user_agent).context("creating HTTP client")?;
    let scorer = VaderScorer::new();

    let summary = pipeline::run(&fetcher, &scorer, &config).context("writing report")?;

    info!(
        "Done. {} reviews from {} of {} targets.",
        summary.records.len(),
        summary.targets - summary.failures.len(),
        summary.targets
    );
    Ok(())
}
