use std::path::PathBuf;
use std::thread;

use log::{info, warn};

use crate::charts;
use crate::delay_manager::PolitenessDelay;
use crate::error::{FetchFailure, ReportError};
use crate::extractor::{Extractor, ReviewRecord};
use crate::fetcher::PageFetcher;
use crate::input_loader::TargetSpec;
use crate::report;
use crate::sentiment::{label_records, SentimentScorer};

pub const DEFAULT_OUTPUT_CSV: &str = "iphone_reviews_sentiment.csv";
pub const DEFAULT_CHARTS_DIR: &str = "charts";
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    #[default]
    Sequential,
    /// One scoped thread per target; results merged back in target order.
    Parallel,
}

#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub records: Vec<ReviewRecord>,
    pub failures: Vec<FetchFailure>,
}

/// Fetches one target and extracts its reviews.
pub fn scrape_target<F: PageFetcher + ?Sized>(
    fetcher: &F,
    extractor: &Extractor,
    target: &TargetSpec,
) -> Result<Vec<ReviewRecord>, FetchFailure> {
    match fetcher.fetch(&target.source_url) {
        Ok(html) => {
            let reviews = extractor.extract(&html, &target.category);
            info!("Scraped {} reviews for {}", reviews.len(), target.category);
            Ok(reviews)
        }
        Err(e) => {
            warn!(
                "Failed to fetch reviews for {} from {}: {}",
                target.category, target.source_url, e
            );
            Err(e)
        }
    }
}

/// Producer stage: every target's reviews, flattened in target order.
pub fn collect_reviews<F: PageFetcher + ?Sized>(
    fetcher: &F,
    targets: &[TargetSpec],
    mode: FetchMode,
    delay: PolitenessDelay,
) -> CollectOutcome {
    let results = match mode {
        FetchMode::Sequential => {
            let extractor = Extractor::new();
            let mut results = Vec::with_capacity(targets.len());
            for (i, target) in targets.iter().enumerate() {
                info!("Processing {} / {} : {}", i + 1, targets.len(), target.category);
                if i > 0 {
                    delay.wait();
                }
                results.push(scrape_target(fetcher, &extractor, target));
            }
            results
        }
        FetchMode::Parallel => thread::scope(|scope| {
            let handles: Vec<_> = targets
                .iter()
                .map(|target| {
                    scope.spawn(move || scrape_target(fetcher, &Extractor::new(), target))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect::<Vec<_>>()
        }),
    };

    let mut outcome = CollectOutcome::default();
    for result in results {
        match result {
            Ok(reviews) => outcome.records.extend(reviews),
            Err(failure) => outcome.failures.push(failure),
        }
    }
    outcome
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub targets: Vec<TargetSpec>,
    pub output_csv: PathBuf,
    /// `None` skips chart rendering.
    pub charts_dir: Option<PathBuf>,
    pub mode: FetchMode,
    pub delay: PolitenessDelay,
}

impl RunConfig {
    pub fn new(targets: Vec<TargetSpec>) -> Self {
        RunConfig {
            targets,
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            charts_dir: Some(PathBuf::from(DEFAULT_CHARTS_DIR)),
            mode: FetchMode::Sequential,
            delay: PolitenessDelay::default(),
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub targets: usize,
    pub records: Vec<ReviewRecord>,
    pub failures: Vec<FetchFailure>,
    pub csv_path: Option<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Scrape, label and report. Artifacts are produced only when at least one
/// review was scraped.
pub fn run<F, S>(fetcher: &F, scorer: &S, config: &RunConfig) -> Result<RunSummary, ReportError>
where
    F: PageFetcher + ?Sized,
    S: SentimentScorer + ?Sized,
{
    info!("Scraping {} targets ({:?})", config.targets.len(), config.mode);
    let CollectOutcome {
        mut records,
        failures,
    } = collect_reviews(fetcher, &config.targets, config.mode, config.delay);

    let mut summary = RunSummary {
        targets: config.targets.len(),
        records: Vec::new(),
        failures,
        csv_path: None,
        charts: Vec::new(),
    };

    if !summary.failures.is_empty() {
        warn!(
            "{} of {} targets could not be fetched",
            summary.failures.len(),
            summary.targets
        );
    }

    if records.is_empty() {
        warn!("No reviews scraped. Check URLs or parsing logic.");
        return Ok(summary);
    }

    info!("Aggregated {} reviews:\n{}", records.len(), report::preview_table(&records, PREVIEW_ROWS));

    label_records(scorer, &mut records);

    for (category, counts) in report::label_counts(&records) {
        info!(
            "{}: {} positive, {} neutral, {} negative",
            category, counts.positive, counts.neutral, counts.negative
        );
    }

    if let Some(dir) = &config.charts_dir {
        summary.charts = charts::render_all(dir, &records)?;
    }

    report::write_csv(&config.output_csv, &records)?;
    info!("Sentiment analysis saved to {:?}", config.output_csv);
    summary.csv_path = Some(config.output_csv.clone());

    summary.records = records;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StubFetcher {
        pages: HashMap<String, String>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            StubFetcher {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    impl PageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
            self.pages.get(url).cloned().ok_or_else(|| FetchFailure::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn page(reviews: &[&str]) -> String {
        reviews
            .iter()
            .map(|r| format!(r#"<span data-hook="review-body">{}</span>"#, r))
            .collect()
    }

    fn targets() -> Vec<TargetSpec> {
        vec![
            TargetSpec::new("A", "https://shop.test/a"),
            TargetSpec::new("B", "https://shop.test/b"),
            TargetSpec::new("C", "https://shop.test/missing"),
        ]
    }

    fn stub() -> StubFetcher {
        let a = page(&["a one", "a two"]);
        let b = r#"<div class="review-text-content">b one</div>"#.to_string();
        StubFetcher::new(&[("https://shop.test/a", &a), ("https://shop.test/b", &b)])
    }

    fn sorted(records: &[ReviewRecord]) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = records
            .iter()
            .map(|r| (r.category.clone(), r.text.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn failures_contribute_no_records_and_processing_continues() {
        let outcome = collect_reviews(&stub(), &targets(), FetchMode::Sequential, PolitenessDelay::default());
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].url(), "https://shop.test/missing");
    }

    #[test]
    fn aggregation_is_order_insensitive() {
        let forward = collect_reviews(&stub(), &targets(), FetchMode::Sequential, PolitenessDelay::default());
        let mut reversed_targets = targets();
        reversed_targets.reverse();
        let reversed = collect_reviews(&stub(), &reversed_targets, FetchMode::Sequential, PolitenessDelay::default());
        assert_eq!(sorted(&forward.records), sorted(&reversed.records));
    }

    #[test]
    fn parallel_matches_sequential() {
        let sequential = collect_reviews(&stub(), &targets(), FetchMode::Sequential, PolitenessDelay::default());
        let parallel = collect_reviews(&stub(), &targets(), FetchMode::Parallel, PolitenessDelay::default());
        assert_eq!(sequential.records, parallel.records);
        assert_eq!(sequential.failures.len(), parallel.failures.len());
    }

    #[test]
    fn records_keep_their_target_category() {
        let outcome = collect_reviews(&stub(), &targets(), FetchMode::Sequential, PolitenessDelay::default());
        let a: Vec<_> = outcome.records.iter().filter(|r| r.text.starts_with("a ")).collect();
        let b: Vec<_> = outcome.records.iter().filter(|r| r.text.starts_with("b ")).collect();
        assert!(a.iter().all(|r| r.category == "A"));
        assert!(b.iter().all(|r| r.category == "B"));
    }
}
