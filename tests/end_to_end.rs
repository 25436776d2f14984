use httpmock::prelude::*;

use review_sentiment_lib::pipeline::{self, RunConfig};
use review_sentiment_lib::{
    FetchFailure, FetchMode, HttpClientError, HttpFetcher, SentimentLabel, TargetSpec, VaderScorer,
};

const REVIEW_PAGE: &str = r#"<!doctype html>
<html><body>
  <div data-hook="review">
    <span data-hook="review-body" class="a-size-base review-text">
      <span>Great phone, love it!</span>
    </span>
  </div>
  <div data-hook="review">
    <span data-hook="review-body" class="a-size-base review-text">
      <span>Terrible battery life.</span>
    </span>
  </div>
</body></html>"#;

fn config(targets: Vec<TargetSpec>, dir: &std::path::Path) -> RunConfig {
    let mut config = RunConfig::new(targets);
    config.output_csv = dir.join("reviews.csv");
    config.charts_dir = Some(dir.join("charts"));
    config
}

#[test]
fn scores_labels_and_exports_two_reviews() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/dp/iphone-14").header("user-agent", "Mozilla/5.0");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(REVIEW_PAGE);
    });

    let dir = tempfile::tempdir().unwrap();
    let config = config(
        vec![TargetSpec::new("iPhone 14", server.url("/dp/iphone-14"))],
        dir.path(),
    );

    let fetcher = HttpFetcher::new().unwrap();
    let summary = pipeline::run(&fetcher, &VaderScorer::new(), &config).unwrap();
    mock.assert();

    assert!(summary.failures.is_empty());
    assert_eq!(summary.records.len(), 2);

    let first = &summary.records[0];
    let second = &summary.records[1];
    assert_eq!(first.text, "Great phone, love it!");
    assert_eq!(second.text, "Terrible battery life.");
    assert!(first.score().unwrap() > 0.0);
    assert!(second.score().unwrap() < 0.0);
    assert_eq!(first.label(), Some(SentimentLabel::Positive));
    assert_eq!(second.label(), Some(SentimentLabel::Negative));
    assert!(summary.records.iter().all(|r| r.category == "iPhone 14"));

    let csv_path = summary.csv_path.expect("csv written");
    let contents = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Model,Review,Sentiment Score,Sentiment Label");
    assert!(lines[1].starts_with("iPhone 14,\"Great phone, love it!\","));
    assert!(lines[1].ends_with(",Positive"));
    assert!(lines[2].ends_with(",Negative"));

    assert_eq!(summary.charts.len(), 3);
    assert!(summary.charts.iter().all(|p| p.exists()));
}

#[test]
fn all_targets_failing_produces_no_artifacts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET);
        then.status(503).body("Sorry, we just need to make sure you're not a robot.");
    });

    let dir = tempfile::tempdir().unwrap();
    let targets = vec![
        TargetSpec::new("iPhone 14", server.url("/a")),
        TargetSpec::new("iPhone 15", server.url("/b")),
        TargetSpec::new("iPhone 16", server.url("/c")),
    ];
    let config = config(targets, dir.path());

    let fetcher = HttpFetcher::new().unwrap();
    let summary = pipeline::run(&fetcher, &VaderScorer::new(), &config).unwrap();

    mock.assert_hits(3);
    assert_eq!(summary.failures.len(), 3);
    assert!(summary
        .failures
        .iter()
        .all(|f| matches!(f, FetchFailure::Status { status: 503, .. })));
    assert!(summary.records.is_empty());
    assert!(summary.csv_path.is_none());
    assert!(summary.charts.is_empty());
    assert!(!dir.path().join("reviews.csv").exists());
    assert!(!dir.path().join("charts").exists());
}

#[test]
fn one_failing_target_does_not_stop_the_others() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ok");
        then.status(200).body(REVIEW_PAGE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(
        vec![
            TargetSpec::new("iPhone 15", server.url("/gone")),
            TargetSpec::new("iPhone 16", server.url("/ok")),
        ],
        dir.path(),
    );
    config.charts_dir = None;
    config.mode = FetchMode::Parallel;

    let fetcher = HttpFetcher::new().unwrap();
    let summary = pipeline::run(&fetcher, &VaderScorer::new(), &config).unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].url(), server.url("/gone"));
    assert_eq!(summary.records.len(), 2);
    assert!(summary.records.iter().all(|r| r.category == "iPhone 16"));
    assert!(summary.charts.is_empty());
    assert!(dir.path().join("reviews.csv").exists());
}

#[test]
fn client_errors_are_reachable_from_the_crate_root() {
    let err: HttpClientError = match HttpFetcher::with_user_agent("bad\nagent") {
        Ok(_) => panic!("control characters must be rejected"),
        Err(e) => e,
    };
    assert!(matches!(err, HttpClientError::UserAgent(_)));
}
