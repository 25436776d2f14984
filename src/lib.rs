pub mod charts;
pub mod delay_manager;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod input_loader;
pub mod logger;
pub mod pipeline;
pub mod report;
pub mod sentiment;

// Exporting types for convenience
pub use delay_manager::PolitenessDelay;
pub use error::{FetchFailure, HttpClientError, ReportError, TargetLoadError};
pub use extractor::{Extractor, ReviewRecord};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use input_loader::TargetSpec;
pub use pipeline::{FetchMode, RunConfig, RunSummary};
pub use sentiment::{Sentiment, SentimentLabel, SentimentScorer, VaderScorer};
