use std::path::PathBuf;
use thiserror::Error;

/// A single target could not be fetched. Recoverable: the target simply
/// contributes no reviews.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchFailure {
    pub fn url(&self) -> &str {
        match self {
            FetchFailure::InvalidUrl { url, .. }
            | FetchFailure::Request { url, .. }
            | FetchFailure::Status { url, .. }
            | FetchFailure::Body { url, .. } => url,
        }
    }
}

#[derive(Debug, Error)]
pub enum TargetLoadError {
    #[error("targets file {0:?} does not exist")]
    Missing(PathBuf),
    #[error("could not read targets file {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("could not open workbook {path:?}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook {0:?} has no worksheets")]
    EmptyWorkbook(PathBuf),
    #[error("targets file {path:?} is missing a '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write csv {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to draw {path:?}: {message}")]
    Chart { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("invalid user agent {0:?}")]
    UserAgent(String),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
