use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use url::Url;

use crate::error::{FetchFailure, HttpClientError};

/// Identity sent instead of reqwest's default, enough to get past basic bot filters.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Anything that can turn a URL into an HTML document.
pub trait PageFetcher: Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchFailure>;
}

/// Blocking HTTP fetcher. One GET per call, no retries; only a 200 counts.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, HttpClientError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(user_agent)
            .map_err(|_| HttpClientError::UserAgent(user_agent.to_string()))?;
        headers.insert(USER_AGENT, value);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(HttpFetcher { client })
    }

    fn visit_page(&self, url: &str) -> Result<(String, StatusCode), FetchFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchFailure::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Ok((String::new(), status));
        }

        let text = resp.text().map_err(|source| FetchFailure::Body {
            url: url.to_string(),
            source,
        })?;
        Ok((text, status))
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        if let Err(source) = Url::parse(url) {
            warn!("Invalid URL: {}", url);
            return Err(FetchFailure::InvalidUrl {
                url: url.to_string(),
                source,
            });
        }

        info!("Visiting: {}", url);
        let (html, status) = self.visit_page(url)?;

        if status != StatusCode::OK {
            return Err(FetchFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(html)
    }
}
