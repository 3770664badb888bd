use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;

use crate::config::{self, Config, HTTP_TIMEOUT_SECS};
use crate::error::Result;

/// Why a listing page produced no markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The site answered with a non-2xx status.
    Status(u16),
    /// The request never produced a response (DNS, TLS, timeout, body read).
    Transport(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Status(code) => write!(f, "HTTP status {code}"),
            FetchFailure::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

/// Result of a single listing request. Failures are values, never errors:
/// the orchestrator decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse {
    Success(String),
    Failed(FetchFailure),
}

/// One GET per (search term, page). No retries.
pub trait PageFetch {
    async fn fetch_page(&self, search_term: &str, page: u32) -> PageResponse;
}

/// Fetches search result pages from the configured retail site.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    site_url: String,
}

impl HttpPageFetcher {
    pub fn new(cfg: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(config::USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(config::ACCEPT_LANGUAGE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            site_url: cfg.site_url.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/s", self.site_url)
    }
}

impl PageFetch for HttpPageFetcher {
    async fn fetch_page(&self, search_term: &str, page: u32) -> PageResponse {
        let page_param = page.to_string();
        let request = self
            .client
            .get(self.search_url())
            .query(&[("k", search_term), ("page", page_param.as_str())]);

        let resp = match request.send().await {
            Ok(r) => r,
            Err(e) => return PageResponse::Failed(FetchFailure::Transport(e.to_string())),
        };

        let status = resp.status();
        if !status.is_success() {
            return PageResponse::Failed(FetchFailure::Status(status.as_u16()));
        }

        match resp.text().await {
            Ok(body) => {
                debug!(search_term, page, bytes = body.len(), "[FETCH] page received");
                PageResponse::Success(body)
            }
            Err(e) => PageResponse::Failed(FetchFailure::Transport(e.to_string())),
        }
    }
}
