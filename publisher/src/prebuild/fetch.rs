//! Fetching project pages over HTTP.
//!
//! The fetcher is a trait so the prebuild can be exercised without network
//! access.

use std::time::Duration;

/// User agent sent with page requests. Some hosts serve bare pages to
/// unrecognised clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; site-publisher/1.0)";

const ACCEPT: &str = "text/html,application/xhtml+xml";

/// Retrieves the HTML of a project page.
#[cfg_attr(test, mockall::automock)]
pub trait PageFetcher {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the server answers
    /// with an error status.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Errors arising while fetching a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed or returned an error status.
    #[error("request to {url} failed: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered HTTP 404.
    #[error("page not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },
}

/// Page fetcher backed by a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|e| FetchError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
