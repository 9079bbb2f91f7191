//! HTTP fetching.
//!
//! One blocking GET per call, bounded by the configured timeout. No retries
//! and no caching: a failure is returned to the caller as-is.

use std::time::Duration;

use crate::encoding::decode_body;
use crate::error::{Error, Result};
use crate::options::Options;

/// Source of page and script text.
///
/// The pipeline is generic over this trait so that callers (and tests) can
/// supply pages from somewhere other than the network.
pub trait Fetch {
    /// Fetch `url` and return the body decoded as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on network failure or timeout and
    /// [`Error::HttpStatus`] on a non-success status.
    fn get(&self, url: &str) -> Result<String>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str) -> Result<String> {
        (**self).get(url)
    }
}

/// Blocking HTTP fetcher built on reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher using the timeout and user agent from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialised.
    pub fn new(options: &Options) -> Result<Self> {
        Self::with_timeout(options.timeout, options.user_agent.as_deref())
    }

    /// Create a fetcher with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder.build().map_err(|e| Error::Transport {
            url: String::new(),
            message: format!("building HTTP client: {e}"),
        })?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "GET");

        let transport = |e: reqwest::Error| Error::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = resp.bytes().map_err(transport)?;
        tracing::debug!(url, status = status.as_u16(), bytes = bytes.len(), "response");

        Ok(decode_body(&bytes, content_type.as_deref()))
    }
}
