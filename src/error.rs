//! Error types for wtm-factor.
//!
//! Every stage of the extraction pipeline reports failures through [`Error`].
//! A failed stage aborts the extraction; partial results are never returned.

/// Pipeline stage an [`Error`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Base URL or options were rejected before any request was made.
    Configuration,
    /// HTTP transport.
    Fetch,
    /// Locating the versioned script in the landing page.
    AssetLocator,
    /// Isolating and decoding the coefficient table.
    CoefficientParser,
}

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network failure, timeout, or an unreadable response body.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("request to {url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The landing page no longer carries the expected asset marker.
    #[error("format not found in page: {0}")]
    PageFormat(String),

    /// The script no longer carries the expected coefficient markers.
    #[error("format not found in script: {0}")]
    ScriptFormat(String),

    /// The coefficient literal could not be decoded.
    #[error("coefficient decode failed: {0}")]
    Decode(String),

    /// The base URL is not an absolute http(s) URL, or a configured
    /// selector does not parse.
    #[error("invalid configuration: {0}")]
    InvalidUrl(String),

    /// A GPU id names no known model.
    #[error("unknown GPU `{0}`")]
    UnknownGpu(String),
}

impl Error {
    /// Stage of the pipeline that produced this error.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => Stage::Fetch,
            Self::PageFormat(_) => Stage::AssetLocator,
            Self::ScriptFormat(_) | Self::Decode(_) => Stage::CoefficientParser,
            Self::InvalidUrl(_) | Self::UnknownGpu(_) => Stage::Configuration,
        }
    }

    /// True for network, timeout and HTTP status failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.stage() == Stage::Fetch
    }

    /// True when a marker was missing from the page or the script.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::PageFormat(_) | Self::ScriptFormat(_))
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
