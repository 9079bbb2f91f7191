//! # wtm-factor
//!
//! Extract proof-of-work algorithm factors from a WhatToMine-style
//! profitability page.
//!
//! The landing page lists every algorithm as a form section with a hashrate
//! and a power input. Its bundled application script carries, per GPU model,
//! the coefficients the page multiplies by the number of cards the visitor
//! selects. This crate scrapes both and reproduces that calculation for a
//! caller-supplied [`Inventory`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wtm_factor::{Gpu, Inventory, Options, WtmFactor};
//!
//! let client = WtmFactor::new("https://whattomine.com", Options::default())?;
//! let inventory: Inventory = [(Gpu::Gtx1080Ti, 2), (Gpu::Rx580, 4)].into_iter().collect();
//!
//! for (key, algo) in client.extract(&inventory)? {
//!     println!("{key}: {} {:?} {:?}", algo.name, algo.hashrate_value, algo.power_value);
//! }
//! # Ok::<(), wtm_factor::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. Fetch the landing page.
//! 2. Locate `/assets/application-<hash>.js` in it and fetch that script.
//! 3. Parse the coefficient declarations out of the script.
//! 4. Scrape the algorithm sections from the same landing page.
//! 5. Aggregate coefficients over the inventory.
//!
//! Every stage reports failures through [`Error`]; see [`Error::stage`].

mod error;
mod options;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Response body decoding.
pub mod encoding;

/// HTTP fetching.
pub mod fetch;

/// Locating the versioned application script.
pub mod assets;

/// Tolerant JavaScript object-literal parser.
pub mod literal;

/// Coefficient table extraction.
pub mod coefficients;

/// Field-id classification.
pub mod field;

/// Algorithm scraping from the landing page form.
pub mod algorithms;

/// Known GPU models and hardware inventory.
pub mod hardware;

/// Inventory-weighted aggregation.
pub mod aggregate;

// Public API - re-exports
pub use aggregate::aggregate;
pub use algorithms::{scrape_algorithms, scrape_algorithms_from_html};
pub use assets::locate_script_url;
pub use coefficients::{parse_coefficients, CoefficientRow, CoefficientTable};
pub use error::{Error, Result, Stage};
pub use fetch::{Fetch, HttpFetcher};
pub use field::{classify_field_id, FieldId};
pub use hardware::{Gpu, Inventory};
pub use options::Options;
pub use result::{Algorithm, AlgorithmMap};

use url::Url;

/// Run the pure part of the pipeline on already-fetched sources.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when a configured selector does not parse,
/// and [`Error::ScriptFormat`] or [`Error::Decode`] when the script does not
/// carry a parseable coefficient table.
pub fn extract_from_sources(
    html: &str,
    script: &str,
    inventory: &Inventory,
    options: &Options,
) -> Result<AlgorithmMap> {
    options.validate()?;
    let table = parse_coefficients(script)?;
    let algorithms = scrape_algorithms_from_html(html, options);
    Ok(aggregate(algorithms, &table, inventory, options))
}

/// Client for one profitability site.
///
/// Generic over the [`Fetch`] implementation; [`WtmFactor::new`] uses
/// [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct WtmFactor<F: Fetch = HttpFetcher> {
    base_url: String,
    options: Options,
    fetcher: F,
}

impl WtmFactor<HttpFetcher> {
    /// Create a client for `base_url` using a blocking HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] when `base_url` is not an absolute
    /// http(s) URL or a configured selector does not parse, or
    /// [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, options: Options) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options)?;
        Self::with_fetcher(base_url, options, fetcher)
    }
}

impl<F: Fetch> WtmFactor<F> {
    /// Create a client that fetches through `fetcher`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] when `base_url` is not an absolute
    /// http(s) URL or a configured selector does not parse.
    pub fn with_fetcher(base_url: &str, options: Options, fetcher: F) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            options,
            fetcher,
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options this client was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Fetch the landing page.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's transport error.
    pub fn fetch_page(&self) -> Result<String> {
        self.fetcher.get(&self.base_url)
    }

    /// Fetch the application script referenced by an already-fetched page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageFormat`] when the page has no asset tag, or the
    /// fetcher's transport error.
    pub fn fetch_script(&self, html: &str) -> Result<String> {
        let script_url = locate_script_url(html, &self.base_url)?;
        tracing::info!(url = %script_url, "GET application script");
        self.fetcher.get(&script_url)
    }

    /// Fetch the landing page and its script, and parse the coefficient table.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error.
    pub fn fetch_coefficients(&self) -> Result<CoefficientTable> {
        let html = self.fetch_page()?;
        let script = self.fetch_script(&html)?;
        parse_coefficients(&script)
    }

    /// Fetch the landing page and scrape its algorithm sections.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's transport error.
    pub fn fetch_algorithms(&self) -> Result<AlgorithmMap> {
        let html = self.fetch_page()?;
        Ok(scrape_algorithms_from_html(&html, &self.options))
    }

    /// Scrape the values currently rendered in the page's inputs, without
    /// touching the script.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's transport error.
    pub fn fetch_rendered(&self) -> Result<AlgorithmMap> {
        let html = self.fetch_page()?;
        let options = Options {
            include_rendered_values: true,
            ..self.options.clone()
        };
        Ok(scrape_algorithms_from_html(&html, &options))
    }

    /// Run the full pipeline for `inventory`.
    ///
    /// The landing page is fetched once and shared by the script lookup and
    /// the form scrape, so both describe the same page revision. Calling
    /// [`fetch_coefficients`](Self::fetch_coefficients) and
    /// [`fetch_algorithms`](Self::fetch_algorithms) separately fetches it
    /// twice, and the two results may then come from different revisions.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error; no partial result is returned.
    pub fn extract(&self, inventory: &Inventory) -> Result<AlgorithmMap> {
        let html = self.fetch_page()?;
        let script = self.fetch_script(&html)?;
        let result = extract_from_sources(&html, &script, inventory, &self.options)?;
        tracing::info!(algorithms = result.len(), "extracted factors");
        Ok(result)
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    let parsed = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(Error::InvalidUrl(format!("{trimmed}: expected an http(s) URL with a host")));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
