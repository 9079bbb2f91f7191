//! Configuration options for factor extraction.
//!
//! The `Options` struct controls HTTP behavior, the CSS selectors used to walk
//! the algorithm form, and how coefficients are aggregated.

use std::time::Duration;

use dom_query::Matcher;

use crate::error::{Error, Result};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration options for factor extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the layout of the live page.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use wtm_factor::Options;
///
/// let options = Options {
///     timeout: Duration::from_secs(10),
///     include_rendered_values: true,
///     ..Options::default()
/// };
/// assert_eq!(options.row_selector, ".form-row .py-1");
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Timeout applied to every HTTP request.
    ///
    /// Default: 60 seconds
    pub timeout: Duration,

    /// User-Agent header sent with each request.
    ///
    /// Default: `None` (the HTTP client's own)
    pub user_agent: Option<String>,

    /// Selector matching one form section per algorithm.
    ///
    /// Default: `.form-row .py-1`
    pub row_selector: String,

    /// Selector of the algorithm display name, relative to a section.
    ///
    /// Default: `label.ck-button span.btn.btn-default.btn-block.mb-1`
    pub name_selector: String,

    /// Selector of one measurement field container, relative to a section.
    ///
    /// Default: `div.input-group.input-group-sm`
    pub field_selector: String,

    /// Selector of the input carrying the field id, relative to a field.
    ///
    /// Default: `input.form-control`
    pub input_selector: String,

    /// Selector of the unit label, relative to a field.
    ///
    /// Default: `span.input-group-text`
    pub unit_selector: String,

    /// Also read the values currently rendered in the form inputs.
    ///
    /// When enabled, the scraper parses each input's `value` attribute into
    /// `hashrate_value` / `power_value`.
    ///
    /// Default: `false`
    pub include_rendered_values: bool,

    /// Coefficient-table row whose field keys drive aggregation.
    ///
    /// When `None`, the union of field keys across all rows is used.
    ///
    /// Default: `None`
    pub reference_hardware: Option<String>,
}

impl Options {
    /// Check that every configured selector parses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] naming the first selector that does not
    /// parse.
    pub fn validate(&self) -> Result<()> {
        let selectors = [
            ("row_selector", &self.row_selector),
            ("name_selector", &self.name_selector),
            ("field_selector", &self.field_selector),
            ("input_selector", &self.input_selector),
            ("unit_selector", &self.unit_selector),
        ];
        for (field, selector) in selectors {
            if let Err(e) = Matcher::new(selector) {
                return Err(Error::InvalidUrl(format!("{field} `{selector}`: {e:?}")));
            }
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            row_selector: ".form-row .py-1".to_string(),
            name_selector: "label.ck-button span.btn.btn-default.btn-block.mb-1".to_string(),
            field_selector: "div.input-group.input-group-sm".to_string(),
            input_selector: "input.form-control".to_string(),
            unit_selector: "span.input-group-text".to_string(),
            include_rendered_values: false,
            reference_hardware: None,
        }
    }
}
