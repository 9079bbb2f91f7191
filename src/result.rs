//! Result types for factor extraction.
//!
//! An [`Algorithm`] is created by the form scraper and enriched in place by the
//! aggregator. The final output is an [`AlgorithmMap`] keyed by algorithm key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Algorithm key → algorithm record.
pub type AlgorithmMap = BTreeMap<String, Algorithm>;

/// One proof-of-work algorithm listed on the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    /// Display name (e.g. "Ethash").
    pub name: String,

    /// Id of the hashrate input (e.g. `factor_eth_hr`).
    pub hashrate_id: String,

    /// Hashrate unit label (e.g. "Mh/s").
    pub hashrate_unit: Option<String>,

    /// Hashrate value: aggregated, or as rendered on the page.
    pub hashrate_value: Option<f64>,

    /// Id of the power input (e.g. `factor_eth_p`).
    pub power_id: String,

    /// Power unit label (e.g. "W").
    pub power_unit: Option<String>,

    /// Power value: aggregated, or as rendered on the page.
    pub power_value: Option<f64>,
}
