//! Known GPU models and the caller's hardware inventory.
//!
//! The page's GPU checkboxes carry ids like `adapt_1080Ti`; the script keys
//! the matching coefficient row by a one-letter minified name (`l`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// GPU models with a coefficient row in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gpu {
    /// Radeon R9 380
    Rx380,
    /// Radeon R9 Fury
    Fury,
    /// Radeon RX 470
    Rx470,
    /// Radeon RX 480
    Rx480,
    /// Radeon RX 570
    Rx570,
    /// Radeon RX 580
    Rx580,
    /// Radeon RX Vega 56
    Vega56,
    /// Radeon RX Vega 64
    Vega64,
    /// Radeon VII
    RadeonVii,
    /// GeForce GTX 1050 Ti
    Gtx1050Ti,
    /// GeForce GTX 1060 6GB
    Gtx1060,
    /// GeForce GTX 1070
    Gtx1070,
    /// GeForce GTX 1070 Ti
    Gtx1070Ti,
    /// GeForce GTX 1080
    Gtx1080,
    /// GeForce GTX 1080 Ti
    Gtx1080Ti,
    /// GeForce GTX 1660
    Gtx1660,
    /// GeForce GTX 1660 Ti
    Gtx1660Ti,
    /// GeForce RTX 2060
    Rtx2060,
    /// GeForce RTX 2070
    Rtx2070,
    /// GeForce RTX 2080
    Rtx2080,
    /// GeForce RTX 2080 Ti
    Rtx2080Ti,
}

impl Gpu {
    /// Every known model, AMD first.
    pub const ALL: [Gpu; 21] = [
        Gpu::Rx380,
        Gpu::Fury,
        Gpu::Rx470,
        Gpu::Rx480,
        Gpu::Rx570,
        Gpu::Rx580,
        Gpu::Vega56,
        Gpu::Vega64,
        Gpu::RadeonVii,
        Gpu::Gtx1050Ti,
        Gpu::Gtx1060,
        Gpu::Gtx1070,
        Gpu::Gtx1070Ti,
        Gpu::Gtx1080,
        Gpu::Gtx1080Ti,
        Gpu::Gtx1660,
        Gpu::Gtx1660Ti,
        Gpu::Rtx2060,
        Gpu::Rtx2070,
        Gpu::Rtx2080,
        Gpu::Rtx2080Ti,
    ];

    /// Id of the model's checkbox on the page.
    #[must_use]
    pub fn form_id(self) -> &'static str {
        match self {
            Gpu::Rx380 => "adapt_380",
            Gpu::Fury => "adapt_fury",
            Gpu::Rx470 => "adapt_470",
            Gpu::Rx480 => "adapt_480",
            Gpu::Rx570 => "adapt_570",
            Gpu::Rx580 => "adapt_580",
            Gpu::Vega56 => "adapt_vega56",
            Gpu::Vega64 => "adapt_vega64",
            Gpu::RadeonVii => "adapt_vii",
            Gpu::Gtx1050Ti => "adapt_1050Ti",
            Gpu::Gtx1060 => "adapt_10606",
            Gpu::Gtx1070 => "adapt_1070",
            Gpu::Gtx1070Ti => "adapt_1070Ti",
            Gpu::Gtx1080 => "adapt_1080",
            Gpu::Gtx1080Ti => "adapt_1080Ti",
            Gpu::Gtx1660 => "adapt_1660",
            Gpu::Gtx1660Ti => "adapt_1660Ti",
            Gpu::Rtx2060 => "adapt_2060",
            Gpu::Rtx2070 => "adapt_2070",
            Gpu::Rtx2080 => "adapt_2080",
            Gpu::Rtx2080Ti => "adapt_2080Ti",
        }
    }

    /// Key of the model's row in the coefficient table.
    #[must_use]
    pub fn hardware_key(self) -> &'static str {
        match self {
            Gpu::Rx380 => "m",
            Gpu::Fury => "x",
            Gpu::Rx470 => "g",
            Gpu::Rx480 => "v",
            Gpu::Rx570 => "y",
            Gpu::Rx580 => "b",
            Gpu::Vega56 => "w",
            Gpu::Vega64 => "T",
            Gpu::RadeonVii => "E",
            Gpu::Gtx1050Ti => "o",
            Gpu::Gtx1060 => "i",
            Gpu::Gtx1070 => "a",
            Gpu::Gtx1070Ti => "s",
            Gpu::Gtx1080 => "c",
            Gpu::Gtx1080Ti => "l",
            Gpu::Gtx1660 => "f",
            Gpu::Gtx1660Ti => "u",
            Gpu::Rtx2060 => "h",
            Gpu::Rtx2070 => "p",
            Gpu::Rtx2080 => "d",
            Gpu::Rtx2080Ti => "_",
        }
    }

    /// Look a model up by its checkbox id (`adapt_1080Ti`) or by the id's
    /// suffix alone (`1080Ti`).
    #[must_use]
    pub fn from_form_id(id: &str) -> Option<Gpu> {
        let id = id.trim();
        let suffix = id.strip_prefix("adapt_").unwrap_or(id);
        Gpu::ALL
            .into_iter()
            .find(|gpu| gpu.form_id().strip_prefix("adapt_") == Some(suffix))
    }
}

impl fmt::Display for Gpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_id())
    }
}

impl FromStr for Gpu {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gpu::from_form_id(s).ok_or_else(|| Error::UnknownGpu(s.trim().to_string()))
    }
}

/// Hardware key → number of units the caller owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    counts: BTreeMap<String, u32>,
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` units under a raw hardware key.
    pub fn add(&mut self, hardware_key: impl Into<String>, count: u32) -> &mut Self {
        let entry = self.counts.entry(hardware_key.into()).or_insert(0);
        *entry = entry.saturating_add(count);
        self
    }

    /// Add `count` units of a known model.
    pub fn add_gpu(&mut self, gpu: Gpu, count: u32) -> &mut Self {
        self.add(gpu.hardware_key(), count)
    }

    /// Build an inventory from checkbox ids (`adapt_1080Ti` or `1080Ti`)
    /// and counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGpu`] for the first id that names no known
    /// model.
    pub fn from_gpu_ids<'a, I>(ids: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut inventory = Inventory::new();
        for (id, count) in ids {
            inventory.add_gpu(id.parse::<Gpu>()?, count);
        }
        Ok(inventory)
    }

    /// Units owned for `hardware_key`; zero when absent.
    #[must_use]
    pub fn count(&self, hardware_key: &str) -> u32 {
        self.counts.get(hardware_key).copied().unwrap_or(0)
    }

    /// Iterate over `(hardware key, count)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True when nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (key, count) in iter {
            inventory.add(key, count);
        }
        inventory
    }
}

impl<'a> FromIterator<(&'a str, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl FromIterator<(Gpu, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (Gpu, u32)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (gpu, count) in iter {
            inventory.add_gpu(gpu, count);
        }
        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keys_are_unique() {
        let mut keys: Vec<&str> = Gpu::ALL.iter().map(|g| g.hardware_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Gpu::ALL.len());
    }

    #[test]
    fn test_from_form_id() {
        assert_eq!(Gpu::from_form_id("adapt_1080Ti"), Some(Gpu::Gtx1080Ti));
        assert_eq!(Gpu::from_form_id("vega56"), Some(Gpu::Vega56));
        assert_eq!(Gpu::from_form_id("adapt_9090"), None);
        assert_eq!("adapt_2080Ti".parse::<Gpu>().ok(), Some(Gpu::Rtx2080Ti));
        assert!("titan".parse::<Gpu>().is_err());
    }

    #[test]
    fn test_rtx2080ti_row_is_underscore() {
        assert_eq!(Gpu::Rtx2080Ti.hardware_key(), "_");
        assert_eq!(Gpu::Rx480.hardware_key(), "v");
        assert_eq!(Gpu::Rx480.to_string(), "adapt_480");
    }

    #[test]
    fn test_inventory_accumulates() {
        let mut inventory = Inventory::new();
        inventory.add_gpu(Gpu::Gtx1080Ti, 2).add("l", 1).add("vga_model", 3);
        assert_eq!(inventory.count("l"), 3);
        assert_eq!(inventory.count("vga_model"), 3);
        assert_eq!(inventory.count("m"), 0);
    }

    #[test]
    fn test_inventory_from_gpus() {
        let inventory: Inventory = [(Gpu::Rx580, 4), (Gpu::Rtx2070, 1)].into_iter().collect();
        let entries: Vec<(&str, u32)> = inventory.iter().collect();
        assert_eq!(entries, vec![("b", 4), ("p", 1)]);
    }

    #[test]
    fn test_inventory_from_gpu_ids() {
        let inventory = Inventory::from_gpu_ids([("adapt_380", 2), ("1080Ti", 1), ("adapt_380", 1)]);
        assert_eq!(inventory.as_ref().map(|i| i.count("m")).ok(), Some(3));
        assert_eq!(inventory.as_ref().map(|i| i.count("l")).ok(), Some(1));

        let err = Inventory::from_gpu_ids([("adapt_titan", 1)]).err();
        assert!(matches!(err, Some(Error::UnknownGpu(ref id)) if id == "adapt_titan"));
        assert_eq!(err.map(|e| e.to_string()).as_deref(), Some("unknown GPU `adapt_titan`"));
    }
}
