//! Inventory-weighted aggregation of coefficients.
//!
//! For every factor field in the coefficient table, the expected value is
//! `Σ count(hw) × coefficient(hw, field)` over the caller's inventory, with a
//! missing coefficient counting as zero. Hashrate fields feed
//! `hashrate_value`, power fields feed `power_value`.

use crate::coefficients::CoefficientTable;
use crate::field::{classify_field_id, FieldId};
use crate::hardware::Inventory;
use crate::options::Options;
use crate::result::AlgorithmMap;

/// Inventory-weighted sum of one field's coefficients.
#[must_use]
pub fn weighted_sum(table: &CoefficientTable, inventory: &Inventory, field: &str) -> f64 {
    inventory
        .iter()
        .map(|(hardware, count)| f64::from(count) * table.get(hardware, field).unwrap_or(0.0))
        .sum()
}

/// Fill `hashrate_value` and `power_value` of every scraped algorithm.
///
/// Every algorithm starts at zero for both values, so one with no
/// coefficients ends up zero-valued. Table fields whose algorithm key was not
/// scraped are ignored; the result holds exactly the scraped algorithms.
///
/// # Example
///
/// ```rust
/// use wtm_factor::{aggregate, Algorithm, AlgorithmMap, CoefficientTable, Inventory, Options};
///
/// let mut table = CoefficientTable::new();
/// table.insert_row("vga_model", [("factor_380_hr".to_string(), 30.0)].into_iter().collect());
///
/// let mut algorithms = AlgorithmMap::new();
/// algorithms.insert("380".to_string(), Algorithm::default());
///
/// let inventory: Inventory = [("vga_model", 2)].into_iter().collect();
/// let result = aggregate(algorithms, &table, &inventory, &Options::default());
/// assert_eq!(result["380"].hashrate_value, Some(60.0));
/// ```
#[must_use]
pub fn aggregate(
    mut algorithms: AlgorithmMap,
    table: &CoefficientTable,
    inventory: &Inventory,
    options: &Options,
) -> AlgorithmMap {
    for algorithm in algorithms.values_mut() {
        algorithm.hashrate_value = Some(0.0);
        algorithm.power_value = Some(0.0);
    }

    let fields: Vec<&str> = match options.reference_hardware.as_deref() {
        Some(reference) => match table.row(reference) {
            Some(row) => row.keys().map(String::as_str).collect(),
            None => {
                tracing::warn!(reference, "reference hardware row missing from coefficient table");
                Vec::new()
            }
        },
        None => table.field_keys().into_iter().collect(),
    };

    for field in fields {
        let total = weighted_sum(table, inventory, field);
        let (key, is_hashrate) = match classify_field_id(field) {
            FieldId::Hashrate(key) => (key, true),
            FieldId::Power(key) => (key, false),
            FieldId::Unrecognized => {
                tracing::debug!(field, "ignoring unrecognized coefficient field");
                continue;
            }
        };

        let Some(algorithm) = algorithms.get_mut(&key) else {
            tracing::debug!(key = %key, "coefficient field has no scraped algorithm");
            continue;
        };
        if is_hashrate {
            algorithm.hashrate_value = Some(total);
        } else {
            algorithm.power_value = Some(total);
        }
    }

    algorithms
}
