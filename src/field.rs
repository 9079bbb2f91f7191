//! Field-id classification.
//!
//! The form and the script name the same measurement with the same id:
//! `factor_<algo>_hr` for hashrate and `factor_<algo>_p` for power. The script
//! spells them as CSS selectors, with a leading `#`.

/// Prefix shared by every factor field id.
pub const FIELD_PREFIX: &str = "factor_";
/// Suffix of hashrate field ids.
pub const HASHRATE_SUFFIX: &str = "_hr";
/// Suffix of power field ids.
pub const POWER_SUFFIX: &str = "_p";

/// A classified field id, carrying the algorithm key it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldId {
    /// `factor_<key>_hr`
    Hashrate(String),
    /// `factor_<key>_p`
    Power(String),
    /// Anything else.
    Unrecognized,
}

impl FieldId {
    /// Algorithm key, if the id was recognized.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Hashrate(key) | Self::Power(key) => Some(key),
            Self::Unrecognized => None,
        }
    }
}

/// Classify a field id from the form (`factor_x11_hr`) or the script
/// (`#factor_x11_hr`).
///
/// # Example
///
/// ```rust
/// use wtm_factor::{classify_field_id, FieldId};
///
/// assert_eq!(classify_field_id("factor_380_hr"), FieldId::Hashrate("380".into()));
/// assert_eq!(classify_field_id("#factor_380_p"), FieldId::Power("380".into()));
/// assert_eq!(classify_field_id("adapt_380"), FieldId::Unrecognized);
/// ```
#[must_use]
pub fn classify_field_id(id: &str) -> FieldId {
    let id = id.trim();
    let id = id.strip_prefix('#').unwrap_or(id);
    let Some(rest) = id.strip_prefix(FIELD_PREFIX) else {
        return FieldId::Unrecognized;
    };

    if let Some(key) = rest.strip_suffix(HASHRATE_SUFFIX).filter(|k| !k.is_empty()) {
        return FieldId::Hashrate(key.to_string());
    }
    if let Some(key) = rest.strip_suffix(POWER_SUFFIX).filter(|k| !k.is_empty()) {
        return FieldId::Power(key.to_string());
    }
    FieldId::Unrecognized
}
