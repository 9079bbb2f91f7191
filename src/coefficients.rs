//! Coefficient table extraction from the application script.
//!
//! The bundle declares one object per GPU model, keyed by a short minified
//! variable name, each mapping factor field selectors to a coefficient:
//!
//! ```text
//! m={"#factor_ethash_hr":30.5,"#factor_ethash_p":.14,...},x={...},...,r=Object.keys(v)
//! ```
//!
//! The declarations are isolated between two fixed markers and parsed with the
//! tolerant [`literal`](crate::literal) parser.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::literal::{LiteralError, Parser};

/// Start of the coefficient declarations (inclusive).
pub const TABLE_START: &str = r##"m={"#factor"##;
/// End of the coefficient declarations (exclusive).
pub const TABLE_END: &str = "r=Object.keys(v)";

/// Field key → coefficient, for one hardware row.
pub type CoefficientRow = BTreeMap<String, f64>;

/// Per-hardware coefficient table: hardware key → field key → coefficient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable {
    rows: BTreeMap<String, CoefficientRow>,
}

impl CoefficientTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one hardware row.
    pub fn insert_row(&mut self, hardware: impl Into<String>, row: CoefficientRow) {
        self.rows.insert(hardware.into(), row);
    }

    /// Coefficient of `field` for `hardware`, if present.
    #[must_use]
    pub fn get(&self, hardware: &str, field: &str) -> Option<f64> {
        self.rows.get(hardware).and_then(|row| row.get(field)).copied()
    }

    /// One hardware row.
    #[must_use]
    pub fn row(&self, hardware: &str) -> Option<&CoefficientRow> {
        self.rows.get(hardware)
    }

    /// Iterate over `(hardware key, row)` in key order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &CoefficientRow)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Union of field keys across all rows.
    #[must_use]
    pub fn field_keys(&self) -> BTreeSet<&str> {
        self.rows
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    /// Number of hardware rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(String, CoefficientRow)> for CoefficientTable {
    fn from_iter<I: IntoIterator<Item = (String, CoefficientRow)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Return the declarations between [`TABLE_START`] and [`TABLE_END`].
///
/// # Errors
///
/// Returns [`Error::ScriptFormat`] when either marker is missing.
pub fn isolate_table(script: &str) -> Result<&str> {
    let start = script
        .find(TABLE_START)
        .ok_or_else(|| Error::ScriptFormat(format!("start marker `{TABLE_START}` not found")))?;
    let rest = &script[start..];
    let end = rest
        .find(TABLE_END)
        .ok_or_else(|| Error::ScriptFormat(format!("end marker `{TABLE_END}` not found")))?;
    Ok(&rest[..end])
}

/// Extract the coefficient table from the application script.
///
/// Parsing is pure: the same script always yields the same table.
///
/// # Errors
///
/// Returns [`Error::ScriptFormat`] when the markers are missing and
/// [`Error::Decode`] when the declarations do not parse or a coefficient is
/// not a number.
///
/// # Example
///
/// ```rust
/// use wtm_factor::parse_coefficients;
///
/// let script = r##"var a=1;m={"#factor_x11_hr":.5,"#factor_x11_p":120},x={"#factor_x11_hr":2},r=Object.keys(v)"##;
/// let table = parse_coefficients(script)?;
/// assert_eq!(table.get("m", "#factor_x11_hr"), Some(0.5));
/// assert_eq!(table.get("x", "#factor_x11_hr"), Some(2.0));
/// # Ok::<(), wtm_factor::Error>(())
/// ```
pub fn parse_coefficients(script: &str) -> Result<CoefficientTable> {
    let region = isolate_table(script)?;
    let table = parse_declarations(region)?;
    tracing::debug!(rows = table.len(), "parsed coefficient table");
    Ok(table)
}

/// Parse a comma-separated list of `name={...}` or `"name":{...}` entries.
///
/// An assigned object whose members are all objects is treated as a wrapper
/// of rows and flattened. Entries of any other shape are skipped.
///
/// # Errors
///
/// Returns [`Error::Decode`] on a malformed object body, a non-numeric
/// coefficient, or when no row is found.
pub fn parse_declarations(region: &str) -> Result<CoefficientTable> {
    let decode = |e: LiteralError| Error::Decode(e.to_string());

    let mut parser = Parser::new(region);
    let mut builder = Map::new();

    loop {
        parser.skip_ws();
        if parser.at_end() {
            break;
        }
        if parser.eat(b',') || parser.eat(b';') {
            continue;
        }

        let start = parser.pos();
        match read_entry(&mut parser).map_err(decode)? {
            Some((name, object)) => push_rows(&mut builder, name, object),
            None => {
                parser.rewind(start);
                parser.skip_item();
                tracing::warn!(entry = %&region[start..parser.pos()], "skipping malformed coefficient entry");
            }
        }
    }

    if builder.is_empty() {
        return Err(Error::Decode("no coefficient rows found".to_string()));
    }

    builder
        .into_iter()
        .map(|(hardware, value)| match serde_json::from_value::<CoefficientRow>(value) {
            Ok(row) => Ok((hardware, row)),
            Err(e) => Err(Error::Decode(format!("row `{hardware}`: {e}"))),
        })
        .collect()
}

/// Read one `name = {…}` / `name : {…}` entry.
///
/// `Ok(None)` means the entry does not have that shape; an error means the
/// object body itself is malformed.
fn read_entry(
    parser: &mut Parser<'_>,
) -> std::result::Result<Option<(String, Map<String, Value>)>, LiteralError> {
    let Ok(name) = parser.parse_key() else {
        return Ok(None);
    };
    parser.skip_ws();
    if !(parser.eat(b'=') || parser.eat(b':')) {
        return Ok(None);
    }
    parser.skip_ws();
    if parser.peek() != Some(b'{') {
        return Ok(None);
    }
    parser.parse_object().map(|object| Some((name, object)))
}

fn push_rows(builder: &mut Map<String, Value>, name: String, object: Map<String, Value>) {
    if !object.is_empty() && object.values().all(Value::is_object) {
        for (hardware, row) in object {
            builder.insert(hardware, row);
        }
    } else {
        builder.insert(name, Value::Object(object));
    }
}
