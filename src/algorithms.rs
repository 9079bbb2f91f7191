//! Algorithm scraping from the landing page form.
//!
//! Each algorithm is a form section holding a checkbox label with its display
//! name and two input groups, one for hashrate and one for power:
//!
//! ```html
//! <div class="form-row"><div class="py-1">
//!   <label class="ck-button"><span class="btn btn-default btn-block mb-1">X11</span></label>
//!   <div class="input-group input-group-sm">
//!     <input class="form-control" id="factor_x11_hr" value="30.0">
//!     <div class="input-group-append"><span class="input-group-text">Mh/s</span></div>
//!   </div>
//!   <div class="input-group input-group-sm">
//!     <input class="form-control" id="factor_x11_p" value="120.0">
//!     <div class="input-group-append"><span class="input-group-text">W</span></div>
//!   </div>
//! </div></div>
//! ```

use crate::dom::{self, Document, Selection};
use crate::field::{classify_field_id, FieldId};
use crate::options::Options;
use crate::result::{Algorithm, AlgorithmMap};

/// Scrape every algorithm section of a parsed landing page.
///
/// Sections without a recognized hashrate or power field are skipped. When
/// two sections yield the same key, the later one wins. Nothing is scraped
/// when [`Options::validate`] rejects a selector.
#[must_use]
pub fn scrape_algorithms(doc: &Document, options: &Options) -> AlgorithmMap {
    let mut algorithms = AlgorithmMap::new();
    if let Err(e) = options.validate() {
        tracing::warn!(error = %e, "not scraping with an unparseable selector");
        return algorithms;
    }

    for section in dom::select_all(doc, &options.row_selector) {
        let Some((key, algorithm)) = scrape_section(&section, options) else {
            tracing::debug!("skipping form section without factor fields");
            continue;
        };
        if let Some(previous) = algorithms.insert(key.clone(), algorithm) {
            tracing::warn!(
                key = %key,
                previous = %previous.name,
                "duplicate algorithm key, keeping the later section"
            );
        }
    }

    tracing::debug!(count = algorithms.len(), "scraped algorithms");
    algorithms
}

/// Parse `html` and scrape its algorithm sections.
#[must_use]
pub fn scrape_algorithms_from_html(html: &str, options: &Options) -> AlgorithmMap {
    let doc = Document::from(html);
    scrape_algorithms(&doc, options)
}

fn scrape_section(section: &Selection, options: &Options) -> Option<(String, Algorithm)> {
    let mut algorithm = Algorithm {
        name: dom::find_text(section, &options.name_selector).unwrap_or_default(),
        ..Algorithm::default()
    };
    let mut key: Option<String> = None;

    for field in dom::each(section, &options.field_selector) {
        let Some(input) = dom::find(&field, &options.input_selector) else {
            continue;
        };
        let Some(id) = dom::get_attribute(&input, "id") else {
            continue;
        };

        let unit = dom::find_text(&field, &options.unit_selector);
        let rendered = if options.include_rendered_values {
            dom::get_attribute(&input, "value").and_then(|v| parse_rendered_value(&v))
        } else {
            None
        };

        let field_key = match classify_field_id(&id) {
            FieldId::Hashrate(field_key) => {
                algorithm.hashrate_id = id;
                algorithm.hashrate_unit = unit;
                algorithm.hashrate_value = rendered;
                field_key
            }
            FieldId::Power(field_key) => {
                algorithm.power_id = id;
                algorithm.power_unit = unit;
                algorithm.power_value = rendered;
                field_key
            }
            FieldId::Unrecognized => continue,
        };

        if let Some(existing) = key.as_deref().filter(|k| *k != field_key) {
            tracing::warn!(
                existing,
                field_key = %field_key,
                name = %algorithm.name,
                "fields of one section disagree on the algorithm key"
            );
        }
        key = Some(field_key);
    }

    key.map(|key| (key, algorithm))
}

/// Parse a rendered input value such as `"30.5"` or `"1,250"`.
fn parse_rendered_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, key: &str, hr: &str, p: &str) -> String {
        format!(
            r#"<div class="py-1">
                <label class="ck-button"><input type="checkbox">
                  <span class="btn btn-default btn-block mb-1"> {name} </span></label>
                <div class="input-group input-group-sm">
                  <input class="form-control" id="factor_{key}_hr" value="{hr}">
                  <div class="input-group-append"><span class="input-group-text"> Mh/s </span></div>
                </div>
                <div class="input-group input-group-sm">
                  <input class="form-control" id="factor_{key}_p" value="{p}">
                  <div class="input-group-append"><span class="input-group-text">W</span></div>
                </div>
            </div>"#
        )
    }

    fn page(sections: &[String]) -> String {
        format!(
            r#"<html><body><form><div class="form-row">{}</div></form></body></html>"#,
            sections.concat()
        )
    }

    #[test]
    fn test_scrape_two_algorithms() {
        let html = page(&[
            section("X11", "x11", "30.0", "120"),
            section("Lyra2REv2", "lyra2v2", "1.5", "95"),
        ]);
        let algorithms = scrape_algorithms_from_html(&html, &Options::default());

        assert_eq!(algorithms.len(), 2);
        let x11 = &algorithms["x11"];
        assert_eq!(x11.name, "X11");
        assert_eq!(x11.hashrate_id, "factor_x11_hr");
        assert_eq!(x11.power_id, "factor_x11_p");
        assert_eq!(x11.hashrate_unit.as_deref(), Some("Mh/s"));
        assert_eq!(x11.power_unit.as_deref(), Some("W"));
        assert_eq!(x11.hashrate_value, None);
        assert_eq!(algorithms["lyra2v2"].name, "Lyra2REv2");
    }

    #[test]
    fn test_hashrate_and_power_merge_under_one_key() {
        let html = page(&[section("Ethash", "380", "30", "140")]);
        let algorithms = scrape_algorithms_from_html(&html, &Options::default());

        assert_eq!(algorithms.keys().collect::<Vec<_>>(), vec!["380"]);
        assert_eq!(algorithms["380"].hashrate_id, "factor_380_hr");
        assert_eq!(algorithms["380"].power_id, "factor_380_p");
    }

    #[test]
    fn test_rendered_values() {
        let html = page(&[section("X11", "x11", "1,250.5", "")]);
        let options = Options {
            include_rendered_values: true,
            ..Options::default()
        };
        let algorithms = scrape_algorithms_from_html(&html, &options);

        assert_eq!(algorithms["x11"].hashrate_value, Some(1250.5));
        assert_eq!(algorithms["x11"].power_value, None);
    }

    #[test]
    fn test_field_without_id_is_skipped() {
        let html = page(&[r#"<div class="py-1">
            <label class="ck-button"><span class="btn btn-default btn-block mb-1">Cost</span></label>
            <div class="input-group input-group-sm"><input class="form-control" name="cost"></div>
            <div class="input-group input-group-sm"><input class="form-control" id="factor_eq_p"></div>
        </div>"#
            .to_string()]);
        let algorithms = scrape_algorithms_from_html(&html, &Options::default());

        assert_eq!(algorithms.len(), 1);
        assert_eq!(algorithms["eq"].hashrate_id, "");
        assert_eq!(algorithms["eq"].power_id, "factor_eq_p");
    }

    #[test]
    fn test_section_without_factor_fields_is_skipped() {
        let html = page(&[r#"<div class="py-1">
            <div class="input-group input-group-sm"><input class="form-control" id="cost"></div>
        </div>"#
            .to_string()]);
        assert!(scrape_algorithms_from_html(&html, &Options::default()).is_empty());
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let html = page(&[section("First", "dup", "1", "1"), section("Second", "dup", "2", "2")]);
        let algorithms = scrape_algorithms_from_html(&html, &Options::default());
        assert_eq!(algorithms.len(), 1);
        assert_eq!(algorithms["dup"].name, "Second");
    }

    #[test]
    fn test_custom_row_selector() {
        let html = r#"<section class="algo">
            <div class="input-group input-group-sm"><input class="form-control" id="factor_kp_hr"></div>
        </section>"#;
        let options = Options {
            row_selector: "section.algo".to_string(),
            ..Options::default()
        };
        let algorithms = scrape_algorithms_from_html(html, &options);
        assert_eq!(algorithms["kp"].name, "");
        assert_eq!(algorithms["kp"].hashrate_id, "factor_kp_hr");
    }

    #[test]
    fn test_unparseable_selector_scrapes_nothing() {
        let html = page(&[section("X11", "x11", "30.0", "120")]);
        let broken = [
            Options {
                row_selector: "div[".to_string(),
                ..Options::default()
            },
            Options {
                input_selector: "input:not(".to_string(),
                ..Options::default()
            },
        ];
        for broken in broken {
            assert!(scrape_algorithms_from_html(&html, &broken).is_empty());
        }
    }

    #[test]
    fn test_parse_rendered_value() {
        assert_eq!(parse_rendered_value(" 42 "), Some(42.0));
        assert_eq!(parse_rendered_value("0.5"), Some(0.5));
        assert_eq!(parse_rendered_value(""), None);
        assert_eq!(parse_rendered_value("n/a"), None);
        assert_eq!(parse_rendered_value("inf"), None);
    }
}
