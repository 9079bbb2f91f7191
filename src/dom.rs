//! DOM helpers over `dom_query`.
//!
//! Thin wrappers for the handful of reads the form scraper needs.

pub use dom_query::{Document, Selection};

// `select` panics on a selector that does not parse; these helpers go through
// `try_select`, so a bad selector matches nothing.

/// Every element of `doc` matched by `selector`, in document order.
#[must_use]
pub fn select_all<'a>(doc: &'a Document, selector: &str) -> Vec<Selection<'a>> {
    doc.try_select(selector)
        .map(|sel| sel.nodes().iter().map(|node| Selection::from(*node)).collect())
        .unwrap_or_default()
}

/// Iterate over every element matched by `selector` under `sel`.
pub fn each<'a>(sel: &Selection<'a>, selector: &str) -> impl Iterator<Item = Selection<'a>> {
    sel.try_select(selector)
        .map(|found| {
            found
                .nodes()
                .iter()
                .map(|node| Selection::from(*node))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
        .into_iter()
}

/// Elements matched by `selector` under `sel`, or `None` when nothing matches.
#[must_use]
pub fn find<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    sel.try_select(selector)
}

/// Get any attribute value of the first matched element
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Trimmed text content of all matched elements
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    sel.text().trim().to_string()
}

/// Trimmed text of the elements matched by `selector`, if non-empty
#[must_use]
pub fn find_text(sel: &Selection, selector: &str) -> Option<String> {
    let text = trimmed_text(&find(sel, selector)?);
    (!text.is_empty()).then_some(text)
}
