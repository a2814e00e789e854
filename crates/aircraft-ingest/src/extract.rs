//! Candidate extraction from a directory-listing page.

use scraper::{Html, Selector};

/// Substring an `href` must contain to count as a snapshot file.
pub const FILE_MARKER: &str = ".json";

/// Extract snapshot filenames from raw listing HTML.
///
/// Returns the `href` of every anchor containing [`FILE_MARKER`], in
/// document order, duplicates preserved. An empty result is not an error:
/// bot-protection pages carry no links and callers fall back to generation.
pub fn extract_candidates(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(FILE_MARKER))
        .map(|href| href.to_string())
        .collect()
}
