//! Text extraction from fetched HTML

use scraper::{Html, Selector};

/// Extract all text content from an HTML document, whitespace-normalized.
///
/// Every text node is collected in document order and joined with single
/// spaces. Used for the static-fetch stage, where the full document body is
/// the best signal available.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

/// Extract the text of `<p>` elements only, whitespace-normalized.
///
/// The rendered-fetch stage uses this narrower extraction: after a headless
/// render, paragraph elements carry the page's readable content while the
/// rest is largely script-generated chrome.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("p") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    let text = document
        .select(&selector)
        .flat_map(|p| p.text())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
