//! Per-page machine text extraction.

use lopdf::Document;

/// Extract the machine-encoded text of a single page (1-indexed).
///
/// Returns the trimmed text run; an empty string means the page carries no
/// extractable text. A decoder fault stays scoped to this page, and callers
/// keep iterating the rest of the document.
pub fn extract_page_text(document: &Document, page_number: u32) -> Result<String, lopdf::Error> {
    let text = document.extract_text(&[page_number])?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::{TestPage, build_document};

    #[test]
    fn extracts_each_page_in_isolation() {
        let doc = build_document(vec![TestPage::Text("Hello"), TestPage::Text("World")]);
        assert_eq!(extract_page_text(&doc, 1).unwrap(), "Hello");
        assert_eq!(extract_page_text(&doc, 2).unwrap(), "World");
    }

    #[test]
    fn faults_stay_scoped_to_their_page() {
        let doc = build_document(vec![
            TestPage::Text("one"),
            TestPage::PoisonedText,
            TestPage::Text("three"),
        ]);
        assert!(extract_page_text(&doc, 2).is_err());
        assert_eq!(extract_page_text(&doc, 1).unwrap(), "one");
        assert_eq!(extract_page_text(&doc, 3).unwrap(), "three");
    }

    #[test]
    fn missing_page_is_an_error() {
        let doc = build_document(vec![TestPage::Text("only")]);
        assert!(extract_page_text(&doc, 9).is_err());
    }
}
