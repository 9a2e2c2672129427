//! Document-to-text extraction pipeline.
//!
//! Raw upload bytes go through document parsing (the only fatal step),
//! per-page machine text extraction, embedded image discovery plus
//! recognition, and normalization of both text streams. Every fault after
//! parsing is scoped to a single page, image object, or bitmap; it is
//! logged and skipped, never fatal.

pub mod normalize;
pub mod ocr;
pub mod pdf;

use std::collections::BTreeMap;

use lopdf::{Document, ObjectId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ExtractError;
use normalize::normalize;
use ocr::TextRecognizer;
use pdf::images::PageImage;

/// Both post-normalization text streams of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentText {
    /// Machine-encoded text, page order, one line per page.
    pub text: String,
    /// Recognition output over embedded raster images, traversal order.
    pub handwriting: String,
}

/// Run the full extraction pipeline over one uploaded document.
///
/// Parsing is the single fatal boundary. A document that parses but yields
/// nothing from either stream is reported as [`ExtractError::NothingExtracted`],
/// distinct from a parse failure.
pub fn extract_document(
    bytes: &[u8],
    recognizer: &dyn TextRecognizer,
) -> Result<DocumentText, ExtractError> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();
    debug!(pages = pages.len(), "document parsed");

    let text = normalize(&collect_machine_text(&document, &pages));

    let bitmaps = collect_page_bitmaps(&document, &pages);
    let handwriting = normalize(&recognize_bitmaps(&bitmaps, recognizer));

    if text.is_empty() && handwriting.is_empty() {
        return Err(ExtractError::NothingExtracted);
    }

    debug!(
        text_len = text.len(),
        handwriting_len = handwriting.len(),
        images = bitmaps.len(),
        "extraction complete"
    );

    Ok(DocumentText { text, handwriting })
}

/// Visit every page in document order and accumulate its text run.
///
/// A page that faults contributes nothing; the loop keeps going.
fn collect_machine_text(document: &Document, pages: &BTreeMap<u32, ObjectId>) -> String {
    let mut blob = String::new();
    for &number in pages.keys() {
        match pdf::text::extract_page_text(document, number) {
            Ok(text) if !text.is_empty() => {
                blob.push_str(&text);
                blob.push('\n');
            }
            Ok(_) => {}
            Err(fault) => {
                warn!(page = number, error = %fault, "Skipping text extraction for page");
            }
        }
    }
    blob
}

/// Visit every page in document order and gather its decodable images.
///
/// Page-level scan faults and per-object decode faults are both recorded
/// and skipped without touching the rest of the traversal.
fn collect_page_bitmaps(document: &Document, pages: &BTreeMap<u32, ObjectId>) -> Vec<PageImage> {
    let mut bitmaps = Vec::new();
    for (&number, &page_id) in pages {
        match pdf::images::collect_page_images(document, number, page_id) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    match outcome {
                        Ok(bitmap) => bitmaps.push(bitmap),
                        Err(fault) => {
                            warn!(page = number, error = %fault, "Skipping image object");
                        }
                    }
                }
            }
            Err(fault) => {
                warn!(page = number, error = %fault, "Skipping image scan for page");
            }
        }
    }
    bitmaps
}

/// Recognize each bitmap in traversal order and accumulate non-empty output.
fn recognize_bitmaps(bitmaps: &[PageImage], recognizer: &dyn TextRecognizer) -> String {
    let mut blob = String::new();
    for bitmap in bitmaps {
        match recognizer.recognize(&bitmap.image) {
            Ok(text) if !text.is_empty() => {
                blob.push_str(&text);
                blob.push('\n');
            }
            Ok(_) => {}
            Err(fault) => {
                warn!(
                    page = bitmap.page_number,
                    object = %bitmap.name,
                    error = %fault,
                    "Skipping recognition for bitmap"
                );
            }
        }
    }
    blob
}
