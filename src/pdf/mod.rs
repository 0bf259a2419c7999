//! PDF text extraction
//!
//! Pulls the text layer out of an uploaded PDF with `lopdf`. Scanned or
//! image-only pages yield nothing and are skipped; a document where every
//! page is like that produces an empty string, which the upload route
//! rejects. Corrupt or encrypted files fail outright.

use lopdf::Document;
use thiserror::Error;

/// Character ceiling on extracted text (roughly 25k tokens).
pub const MAX_TEXT_CHARS: usize = 100_000;

const TRUNCATION_MARKER: &str = "\n\n[Text truncated due to length...]";

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("could not load PDF: {0}")]
    Load(lopdf::Error),

    #[error("could not extract text from page {page}: {source}")]
    Extract { page: u32, source: lopdf::Error },
}

/// Extract text content from raw PDF bytes.
///
/// Pages are joined by blank lines. Output over [`MAX_TEXT_CHARS`] is cut
/// there and marked as truncated.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let doc = Document::load_mem(bytes).map_err(PdfError::Load)?;

    let mut parts = Vec::new();
    for (page_num, _page_id) in doc.get_pages() {
        let text = doc
            .extract_text(&[page_num])
            .map_err(|source| PdfError::Extract {
                page: page_num,
                source,
            })?;
        if !text.trim().is_empty() {
            parts.push(text.trim().to_string());
        }
    }

    Ok(assemble(&parts))
}

fn assemble(parts: &[String]) -> String {
    let full = parts.join("\n\n");
    if full.chars().count() <= MAX_TEXT_CHARS {
        return full;
    }
    let mut truncated: String = full.chars().take(MAX_TEXT_CHARS).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}


#[cfg(test)]
mod tests {
    use super::testdata::pdf_with_pages;
    use super::*;

    #[test]
    fn extracts_pages_joined_by_blank_lines() {
        let bytes = pdf_with_pages(&["The Annales school", "rejected event-driven history"]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("The Annales school"));
        assert!(text.contains("rejected event-driven history"));
        assert!(text.contains("\n\n"));
    }

    #[test]
    fn skips_pages_without_text() {
        let bytes = pdf_with_pages(&["", "only this page has text", ""]);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "only this page has text");
    }

    #[test]
    fn all_empty_pages_yield_empty_string() {
        let bytes = pdf_with_pages(&["", ""]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn corrupt_bytes_are_an_error() {
        let result = extract_text(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Load(_))));
    }

    #[test]
    fn assemble_truncates_at_ceiling() {
        let long = "x".repeat(MAX_TEXT_CHARS + 50);
        let out = assemble(&[long]);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            out.chars().count(),
            MAX_TEXT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn assemble_leaves_short_text_alone() {
        let out = assemble(&["page one".to_string(), "page two".to_string()]);
        assert_eq!(out, "page one\n\npage two");
    }
}
