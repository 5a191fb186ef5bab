//! UTF-8 text extractor

use crate::domain::ingestion::{ExtractedPage, TextExtractor};
use crate::domain::DomainError;

/// Reads the whole file as one UTF-8 page
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DomainError::extraction(self.name(), format!("Invalid UTF-8: {}", e)))?;

        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        Ok(vec![ExtractedPage::new(0, text)])
    }

    fn name(&self) -> &'static str {
        "plain_text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_utf8() {
        let pages = PlainTextExtractor.extract("Día uno".as_bytes()).unwrap();
        assert_eq!(pages, vec![ExtractedPage::new(0, "Día uno")]);
    }

    #[test]
    fn test_strips_bom() {
        let pages = PlainTextExtractor.extract(b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(pages[0].content, "hello");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert!(PlainTextExtractor.extract(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_empty_file_is_one_blank_page() {
        let pages = PlainTextExtractor.extract(b"").unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_blank());
    }
}
