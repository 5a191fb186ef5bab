//! DOCX extractor

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::domain::ingestion::{ExtractedPage, TextExtractor};
use crate::domain::DomainError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads paragraph text from the main document part of a DOCX package
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    fn document_xml(&self, bytes: &[u8]) -> Result<String, DomainError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DomainError::extraction(self.name(), format!("Invalid archive: {}", e)))?;

        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| {
            DomainError::extraction(self.name(), format!("Missing {}: {}", DOCUMENT_PART, e))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| DomainError::extraction(self.name(), format!("Unreadable {}: {}", DOCUMENT_PART, e)))?;

        Ok(xml)
    }

    fn paragraphs(&self, xml: &str) -> Result<Vec<String>, DomainError> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"w:p" => current.clear(),
                    b"w:t" => in_text_run = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                    b"w:t" => in_text_run = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:p" => paragraphs.push(String::new()),
                    b"w:tab" => current.push('\t'),
                    b"w:br" | b"w:cr" => current.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(t)) if in_text_run => {
                    let text = t.unescape().map_err(|e| {
                        DomainError::extraction(self.name(), format!("Bad text node: {}", e))
                    })?;
                    current.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(DomainError::extraction(
                        self.name(),
                        format!("Malformed XML at {}: {}", reader.buffer_position(), e),
                    ));
                }
            }
        }

        Ok(paragraphs)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        let xml = self.document_xml(bytes)?;
        let paragraphs = self.paragraphs(&xml)?;

        Ok(vec![ExtractedPage::new(0, paragraphs.join("\n"))])
    }

    fn name(&self) -> &'static str {
        "docx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_paragraphs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Termination</w:t></w:r><w:r><w:t xml:space="preserve"> clause</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Notice &amp; cure</w:t><w:tab/><w:t>30 days</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let pages = DocxExtractor.extract(&docx(xml)).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].content, "Termination clause\n\nNotice & cure\t30 days");
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let error = DocxExtractor.extract(&bytes).unwrap_err();
        assert!(error.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(DocxExtractor.extract(b"plain text").is_err());
    }
}
