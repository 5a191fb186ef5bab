//! PDF extraction strategies

use std::borrow::Cow;
use std::io::{Read, Write};

use pdf_oxide::PdfDocument;

use crate::domain::ingestion::{ExtractedPage, TextExtractor};
use crate::domain::DomainError;

/// Open the PDF from a temporary file and collect one string per page
fn extract_pages<F>(name: &'static str, bytes: &[u8], mut page_text: F) -> Result<Vec<ExtractedPage>, DomainError>
where
    F: FnMut(&mut PdfDocument, usize) -> Result<String, DomainError>,
{
    let mut file = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| DomainError::extraction(name, format!("Failed to create temp file: {}", e)))?;
    file.write_all(bytes)
        .map_err(|e| DomainError::extraction(name, format!("Failed to write temp file: {}", e)))?;

    let mut document = PdfDocument::open(file.path())
        .map_err(|e| DomainError::extraction(name, format!("Failed to open PDF: {}", e)))?;

    let page_count = document
        .page_count()
        .map_err(|e| DomainError::extraction(name, format!("Failed to count pages: {}", e)))?;

    (0..page_count)
        .map(|page| page_text(&mut document, page).map(|text| ExtractedPage::new(page, text)))
        .collect()
}

/// Structured text extraction, page by page
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        let name = self.name();

        extract_pages(name, bytes, |document, page| {
            document
                .extract_text(page)
                .map_err(|e| DomainError::extraction(name, format!("Page {}: {}", page, e)))
        })
    }

    fn name(&self) -> &'static str {
        "pdf_text"
    }
}

/// Layout-aware extraction through markdown conversion
///
/// Handles multi-column pages and tables that defeat plain text extraction.
#[derive(Debug, Clone, Default)]
pub struct PdfLayoutExtractor;

impl TextExtractor for PdfLayoutExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        let name = self.name();

        extract_pages(name, bytes, |document, page| {
            document
                .to_markdown(page, &Default::default())
                .map_err(|e| DomainError::extraction(name, format!("Page {}: {}", page, e)))
        })
    }

    fn name(&self) -> &'static str {
        "pdf_layout"
    }
}

/// Object-tree extraction with lopdf
///
/// Decodes filtered content streams and font encodings independently of
/// pdf_oxide, so it still reads files the first two strategies reject.
#[derive(Debug, Clone, Default)]
pub struct PdfObjectTreeExtractor;

impl TextExtractor for PdfObjectTreeExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        let name = self.name();

        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| DomainError::extraction(name, format!("Failed to load PDF: {}", e)))?;

        document
            .get_pages()
            .keys()
            .enumerate()
            .map(|(index, &page)| {
                document
                    .extract_text(&[page])
                    .map(|text| ExtractedPage::new(index, text))
                    .map_err(|e| DomainError::extraction(name, format!("Page {}: {}", page, e)))
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "pdf_object_tree"
    }
}

/// Last-resort scanner over raw content streams
///
/// Does not need a readable cross-reference table. FlateDecode streams are
/// inflated; streams with other filters are skipped. Collects literal strings
/// shown by `Tj`/`TJ`/`'`/`"` operators between `BT` and `ET`.
#[derive(Debug, Clone, Default)]
pub struct PdfContentStreamExtractor;

impl PdfContentStreamExtractor {
    /// Read a literal string starting after its opening parenthesis
    fn read_literal(bytes: &[u8], start: usize) -> (String, usize) {
        let mut out = String::new();
        let mut depth = 1;
        let mut i = start;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => {
                    i += 1;
                    match bytes[i] {
                        b'n' => out.push('\n'),
                        b'r' => out.push('\r'),
                        b't' => out.push('\t'),
                        b'(' | b')' | b'\\' => out.push(bytes[i] as char),
                        d @ b'0'..=b'7' => {
                            let mut value = (d - b'0') as u32;
                            let mut digits = 1;
                            while digits < 3 && i + 1 < bytes.len() && (b'0'..=b'7').contains(&bytes[i + 1]) {
                                i += 1;
                                value = value * 8 + (bytes[i] - b'0') as u32;
                                digits += 1;
                            }
                            if let Some(c) = char::from_u32(value) {
                                out.push(c);
                            }
                        }
                        _ => {}
                    }
                }
                b'(' => {
                    depth += 1;
                    out.push('(');
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return (out, i + 1);
                    }
                    out.push(')');
                }
                b => out.push(b as char),
            }
            i += 1;
        }

        (out, i)
    }

    fn is_keyword_at(bytes: &[u8], i: usize, keyword: &[u8]) -> bool {
        let end = i + keyword.len();
        let before_ok = i == 0 || bytes[i - 1].is_ascii_whitespace();
        let after_ok = end >= bytes.len() || bytes[end].is_ascii_whitespace();

        end <= bytes.len() && &bytes[i..end] == keyword && before_ok && after_ok
    }

    fn scan(bytes: &[u8]) -> String {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut in_text = false;
        let mut i = 0;

        while i < bytes.len() {
            if Self::is_keyword_at(bytes, i, b"BT") {
                in_text = true;
                i += 2;
                continue;
            }

            if Self::is_keyword_at(bytes, i, b"ET") {
                in_text = false;
                if !current.trim().is_empty() {
                    lines.push(current.trim().to_string());
                }
                current.clear();
                i += 2;
                continue;
            }

            if in_text && bytes[i] == b'(' {
                let (literal, next) = Self::read_literal(bytes, i + 1);
                current.push_str(&literal);
                i = next;
                continue;
            }

            if in_text && (Self::is_keyword_at(bytes, i, b"Td") || Self::is_keyword_at(bytes, i, b"T*")) {
                current.push(' ');
            }

            i += 1;
        }

        lines.join("\n")
    }
}

impl TextExtractor for PdfContentStreamExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(DomainError::extraction(self.name(), "Missing PDF header"));
        }

        let streams = content_streams(bytes);
        let text = if streams.is_empty() {
            Self::scan(bytes)
        } else {
            streams
                .iter()
                .map(|stream| Self::scan(stream))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        };

        Ok(vec![ExtractedPage::new(0, text)])
    }

    fn name(&self) -> &'static str {
        "pdf_content_stream"
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data).read_to_end(&mut out).ok()?;
    Some(out)
}

/// Body of every `stream ... endstream` block, inflated when FlateDecode
fn content_streams(bytes: &[u8]) -> Vec<Cow<'_, [u8]>> {
    let mut streams = Vec::new();
    let mut dict_start = 0;
    let mut cursor = 0;

    while let Some(keyword) = find(bytes, b"stream", cursor) {
        cursor = keyword + b"stream".len();

        if keyword >= 3 && &bytes[keyword - 3..keyword] == b"end" {
            dict_start = cursor;
            continue;
        }

        let mut data_start = cursor;
        if bytes.get(data_start) == Some(&b'\r') {
            data_start += 1;
        }
        if bytes.get(data_start) == Some(&b'\n') {
            data_start += 1;
        }

        let Some(data_end) = find(bytes, b"endstream", data_start) else {
            break;
        };

        let header = bytes[dict_start..keyword]
            .windows(3)
            .rposition(|w| w == b"obj")
            .map_or(dict_start, |p| dict_start + p);
        let dictionary = &bytes[header..keyword];
        let data = &bytes[data_start..data_end];

        if find(dictionary, b"/FlateDecode", 0).is_some() {
            if let Some(inflated) = inflate(data) {
                streams.push(Cow::Owned(inflated));
            }
        } else if find(dictionary, b"/Filter", 0).is_none() {
            streams.push(Cow::Borrowed(data));
        }

        cursor = data_end + b"endstream".len();
        dict_start = cursor;
    }

    streams
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Length 60 >>\nstream\nBT\n/F1 12 Tf\n72 712 Td\n(Deploy with docker) Tj\n0 -14 Td\n(compose \\(v2\\)) Tj\nET\nendstream\nendobj\n%%EOF";

    #[test]
    fn test_content_stream_scan() {
        let pages = PdfContentStreamExtractor.extract(SIMPLE_PDF).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].content.contains("Deploy with docker"));
        assert!(pages[0].content.contains("compose (v2)"));
    }

    #[test]
    fn test_content_stream_ignores_text_outside_blocks() {
        let pages = PdfContentStreamExtractor
            .extract(b"%PDF-1.7\n(Not shown) Tj\nBT (Shown) Tj ET")
            .unwrap();

        assert_eq!(pages[0].content, "Shown");
    }

    #[test]
    fn test_octal_escapes() {
        let (text, next) = PdfContentStreamExtractor::read_literal(b"caf\\351) rest", 0);
        assert_eq!(text, "caf\u{e9}");
        assert_eq!(next, 8);
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn flate_pdf(content: &[u8]) -> Vec<u8> {
        let compressed = deflate(content);
        let mut pdf = format!(
            "%PDF-1.5\n4 0 obj\n<< /Length {} /Filter /FlateDecode >>\nstream\n",
            compressed.len()
        )
        .into_bytes();
        pdf.extend_from_slice(&compressed);
        pdf.extend_from_slice(b"\nendstream\nendobj\n%%EOF");
        pdf
    }

    /// Single-page PDF with compressed streams, written by lopdf itself
    fn generated_pdf(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        // repeated lines so compress() actually deflates the content stream
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 712.into()]),
        ];
        for _ in 0..20 {
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
        }
        operations.push(Operation::new("ET", vec![]));
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_content_stream_inflates_flate_streams() {
        let pdf = flate_pdf(b"BT\n/F1 12 Tf\n72 712 Td\n(Rotate the TLS certificates) Tj\nET");

        let pages = PdfContentStreamExtractor.extract(&pdf).unwrap();

        assert_eq!(pages[0].content, "Rotate the TLS certificates");
    }

    #[test]
    fn test_content_stream_skips_unknown_filters() {
        let pdf = b"%PDF-1.5\n5 0 obj\n<< /Length 9 /Filter /DCTDecode >>\nstream\nBT (x) ET\nendstream\nendobj";

        let pages = PdfContentStreamExtractor.extract(pdf).unwrap();

        assert!(pages[0].is_blank());
    }

    #[test]
    fn test_object_tree_reads_compressed_pdf() {
        let pdf = generated_pdf("Quarterly maintenance window");

        let pages = PdfObjectTreeExtractor.extract(&pdf).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].content.contains("Quarterly maintenance window"));
    }

    #[test]
    fn test_content_stream_reads_generated_pdf() {
        let pdf = generated_pdf("Quarterly maintenance window");

        let pages = PdfContentStreamExtractor.extract(&pdf).unwrap();

        assert!(pages[0].content.contains("Quarterly maintenance window"));
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert!(PdfContentStreamExtractor.extract(b"hello").is_err());
    }

    #[test]
    fn test_structured_extractors_fail_on_garbage() {
        assert!(PdfTextExtractor.extract(b"not a pdf at all").is_err());
        assert!(PdfLayoutExtractor.extract(b"not a pdf at all").is_err());
        assert!(PdfObjectTreeExtractor.extract(b"not a pdf at all").is_err());
    }
}
