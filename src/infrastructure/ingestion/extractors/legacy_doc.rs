//! Legacy binary `.doc` extractor

use crate::domain::ingestion::{ExtractedPage, TextExtractor};
use crate::domain::DomainError;

/// Pulls runs of printable text out of an opaque binary file
///
/// Word 97-2003 documents store most body text as plain 8-bit or UTF-16LE
/// runs; both are recovered, shorter runs are treated as noise.
#[derive(Debug, Clone)]
pub struct PrintableRunExtractor {
    min_run: usize,
}

impl Default for PrintableRunExtractor {
    fn default() -> Self {
        Self { min_run: 4 }
    }
}

impl PrintableRunExtractor {
    pub fn new(min_run: usize) -> Self {
        Self { min_run }
    }

    fn is_text_byte(b: u8) -> bool {
        b.is_ascii_graphic() || b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
    }

    fn push_run(&self, runs: &mut Vec<String>, run: &mut String) {
        let trimmed = run.trim();
        if trimmed.chars().filter(|c| c.is_alphanumeric()).count() >= self.min_run {
            runs.push(trimmed.replace('\r', "\n"));
        }
        run.clear();
    }

    fn single_byte_runs(&self, bytes: &[u8]) -> Vec<String> {
        let mut runs = Vec::new();
        let mut run = String::new();

        for &b in bytes {
            if Self::is_text_byte(b) {
                run.push(b as char);
            } else {
                self.push_run(&mut runs, &mut run);
            }
        }
        self.push_run(&mut runs, &mut run);

        runs
    }

    fn utf16_runs(&self, bytes: &[u8]) -> Vec<String> {
        let mut runs = Vec::new();
        let mut run = String::new();

        for pair in bytes.chunks_exact(2) {
            if pair[1] == 0 && Self::is_text_byte(pair[0]) {
                run.push(pair[0] as char);
            } else {
                self.push_run(&mut runs, &mut run);
            }
        }
        self.push_run(&mut runs, &mut run);

        runs
    }
}

impl TextExtractor for PrintableRunExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedPage>, DomainError> {
        let narrow = self.single_byte_runs(bytes);
        let wide = self.utf16_runs(bytes);

        let narrow_len: usize = narrow.iter().map(String::len).sum();
        let wide_len: usize = wide.iter().map(String::len).sum();
        let runs = if wide_len > narrow_len { wide } else { narrow };

        Ok(vec![ExtractedPage::new(0, runs.join("\n"))])
    }

    fn name(&self) -> &'static str {
        "printable_runs"
    }
}
