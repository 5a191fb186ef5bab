//! Recursive separator-based splitting strategy

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{ChunkingConfig, TextSplitter};
use crate::domain::DomainError;

/// Default separators, coarsest first; the empty separator cuts between graphemes
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splitter that tries each separator in turn, recursing into pieces that
/// are still too long, then greedily merges small pieces back together with
/// the configured overlap.
///
/// Lengths are measured in characters.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    separators: Vec<String>,
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self::with_separators(DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_separators(separators: Vec<String>) -> Self {
        Self { separators }
    }

    fn split_recursive(&self, text: &str, separators: &[String], config: &ChunkingConfig) -> Vec<String> {
        let (separator, remaining) = pick_separator(text, separators);
        let pieces = split_keeping_separator(text, separator);

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) < config.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(merge_pieces(&pending, config));
                pending.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, remaining, config));
            }
        }

        if !pending.is_empty() {
            chunks.extend(merge_pieces(&pending, config));
        }

        chunks
    }
}

/// First separator present in `text`, and the finer separators after it
fn pick_separator<'s>(text: &str, separators: &'s [String]) -> (&'s str, &'s [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }

        if text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[i + 1..]);
        }
    }

    match separators.last() {
        Some(last) => (last.as_str(), &[]),
        None => ("", &[]),
    }
}

/// Split on `separator`, keeping each separator at the start of the piece that follows it
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text.graphemes(true).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }

    pieces.push(&text[start..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join_trimmed(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Greedily merge pieces into chunks no longer than `chunk_size`, carrying
/// up to `chunk_overlap` characters of trailing pieces into the next chunk
fn merge_pieces(pieces: &[&str], config: &ChunkingConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &piece in pieces {
        let len = char_len(piece);

        if total + len > config.chunk_size && !window.is_empty() {
            if let Some(chunk) = join_trimmed(&window) {
                chunks.push(chunk);
            }

            while total > config.chunk_overlap || (total + len > config.chunk_size && total > 0) {
                match window.pop_front() {
                    Some(front) => total -= char_len(front),
                    None => break,
                }
            }
        }

        window.push_back(piece);
        total += len;
    }

    if let Some(chunk) = join_trimmed(&window) {
        chunks.push(chunk);
    }

    chunks
}

impl TextSplitter for RecursiveChunker {
    fn split(&self, text: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError> {
        config.validate()?;

        if text.trim().is_empty() {
            return Ok(vec![]);
        }

        Ok(self
            .split_recursive(text, &self.separators, config)
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect())
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str, size: usize, overlap: usize) -> Vec<String> {
        RecursiveChunker::new()
            .split(text, &ChunkingConfig::new(size, overlap))
            .unwrap()
    }

    #[test]
    fn test_empty_content() {
        assert!(split("", 1000, 200).is_empty());
        assert!(split(" \n\n ", 1000, 200).is_empty());
    }

    #[test]
    fn test_small_content_is_single_trimmed_chunk() {
        assert_eq!(split("  Small content\n", 1000, 200), vec!["Small content"]);
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.";
        let chunks = split(text, 30, 0);

        assert_eq!(
            chunks,
            vec![
                "First paragraph here.",
                "Second paragraph here.",
                "Third paragraph here."
            ]
        );
    }

    #[test]
    fn test_overlap_repeats_trailing_words() {
        let chunks = split("one two three four five six", 10, 5);

        assert_eq!(chunks, vec!["one two", "two three", "four five", "five six"]);
    }

    #[test]
    fn test_chunks_respect_size_and_cover_text() {
        let text = "Containers package an application with its dependencies. \
                    Docker builds images from a Dockerfile.\n\n\
                    Kubernetes schedules containers across nodes.\nServices expose pods.";
        let chunks = split(text, 40, 10);

        for chunk in &chunks {
            assert!(!chunk.trim().is_empty());
            assert!(chunk.chars().count() <= 40, "{:?}", chunk);
        }

        for word in text.split_whitespace() {
            assert!(chunks.iter().any(|c| c.contains(word)), "missing {}", word);
        }
    }

    #[test]
    fn test_hard_cut_without_separators() {
        let text = "x".repeat(25);
        let chunks = split(&text, 10, 0);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundaries() {
        let text = "é".repeat(15);
        let chunks = split(&text, 10, 2);

        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = RecursiveChunker::new().split("text", &ChunkingConfig::new(10, 10));
        assert!(result.is_err());
    }

    #[test]
    fn test_same_text_same_chunks() {
        let text = "alpha beta gamma delta ".repeat(100);
        assert_eq!(split(&text, 100, 20), split(&text, 100, 20));
    }

    #[test]
    fn test_name() {
        assert_eq!(RecursiveChunker::new().name(), "recursive");
    }
}
