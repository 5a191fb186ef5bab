//! Local lexical search used when vector search is unavailable

use serde::{Deserialize, Serialize};

use crate::domain::knowledge::{no_content_for, NO_DOCUMENTS_UPLOADED};
use crate::domain::{Category, DocumentChunk, Scope};

const STOP_WORDS: [&str; 14] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Tunable constants of the lexical scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalScoring {
    /// Score for a query token occurring verbatim in the chunk text
    pub exact_match: f32,
    /// Score for a query token overlapping a chunk token as a substring
    pub partial_match: f32,
    /// Minimum score per query token for a chunk to qualify
    pub min_match_ratio: f32,
    /// Score given to chunks admitted by the lenient pass
    pub lenient_score: f32,
    /// Characters of each chunk shown in results
    pub snippet_chars: usize,
}

impl Default for LexicalScoring {
    fn default() -> Self {
        Self {
            exact_match: 1.0,
            partial_match: 0.5,
            min_match_ratio: 0.1,
            lenient_score: 0.1,
            snippet_chars: 500,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Lowercased query tokens with stop words and single characters removed
fn query_tokens(query_lower: &str) -> Vec<&str> {
    let all: Vec<&str> = query_lower.split_whitespace().collect();
    let filtered: Vec<&str> = all
        .iter()
        .copied()
        .filter(|t| !STOP_WORDS.contains(t) && char_len(t) > 1)
        .collect();

    if filtered.is_empty() { all } else { filtered }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChunkScore {
    score: f32,
    exact_matches: usize,
}

impl LexicalScoring {
    /// Exact means the token occurs anywhere in the lowercased chunk, so
    /// punctuation around a word does not demote it to a partial match
    fn score(&self, tokens: &[&str], chunk_lower: &str) -> ChunkScore {
        let chunk_tokens: Vec<&str> = chunk_lower.split_whitespace().collect();
        let mut result = ChunkScore {
            score: 0.0,
            exact_matches: 0,
        };

        for token in tokens {
            if chunk_lower.contains(token) {
                result.score += self.exact_match;
                result.exact_matches += 1;
                continue;
            }

            let partial = char_len(token) > 2
                && chunk_tokens.iter().any(|ct| {
                    char_len(ct) > 2 && (ct.contains(token) || token.contains(ct))
                });

            if partial {
                result.score += self.partial_match;
            }
        }

        result
    }

    fn render(&self, hits: &[(f32, &DocumentChunk)], top_k: usize) -> String {
        hits.iter()
            .take(top_k)
            .map(|(_, chunk)| {
                let snippet: String = chunk.text().chars().take(self.snippet_chars).collect();
                format!("From {}: {}", chunk.source(), snippet)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
            .trim()
            .to_string()
    }

    /// Rank `chunks` of `category` under `scope` against `query`
    pub fn search(
        &self,
        chunks: &[DocumentChunk],
        query: &str,
        category: Category,
        scope: &Scope,
        top_k: usize,
    ) -> String {
        if chunks.is_empty() {
            return NO_DOCUMENTS_UPLOADED.to_string();
        }

        let candidates: Vec<&DocumentChunk> = chunks
            .iter()
            .filter(|c| c.category() == category && c.scope() == scope.as_str())
            .collect();

        let query_lower = query.to_lowercase();
        let tokens = query_tokens(&query_lower);

        let mut hits: Vec<(f32, &DocumentChunk)> = candidates
            .iter()
            .filter_map(|&chunk| {
                let scored = self.score(&tokens, &chunk.text().to_lowercase());
                let ratio = if tokens.is_empty() {
                    0.0
                } else {
                    scored.score / tokens.len() as f32
                };

                (ratio >= self.min_match_ratio || scored.exact_matches > 0)
                    .then_some((scored.score, chunk))
            })
            .collect();

        if hits.is_empty() {
            let lenient_tokens: Vec<&str> = query_lower
                .split_whitespace()
                .filter(|t| char_len(t) > 2)
                .collect();

            hits = candidates
                .iter()
                .filter(|chunk| {
                    let lower = chunk.text().to_lowercase();
                    lenient_tokens.iter().any(|t| lower.contains(t))
                })
                .map(|&chunk| (self.lenient_score, chunk))
                .collect();
        }

        if hits.is_empty() {
            return no_content_for(category);
        }

        hits.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.render(&hits, top_k)
    }
}
