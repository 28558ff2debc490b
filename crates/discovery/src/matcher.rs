use miner_core::{MatchMethod, MatchResult, MinerError};

use crate::algorithms::similarity::cosine_similarity;

/// Nearest-neighbor lookup against the canonical-intent embedding set.
///
/// Built once per run and reused for every cluster centroid and audit
/// query; the canonical registry is read-only reference data.
#[derive(Debug)]
pub struct CanonicalMatcher {
    ids: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
}

impl CanonicalMatcher {
    /// Build a matcher from `(intent_id, embedding)` pairs.
    ///
    /// Fails fast on mixed dimensionality; a silently truncated similarity
    /// score is worse than no score.
    pub fn new(entries: Vec<(String, Vec<f32>)>) -> Result<Self, MinerError> {
        let dimensions = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        for (_, vector) in &entries {
            if vector.len() != dimensions {
                return Err(MinerError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
        }
        let (ids, embeddings) = entries.into_iter().unzip();
        Ok(Self {
            ids,
            embeddings,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Canonical intent ids in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The single nearest canonical intent by cosine similarity.
    ///
    /// Returns the NONE sentinel with score 0 when the canonical set is
    /// empty (a valid, non-error state) and fails fast when the query
    /// dimensionality differs from the canonical embeddings.
    pub fn nearest(&self, query: &[f32]) -> Result<MatchResult, MinerError> {
        if self.is_empty() {
            return Ok(MatchResult::none());
        }
        if query.len() != self.dimensions {
            return Err(MinerError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut best_idx = 0;
        let mut best_score = f32::MIN;
        for (idx, embedding) in self.embeddings.iter().enumerate() {
            let score = cosine_similarity(query, embedding);
            if score > best_score {
                best_score = score;
                best_idx = idx;
            }
        }

        Ok(MatchResult {
            method: MatchMethod::Semantic,
            score: best_score,
            matched_intent_id: self.ids[best_idx].clone(),
        })
    }
}
