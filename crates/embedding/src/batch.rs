use tracing::{debug, warn};

use super::cache::EmbeddingCache;
use super::traits::Embedder;

/// Provider-imposed ceiling on texts per call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Result of embedding a list of texts in fixed-size batches.
///
/// A failed provider batch leaves its slots as `None` instead of aborting
/// the run; callers read `failed_batches` to decide whether to retry.
#[derive(Debug)]
pub struct BatchOutcome {
    /// One slot per input text, in input order.
    pub vectors: Vec<Option<Vec<f32>>>,
    /// Number of texts successfully embedded (cache hits included).
    pub embedded: usize,
    /// Number of provider batches that failed.
    pub failed_batches: usize,
}

/// Embed `texts` through `embedder` in sequential chunks of at most
/// `batch_size` (clamped to [`MAX_BATCH_SIZE`]), consulting and filling the
/// run-scoped cache.
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    cache: &mut EmbeddingCache,
    texts: &[String],
    batch_size: usize,
) -> BatchOutcome {
    let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
    let mut vectors: Vec<Option<Vec<f32>>> = vec![None; texts.len()];

    // Cache pass first so only misses hit the provider.
    let mut misses: Vec<usize> = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        match cache.get(text) {
            Some(vector) => vectors[i] = Some(vector),
            None => misses.push(i),
        }
    }

    debug!(
        total = texts.len(),
        cached = texts.len() - misses.len(),
        "embedding pass"
    );

    let mut failed_batches = 0usize;

    for chunk in misses.chunks(batch_size) {
        let batch_texts: Vec<&str> = chunk.iter().map(|&i| texts[i].as_str()).collect();
        match embedder.embed_batch(&batch_texts).await {
            Ok(embeddings) => {
                for (&i, vector) in chunk.iter().zip(embeddings) {
                    cache.put(&texts[i], vector.clone());
                    vectors[i] = Some(vector);
                }
            }
            Err(e) => {
                warn!(batch_len = chunk.len(), error = %e, "embedding batch failed");
                failed_batches += 1;
            }
        }
    }

    let embedded = vectors.iter().filter(|v| v.is_some()).count();

    BatchOutcome {
        vectors,
        embedded,
        failed_batches,
    }
}
