use rayon::prelude::*;

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude. Callers are expected
/// to pass vectors of equal dimensionality; the pipeline validates this
/// before any similarity computation.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// An undirected candidate edge in the similarity graph, `a < b`.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub similarity: f32,
}

/// Compute all pairwise similarities above `prefilter`.
///
/// The O(n^2) pair scan parallelizes over the first endpoint; the prefilter
/// bounds the candidate edge set before the clusterer sorts it.
pub fn candidate_edges(vectors: &[Vec<f32>], prefilter: f32) -> Vec<Edge> {
    let n = vectors.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            ((i + 1)..n).filter_map(move |j| {
                let similarity = cosine_similarity(&vectors[i], &vectors[j]);
                (similarity > prefilter).then_some(Edge { a: i, b: j, similarity })
            })
        })
        .collect()
}
