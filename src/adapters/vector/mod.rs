//! In-memory vector store. Cosine similarity, exact (brute-force) nearest neighbours.
//!
//! Catalogs are small (tens to hundreds of case studies), so a linear scan beats
//! maintaining an ANN structure.

/// Compute the cosine similarity between two equal-length vectors.
/// Returns 0.0 when either vector has zero norm or the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())) as f32
}

/// A stored vector's payload together with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a, T> {
    pub payload: &'a T,
    pub score: f32,
}

/// Append-only store of (vector, payload) pairs.
#[derive(Debug, Clone)]
pub struct MemoryVectorStore<T> {
    vectors: Vec<Vec<f32>>,
    payloads: Vec<T>,
}

impl<T> MemoryVectorStore<T> {
    pub fn new() -> Self {
        Self {
            vectors: Vec::new(),
            payloads: Vec::new(),
        }
    }

    pub fn insert(&mut self, vector: Vec<f32>, payload: T) {
        self.vectors.push(vector);
        self.payloads.push(payload);
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Up to `k` entries in descending similarity. Ties keep insertion order.
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<Neighbor<'_, T>> {
        if k == 0 || self.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| {
                // NaN (degenerate remote vectors) ranks below every real score.
                let score = cosine_similarity(v, query);
                (i, if score.is_nan() { f32::NEG_INFINITY } else { score })
            })
            .collect();
        // Stable sort: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(i, score)| Neighbor {
                payload: &self.payloads[i],
                score,
            })
            .collect()
    }
}

impl<T> Default for MemoryVectorStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
