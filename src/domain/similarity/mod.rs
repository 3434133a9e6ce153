//! Similarity index - linear cosine scan over an ordered candidate set
//!
//! Both the classification cache and the response memory pick their best
//! candidate through [`best_match`], so the tie-break (first candidate in
//! sequence order wins) is the same everywhere.

/// A fixed-length embedding vector
pub type Vector = Vec<f32>;

/// Calculate cosine similarity between two vectors
///
/// Mismatched dimensions, empty vectors and zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Best scoring candidate of a scan
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch<K> {
    pub key: K,
    pub score: f32,
}

/// Scan `candidates` in order and return the one most similar to `query`
///
/// Returns `None` for an empty candidate set. On equal scores the earliest
/// candidate is kept.
pub fn best_match<'a, K, I>(query: &[f32], candidates: I) -> Option<BestMatch<K>>
where
    I: IntoIterator<Item = (K, &'a [f32])>,
{
    let mut best: Option<BestMatch<K>> = None;

    for (key, vector) in candidates {
        let score = cosine_similarity(query, vector);

        match &best {
            Some(current) if score <= current.score => {}
            _ => best = Some(BestMatch { key, score }),
        }
    }

    best
}

/// Inclusive threshold check shared by every fuzzy lookup
pub fn meets_threshold(score: f32, threshold: f32) -> bool {
    score >= threshold
}
