//! Lexical Similarity: TF-IDF vectors and cosine similarity over one ranking call.
//!
//! IDF is computed from the query and the candidates of the current call only, so
//! scores are comparable within a call but not across calls.
//!
//! Weighting: raw term frequency × smoothed IDF `ln((1 + n) / (1 + df)) + 1`, stop words
//! removed, vectors L2-normalized. Vectors are `BTreeMap`s so every sum runs in term
//! order and repeated calls give bit-identical scores.

use std::collections::BTreeMap;

use crate::extraction::normalize::significant_words;

type TermVector = BTreeMap<String, f64>;

pub struct LexicalCorpus {
    vectors: Vec<TermVector>,
}

impl LexicalCorpus {
    /// Builds one unit vector per body, in input order.
    pub fn build(bodies: &[&str]) -> Self {
        let counts: Vec<BTreeMap<String, usize>> = bodies
            .iter()
            .map(|body| {
                let mut tf = BTreeMap::new();
                for word in significant_words(body) {
                    *tf.entry(word).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = bodies.len() as f64;
        let idf = |term: &str| {
            let df = df.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        };

        let vectors = counts
            .iter()
            .map(|tf| {
                let mut vector: TermVector = tf
                    .iter()
                    .map(|(term, &count)| (term.clone(), count as f64 * idf(term.as_str())))
                    .collect();
                let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    vector.values_mut().for_each(|w| *w /= norm);
                }
                vector
            })
            .collect();

        Self { vectors }
    }

    /// Cosine similarity of documents `a` and `b`, in [0, 1]. Out-of-range indices and
    /// empty vectors score 0.
    pub fn similarity(&self, a: usize, b: usize) -> f64 {
        match (self.vectors.get(a), self.vectors.get(b)) {
            (Some(va), Some(vb)) => cosine(va, vb),
            _ => 0.0,
        }
    }
}

/// Dot product of two unit vectors, iterating `a` in term order.
fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    dot.clamp(0.0, 1.0)
}
