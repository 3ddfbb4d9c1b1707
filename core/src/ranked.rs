use crate::index::InvertedIndex;
use crate::stats::DocStats;
use crate::DocId;
use std::collections::HashMap;

/// One ranked hit. Results are ordered by strictly descending score; ties
/// keep the order their scores were first accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f32,
}

/// Score accumulator that preserves first-touch order, so that the final
/// stable sort is deterministic across runs.
#[derive(Default)]
struct Accumulator {
    scores: Vec<(DocId, f32)>,
    slots: HashMap<DocId, usize>,
}

impl Accumulator {
    fn add(&mut self, doc_id: DocId, contrib: f32) {
        match self.slots.get(&doc_id) {
            Some(&slot) => self.scores[slot].1 += contrib,
            None => {
                self.slots.insert(doc_id, self.scores.len());
                self.scores.push((doc_id, contrib));
            }
        }
    }
}

/// Rank documents for a query by tf-idf cosine similarity.
///
/// Query terms must already be normalized. Unknown terms are silently
/// dropped: ranked mode tolerates partial vocabulary coverage. The weighting
/// is deliberately asymmetric: the query side is log-tf * idf and normalized
/// to unit length, the document side is log-tf only, with the accumulated
/// score divided by the document's length norm. Documents never touched by a
/// query term are absent from the result; so are documents with a zero or
/// missing length norm.
pub fn evaluate(index: &InvertedIndex, stats: &DocStats, query_terms: &[String]) -> Vec<ScoredDoc> {
    // Raw query term frequencies, in first-appearance order.
    let mut terms: Vec<(String, u32)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for term in query_terms {
        match slots.get(term.as_str()) {
            Some(&slot) => terms[slot].1 += 1,
            None => {
                slots.insert(term, terms.len());
                terms.push((term.clone(), 1));
            }
        }
    }

    // Query-side weights: (1 + log10(tf)) * ln(N / df), unknown terms dropped.
    let n = index.num_docs() as f32;
    let mut weights: Vec<(&str, f32)> = Vec::new();
    for (term, tf) in &terms {
        if let Some(posting) = index.get(term) {
            let ltf = 1.0 + (*tf as f32).log10();
            let idf = (n / posting.doc_count() as f32).ln();
            weights.push((term.as_str(), ltf * idf));
        }
    }

    // Normalize to a unit query vector; an all-zero vector stays as-is.
    let norm: f32 = weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in weights.iter_mut() {
            *w /= norm;
        }
    }

    // Accumulate document-side log-tf contributions per posting.
    let mut acc = Accumulator::default();
    for (term, weight) in &weights {
        if let Some(posting) = index.get(term) {
            for (doc_id, tf) in posting.term_frequencies() {
                let dtf = 1.0 + (tf as f32).log10();
                acc.add(doc_id, weight * dtf);
            }
        }
    }

    // Length-normalize and sort, stable, by descending score.
    let mut results: Vec<ScoredDoc> = acc
        .scores
        .into_iter()
        .filter_map(|(doc_id, score)| match stats.norm(doc_id) {
            Some(norm) if norm > 0.0 => Some(ScoredDoc {
                doc_id,
                score: score / norm,
            }),
            _ => None,
        })
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results
}
