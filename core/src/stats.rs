use crate::corpus::Corpus;
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-document length norms used by ranked scoring: the Euclidean norm of
/// the document's log-weighted term-frequency vector,
/// sqrt(sum over distinct terms of (1 + log10(tf))^2).
///
/// Every document in the corpus has exactly one entry; the norm is 0 only
/// for an empty document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocStats {
    stem: bool,
    norms: BTreeMap<DocId, f32>,
}

impl DocStats {
    /// Compute length norms for every document in the corpus.
    pub fn compute(corpus: &Corpus, stem: bool) -> Self {
        let mut norms = BTreeMap::new();
        for doc in corpus.iter() {
            let mut tf: HashMap<String, u32> = HashMap::new();
            for token in tokenize(&doc.full_text(), stem) {
                *tf.entry(token).or_insert(0) += 1;
            }
            let sum: f32 = tf
                .values()
                .map(|&count| {
                    let ltf = 1.0 + (count as f32).log10();
                    ltf * ltf
                })
                .sum();
            norms.insert(doc.id, sum.sqrt());
        }
        Self { stem, norms }
    }

    /// Whether term frequencies were stemmed when the norms were computed.
    pub fn stem(&self) -> bool {
        self.stem
    }

    /// Length norm of a document, if known.
    pub fn norm(&self, id: DocId) -> Option<f32> {
        self.norms.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.norms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }
}
