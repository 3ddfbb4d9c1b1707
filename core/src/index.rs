use crate::corpus::Corpus;
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Numeric document id. Collection files carry ids as digit strings of
/// varying width; they are parsed once at the loader boundary so that every
/// ordering comparison here is numeric.
pub type DocId = u32;

/// Posting shape, chosen once when the index is built and fixed for its
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexMode {
    /// term -> (doc id, occurrence count)
    Frequency,
    /// term -> (doc id, 0-based token offsets in title+content stream)
    Positional,
}

/// Per-term record of which documents contain the term and how. Entries are
/// sorted by doc id; positional offset lists are strictly increasing by
/// construction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Posting {
    Frequency(Vec<(DocId, u32)>),
    Positional(Vec<(DocId, Vec<u32>)>),
}

impl Posting {
    /// Number of documents containing the term (document frequency).
    pub fn doc_count(&self) -> usize {
        match self {
            Posting::Frequency(entries) => entries.len(),
            Posting::Positional(entries) => entries.len(),
        }
    }

    /// Sorted doc ids of this posting, the operand pushed by the boolean
    /// evaluator.
    pub fn doc_ids(&self) -> Vec<DocId> {
        match self {
            Posting::Frequency(entries) => entries.iter().map(|(id, _)| *id).collect(),
            Posting::Positional(entries) => entries.iter().map(|(id, _)| *id).collect(),
        }
    }

    /// Sorted (doc id, term frequency) pairs. In positional form the
    /// frequency is the occurrence count.
    pub fn term_frequencies(&self) -> Vec<(DocId, u32)> {
        match self {
            Posting::Frequency(entries) => entries.clone(),
            Posting::Positional(entries) => entries
                .iter()
                .map(|(id, offsets)| (*id, offsets.len() as u32))
                .collect(),
        }
    }

    /// Occurrence offsets per document, if this posting carries them.
    pub fn positions(&self) -> Option<&[(DocId, Vec<u32>)]> {
        match self {
            Posting::Frequency(_) => None,
            Posting::Positional(entries) => Some(entries),
        }
    }
}

/// Term -> posting map over the whole collection. Built once, read many
/// times, never mutated by queries; terms are kept in lexicographic order so
/// dumps are reproducible.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    mode: IndexMode,
    stem: bool,
    num_docs: u32,
    postings: BTreeMap<String, Posting>,
}

impl Default for IndexMode {
    fn default() -> Self {
        IndexMode::Frequency
    }
}

impl InvertedIndex {
    /// Build an index over the corpus in the given mode. An empty corpus
    /// yields an empty index.
    pub fn build(corpus: &Corpus, mode: IndexMode, stem: bool) -> Self {
        let start = Instant::now();
        let postings = match mode {
            IndexMode::Frequency => build_frequency(corpus, stem),
            IndexMode::Positional => build_positional(corpus, stem),
        };
        let index = Self {
            mode,
            stem,
            num_docs: corpus.len() as u32,
            postings,
        };
        tracing::info!(
            num_docs = index.num_docs,
            num_terms = index.term_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "index built"
        );
        index
    }

    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    /// Whether terms were stemmed at build time. Query operands must be
    /// normalized with the same flag or lookups hit the wrong vocabulary.
    pub fn stem(&self) -> bool {
        self.stem
    }

    /// Number of documents the index was built over.
    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<&Posting> {
        self.postings.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &Posting)> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p))
    }
}

fn build_frequency(corpus: &Corpus, stem: bool) -> BTreeMap<String, Posting> {
    let mut acc: BTreeMap<String, BTreeMap<DocId, u32>> = BTreeMap::new();
    for doc in corpus.iter() {
        for token in tokenize(&doc.full_text(), stem) {
            *acc.entry(token).or_default().entry(doc.id).or_insert(0) += 1;
        }
    }
    acc.into_iter()
        .map(|(term, by_doc)| (term, Posting::Frequency(by_doc.into_iter().collect())))
        .collect()
}

fn build_positional(corpus: &Corpus, stem: bool) -> BTreeMap<String, Posting> {
    let mut acc: BTreeMap<String, BTreeMap<DocId, Vec<u32>>> = BTreeMap::new();
    for doc in corpus.iter() {
        for (pos, token) in tokenize(&doc.full_text(), stem).into_iter().enumerate() {
            acc.entry(token)
                .or_default()
                .entry(doc.id)
                .or_default()
                .push(pos as u32);
        }
    }
    acc.into_iter()
        .map(|(term, by_doc)| (term, Posting::Positional(by_doc.into_iter().collect())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn tiny_corpus() -> Corpus {
        Corpus::from_documents([
            Document { id: 1, title: "cat".into(), content: "cat sat".into() },
            Document { id: 2, title: "dog".into(), content: "sat".into() },
        ])
    }

    #[test]
    fn frequency_counts_occurrences() {
        let index = InvertedIndex::build(&tiny_corpus(), IndexMode::Frequency, false);
        assert_eq!(
            index.get("cat").unwrap(),
            &Posting::Frequency(vec![(1, 2)])
        );
        assert_eq!(
            index.get("sat").unwrap(),
            &Posting::Frequency(vec![(1, 1), (2, 1)])
        );
    }

    #[test]
    fn positional_offsets_span_title_and_content() {
        let index = InvertedIndex::build(&tiny_corpus(), IndexMode::Positional, false);
        // doc 1 token stream: cat cat sat
        assert_eq!(
            index.get("cat").unwrap(),
            &Posting::Positional(vec![(1, vec![0, 1])])
        );
        assert_eq!(
            index.get("sat").unwrap(),
            &Posting::Positional(vec![(1, vec![2]), (2, vec![1])])
        );
    }

    #[test]
    fn empty_corpus_builds_empty_index() {
        let index = InvertedIndex::build(&Corpus::new(), IndexMode::Frequency, false);
        assert!(index.is_empty());
        assert_eq!(index.num_docs(), 0);
    }

    #[test]
    fn terms_iterate_lexicographically() {
        let index = InvertedIndex::build(&tiny_corpus(), IndexMode::Frequency, false);
        let terms: Vec<&str> = index.terms().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["cat", "dog", "sat"]);
    }
}
