use fts_core::ranked::evaluate;
use fts_core::tokenizer::tokenize;
use fts_core::{Corpus, DocStats, Document, IndexMode, InvertedIndex};

fn doc(id: u32, text: &str) -> Document {
    Document {
        id,
        title: String::new(),
        content: text.to_string(),
    }
}

fn fixture() -> (Corpus, InvertedIndex, DocStats) {
    let corpus = Corpus::from_documents([
        doc(1, "cat sat"),
        doc(2, "dog sat"),
        doc(3, "cat dog sat"),
    ]);
    let index = InvertedIndex::build(&corpus, IndexMode::Frequency, false);
    let stats = DocStats::compute(&corpus, false);
    (corpus, index, stats)
}

fn query(raw: &str) -> Vec<String> {
    tokenize(raw, false)
}

#[test]
fn term_in_every_document_scores_zero_in_stable_order() {
    let (_, index, stats) = fixture();
    // df = N, so idf = ln(1) = 0; all scores are 0 and the order falls back
    // to first-computed (posting) order.
    let results = evaluate(&index, &stats, &query("sat"));
    let ids: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(results.iter().all(|r| r.score == 0.0));
}

#[test]
fn rarer_term_scores_matching_docs_positively() {
    let (_, index, stats) = fixture();
    let results = evaluate(&index, &stats, &query("cat"));
    let ids: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(results.iter().all(|r| r.score > 0.0));
    // Doc 1 is shorter, so its length norm boosts it above doc 3.
    assert!(results[0].score > results[1].score);
}

#[test]
fn unknown_terms_are_silently_dropped() {
    let (_, index, stats) = fixture();
    let with_unknown = evaluate(&index, &stats, &query("cat zzznotaword"));
    let without = evaluate(&index, &stats, &query("cat"));
    assert_eq!(with_unknown, without);
}

#[test]
fn all_unknown_terms_yield_empty_results() {
    let (_, index, stats) = fixture();
    assert!(evaluate(&index, &stats, &query("zzznotaword")).is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let (_, index, stats) = fixture();
    let q = query("cat dog sat");
    let first = evaluate(&index, &stats, &q);
    for _ in 0..5 {
        assert_eq!(evaluate(&index, &stats, &q), first);
    }
}

#[test]
fn raising_query_tf_never_lowers_scores() {
    let (_, index, stats) = fixture();
    let once = evaluate(&index, &stats, &query("cat dog"));
    let thrice = evaluate(&index, &stats, &query("cat cat cat dog"));
    // ltf is monotonic in tf, so repeating "cat" can only grow its share of
    // the unit query vector. Doc 1 matches "cat" alone, so its whole score
    // is that term's contribution and must not decrease.
    let score = |results: &[fts_core::ScoredDoc], id: u32| {
        results.iter().find(|r| r.doc_id == id).map(|r| r.score)
    };
    assert!(score(&thrice, 1).unwrap() >= score(&once, 1).unwrap() - 1e-6);
}

#[test]
fn zero_or_missing_length_norm_excludes_document() {
    // Index built over a corpus where doc 3 has text, stats computed over a
    // degenerate corpus where it is empty: the engine must drop doc 3 rather
    // than divide by zero.
    let indexed = Corpus::from_documents([doc(1, "cat sat"), doc(3, "cat")]);
    let degenerate = Corpus::from_documents([doc(1, "cat sat"), doc(3, "")]);
    let index = InvertedIndex::build(&indexed, IndexMode::Frequency, false);
    let stats = DocStats::compute(&degenerate, false);
    let results = evaluate(&index, &stats, &query("cat"));
    let ids: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn positional_index_ranks_identically_to_frequency() {
    let (corpus, index, stats) = fixture();
    let positional = InvertedIndex::build(&corpus, IndexMode::Positional, false);
    let q = query("cat dog");
    assert_eq!(evaluate(&index, &stats, &q), evaluate(&positional, &stats, &q));
}
