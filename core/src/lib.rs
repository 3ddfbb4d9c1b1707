//! Small-collection full-text search engine: inverted index construction,
//! boolean retrieval over sorted postings, and ranked tf-idf cosine
//! retrieval. The index and stats are built once and read-only thereafter,
//! so concurrent queries need no locking.

pub mod boolean;
pub mod corpus;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod ranked;
pub mod stats;
pub mod tokenizer;

pub use corpus::{Corpus, Document};
pub use error::SearchError;
pub use index::{DocId, IndexMode, InvertedIndex, Posting};
pub use query::QueryToken;
pub use ranked::ScoredDoc;
pub use stats::DocStats;
