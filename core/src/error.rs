use crate::DocId;
use thiserror::Error;

/// Errors surfaced by the engine. All query failures are synchronous and
/// deterministic: retrying with the same input cannot change the outcome.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing opening bracket '('")]
    UnmatchedClosingParen,

    #[error("missing closing bracket ')'")]
    UnmatchedOpeningParen,

    /// Boolean mode is strict: every unrecognized term is collected before
    /// the query is rejected.
    #[error("query contains unknown term(s): {}", .0.join(", "))]
    UnknownTerms(Vec<String>),

    #[error("query is not correct; add or remove 'AND'/'OR'/'NOT' operators")]
    MalformedQuery,

    #[error("index was built in frequency mode; positional data unavailable")]
    PositionsUnavailable,

    #[error("document id '{0}' is not a valid numeric id")]
    InvalidDocId(String),

    #[error("duplicate document id {0}")]
    DuplicateDocId(DocId),

    #[error("cached {0} failed to deserialize: {1}")]
    CacheCorrupt(&'static str, String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
