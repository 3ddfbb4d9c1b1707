use crate::error::SearchError;
use crate::index::InvertedIndex;
use crate::query::QueryToken;
use crate::DocId;
use std::collections::HashSet;

/// Merge operation over two sorted postings id lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    And,
    Or,
}

/// Linear merge of two ascending doc id lists: intersection for AND, union
/// for OR. O(n+m) versus the naive O(n*m) scan, exploiting sorted storage.
/// The result stays sorted.
pub fn merge(a: &[DocId], b: &[DocId], op: MergeOp) -> Vec<DocId> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            if op == MergeOp::Or {
                out.push(a[i]);
            }
            i += 1;
        } else {
            if op == MergeOp::Or {
                out.push(b[j]);
            }
            j += 1;
        }
    }
    if op == MergeOp::Or {
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
    }
    out
}

/// Sorted complement of `set` against the full corpus universe.
pub fn complement(universe: &[DocId], set: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::new();
    let mut j = 0;
    for &id in universe {
        while j < set.len() && set[j] < id {
            j += 1;
        }
        if j >= set.len() || set[j] != id {
            out.push(id);
        }
    }
    out
}

/// Evaluate a postfix boolean query against the index in a single
/// left-to-right pass with an operand stack of sorted id lists.
///
/// Boolean mode is strict: every term absent from the index is collected and
/// the whole query rejected with `UnknownTerms`. Operator arity violations
/// and a final stack size other than one are `MalformedQuery`.
pub fn evaluate(
    index: &InvertedIndex,
    universe: &[DocId],
    rpn: &[QueryToken],
) -> Result<Vec<DocId>, SearchError> {
    let mut unknown: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for token in rpn {
        if let QueryToken::Term(term) = token {
            if !index.contains(term) && seen.insert(term) {
                unknown.push(term.clone());
            }
        }
    }
    if !unknown.is_empty() {
        return Err(SearchError::UnknownTerms(unknown));
    }

    let mut stack: Vec<Vec<DocId>> = Vec::new();
    for token in rpn {
        match token {
            QueryToken::Term(term) => {
                // Presence checked above.
                let posting = index.get(term).ok_or(SearchError::MalformedQuery)?;
                stack.push(posting.doc_ids());
            }
            QueryToken::And | QueryToken::Or => {
                let b = stack.pop().ok_or(SearchError::MalformedQuery)?;
                let a = stack.pop().ok_or(SearchError::MalformedQuery)?;
                let op = if matches!(token, QueryToken::And) {
                    MergeOp::And
                } else {
                    MergeOp::Or
                };
                stack.push(merge(&a, &b, op));
            }
            QueryToken::Not => {
                let set = stack.pop().ok_or(SearchError::MalformedQuery)?;
                stack.push(complement(universe, &set));
            }
        }
    }

    if stack.len() != 1 {
        return Err(SearchError::MalformedQuery);
    }
    Ok(stack.pop().unwrap_or_default())
}

/// One qualifying occurrence pair from a proximity intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMatch {
    pub doc_id: DocId,
    /// Offset of the first term's occurrence.
    pub first: u32,
    /// Offset of the second term's occurrence within distance k.
    pub second: u32,
}

/// Proximity intersection over positional postings: for each document in
/// both postings, emit every occurrence pair within absolute distance <= k
/// at distinct offsets. Bounded sliding-window scan per shared document.
///
/// No surface query syntax constructs this; it is the primitive for future
/// phrase-query support.
pub fn intersect_positional(
    p1: &[(DocId, Vec<u32>)],
    p2: &[(DocId, Vec<u32>)],
    k: u32,
) -> Vec<PositionMatch> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        let (id1, ref pos1) = p1[i];
        let (id2, ref pos2) = p2[j];
        if id1 == id2 {
            let mut start = 0;
            for &a in pos1 {
                // Slide the window to offsets >= a - k.
                while start < pos2.len() && pos2[start].saturating_add(k) < a {
                    start += 1;
                }
                let mut t = start;
                while t < pos2.len() && pos2[t] <= a.saturating_add(k) {
                    if pos2[t] != a {
                        out.push(PositionMatch {
                            doc_id: id1,
                            first: a,
                            second: pos2[t],
                        });
                    }
                    t += 1;
                }
            }
            i += 1;
            j += 1;
        } else if id1 < id2 {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Proximity lookup for two terms against a positional index. Strict about
/// unknown terms, like boolean evaluation; fails with
/// `PositionsUnavailable` on a frequency-mode index.
pub fn proximity(
    index: &InvertedIndex,
    first: &str,
    second: &str,
    k: u32,
) -> Result<Vec<PositionMatch>, SearchError> {
    let unknown: Vec<String> = [first, second]
        .iter()
        .filter(|t| !index.contains(t))
        .map(|t| t.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(SearchError::UnknownTerms(unknown));
    }
    let p1 = index
        .get(first)
        .and_then(|p| p.positions())
        .ok_or(SearchError::PositionsUnavailable)?;
    let p2 = index
        .get(second)
        .and_then(|p| p.positions())
        .ok_or(SearchError::PositionsUnavailable)?;
    Ok(intersect_positional(p1, p2, k))
}
