use crate::error::SearchError;
use crate::DocId;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

/// A single document of the collection. Immutable after loading; the corpus
/// is read-only for the lifetime of a process.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub content: String,
}

impl Document {
    /// Title and content joined with a separating boundary, the text stream
    /// the index builder tokenizes.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

/// The loaded document collection, keyed by numeric id. Ids in the source
/// files are digit strings of varying width; they are parsed at this boundary
/// so every later comparison is numeric.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    docs: BTreeMap<DocId, Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(docs: impl IntoIterator<Item = Document>) -> Self {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.insert(doc);
        }
        corpus
    }

    pub fn insert(&mut self, doc: Document) {
        self.docs.insert(doc.id, doc);
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.docs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }

    /// All document ids in ascending numeric order, the universe used for
    /// NOT complements.
    pub fn ids(&self) -> Vec<DocId> {
        self.docs.keys().copied().collect()
    }
}

lazy_static! {
    static ref DOC_HEADER: Regex = Regex::new(r"^Document[ ]+(\d+)").expect("valid regex");
    static ref BLANK: Regex = Regex::new(r"^[ ]*$").expect("valid regex");
    static ref RECORD_END: Regex = Regex::new(r"^\*{3,}").expect("valid regex");
}

/// Read every collection file under `dir` into a corpus.
///
/// Record format: a `Document NNN` header line, title lines up to the first
/// blank line, content lines up to a `***` terminator line. An id that does
/// not fit the numeric id type or repeats an already-loaded document rejects
/// the load with a typed error; no record is silently dropped.
pub fn read_corpus(dir: &Path) -> Result<Corpus, SearchError> {
    let mut corpus = Corpus::new();
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();

    for file in files {
        read_collection_file(&file, &mut corpus)?;
    }
    tracing::debug!(num_docs = corpus.len(), "corpus loaded");
    Ok(corpus)
}

fn read_collection_file(path: &Path, corpus: &mut Corpus) -> Result<(), SearchError> {
    let reader = BufReader::new(File::open(path)?);

    let mut doc_id: Option<DocId> = None;
    let mut title = String::new();
    let mut in_title = true;
    let mut buf = String::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(caps) = DOC_HEADER.captures(&line) {
            let id = caps[1]
                .parse::<DocId>()
                .map_err(|_| SearchError::InvalidDocId(caps[1].to_string()))?;
            doc_id = Some(id);
            title.clear();
            buf.clear();
            in_title = true;
        } else if RECORD_END.is_match(&line) {
            if let Some(id) = doc_id.take() {
                if corpus.get(id).is_some() {
                    return Err(SearchError::DuplicateDocId(id));
                }
                corpus.insert(Document {
                    id,
                    title: title.trim_end().to_string(),
                    content: buf.trim_end().to_string(),
                });
            }
            buf.clear();
            in_title = true;
        } else if in_title && BLANK.is_match(&line) {
            title = std::mem::take(&mut buf);
            in_title = false;
        } else {
            buf.push_str(&line);
            buf.push('\n');
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_record_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("COLL0.001")).unwrap();
        writeln!(f, "Document   12").unwrap();
        writeln!(f, "A title line").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "Body text here.").unwrap();
        writeln!(f, "More body.").unwrap();
        writeln!(f, "********************").unwrap();
        writeln!(f, "Document   205").unwrap();
        writeln!(f, "Second title").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "Second body.").unwrap();
        writeln!(f, "********************").unwrap();
        drop(f);

        let corpus = read_corpus(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(12).unwrap().title, "A title line");
        assert_eq!(corpus.get(205).unwrap().content, "Second body.");
    }

    #[test]
    fn duplicate_id_rejects_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("COLL0.001")).unwrap();
        for _ in 0..2 {
            writeln!(f, "Document 9").unwrap();
            writeln!(f, "Title").unwrap();
            writeln!(f).unwrap();
            writeln!(f, "Body.").unwrap();
            writeln!(f, "********************").unwrap();
        }
        drop(f);

        assert!(matches!(
            read_corpus(dir.path()),
            Err(SearchError::DuplicateDocId(9))
        ));
    }

    #[test]
    fn non_numeric_width_id_rejects_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("COLL0.001")).unwrap();
        // 99999999999 overflows the numeric id type.
        writeln!(f, "Document 99999999999").unwrap();
        writeln!(f, "Title").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "Body.").unwrap();
        writeln!(f, "********************").unwrap();
        drop(f);

        assert!(matches!(
            read_corpus(dir.path()),
            Err(SearchError::InvalidDocId(_))
        ));
    }

    #[test]
    fn ids_are_numerically_ordered() {
        let corpus = Corpus::from_documents([
            Document { id: 100, title: "a".into(), content: "".into() },
            Document { id: 7, title: "b".into(), content: "".into() },
            Document { id: 30, title: "c".into(), content: "".into() },
        ]);
        assert_eq!(corpus.ids(), vec![7, 30, 100]);
    }
}
