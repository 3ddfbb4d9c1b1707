use crate::corpus::Corpus;
use crate::error::SearchError;
use crate::index::{IndexMode, InvertedIndex};
use crate::stats::DocStats;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Sidecar describing a persisted store.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

/// Well-known file names of the index/stats cache under one root directory.
pub struct StorePaths {
    pub root: PathBuf,
}

impl StorePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    fn index(&self) -> PathBuf {
        self.root.join("indexfile.bin")
    }
    fn stats(&self) -> PathBuf {
        self.root.join("docstats.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

pub fn save_index(paths: &StorePaths, index: &InvertedIndex) -> Result<(), SearchError> {
    create_dir_all(&paths.root)?;
    let bytes =
        bincode::serialize(index).map_err(|e| SearchError::CacheCorrupt("index", e.to_string()))?;
    File::create(paths.index())?.write_all(&bytes)?;
    Ok(())
}

/// Load a cached index verbatim. A missing file surfaces as `Io(NotFound)`;
/// a file that fails structural parse is `CacheCorrupt`. Either way no
/// partial data is returned.
pub fn load_index(paths: &StorePaths) -> Result<InvertedIndex, SearchError> {
    let mut buf = Vec::new();
    File::open(paths.index())?.read_to_end(&mut buf)?;
    bincode::deserialize(&buf).map_err(|e| SearchError::CacheCorrupt("index", e.to_string()))
}

pub fn save_stats(paths: &StorePaths, stats: &DocStats) -> Result<(), SearchError> {
    create_dir_all(&paths.root)?;
    let bytes =
        bincode::serialize(stats).map_err(|e| SearchError::CacheCorrupt("stats", e.to_string()))?;
    File::create(paths.stats())?.write_all(&bytes)?;
    Ok(())
}

pub fn load_stats(paths: &StorePaths) -> Result<DocStats, SearchError> {
    let mut buf = Vec::new();
    File::open(paths.stats())?.read_to_end(&mut buf)?;
    bincode::deserialize(&buf).map_err(|e| SearchError::CacheCorrupt("stats", e.to_string()))
}

pub fn save_meta(paths: &StorePaths, meta: &MetaFile) -> Result<(), SearchError> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(meta)
        .map_err(|e| SearchError::CacheCorrupt("meta", e.to_string()))?;
    File::create(paths.meta())?.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &StorePaths) -> Result<MetaFile, SearchError> {
    let mut buf = String::new();
    File::open(paths.meta())?.read_to_string(&mut buf)?;
    serde_json::from_str(&buf).map_err(|e| SearchError::CacheCorrupt("meta", e.to_string()))
}

/// Return the cached index if one deserializes and matches the requested
/// mode and stemming, otherwise build from the corpus and persist the fresh
/// index. A corrupt cache degrades to a rebuild, never to partial data.
pub fn load_or_build_index(
    corpus: &Corpus,
    mode: IndexMode,
    stem: bool,
    paths: &StorePaths,
) -> Result<InvertedIndex, SearchError> {
    match load_index(paths) {
        Ok(index) if index.mode() == mode && index.stem() == stem => {
            tracing::info!(num_terms = index.term_count(), "loaded index from cache");
            return Ok(index);
        }
        Ok(_) => {
            tracing::warn!("cached index mode or stemming differs from requested; rebuilding")
        }
        Err(SearchError::Io(ref e)) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("index cache not found; building")
        }
        Err(SearchError::CacheCorrupt(what, reason)) => {
            tracing::warn!(what, %reason, "corrupt cache; rebuilding")
        }
        Err(e) => return Err(e),
    }
    let index = InvertedIndex::build(corpus, mode, stem);
    save_index(paths, &index)?;
    Ok(index)
}

/// Same degradation policy as `load_or_build_index`, for document length
/// norms.
pub fn load_or_build_stats(
    corpus: &Corpus,
    stem: bool,
    paths: &StorePaths,
) -> Result<DocStats, SearchError> {
    match load_stats(paths) {
        Ok(stats) if stats.stem() == stem => {
            tracing::info!(num_docs = stats.len(), "loaded stats from cache");
            return Ok(stats);
        }
        Ok(_) => tracing::warn!("cached stats stemming differs from requested; recomputing"),
        Err(SearchError::Io(ref e)) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("stats cache not found; computing")
        }
        Err(SearchError::CacheCorrupt(what, reason)) => {
            tracing::warn!(what, %reason, "corrupt cache; recomputing")
        }
        Err(e) => return Err(e),
    }
    let stats = DocStats::compute(corpus, stem);
    save_stats(paths, &stats)?;
    Ok(stats)
}
