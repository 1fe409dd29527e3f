//! An in-memory document store.
//!
//! The [`MemoryStore`] holds named collections of documents and evaluates
//! [`Filter`]s by scanning them. It backs the CLI, where collections are loaded
//! from a snapshot file, and the test suite.

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::Document,
    storage::{DocumentStore, Filter, RequestContext, StoreError},
};

/// Named collections of documents, held in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<Document>>,
}

/// Errors that can occur when loading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The file could not be read.
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        /// The snapshot path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid YAML of the expected shape.
    #[error("failed to parse snapshot {}: {source}", path.display())]
    Yaml {
        /// The snapshot path.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_yaml::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse snapshot {}: {source}", path.display())]
    Json {
        /// The snapshot path.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot file mapping collection names to document lists.
    ///
    /// Files ending in `.json` are read as JSON; anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let collections: BTreeMap<String, Vec<Document>> =
            if path.extension() == Some(OsStr::new("json")) {
                serde_json::from_str(&content).map_err(|source| SnapshotError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            } else {
                serde_yaml::from_str(&content).map_err(|source| SnapshotError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            };

        tracing::debug!(
            collections = collections.len(),
            documents = collections.values().map(Vec::len).sum::<usize>(),
            "loaded snapshot"
        );
        Ok(Self { collections })
    }

    /// Appends a document to a collection, creating the collection if needed.
    pub fn insert(&mut self, collection: impl Into<String>, document: Document) {
        self.collections
            .entry(collection.into())
            .or_default()
            .push(document);
    }

    /// Appends several documents to a collection.
    pub fn extend(
        &mut self,
        collection: impl Into<String>,
        documents: impl IntoIterator<Item = Document>,
    ) {
        self.collections
            .entry(collection.into())
            .or_default()
            .extend(documents);
    }

    /// The documents of a collection, in insertion order.
    #[must_use]
    pub fn collection(&self, name: &str) -> &[Document] {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    fn find(
        &self,
        ctx: &RequestContext,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        ctx.check()?;
        if let Some(condition) = filter.conditions().iter().find(|c| c.path().is_empty()) {
            return Err(StoreError::InvalidQuery {
                collection: collection.to_string(),
                reason: format!("condition {condition:?} has an empty field path"),
            });
        }

        Ok(self
            .collection(collection)
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect())
    }
}
