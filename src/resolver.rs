//! Blog post resolution - slug to parsed notebook document
//!
//! Resolution is metadata-first: the slug is checked against the metadata
//! table before anything is fetched, so an unknown slug costs no I/O. A
//! successful lookup fetches the mapped notebook through the content store
//! and parses it whole.

use std::sync::Arc;

use crate::content::{ContentStore, MetadataTable};
use crate::error::SiteError;
use crate::notebook::NotebookDocument;

/// Load lifecycle of an asynchronously fetched document.
///
/// A load starts at `Loading` and ends at exactly one of `Loaded` or
/// `Failed`. Views render every state: an interim empty state for
/// `Loading`, content for `Loaded`, and a visible error for `Failed`.
#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(SiteError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }
}

/// Resolves slugs to notebook documents through the metadata table and an
/// injected content store
pub struct PostResolver {
    table: MetadataTable,
    store: Arc<dyn ContentStore>,
    blog_dir: String,
}

impl PostResolver {
    pub fn new(table: MetadataTable, store: Arc<dyn ContentStore>, blog_dir: impl Into<String>) -> Self {
        Self {
            table,
            store,
            blog_dir: blog_dir.into(),
        }
    }

    pub fn table(&self) -> &MetadataTable {
        &self.table
    }

    /// Metadata lookup only; never touches the store
    pub fn lookup(&self, slug: &str) -> Result<&str, SiteError> {
        self.table
            .notebook_for(slug)
            .ok_or_else(|| SiteError::PostNotFound {
                slug: slug.to_string(),
            })
    }

    /// One-shot load of the post behind a slug.
    ///
    /// An unknown slug fails before any fetch. A fetch or parse failure
    /// produces `Failed` and never partial content. Dropping the returned
    /// future cancels the load; no state is retained anywhere.
    pub async fn load(&self, slug: &str) -> LoadState<NotebookDocument> {
        let notebook = match self.lookup(slug) {
            Ok(notebook) => notebook.to_string(),
            Err(err) => return LoadState::Failed(err),
        };

        let name = format!("{}/{}", self.blog_dir, notebook);
        let raw = match self.store.fetch(&name).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Failed to fetch notebook for slug '{}': {}", slug, err);
                return LoadState::Failed(err);
            }
        };

        match NotebookDocument::parse(&notebook, &raw) {
            Ok(document) => LoadState::Loaded(document),
            Err(err) => {
                tracing::warn!("Notebook for slug '{}' failed to parse: {}", slug, err);
                LoadState::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryStore;
    use async_trait::async_trait;

    /// Store that panics on any fetch; proves resolution never touches the
    /// store for unknown slugs.
    struct NoFetchStore;

    #[async_trait]
    impl ContentStore for NoFetchStore {
        async fn fetch(&self, name: &str) -> Result<String, SiteError> {
            panic!("unexpected fetch of '{}'", name);
        }
    }

    fn table_with(slug: &str, notebook: &str) -> MetadataTable {
        let raw = format!(
            r#"{{ "slugs": {{ "{}": "{}" }}, "posts": [] }}"#,
            slug, notebook
        );
        MetadataTable::parse(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_load_known_slug() {
        let mut store = MemoryStore::new();
        store.insert(
            "blog/intro.ipynb",
            r##"{ "cells": [ { "cell_type": "markdown", "source": "# Hi" } ] }"##,
        );

        let resolver = PostResolver::new(table_with("intro", "intro.ipynb"), Arc::new(store), "blog");
        let state = resolver.load("intro").await;
        match state {
            LoadState::Loaded(doc) => assert_eq!(doc.cells.len(), 1),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_slug_fails_without_fetching() {
        let resolver = PostResolver::new(
            table_with("intro", "intro.ipynb"),
            Arc::new(NoFetchStore),
            "blog",
        );

        let state = resolver.load("missing").await;
        match state {
            LoadState::Failed(SiteError::PostNotFound { slug }) => assert_eq!(slug, "missing"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_failed_state() {
        let resolver = PostResolver::new(
            table_with("intro", "intro.ipynb"),
            Arc::new(MemoryStore::new()),
            "blog",
        );

        let state = resolver.load("intro").await;
        assert!(matches!(state, LoadState::Failed(SiteError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_malformed_notebook_is_failed_state() {
        let mut store = MemoryStore::new();
        store.insert("blog/intro.ipynb", "{ not json");

        let resolver = PostResolver::new(table_with("intro", "intro.ipynb"), Arc::new(store), "blog");
        let state = resolver.load("intro").await;
        assert!(matches!(
            state,
            LoadState::Failed(SiteError::MalformedNotebook { .. })
        ));
        assert!(!state.is_loaded());
    }
}
