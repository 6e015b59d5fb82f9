//! Content store, read-only access to site content by logical name
//!
//! Rendering code never touches the filesystem directly. Everything goes
//! through a [`ContentStore`], so resolvers and renderers can be exercised
//! against an in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SiteError;

/// Read-only source of content documents, addressed by logical relative
/// name such as `home.json` or `blog/metadata.json`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the raw text of a content document.
    ///
    /// Fetches are one-shot: a miss or read failure is reported as
    /// [`SiteError::Fetch`] and callers do not retry.
    async fn fetch(&self, name: &str) -> Result<String, SiteError>;
}

/// Filesystem-backed store rooted at the site's content directory
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn fetch(&self, name: &str) -> Result<String, SiteError> {
        let path = self.root.join(name);
        tracing::debug!("Fetching content {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| SiteError::Fetch {
                name: name.to_string(),
                source,
            })
    }
}

/// In-memory store, used by tests and anywhere content is assembled
/// programmatically
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.entries.insert(name.into(), body.into());
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch(&self, name: &str) -> Result<String, SiteError> {
        self.entries.get(name).cloned().ok_or_else(|| SiteError::Fetch {
            name: name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such entry"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_fetch() {
        let mut store = MemoryStore::new();
        store.insert("home.json", "[]");

        let body = store.fetch("home.json").await.unwrap();
        assert_eq!(body, "[]");

        let missing = store.fetch("nope.json").await;
        assert!(matches!(missing, Err(SiteError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_fs_store_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("blog")).unwrap();
        std::fs::write(dir.path().join("blog/metadata.json"), "{}").unwrap();

        let store = FsContentStore::new(dir.path());
        let body = store.fetch("blog/metadata.json").await.unwrap();
        assert_eq!(body, "{}");

        let missing = store.fetch("blog/other.json").await;
        assert!(matches!(missing, Err(SiteError::Fetch { .. })));
    }
}
