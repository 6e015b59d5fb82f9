//! Crate-wide error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, resolving, and rendering site content
#[derive(Error, Debug)]
pub enum SiteError {
    /// The metadata table has no entry for the requested slug.
    #[error("no post registered for slug '{slug}'")]
    PostNotFound { slug: String },

    /// Fetched content failed to parse as a notebook document. The document
    /// is abandoned whole; partial notebooks are never rendered.
    #[error("notebook '{name}' is malformed: {source}")]
    MalformedNotebook {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A section page or the metadata table failed to parse. These are build
    /// inputs, so generation stops.
    #[error("content file '{name}' is malformed: {source}")]
    MalformedContent {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata table parsed but violates its own invariants
    /// (duplicate slug, unmapped post, malformed slug).
    #[error("metadata table is invalid: {0}")]
    MetadataInvalid(String),

    /// Content references an asset that is not present in the assets
    /// directory. Raised at build time, never at serve time.
    #[error("asset '{path}' referenced by content but missing from {assets_dir:?}")]
    UnresolvedAsset { path: String, assets_dir: PathBuf },

    /// A one-shot content fetch failed. There is no retry policy; callers
    /// surface this as a visible "content unavailable" state.
    #[error("failed to fetch '{name}': {source}")]
    Fetch {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
