//! Rebuild the blog metadata table from sidecar files

use anyhow::Result;
use std::fs;

use crate::content::{MetadataTable, PostSummary};
use crate::error::SiteError;
use crate::Folio;

/// Scan the blog directory for `.meta` sidecars and write a fresh
/// `metadata.json` ordered newest first.
pub fn run(folio: &Folio) -> Result<()> {
    let blog_dir = folio.content_dir.join(&folio.config.blog_dir);

    let mut sidecars = Vec::new();
    for entry in fs::read_dir(&blog_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map(|ext| ext == "meta").unwrap_or(false) {
            sidecars.push(path);
        }
    }
    // Scan order breaks publish-date ties, so keep it deterministic
    sidecars.sort();

    let mut summaries = Vec::with_capacity(sidecars.len());
    for path in &sidecars {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let raw = fs::read_to_string(path)?;
        let summary: PostSummary = serde_json::from_str(&raw)
            .map_err(|source| SiteError::MalformedContent { name, source })?;
        tracing::debug!("Indexed sidecar: {}", path.display());
        summaries.push(summary);
    }

    let count = summaries.len();
    let table = MetadataTable::from_sidecars(summaries)?;

    let json = serde_json::to_string_pretty(&table)?;
    fs::write(blog_dir.join("metadata.json"), json)?;

    tracing::info!("Indexed {} posts into metadata.json", count);

    Ok(())
}
