//! Blog post metadata table
//!
//! `blog/metadata.json` is the single source of truth for which posts exist:
//! a `slugs` map from slug to notebook file, plus a `posts` array carrying
//! the display metadata for the blog index. The `posts` order is the index
//! display order; nothing re-sorts at render time.

use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::SiteError;

fn slug_pattern() -> &'static Regex {
    static SLUG_RE: OnceLock<Regex> = OnceLock::new();
    SLUG_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap())
}

/// Display metadata for a single blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    /// URL-safe identifier, unique across the site
    pub slug: String,
    pub title: String,
    /// Publication date (YYYY-MM-DD)
    pub publish_date: NaiveDate,
    #[serde(default)]
    pub summary: String,
    /// Notebook file the post is rendered from, relative to the blog
    /// directory
    pub notebook: String,
}

/// The blog metadata table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataTable {
    /// Slug to notebook file, in publication order
    #[serde(default)]
    pub slugs: IndexMap<String, String>,
    /// Post display metadata, in display order (newest first)
    #[serde(default)]
    pub posts: Vec<PostSummary>,
}

impl MetadataTable {
    /// Parse the metadata table from raw JSON
    pub fn parse(raw: &str) -> Result<Self, SiteError> {
        let table: MetadataTable =
            serde_json::from_str(raw).map_err(|source| SiteError::MalformedContent {
                name: "metadata.json".to_string(),
                source,
            })?;
        table.validate()?;
        Ok(table)
    }

    /// Check the table's structural invariants: well-formed unique slugs,
    /// and every listed post mapped to the notebook the slugs table names.
    pub fn validate(&self) -> Result<(), SiteError> {
        for slug in self.slugs.keys() {
            if !slug_pattern().is_match(slug) {
                return Err(SiteError::MetadataInvalid(format!(
                    "slug '{}' contains characters that cannot appear in a URL path",
                    slug
                )));
            }
        }

        let mut seen = IndexMap::new();
        for post in &self.posts {
            if seen.insert(post.slug.as_str(), ()).is_some() {
                return Err(SiteError::MetadataInvalid(format!(
                    "slug '{}' is listed more than once",
                    post.slug
                )));
            }
            match self.slugs.get(&post.slug) {
                None => {
                    return Err(SiteError::MetadataInvalid(format!(
                        "post '{}' has no entry in the slugs table",
                        post.slug
                    )));
                }
                Some(notebook) if notebook != &post.notebook => {
                    return Err(SiteError::MetadataInvalid(format!(
                        "post '{}' maps to '{}' but the slugs table says '{}'",
                        post.slug, post.notebook, notebook
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Notebook file for a slug, if the slug is registered
    pub fn notebook_for(&self, slug: &str) -> Option<&str> {
        self.slugs.get(slug).map(|s| s.as_str())
    }

    /// Display metadata for a slug, if the post is listed
    pub fn summary_for(&self, slug: &str) -> Option<&PostSummary> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Build a table from per-post sidecar summaries. Posts are ordered
    /// newest first; ties keep their scan order.
    pub fn from_sidecars(mut summaries: Vec<PostSummary>) -> Result<Self, SiteError> {
        summaries.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

        let mut slugs = IndexMap::new();
        for post in &summaries {
            if slugs.insert(post.slug.clone(), post.notebook.clone()).is_some() {
                return Err(SiteError::MetadataInvalid(format!(
                    "slug '{}' is claimed by more than one post",
                    post.slug
                )));
            }
        }

        let table = MetadataTable {
            slugs,
            posts: summaries,
        };
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(slug: &str, date: &str) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            publish_date: date.parse().unwrap(),
            summary: String::new(),
            notebook: format!("{}.ipynb", slug),
        }
    }

    #[test]
    fn test_parse_preserves_slug_order() {
        let raw = r#"{
            "slugs": {
                "newest": "newest.ipynb",
                "middle": "middle.ipynb",
                "oldest": "oldest.ipynb"
            },
            "posts": [
                {
                    "slug": "newest",
                    "title": "Newest",
                    "publish_date": "2021-03-01",
                    "summary": "",
                    "notebook": "newest.ipynb"
                }
            ]
        }"#;

        let table = MetadataTable::parse(raw).unwrap();
        let order: Vec<&str> = table.slugs.keys().map(|s| s.as_str()).collect();
        assert_eq!(order, vec!["newest", "middle", "oldest"]);
        assert_eq!(table.notebook_for("middle"), Some("middle.ipynb"));
        assert_eq!(table.notebook_for("unknown"), None);
    }

    #[test]
    fn test_from_sidecars_sorts_newest_first() {
        let table = MetadataTable::from_sidecars(vec![
            summary("oldest", "2019-01-15"),
            summary("newest", "2021-03-01"),
            summary("middle", "2020-06-10"),
        ])
        .unwrap();

        let order: Vec<&str> = table.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["newest", "middle", "oldest"]);
        // The slugs map follows the same order
        let slugs: Vec<&str> = table.slugs.keys().map(|s| s.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_from_sidecars_equal_dates_keep_scan_order() {
        let table = MetadataTable::from_sidecars(vec![
            summary("first", "2020-06-10"),
            summary("second", "2020-06-10"),
        ])
        .unwrap();

        let order: Vec<&str> = table.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let err = MetadataTable::from_sidecars(vec![
            summary("dup", "2020-01-01"),
            summary("dup", "2021-01-01"),
        ])
        .unwrap_err();
        assert!(matches!(err, SiteError::MetadataInvalid(_)));
    }

    #[test]
    fn test_post_without_slug_entry_rejected() {
        let raw = r#"{
            "slugs": {},
            "posts": [
                {
                    "slug": "ghost",
                    "title": "Ghost",
                    "publish_date": "2020-01-01",
                    "notebook": "ghost.ipynb"
                }
            ]
        }"#;
        let err = MetadataTable::parse(raw).unwrap_err();
        assert!(matches!(err, SiteError::MetadataInvalid(_)));
    }

    #[test]
    fn test_malformed_slug_rejected() {
        let raw = r#"{
            "slugs": { "bad slug!": "x.ipynb" },
            "posts": []
        }"#;
        let err = MetadataTable::parse(raw).unwrap_err();
        assert!(matches!(err, SiteError::MetadataInvalid(_)));
    }

    #[test]
    fn test_mismatched_notebook_rejected() {
        let raw = r#"{
            "slugs": { "post": "a.ipynb" },
            "posts": [
                {
                    "slug": "post",
                    "title": "Post",
                    "publish_date": "2020-01-01",
                    "notebook": "b.ipynb"
                }
            ]
        }"#;
        let err = MetadataTable::parse(raw).unwrap_err();
        assert!(matches!(err, SiteError::MetadataInvalid(_)));
    }
}
