//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub assets_dir: String,
    pub public_dir: String,
    pub blog_dir: String,

    // Content pages
    #[serde(default)]
    pub pages: PagesConfig,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub math: MathConfig,

    // Feed
    #[serde(default)]
    pub feed: FeedConfig,

    // Stylesheet path, relative to the assets directory
    pub stylesheet: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            assets_dir: "assets".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),

            pages: PagesConfig::default(),

            highlight: HighlightConfig::default(),
            math: MathConfig::default(),

            feed: FeedConfig::default(),

            stylesheet: "site.css".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Section page files, relative to the content directory.
/// Each names a JSON array of page sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    pub home: String,
    pub about: String,
    pub projects: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            home: "home.json".to_string(),
            about: "about.json".to_string(),
            projects: "projects.json".to_string(),
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
}

/// Math typesetting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub enable: bool,
    pub cdn: String,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enable: true,
            cdn: "https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.9/MathJax.js?config=TeX-MML-AM_CHTML"
                .to_string(),
        }
    }
}

/// Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            limit: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Folio");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.pages.home, "home.json");
        assert!(config.math.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
root: /folio/
highlight:
  theme: base16-ocean.dark
feed:
  limit: 5
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.root, "/folio/");
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert_eq!(config.feed.limit, 5);
        // Untouched sections keep their defaults
        assert!(config.feed.enable);
        assert_eq!(config.blog_dir, "blog");
    }
}
