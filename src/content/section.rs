//! Page sections, the building blocks of content pages
//!
//! A content page file is a JSON array of sections; array order is display
//! order. Each section carries a title, a subtitle, and one or more content
//! blocks.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SiteError;

/// A titled block of page content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One unit of section content: markdown text, optionally paired with an
/// image and a call-to-action button.
///
/// The content schema uses kebab-case keys and an empty string for an absent
/// field; empty strings normalize to `None` on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub markdown: String,
    #[serde(
        default,
        rename = "image-file",
        deserialize_with = "empty_as_none"
    )]
    pub image_file: Option<String>,
    #[serde(
        default,
        rename = "button-text",
        deserialize_with = "empty_as_none"
    )]
    pub button_text: Option<String>,
    #[serde(
        default,
        rename = "button-link",
        deserialize_with = "empty_as_none"
    )]
    pub button_link: Option<String>,
}

impl ContentBlock {
    /// Whether the block carries a complete call-to-action (both text and
    /// target present)
    pub fn button(&self) -> Option<(&str, &str)> {
        match (&self.button_text, &self.button_link) {
            (Some(text), Some(link)) => Some((text.as_str(), link.as_str())),
            _ => None,
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Parse a content page file into its ordered sections
pub fn parse_sections(name: &str, raw: &str) -> Result<Vec<PageSection>, SiteError> {
    serde_json::from_str(raw).map_err(|source| SiteError::MalformedContent {
        name: name.to_string(),
        source,
    })
}
