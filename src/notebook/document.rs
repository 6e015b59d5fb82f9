//! Notebook document model
//!
//! Blog posts are Jupyter-style notebook files: a JSON object whose `cells`
//! array is an ordered sequence of markdown and code cells. Only the fields
//! the renderer displays are modeled; everything else in the file is
//! ignored. A document either parses whole or not at all.

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::SiteError;

/// A parsed notebook document, an ordered sequence of cells
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookDocument {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl NotebookDocument {
    /// Parse a notebook from raw JSON
    pub fn parse(name: &str, raw: &str) -> Result<Self, SiteError> {
        serde_json::from_str(raw).map_err(|source| SiteError::MalformedNotebook {
            name: name.to_string(),
            source,
        })
    }
}

/// One cell of a notebook document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(default)]
        source: SourceText,
    },
    Code {
        #[serde(default)]
        source: SourceText,
        #[serde(default)]
        outputs: Vec<Output>,
        #[serde(default)]
        metadata: CellMetadata,
    },
    /// Any cell kind this renderer does not recognize. Modeled rather than
    /// rejected so one odd cell never sinks the document.
    #[serde(other)]
    Other,
}

/// Code cell metadata; only the language tag matters for rendering
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellMetadata {
    #[serde(default)]
    pub language: Option<String>,
}

/// Output attached to a code cell, discriminated by field presence: a MIME
/// data bundle, a named stream, or something else entirely.
///
/// Variant order matters: `data` wins over `name` when both are present.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Output {
    Data {
        data: MimeBundle,
    },
    Stream {
        name: String,
        #[serde(default)]
        text: SourceText,
    },
    Unrecognized(serde_json::Value),
}

/// MIME payloads carried by a data output. Only the payloads the renderer
/// displays are modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MimeBundle {
    #[serde(default, rename = "text/plain")]
    pub text_plain: Option<SourceText>,
    #[serde(default, rename = "image/png")]
    pub image_png: Option<SourceText>,
}

/// Text payload that is either a single string or a list of fragments
/// concatenated in order; the notebook format allows both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceText(String);

impl SourceText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The payload with all whitespace removed. Base64 image data is often
    /// split across fragments with trailing newlines; those must not reach
    /// the decoded payload.
    pub fn compact(&self) -> String {
        self.0.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceText {
    fn from(value: &str) -> Self {
        SourceText(value.to_string())
    }
}

impl<'de> Deserialize<'de> for SourceText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextOrFragments;

        impl<'de> Visitor<'de> for TextOrFragments {
            type Value = SourceText;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a list of string fragments")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SourceText(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SourceText(value))
            }

            fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
            where
                S: SeqAccess<'de>,
            {
                let mut text = String::new();
                while let Some(fragment) = seq.next_element::<String>()? {
                    text.push_str(&fragment);
                }
                Ok(SourceText(text))
            }
        }

        deserializer.deserialize_any(TextOrFragments)
    }
}
