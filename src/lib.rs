//! folio-rs: a static site generator for personal portfolio sites with
//! notebook blogs
//!
//! A site is a directory of JSON content: section pages for home, about,
//! and projects, plus a blog whose posts are Jupyter-style notebook files
//! registered in a metadata table. This crate renders that content into a
//! static HTML tree through embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod notebook;
pub mod render;
pub mod resolver;
pub mod routes;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (section pages, blog metadata, notebooks)
    pub content_dir: std::path::PathBuf,
    /// Assets directory (images, stylesheets)
    pub assets_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let assets_dir = base_dir.join(&config.assets_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            assets_dir,
            public_dir,
        })
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Rebuild the blog metadata table from sidecar files
    pub fn build_metadata(&self) -> Result<()> {
        commands::meta::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<()> {
        commands::new::run(self, title)
    }
}
