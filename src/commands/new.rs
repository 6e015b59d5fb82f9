//! Create a new blog post

use anyhow::Result;
use std::fs;

use crate::content::PostSummary;
use crate::Folio;

/// Create a notebook skeleton and metadata sidecar for a new post
pub fn create_post(folio: &Folio, title: &str) -> Result<()> {
    let slug = slug::slugify(title);
    let blog_dir = folio.content_dir.join(&folio.config.blog_dir);
    fs::create_dir_all(&blog_dir)?;

    let notebook_name = format!("{}.ipynb", slug);
    let notebook_path = blog_dir.join(&notebook_name);
    if notebook_path.exists() {
        anyhow::bail!("File already exists: {:?}", notebook_path);
    }

    let notebook = serde_json::json!({
        "cells": [
            {
                "cell_type": "markdown",
                "metadata": {},
                "source": [format!("# {}", title)]
            }
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    });
    fs::write(&notebook_path, serde_json::to_string_pretty(&notebook)?)?;

    let summary = PostSummary {
        slug: slug.clone(),
        title: title.to_string(),
        publish_date: chrono::Local::now().date_naive(),
        summary: String::new(),
        notebook: notebook_name,
    };
    let sidecar_path = blog_dir.join(format!("{}.meta", slug));
    fs::write(&sidecar_path, serde_json::to_string_pretty(&summary)?)?;

    println!("Created: {:?}", notebook_path);

    // Fold the new post into the metadata table
    super::meta::run(folio)?;

    Ok(())
}

/// Run the new command
pub fn run(folio: &Folio, title: &str) -> Result<()> {
    create_post(folio, title)
}
