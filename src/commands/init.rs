//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{MetadataTable, PostSummary};
use crate::Folio;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/blog"))?;
    fs::create_dir_all(target_dir.join("assets"))?;

    // Create default _config.yml
    let config_content = r#"# Site
title: Folio
subtitle: ''
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content
assets_dir: assets
public_dir: public
blog_dir: blog

# Content pages
pages:
  home: home.json
  about: about.json
  projects: projects.json

# Code highlighting
highlight:
  theme: InspiredGitHub
  line_number: false

# Math typesetting
math:
  enable: true
  cdn: https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.9/MathJax.js?config=TeX-MML-AM_CHTML

# Atom feed
feed:
  enable: true
  limit: 20

# Stylesheet, relative to the assets directory
stylesheet: site.css
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Create the three content pages
    let home_page = r#"[
  {
    "title": "Hello, I'm John Doe",
    "subtitle": "I build software and write about it",
    "content": [
      {
        "markdown": "Welcome to my corner of the web. Have a look at my [projects](/projects/), read the [blog](/blog/), or learn more [about me](/about/).",
        "button-text": "Read the blog",
        "button-link": "/blog/"
      }
    ]
  },
  {
    "title": "Recent work",
    "subtitle": "",
    "content": [
      { "markdown": "Edit `content/home.json` to put your own sections here. Each section is a title, a subtitle, and one or more content blocks." },
      { "markdown": "Blocks can carry markdown, an image from the assets directory, and a call-to-action button." }
    ]
  }
]
"#;

    let about_page = r#"[
  {
    "title": "About",
    "subtitle": "",
    "content": [
      { "markdown": "Write a short bio here. This page is generated from `content/about.json`." }
    ]
  }
]
"#;

    let projects_page = r#"[
  {
    "title": "Projects",
    "subtitle": "Things I have built",
    "content": [
      {
        "markdown": "Describe a project here, and link to it with a button.",
        "button-text": "View source",
        "button-link": "https://example.com"
      }
    ]
  }
]
"#;

    fs::write(target_dir.join("content/home.json"), home_page)?;
    fs::write(target_dir.join("content/about.json"), about_page)?;
    fs::write(target_dir.join("content/projects.json"), projects_page)?;

    // Create a sample notebook post
    let welcome_notebook = r##"{
  "cells": [
    {
      "cell_type": "markdown",
      "metadata": {},
      "source": [
        "# Welcome\n",
        "\n",
        "This post is a Jupyter notebook. Markdown cells render as prose,\n",
        "inline math like $e^{i\\pi} + 1 = 0$ is typeset in the browser,\n",
        "and code cells keep their outputs:"
      ]
    },
    {
      "cell_type": "code",
      "metadata": {},
      "source": [
        "print(\"hello from the blog\")"
      ],
      "outputs": [
        {
          "output_type": "stream",
          "name": "stdout",
          "text": [
            "hello from the blog\n"
          ]
        }
      ]
    }
  ],
  "metadata": {},
  "nbformat": 4,
  "nbformat_minor": 5
}
"##;

    fs::write(
        target_dir.join("content/blog/welcome.ipynb"),
        welcome_notebook,
    )?;

    // Sidecar and metadata table for the sample post
    let welcome = PostSummary {
        slug: "welcome".to_string(),
        title: "Welcome".to_string(),
        publish_date: chrono::Local::now().date_naive(),
        summary: "A short tour of the notebook-powered blog.".to_string(),
        notebook: "welcome.ipynb".to_string(),
    };
    fs::write(
        target_dir.join("content/blog/welcome.meta"),
        serde_json::to_string_pretty(&welcome)?,
    )?;

    let table = MetadataTable::from_sidecars(vec![welcome])?;
    fs::write(
        target_dir.join("content/blog/metadata.json"),
        serde_json::to_string_pretty(&table)?,
    )?;

    // Create the default stylesheet
    fs::write(target_dir.join("assets/site.css"), DEFAULT_STYLESHEET)?;

    Ok(())
}

/// Run the init command with an existing Folio instance
pub fn run(folio: &Folio) -> Result<()> {
    init_site(&folio.base_dir)
}

const DEFAULT_STYLESHEET: &str = r#"/* Folio default stylesheet */

:root {
  --text: #1f2428;
  --muted: #6a737d;
  --accent: #0366d6;
  --surface: #f6f8fa;
  --border: #e1e4e8;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  color: var(--text);
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  line-height: 1.6;
}

.app { display: flex; flex-direction: column; min-height: 100vh; }
.page { flex: 1; width: 100%; max-width: 56rem; margin: 0 auto; padding: 0 1.5rem; }

/* Header */
.header {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  max-width: 56rem;
  margin: 0 auto;
  padding: 1.25rem 1.5rem;
  width: 100%;
}
.header a { color: var(--text); text-decoration: none; }
.header-nav a { font-weight: 600; font-size: 1.2rem; }
.header-links a { margin-left: 1.25rem; color: var(--muted); }
.header-links a:hover, .header a.header-active { color: var(--accent); }

/* Footer */
.footer {
  margin-top: 3rem;
  padding: 1.5rem;
  text-align: center;
  color: var(--muted);
  font-size: 0.85rem;
  border-top: 1px solid var(--border);
}

/* Sections */
.section { padding: 2.5rem 0; }
.section-alt { background: var(--surface); margin: 0 -1.5rem; padding: 2.5rem 1.5rem; }
.section-heading h1 { margin: 0 0 0.25rem; font-size: 1.8rem; }
.section-heading p { margin: 0 0 1.5rem; color: var(--muted); }
.section-content, .section-content-single { display: flex; gap: 2rem; margin-bottom: 1.5rem; }
.section-image { max-width: 16rem; border-radius: 6px; }
.section-text, .section-text-full { flex: 1; }

/* Buttons */
.button {
  display: inline-block;
  padding: 0.4rem 1rem;
  border: 1px solid var(--accent);
  border-radius: 6px;
  color: var(--accent);
  text-decoration: none;
}
.button:hover { background: var(--accent); color: #fff; }

/* Blog index */
.blog-roll { padding: 2rem 0; }
.blog-entry { margin-bottom: 2.5rem; }
.blog-entry-title { margin: 0; font-size: 1.4rem; }
.blog-entry-title a { color: var(--text); text-decoration: none; }
.blog-entry-title a:hover { color: var(--accent); }
.blog-entry-date { color: var(--muted); font-size: 0.9rem; }
.blog-entry-summary { margin: 0.5rem 0 1rem; }

/* Blog post */
.blog-post { padding: 2rem 0; }
.blog-post-title { margin-bottom: 0.25rem; }
.blog-post-date { color: var(--muted); margin-bottom: 2rem; }
.blog-post-error {
  padding: 1rem;
  border: 1px solid #d73a49;
  border-radius: 6px;
  background: #ffeef0;
}
.blog-post-error-detail { color: var(--muted); font-size: 0.9rem; }

/* Notebook */
.notebook-markdown { margin: 1rem 0; }
.notebook-code pre, .notebook-output pre {
  padding: 0.75rem 1rem;
  overflow-x: auto;
  border-radius: 6px;
  background: var(--surface);
}
.notebook-output pre { border-left: 3px solid var(--border); }
.notebook-output img { max-width: 100%; }
.notebook-unhandled { color: var(--muted); font-style: italic; }

/* Highlighted code with line numbers */
.highlight table { width: 100%; border-collapse: collapse; }
.highlight .gutter { width: 1%; padding-right: 1rem; text-align: right; user-select: none; }
.highlight .line-number { color: var(--muted); }
"#;
