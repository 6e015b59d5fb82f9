//! Generator module - renders every route of the site into the public
//! directory
//!
//! The metadata table drives generation: the route table is the four fixed
//! pages plus one post page per registered slug. Section pages and the
//! metadata table are build inputs and stop the build when broken; a single
//! broken notebook only breaks its own page.

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::content::{parse_sections, ContentStore, FsContentStore, MetadataTable, PageSection};
use crate::error::SiteError;
use crate::helpers::date::atom_timestamp;
use crate::helpers::url::url_for;
use crate::notebook::{MathEngine, MathJax, NotebookDocument, NotebookRenderer};
use crate::render::SectionRenderer;
use crate::resolver::{LoadState, PostResolver};
use crate::routes::{route_table, Route};
use crate::templates::{base_context, PostEntryData, TemplateRenderer};
use crate::Folio;

/// Static site generator
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
    notebook: NotebookRenderer,
    math: Option<Arc<dyn MathEngine>>,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let math: Option<Arc<dyn MathEngine>> = if folio.config.math.enable {
            Some(Arc::new(MathJax::new(folio.config.math.cdn.clone())))
        } else {
            None
        };
        let notebook = NotebookRenderer::new(&folio.config.highlight, math.clone());

        Ok(Self {
            folio: folio.clone(),
            renderer,
            notebook,
            math,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<()> {
        // Ensure public directory exists
        fs::create_dir_all(&self.folio.public_dir)?;

        // Copy assets (images, stylesheets)
        self.copy_assets()?;

        let store: Arc<dyn ContentStore> =
            Arc::new(FsContentStore::new(&self.folio.content_dir));

        // The metadata table is a build input; a broken table stops the build
        let raw = store
            .fetch(&format!("{}/metadata.json", self.folio.config.blog_dir))
            .await?;
        let table = MetadataTable::parse(&raw)?;

        // Section pages load up front, so asset references can be checked
        // before anything is written
        let home = self.load_page(&store, &self.folio.config.pages.home).await?;
        let about = self.load_page(&store, &self.folio.config.pages.about).await?;
        let projects = self
            .load_page(&store, &self.folio.config.pages.projects)
            .await?;
        self.check_assets(home.iter().chain(&about).chain(&projects))?;

        let resolver = PostResolver::new(table.clone(), store, self.folio.config.blog_dir.clone());

        let mut generated = 0;
        for route in route_table(resolver.table()) {
            let html = match &route {
                Route::Home => self.render_sections_page(&home, "home", None)?,
                Route::About => self.render_sections_page(&about, "about", Some("About"))?,
                Route::Projects => {
                    self.render_sections_page(&projects, "projects", Some("Projects"))?
                }
                Route::BlogIndex => self.render_blog_index(resolver.table())?,
                Route::BlogPost { slug } => {
                    let state = resolver.load(slug).await;
                    self.render_post_page(slug, resolver.table(), state)?
                }
            };

            // Typesetting runs here and nowhere else, after every template
            // render; the pass itself is idempotent
            let html = self.finish_page(html);
            self.write_page(&route, &html)?;
            generated += 1;
        }

        if self.folio.config.feed.enable {
            self.generate_atom_feed(&table)?;
        }

        tracing::info!("Generated {} pages", generated);
        Ok(())
    }

    /// Fetch and parse one section page file
    async fn load_page(
        &self,
        store: &Arc<dyn ContentStore>,
        name: &str,
    ) -> Result<Vec<PageSection>> {
        let raw = store.fetch(name).await?;
        Ok(parse_sections(name, &raw)?)
    }

    /// Verify that every asset referenced by section content exists.
    /// Missing assets fail the build, never the served site.
    fn check_assets<'a>(&self, sections: impl Iterator<Item = &'a PageSection>) -> Result<()> {
        for section in sections {
            for block in &section.content {
                let image = match &block.image_file {
                    Some(image) => image,
                    None => continue,
                };
                if image.starts_with("http://") || image.starts_with("https://") {
                    continue;
                }
                let path = self.folio.assets_dir.join(image.trim_start_matches('/'));
                if !path.is_file() {
                    return Err(SiteError::UnresolvedAsset {
                        path: image.clone(),
                        assets_dir: self.folio.assets_dir.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Render a section page (home, about, projects)
    fn render_sections_page(
        &self,
        sections: &[PageSection],
        active: &str,
        page_title: Option<&str>,
    ) -> Result<String> {
        let section_renderer = SectionRenderer::new(&self.folio.config);
        let rendered: Vec<String> = sections
            .iter()
            .enumerate()
            .map(|(index, section)| section_renderer.render(section, index))
            .collect::<Result<_>>()?;

        let mut context = base_context(&self.folio.config, active, page_title);
        context.insert("sections", &rendered);
        self.renderer.render("sections.html", &context)
    }

    /// Render the blog index. Entries appear in the table's stored order;
    /// nothing re-sorts here.
    fn render_blog_index(&self, table: &MetadataTable) -> Result<String> {
        let posts: Vec<PostEntryData> = table
            .posts
            .iter()
            .map(|post| PostEntryData {
                title: post.title.clone(),
                url: url_for(
                    &self.folio.config,
                    &Route::BlogPost {
                        slug: post.slug.clone(),
                    }
                    .url(),
                ),
                date: post.publish_date.to_string(),
                summary: post.summary.clone(),
            })
            .collect();

        let mut context = base_context(&self.folio.config, "blog", Some("Blog"));
        context.insert("posts", &posts);
        self.renderer.render("blog.html", &context)
    }

    /// Render one post page from its load state. All three states render:
    /// pending as an empty container, loaded as the notebook, failed as a
    /// visible error.
    fn render_post_page(
        &self,
        slug: &str,
        table: &MetadataTable,
        state: LoadState<NotebookDocument>,
    ) -> Result<String> {
        let summary = table.summary_for(slug);
        let title = summary.map(|s| s.title.clone()).unwrap_or_else(|| slug.to_string());

        let mut context = base_context(&self.folio.config, "blog", Some(&title));
        if let Some(summary) = summary {
            context.insert("page_date", &summary.publish_date.to_string());
        }

        match state {
            LoadState::Loading => {
                context.insert("load_pending", &true);
            }
            LoadState::Loaded(document) => {
                let rendered = self.notebook.render(&document)?;
                context.insert("notebook_html", &rendered.container_html());
            }
            LoadState::Failed(err) => {
                tracing::warn!("Post '{}' failed to load: {}", slug, err);
                context.insert("load_failed", &true);
                context.insert("load_error", &err.to_string());
            }
        }

        self.renderer.render("post.html", &context)
    }

    /// Apply the page-level typesetting pass
    fn finish_page(&self, html: String) -> String {
        match &self.math {
            Some(math) => math.typeset_page(&html),
            None => html,
        }
    }

    /// Write one rendered page to its output path
    fn write_page(&self, route: &Route, html: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(route.output_path());
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Generate the Atom feed from the post index
    fn generate_atom_feed(&self, table: &MetadataTable) -> Result<()> {
        let config = &self.folio.config;
        let base_url = config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}{}\" rel=\"self\"/>\n",
            base_url,
            url_for(config, "atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
        feed.push_str(&format!(
            "  <updated>{}</updated>\n",
            chrono::Utc::now().to_rfc3339()
        ));
        feed.push_str(&format!("  <id>{}/</id>\n", base_url));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in table.posts.iter().take(config.feed.limit) {
            let link = format!(
                "{}{}",
                base_url,
                url_for(
                    config,
                    &Route::BlogPost {
                        slug: post.slug.clone()
                    }
                    .url()
                )
            );
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                atom_timestamp(&post.publish_date)
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                atom_timestamp(&post.publish_date)
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&post.summary)
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.folio.public_dir.join("atom.xml");
        fs::write(&output_path, feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Copy the assets directory into the public directory
    fn copy_assets(&self) -> Result<()> {
        let assets_dir = &self.folio.assets_dir;
        if !assets_dir.is_dir() {
            tracing::debug!("No assets directory at {:?}", assets_dir);
            return Ok(());
        }

        let dest_root = self.folio.public_dir.join(&self.folio.config.assets_dir);
        for entry in WalkDir::new(assets_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(assets_dir)?;
                let dest = dest_root.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(path: &Path, body: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    fn scaffold_site(base: &Path) {
        write(
            &base.join("content/home.json"),
            r#"[
                {
                    "title": "Hi there",
                    "subtitle": "Welcome",
                    "content": [ { "markdown": "I build things.", "image-file": "portrait.png" } ]
                },
                {
                    "title": "Work",
                    "subtitle": "",
                    "content": [
                        { "markdown": "First thing." },
                        { "markdown": "Second thing." }
                    ]
                }
            ]"#,
        );
        write(
            &base.join("content/about.json"),
            r#"[ { "title": "About", "subtitle": "", "content": [ { "markdown": "Me." } ] } ]"#,
        );
        write(
            &base.join("content/projects.json"),
            r#"[ { "title": "Projects", "subtitle": "", "content": [ { "markdown": "Things." } ] } ]"#,
        );
        write(
            &base.join("content/blog/metadata.json"),
            r#"{
                "slugs": { "intro": "intro.ipynb", "broken": "broken.ipynb" },
                "posts": [
                    {
                        "slug": "intro",
                        "title": "Intro Post",
                        "publish_date": "2021-03-01",
                        "summary": "The first post",
                        "notebook": "intro.ipynb"
                    },
                    {
                        "slug": "broken",
                        "title": "Broken Post",
                        "publish_date": "2020-01-01",
                        "summary": "",
                        "notebook": "broken.ipynb"
                    }
                ]
            }"#,
        );
        write(
            &base.join("content/blog/intro.ipynb"),
            r##"{
                "cells": [
                    { "cell_type": "markdown", "source": ["# Hello\n", "\n", "Euler: $e^x$"] },
                    {
                        "cell_type": "code",
                        "source": ["print(1)"],
                        "outputs": [ { "name": "stdout", "text": ["1\n"] } ]
                    }
                ]
            }"##,
        );
        write(&base.join("content/blog/broken.ipynb"), "{ not json");
        write(&base.join("assets/portrait.png"), "png-bytes");
        write(&base.join("assets/site.css"), "body {}");
    }

    #[tokio::test]
    async fn test_generate_writes_every_route() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let folio = Folio::new(dir.path()).unwrap();
        Generator::new(&folio).unwrap().generate().await.unwrap();

        let public = dir.path().join("public");
        assert!(public.join("index.html").is_file());
        assert!(public.join("about/index.html").is_file());
        assert!(public.join("projects/index.html").is_file());
        assert!(public.join("blog/index.html").is_file());
        assert!(public.join("blog/intro/index.html").is_file());
        assert!(public.join("blog/broken/index.html").is_file());
        assert!(public.join("assets/portrait.png").is_file());
        assert!(public.join("assets/site.css").is_file());
        assert!(public.join("atom.xml").is_file());
    }

    #[tokio::test]
    async fn test_post_page_has_notebook_and_one_runtime() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let folio = Folio::new(dir.path()).unwrap();
        Generator::new(&folio).unwrap().generate().await.unwrap();

        let html =
            fs::read_to_string(dir.path().join("public/blog/intro/index.html")).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("notebook-code"));
        assert!(html.contains("math-inline"));
        // The typesetting runtime appears exactly once
        assert_eq!(html.matches("MathJax.Hub.Queue").count(), 1);
    }

    #[tokio::test]
    async fn test_broken_notebook_breaks_only_its_own_page() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let folio = Folio::new(dir.path()).unwrap();
        Generator::new(&folio).unwrap().generate().await.unwrap();

        let broken =
            fs::read_to_string(dir.path().join("public/blog/broken/index.html")).unwrap();
        assert!(broken.contains("blog-post-error"));
        assert!(broken.contains("Broken Post"));

        // The rest of the site generated normally
        let index = fs::read_to_string(dir.path().join("public/blog/index.html")).unwrap();
        assert!(index.contains("Intro Post"));
    }

    #[tokio::test]
    async fn test_blog_index_keeps_stored_order() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let folio = Folio::new(dir.path()).unwrap();
        Generator::new(&folio).unwrap().generate().await.unwrap();

        let index = fs::read_to_string(dir.path().join("public/blog/index.html")).unwrap();
        let intro = index.find("Intro Post").unwrap();
        let broken = index.find("Broken Post").unwrap();
        assert!(intro < broken);
        assert!(index.contains("Published on March 1, 2021"));
    }

    #[tokio::test]
    async fn test_missing_asset_fails_the_build() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());
        fs::remove_file(dir.path().join("assets/portrait.png")).unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let err = Generator::new(&folio)
            .unwrap()
            .generate()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("portrait.png"));
    }

    #[tokio::test]
    async fn test_sections_page_markup() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let folio = Folio::new(dir.path()).unwrap();
        Generator::new(&folio).unwrap().generate().await.unwrap();

        let home = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        // First section: single block with image
        assert!(home.contains("section-content-single"));
        assert!(home.contains("/assets/portrait.png"));
        // Second section: alternate treatment, blocks in order
        assert!(home.contains("section section-alt"));
        let first = home.find("First thing.").unwrap();
        let second = home.find("Second thing.").unwrap();
        assert!(first < second);
        // Section pages carry no typesetting runtime
        assert!(!home.contains("MathJax"));
    }

    #[tokio::test]
    async fn test_atom_feed_lists_posts() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let folio = Folio::new(dir.path()).unwrap();
        Generator::new(&folio).unwrap().generate().await.unwrap();

        let feed = fs::read_to_string(dir.path().join("public/atom.xml")).unwrap();
        assert!(feed.contains("<title>Intro Post</title>"));
        assert!(feed.contains("/blog/intro/"));
        assert!(feed.contains("2021-03-01T00:00:00+00:00"));
    }
}
