//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary; a site supplies
//! content and a stylesheet, never markup.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{date::long_date, html::meta_generator, url::url_for};

/// Template renderer with the embedded folio templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Disable autoescaping; the generator inserts pre-rendered HTML and
        // pre-escaped values
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("folio/layout.html")),
            ("sections.html", include_str!("folio/sections.html")),
            ("blog.html", include_str!("folio/blog.html")),
            ("post.html", include_str!("folio/post.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("folio/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("folio/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("folio/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Base context shared by every page: site data, navigation state, and the
/// head links
pub fn base_context(config: &SiteConfig, active: &str, page_title: Option<&str>) -> Context {
    let mut context = Context::new();
    context.insert("config", &ConfigData::from(config));
    context.insert("active", active);
    if let Some(title) = page_title {
        context.insert("page_title", title);
    }
    context.insert(
        "stylesheet",
        &url_for(config, &format!("{}/{}", config.assets_dir, config.stylesheet)),
    );
    if config.feed.enable {
        context.insert("feed_url", &url_for(config, "atom.xml"));
    }
    context.insert("generator_tag", &meta_generator());
    context.insert("current_year", &chrono::Utc::now().year());
    context
}

/// Tera filter: format an ISO date for display ("LL" gives "May 4, 2020")
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "LL".to_string(),
    };

    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(long_date(&date)));
        }
    }

    // Default: return as-is (already YYYY-MM-DD)
    Ok(tera::Value::String(s))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        let mut root = config.root.clone();
        if !root.ends_with('/') {
            root.push('/');
        }
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root,
        }
    }
}

/// One entry on the blog index page
#[derive(Debug, Clone, Serialize)]
pub struct PostEntryData {
    pub title: String,
    pub url: String,
    pub date: String,
    pub summary: String,
}
