//! Section rendering - content pages are stacks of two-column sections
//!
//! Every section renders a heading column (title and subtitle) next to a
//! body column of content blocks. Sections alternate styling by position,
//! and a section with exactly one block gets the single-block treatment.

use anyhow::Result;

use crate::config::SiteConfig;
use crate::content::{ContentBlock, PageSection};
use crate::helpers::html::{button_to, html_escape, image_tag};
use crate::render::markdown::MarkdownRenderer;

/// Renders page sections to HTML
pub struct SectionRenderer<'a> {
    config: &'a SiteConfig,
    markdown: MarkdownRenderer,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            markdown: MarkdownRenderer::with_options(
                &config.highlight.theme,
                config.highlight.line_number,
            ),
        }
    }

    /// Render one section. `index` is the section's position on the page;
    /// odd positions get the alternate treatment.
    pub fn render(&self, section: &PageSection, index: usize) -> Result<String> {
        let class = if index % 2 != 0 {
            "section section-alt"
        } else {
            "section"
        };

        let mut html = String::new();
        html.push_str(&format!("<div class=\"{}\">\n", class));
        html.push_str("<div class=\"section-heading\">\n");
        html.push_str(&format!("<h1>{}</h1>\n", html_escape(&section.title)));
        if !section.subtitle.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", html_escape(&section.subtitle)));
        }
        html.push_str("</div>\n");

        html.push_str("<div class=\"section-body\">\n");
        if section.content.len() == 1 {
            html.push_str(&self.render_block(&section.content[0], true)?);
        } else {
            for block in &section.content {
                html.push_str(&self.render_block(block, false)?);
            }
        }
        html.push_str("</div>\n</div>");

        Ok(html)
    }

    fn render_block(&self, block: &ContentBlock, single: bool) -> Result<String> {
        let block_class = if single {
            "section-content section-content-single"
        } else {
            "section-content"
        };
        let text_class = if block.image_file.is_some() {
            "section-text"
        } else {
            "section-text section-text-full"
        };

        let mut html = String::new();
        html.push_str(&format!("<div class=\"{}\">\n", block_class));

        if let Some(image) = &block.image_file {
            html.push_str(&image_tag(self.config, image, "section-image"));
            html.push('\n');
        }

        html.push_str(&format!("<div class=\"{}\">\n", text_class));
        html.push_str(&self.markdown.render(&block.markdown)?);
        if let Some((text, link)) = block.button() {
            html.push_str(&button_to(self.config, link, text, true));
            html.push('\n');
        }
        html.push_str("</div>\n</div>\n");

        Ok(html)
    }
}
