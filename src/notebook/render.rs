//! Notebook rendering - ordered cells to ordered HTML blocks
//!
//! Each cell contributes zero or more blocks, and block order always follows
//! cell order. Markdown cells render through the markdown pipeline, code
//! cells render as highlighted source followed by their outputs, and
//! anything unrecognized renders as a placeholder without disturbing its
//! neighbors.

use anyhow::Result;
use std::sync::Arc;

use crate::config::HighlightConfig;
use crate::helpers::html::html_escape;
use crate::notebook::document::{Cell, NotebookDocument, Output};
use crate::notebook::math::MathEngine;
use crate::render::MarkdownRenderer;

/// Language assumed for code cells without a language tag
const DEFAULT_LANGUAGE: &str = "python";

/// Kind of rendered block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Markdown,
    Code,
    TextOutput,
    ImageOutput,
    Placeholder,
}

/// One rendered block, tagged with the index of the cell that produced it
#[derive(Debug, Clone)]
pub struct RenderedBlock {
    pub cell: usize,
    pub kind: BlockKind,
    pub html: String,
}

/// A fully rendered notebook
#[derive(Debug, Clone, Default)]
pub struct RenderedNotebook {
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedNotebook {
    /// The single container holding every block in document order. The
    /// typesetting pass targets this container by its id.
    pub fn container_html(&self) -> String {
        let mut html = String::from("<div class=\"notebook\" id=\"notebook\">\n");
        for block in &self.blocks {
            html.push_str(&block.html);
            html.push('\n');
        }
        html.push_str("</div>");
        html
    }

    /// Cell index of each block, in render order
    pub fn cell_order(&self) -> Vec<usize> {
        self.blocks.iter().map(|b| b.cell).collect()
    }
}

/// Renders notebook documents cell by cell
pub struct NotebookRenderer {
    markdown: MarkdownRenderer,
}

impl NotebookRenderer {
    pub fn new(highlight: &HighlightConfig, math: Option<Arc<dyn MathEngine>>) -> Self {
        let mut markdown = MarkdownRenderer::with_options(&highlight.theme, highlight.line_number);
        if let Some(math) = math {
            markdown = markdown.with_math(math);
        }
        Self { markdown }
    }

    /// Render every cell, preserving document order. An empty document
    /// yields an empty container.
    pub fn render(&self, document: &NotebookDocument) -> Result<RenderedNotebook> {
        let mut blocks = Vec::new();
        for (index, cell) in document.cells.iter().enumerate() {
            self.render_cell(index, cell, &mut blocks)?;
        }
        Ok(RenderedNotebook { blocks })
    }

    fn render_cell(&self, index: usize, cell: &Cell, blocks: &mut Vec<RenderedBlock>) -> Result<()> {
        match cell {
            Cell::Markdown { source } => {
                let body = self.markdown.render(source.as_str())?;
                blocks.push(RenderedBlock {
                    cell: index,
                    kind: BlockKind::Markdown,
                    html: format!("<div class=\"notebook-markdown\">{}</div>", body),
                });
            }
            Cell::Code {
                source,
                outputs,
                metadata,
            } => {
                let language = metadata
                    .language
                    .as_deref()
                    .filter(|l| !l.is_empty())
                    .unwrap_or(DEFAULT_LANGUAGE);
                let highlighted = self.markdown.highlight(source.as_str(), Some(language));
                blocks.push(RenderedBlock {
                    cell: index,
                    kind: BlockKind::Code,
                    html: format!("<div class=\"notebook-code\">{}</div>", highlighted),
                });
                for output in outputs {
                    self.render_output(index, output, blocks);
                }
            }
            Cell::Other => {
                tracing::warn!("Cell {} has an unrecognized type, rendering placeholder", index);
                blocks.push(RenderedBlock {
                    cell: index,
                    kind: BlockKind::Placeholder,
                    html: "<p class=\"notebook-unhandled\">This cell type is not supported.</p>"
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// Outputs degrade instead of failing: a shape the renderer does not
    /// recognize contributes nothing.
    fn render_output(&self, index: usize, output: &Output, blocks: &mut Vec<RenderedBlock>) {
        match output {
            Output::Data { data } => {
                if let Some(text) = &data.text_plain {
                    blocks.push(RenderedBlock {
                        cell: index,
                        kind: BlockKind::TextOutput,
                        html: format!(
                            "<div class=\"notebook-output\"><pre><code>{}</code></pre></div>",
                            html_escape(text.as_str())
                        ),
                    });
                }
                if let Some(image) = &data.image_png {
                    blocks.push(RenderedBlock {
                        cell: index,
                        kind: BlockKind::ImageOutput,
                        html: format!(
                            "<div class=\"notebook-output\"><img src=\"data:image/png;base64,{}\" alt=\"\"></div>",
                            image.compact()
                        ),
                    });
                }
            }
            Output::Stream { name, text } => {
                blocks.push(RenderedBlock {
                    cell: index,
                    kind: BlockKind::TextOutput,
                    html: format!(
                        "<div class=\"notebook-output\" data-stream=\"{}\"><pre><code>{}</code></pre></div>",
                        html_escape(name),
                        html_escape(text.as_str())
                    ),
                });
            }
            Output::Unrecognized(_) => {
                tracing::debug!("Cell {} has an unrecognized output, skipping", index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::document::NotebookDocument;
    use crate::notebook::math::MathJax;

    fn renderer() -> NotebookRenderer {
        NotebookRenderer::new(&HighlightConfig::default(), None)
    }

    fn math_renderer() -> NotebookRenderer {
        NotebookRenderer::new(
            &HighlightConfig::default(),
            Some(Arc::new(MathJax::new("https://cdn.example/mj.js"))),
        )
    }

    fn parse(raw: &str) -> NotebookDocument {
        NotebookDocument::parse("test.ipynb", raw).unwrap()
    }

    #[test]
    fn test_blocks_follow_cell_order() {
        let doc = parse(
            r##"{
                "cells": [
                    { "cell_type": "markdown", "source": "# First" },
                    { "cell_type": "code", "source": "print(1)", "outputs": [] },
                    { "cell_type": "markdown", "source": "Last" }
                ]
            }"##,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert_eq!(rendered.cell_order(), vec![0, 1, 2]);
        assert_eq!(rendered.blocks[0].kind, BlockKind::Markdown);
        assert_eq!(rendered.blocks[1].kind, BlockKind::Code);
        assert_eq!(rendered.blocks[2].kind, BlockKind::Markdown);
    }

    #[test]
    fn test_code_cell_without_outputs_is_one_block() {
        let doc = parse(
            r#"{
                "cells": [
                    { "cell_type": "code", "source": "x = 1", "outputs": [] }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert_eq!(rendered.blocks.len(), 1);
        assert_eq!(rendered.blocks[0].kind, BlockKind::Code);
    }

    #[test]
    fn test_untagged_code_highlights_as_python() {
        let doc = parse(
            r#"{
                "cells": [
                    { "cell_type": "code", "source": "print('hi')", "outputs": [] }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert!(rendered.blocks[0].html.contains("language-python"));
    }

    #[test]
    fn test_language_tag_overrides_default() {
        let doc = parse(
            r#"{
                "cells": [
                    {
                        "cell_type": "code",
                        "metadata": { "language": "rust" },
                        "source": "fn main() {}",
                        "outputs": []
                    }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert!(rendered.blocks[0].html.contains("language-rust"));
    }

    #[test]
    fn test_output_with_text_and_image_yields_both_blocks() {
        let doc = parse(
            r#"{
                "cells": [
                    {
                        "cell_type": "code",
                        "source": "plot()",
                        "outputs": [
                            {
                                "data": {
                                    "text/plain": ["<Figure size 640x480>"],
                                    "image/png": ["iVBORw0KGgo\n", "AAAANSUhEUg\n"]
                                }
                            }
                        ]
                    }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert_eq!(rendered.blocks.len(), 3);
        assert_eq!(rendered.blocks[1].kind, BlockKind::TextOutput);
        assert_eq!(rendered.blocks[2].kind, BlockKind::ImageOutput);
        // Text payload is escaped, image payload is whitespace-free
        assert!(rendered.blocks[1].html.contains("&lt;Figure size 640x480&gt;"));
        assert!(rendered.blocks[2]
            .html
            .contains("data:image/png;base64,iVBORw0KGgoAAAANSUhEUg"));
        // All three blocks come from the same cell
        assert_eq!(rendered.cell_order(), vec![0, 0, 0]);
    }

    #[test]
    fn test_stream_output_joins_fragments_into_one_block() {
        let doc = parse(
            r#"{
                "cells": [
                    {
                        "cell_type": "code",
                        "source": "print('x')",
                        "outputs": [
                            { "name": "stdout", "text": ["line one\n", "line two\n"] }
                        ]
                    }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert_eq!(rendered.blocks.len(), 2);
        assert_eq!(rendered.blocks[1].kind, BlockKind::TextOutput);
        assert!(rendered.blocks[1].html.contains("line one\nline two\n"));
        assert!(rendered.blocks[1].html.contains("data-stream=\"stdout\""));
    }

    #[test]
    fn test_unrecognized_output_contributes_nothing() {
        let doc = parse(
            r#"{
                "cells": [
                    {
                        "cell_type": "code",
                        "source": "boom()",
                        "outputs": [
                            { "ename": "ValueError", "evalue": "bad", "traceback": [] }
                        ]
                    }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert_eq!(rendered.blocks.len(), 1);
        assert_eq!(rendered.blocks[0].kind, BlockKind::Code);
    }

    #[test]
    fn test_unknown_cell_renders_placeholder_and_isolates_fault() {
        let doc = parse(
            r#"{
                "cells": [
                    { "cell_type": "markdown", "source": "before" },
                    { "cell_type": "raw", "source": "????" },
                    { "cell_type": "markdown", "source": "after" }
                ]
            }"#,
        );
        let rendered = renderer().render(&doc).unwrap();
        assert_eq!(rendered.blocks.len(), 3);
        assert_eq!(rendered.blocks[1].kind, BlockKind::Placeholder);
        assert!(rendered.blocks[0].html.contains("before"));
        assert!(rendered.blocks[2].html.contains("after"));
    }

    #[test]
    fn test_markdown_math_renders_formula_nodes() {
        let doc = parse(
            r#"{
                "cells": [
                    { "cell_type": "markdown", "source": "Inline $a+b$ and\n\n$$c^2$$" }
                ]
            }"#,
        );
        let rendered = math_renderer().render(&doc).unwrap();
        let html = &rendered.blocks[0].html;
        assert!(html.contains("math-inline"));
        assert!(html.contains("math-display"));
        assert!(html.contains("data-formula=\"a+b\""));
    }

    #[test]
    fn test_empty_document_yields_empty_container() {
        let doc = parse(r#"{ "cells": [] }"#);
        let rendered = renderer().render(&doc).unwrap();
        assert!(rendered.blocks.is_empty());
        let container = rendered.container_html();
        assert!(container.contains("id=\"notebook\""));
        assert!(!container.contains("notebook-markdown"));
    }

    #[test]
    fn test_end_to_end_heading_code_stream() {
        let doc = parse(
            r##"{
                "cells": [
                    { "cell_type": "markdown", "source": ["# Hello"] },
                    {
                        "cell_type": "code",
                        "source": ["print(1)"],
                        "outputs": [ { "name": "stdout", "text": ["1\n"] } ]
                    }
                ]
            }"##,
        );
        let rendered = renderer().render(&doc).unwrap();
        let container = rendered.container_html();

        let heading = container.find("<h1>Hello</h1>").unwrap();
        let code = container.find("notebook-code").unwrap();
        let output = container.find("notebook-output").unwrap();
        assert!(heading < code);
        assert!(code < output);
        assert!(container.contains("1\n"));
    }
}
