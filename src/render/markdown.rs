//! Markdown rendering with syntax highlighting and math notation

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::Arc;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html::html_escape;
use crate::notebook::math::MathEngine;

/// Markdown renderer with syntax highlighting and, when an engine is
/// attached, math notation support
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    math: Option<Arc<dyn MathEngine>>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("InspiredGitHub", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
            math: None,
        }
    }

    /// Attach a math engine. `$...$` and `$$...$$` spans then render as the
    /// engine's formula nodes instead of literal text.
    pub fn with_math(mut self, math: Arc<dyn MathEngine>) -> Self {
        self.math = Some(math);
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        if self.math.is_some() {
            options |= Options::ENABLE_MATH;
        }
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::InlineMath(formula) => {
                    if let Some(math) = &self.math {
                        events.push(Event::Html(CowStr::from(math.inline_html(&formula))));
                    }
                }
                Event::DisplayMath(formula) => {
                    if let Some(math) = &self.math {
                        events.push(Event::Html(CowStr::from(math.display_html(&formula))));
                    }
                }
                _ => {
                    events.push(event);
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a standalone code block. Notebook code cells call this
    /// directly, without going through markdown.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        // Try the token first ("rust", "py"), then the file extension
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .unwrap_or_else(|| {
                self.theme_set
                    .themes
                    .values()
                    .next()
                    .expect("No themes available")
            });

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    self.add_line_numbers(&highlighted, lang)
                } else {
                    format!(
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        lang, highlighted
                    )
                }
            }
            Err(_) => {
                // Fallback to a plain code block
                let escaped = html_escape(code);
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang, escaped
                )
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();
        let line_count = lines.len();

        let mut gutter = String::new();
        let mut code_lines = String::new();

        for (i, line) in lines.iter().enumerate() {
            gutter.push_str(&format!(r#"<span class="line-number">{}</span>"#, i + 1));
            if i < line_count - 1 {
                gutter.push('\n');
            }

            code_lines.push_str(line);
            if i < line_count - 1 {
                code_lines.push('\n');
            }
        }

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang, gutter, code_lines
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::math::MathJax;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("language-rust"));
        assert!(html.contains("<pre>"));
    }

    #[test]
    fn test_math_without_engine_stays_literal() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Euler: $e^{i\\pi} + 1 = 0$").unwrap();
        assert!(!html.contains("math-inline"));
    }

    #[test]
    fn test_inline_math_renders_formula_node() {
        let renderer =
            MarkdownRenderer::new().with_math(Arc::new(MathJax::new("https://cdn.example/mj.js")));
        let html = renderer.render("Euler: $e^x$").unwrap();
        assert!(html.contains("math-inline"));
        assert!(html.contains(r#"data-formula="e^x""#));
    }

    #[test]
    fn test_display_math_renders_block_node() {
        let renderer =
            MarkdownRenderer::new().with_math(Arc::new(MathJax::new("https://cdn.example/mj.js")));
        let html = renderer.render("$$\\sum_{i=0}^n i$$").unwrap();
        assert!(html.contains("math-display"));
    }

    #[test]
    fn test_highlight_unknown_language_falls_back_to_plain() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.highlight("whatever <tag>", Some("no-such-lang"));
        assert!(html.contains("<pre>"));
        // Raw markup never leaks through
        assert!(!html.contains("<tag>"));
    }
}
