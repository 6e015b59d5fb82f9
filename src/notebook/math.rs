//! Math typesetting capability
//!
//! Formula rendering is delegated to an explicitly passed engine, so the
//! markdown pipeline stays free of any global typesetting state and tests
//! can run without a browser runtime. The default engine emits
//! MathJax-delimited nodes and injects the typesetting runtime in a
//! page-level pass.

use crate::helpers::html::html_escape;

/// Marker attribute carried by the injected runtime tags; its presence turns
/// a repeat typeset pass into a no-op.
const TYPESET_MARKER: &str = "data-typeset-runtime";

/// A formula typesetting engine.
///
/// Engines produce the in-page nodes for inline and display formulas, and a
/// whole-page pass that arranges for those nodes to be typeset.
pub trait MathEngine: Send + Sync {
    /// Inline formula node. The node keys itself by its raw formula text.
    fn inline_html(&self, formula: &str) -> String;

    /// Display (block) formula node.
    fn display_html(&self, formula: &str) -> String;

    /// Page-level pass over fully rendered HTML. Must be idempotent: the
    /// generator applies it after every render, including re-renders of the
    /// same page.
    fn typeset_page(&self, html: &str) -> String;
}

/// MathJax-backed engine. Formula nodes use TeX delimiters; the page pass
/// injects the runtime and an explicit typeset request for the notebook
/// container before `</body>`.
pub struct MathJax {
    cdn: String,
}

impl MathJax {
    pub fn new(cdn: impl Into<String>) -> Self {
        Self { cdn: cdn.into() }
    }

    fn runtime_tags(&self) -> String {
        format!(
            concat!(
                "<script {marker} type=\"text/x-mathjax-config\">\n",
                "MathJax.Hub.Queue([\"Typeset\", MathJax.Hub, \"notebook\"]);\n",
                "</script>\n",
                "<script {marker} src=\"{cdn}\" async></script>\n"
            ),
            marker = TYPESET_MARKER,
            cdn = self.cdn
        )
    }
}

impl MathEngine for MathJax {
    fn inline_html(&self, formula: &str) -> String {
        let escaped = html_escape(formula);
        format!(
            r#"<span class="math math-inline" data-formula="{}">\({}\)</span>"#,
            escaped, escaped
        )
    }

    fn display_html(&self, formula: &str) -> String {
        let escaped = html_escape(formula);
        format!(
            r#"<div class="math math-display" data-formula="{}">\[{}\]</div>"#,
            escaped, escaped
        )
    }

    fn typeset_page(&self, html: &str) -> String {
        // Only pages carrying a notebook container need the runtime
        if !html.contains(r#"id="notebook""#) {
            return html.to_string();
        }
        if html.contains(TYPESET_MARKER) {
            return html.to_string();
        }
        if html.contains("</body>") {
            html.replace("</body>", &format!("{}</body>", self.runtime_tags()))
        } else {
            format!("{}{}", html, self.runtime_tags())
        }
    }
}
