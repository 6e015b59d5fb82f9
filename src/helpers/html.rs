//! HTML helper functions

use super::url::{encode_url, url_for};
use crate::config::SiteConfig;

/// Generate an image tag for a site asset
///
/// # Examples
/// ```ignore
/// image_tag(&config, "portrait.png", "section-image")
/// // -> <img src="/assets/portrait.png" alt="" class="section-image">
/// ```
pub fn image_tag(config: &SiteConfig, path: &str, class: &str) -> String {
    let src = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        url_for(
            config,
            &format!("{}/{}", config.assets_dir, encode_url(path.trim_start_matches('/'))),
        )
    };

    format!(r#"<img src="{}" alt="" class="{}">"#, src, class)
}

/// Generate a call-to-action link. External targets open in a new tab.
///
/// # Examples
/// ```ignore
/// button_to(&config, "https://example.com", "See more", true)
/// ```
pub fn button_to(config: &SiteConfig, path: &str, text: &str, new_tab: bool) -> String {
    let href = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        url_for(config, path)
    };

    if new_tab {
        format!(
            r#"<a href="{}" class="button" target="_blank" rel="noopener">{}</a>"#,
            href,
            html_escape(text)
        )
    } else {
        format!(r#"<a href="{}" class="button">{}</a>"#, href, html_escape(text))
    }
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="folio-rs {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
