//! Rendering building blocks shared by pages and posts

mod markdown;
mod section;

pub use markdown::MarkdownRenderer;
pub use section::SectionRenderer;
