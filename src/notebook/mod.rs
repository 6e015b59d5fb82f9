//! Notebook module - document parsing and cell-by-cell rendering

mod document;
pub mod math;
mod render;

pub use document::{Cell, CellMetadata, MimeBundle, NotebookDocument, Output, SourceText};
pub use math::{MathEngine, MathJax};
pub use render::{BlockKind, NotebookRenderer, RenderedBlock, RenderedNotebook};
