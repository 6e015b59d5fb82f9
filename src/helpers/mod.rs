//! Helper functions shared by the renderers and the generator:
//! URL building, date formatting, and small pieces of HTML markup.

pub mod date;
pub mod html;
pub mod url;

pub use date::*;
pub use html::*;
pub use url::*;
