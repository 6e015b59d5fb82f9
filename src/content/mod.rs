//! Content module - page sections, blog metadata, and the content store

mod metadata;
mod section;
mod store;

pub use metadata::{MetadataTable, PostSummary};
pub use section::{parse_sections, ContentBlock, PageSection};
pub use store::{ContentStore, FsContentStore, MemoryStore};
