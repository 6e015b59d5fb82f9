//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::FeedConfig;
pub use site::HighlightConfig;
pub use site::MathConfig;
pub use site::PagesConfig;
