//! Configuration module

mod site;

pub use site::CollectionConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
