// Adapters layer: concrete implementations of the profile, avatar and template ports.

pub mod directory;
pub mod http;

pub use directory::StorageDirectory;
pub use http::HttpProfileSource;
