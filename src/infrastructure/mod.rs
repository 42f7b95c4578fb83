pub mod config;
pub mod container;
pub mod http;

// Re-export commonly used items
pub use config::ClientConfig;
pub use container::AppContainer;
pub use http::MetabaseApiClient;
