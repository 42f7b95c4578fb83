pub mod api_client;
pub mod dto;

pub use api_client::{ClientBuildError, MetabaseApiClient};
