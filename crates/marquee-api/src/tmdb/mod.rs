pub mod client;
pub mod error;
pub mod types;

pub use client::TmdbClient;
pub use error::ProviderError;
