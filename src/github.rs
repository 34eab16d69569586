mod auth;
mod client;
mod client_builder;
mod error;
pub mod models;
mod result;

pub use auth::Auth;
pub use client::Client;
pub use client_builder::ClientBuilder;
pub use error::Error;
pub use result::Result;

/// The default base URL of the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";
