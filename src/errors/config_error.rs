use thiserror::Error;

/// Startup configuration failures. Any of these stops the process before a
/// single tool is served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingApiKey(&'static str),

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{name} must be greater than zero")]
    ZeroLimit { name: &'static str },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
