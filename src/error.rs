use thiserror::Error;

/// Failures that leave the engine as `Err`.
///
/// Problems in the user's query string are not errors in this sense, they are
/// reported through the interpretation attached to the filter tree.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("{0}")]
    InvalidOption(String),
    #[error("Allocation error: {0}")]
    Allocation(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

// Helper conversions
impl From<config::ConfigError> for SearchError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
