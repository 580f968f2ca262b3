use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the blog or image service failed, or its response could
    /// not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-success status code
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response was well-formed but not what the blog API promises.
    #[error("Invariant: {0}")]
    Invariant(String),
}

pub type PublishResult<T> = Result<T, PublishError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
}
