//! Error types for matrix construction and scene setup
use thiserror::Error;

/// Error returned when an input would produce a degenerate or non-finite result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A parameter is outside the range the operation is defined for.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        let message = message.into();
        log::debug!("rejected argument: {}", message);
        Error::InvalidArgument(message)
    }
}

/// Result type used throughout pixshade-core.
pub type Result<T> = std::result::Result<T, Error>;
