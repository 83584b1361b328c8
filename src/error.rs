//! Unified infrastructure error type.

use thiserror::Error;

/// The error type returned by pantry's fallible startup operations.
///
/// Request-level failures (400, 404, 500) are expressed as HTTP
/// [`Response`](crate::Response) values through
/// [`ApiError`](crate::ApiError), not as `Error`s. This type surfaces
/// infrastructure failures: reading configuration, binding to a port or
/// accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid {key}={value:?}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },
}
