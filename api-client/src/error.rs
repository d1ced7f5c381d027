use thiserror::Error;

/// Failure of one query cycle. Terminal for that cycle only; never retried
/// automatically, and the caller decides what to surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The endpoint answered with a structured error body.
    #[error("{0}")]
    Api(String),
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The response decoded as something other than the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}
