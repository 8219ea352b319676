use thiserror::Error;

/// Failures of the UDP game query protocol.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Socket level failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The server did not answer within the deadline.
    #[error("The query endpoint did not respond in time")]
    Timeout,

    /// The response did not follow the protocol.
    #[error("Malformed query response: {0}")]
    Malformed(&'static str),
}
