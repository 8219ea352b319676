use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the game panel's HTTP API.
///
/// Status codes the panel uses with a specific meaning get their own variant so callers
/// can turn them into precise user-facing outcomes; everything else is `UnexpectedStatus`.
#[derive(Error, Debug)]
pub enum PanelError {
    /// 403 Forbidden: the API key lacks the permission for this call.
    #[error("The panel denied access to this action")]
    AccessDenied,

    /// 404 Not Found: unknown server identifier or file path.
    #[error("The panel could not find the requested resource")]
    NotFound,

    /// 502 Bad Gateway: the panel could not reach the game server daemon, usually because
    /// the server is offline.
    #[error("The game server is offline")]
    ServerOffline,

    /// Any other non-success status.
    #[error("The panel responded with unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The call did not complete within its deadline.
    #[error("The panel did not respond in time")]
    Timeout,

    /// Transport or decoding failure.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl PanelError {
    /// Maps a non-success HTTP status to its error kind.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::FORBIDDEN => Self::AccessDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::BAD_GATEWAY => Self::ServerOffline,
            other => Self::UnexpectedStatus(other.as_u16()),
        }
    }
}
