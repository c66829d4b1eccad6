use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Transport-level failure: DNS, TLS, connect, timeout, reset.
    /// HTTP status codes are never errors at this layer — see
    /// [`crate::session::Session::fetch`].
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid target URL \"{url}\": {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("probe deadline of {secs}s exceeded")]
    DeadlineExceeded { secs: u64 },
}
