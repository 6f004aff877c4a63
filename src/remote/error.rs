//! Typed errors for the remote API boundary

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the gateway and decoding layers.
///
/// `Unauthorized` is deliberately its own variant: the transport never acts on
/// it, the top-level dispatcher clears the session and points at `vit login`.
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    /// Login rejected by the remote system
    #[error("authentication failed: {0}")]
    #[diagnostic(code(vit::remote::auth))]
    Auth(String),

    /// 401 on any call - the stored credential is no longer accepted
    #[error("session expired or unauthorized")]
    #[diagnostic(code(vit::remote::unauthorized))]
    Unauthorized,

    /// The remote system refused a mutation (envelope success=false)
    #[error("request rejected: {0}")]
    #[diagnostic(code(vit::remote::rejected))]
    Rejected(String),

    /// Transport-level failure (connection refused, timeout, DNS, ...)
    #[error("network error: {0}")]
    #[diagnostic(
        code(vit::remote::network),
        help("check the base URL and your connection, then try again")
    )]
    Network(String),

    /// Payload did not match any shape we know how to decode
    #[error("unrecognized response shape: {0}")]
    #[diagnostic(code(vit::remote::decode))]
    Decode(String),

    /// A lookup by id matched nothing
    #[error("no {0} found matching '{1}'")]
    #[diagnostic(code(vit::remote::not_found))]
    NotFound(&'static str, String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl ApiError {
    /// Generic fallback used when the remote gives no message at all
    pub fn rejected_or_default(message: Option<String>) -> Self {
        ApiError::Rejected(message.unwrap_or_else(|| "operation failed".to_string()))
    }
}
