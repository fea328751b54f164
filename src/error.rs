//! Errors raised before a request leaves the process.

/// Failures that abort a call before any network I/O.
///
/// Transport failures are not represented here: the client absorbs them and
/// resolves the call with no envelope.
#[derive(Debug)]
pub enum ClientError {
    /// Token could not be minted (empty key/secret or signer failure)
    Signing(String),
    /// Request path is empty
    InvalidPath(String),
    /// Caller-supplied header name or value is not valid HTTP
    InvalidHeader(String),
    /// Required configuration value is missing
    MissingConfig(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Signing(msg) => {
                write!(f, "Failed to sign request token: {}", msg)
            }
            ClientError::InvalidPath(msg) => {
                write!(f, "Invalid request path: {}", msg)
            }
            ClientError::InvalidHeader(msg) => {
                write!(f, "Invalid request header: {}", msg)
            }
            ClientError::MissingConfig(key) => {
                write!(
                    f,
                    "Missing configuration: {}. Set it in the environment or pass it on the command line.",
                    key
                )
            }
        }
    }
}

impl std::error::Error for ClientError {}
