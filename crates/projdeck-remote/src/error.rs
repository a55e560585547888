use std::fmt;

/// Result type for projdeck-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while talking to the hosting provider.
/// Callers degrade to the local-only view on any of these; nothing here is
/// ever fatal to a scan.
#[derive(Debug)]
pub enum Error {
    /// Transport-level failure (DNS, TLS, timeout)
    Http(reqwest::Error),

    /// The provider answered with a non-success status (typically auth)
    Status(u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status(code) => write!(f, "provider returned status {}", code),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
