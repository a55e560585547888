use std::fmt;

/// Result type for projdeck-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A remote identity string did not have the `host/owner/name` shape
    InvalidIdentity(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidIdentity(s) => write!(f, "Invalid remote identity: {}", s),
        }
    }
}

impl std::error::Error for Error {}
