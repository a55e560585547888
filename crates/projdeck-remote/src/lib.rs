pub mod error;
mod github;

pub use error::{Error, Result};
pub use github::{GITHUB_API_BASE, GithubClient};
