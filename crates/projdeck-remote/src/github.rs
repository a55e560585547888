use crate::Result;
use projdeck_types::RemoteIdentity;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const PAGE_SIZE: usize = 100;

/// Minimal slice of the repository payload we care about.
#[derive(Debug, Deserialize)]
struct RawRepo {
    full_name: String,
    #[serde(default)]
    archived: bool,
}

/// Blocking GitHub client for the "available" overlay. The engine is
/// synchronous end to end; enrichment runs once per invocation before any
/// server starts, so a blocking client keeps the call site trivial.
pub struct GithubClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
    include_archived: bool,
}

impl GithubClient {
    pub fn new(token: impl Into<String>, include_archived: bool) -> Result<Self> {
        Self::with_api_base(token, include_archived, GITHUB_API_BASE)
    }

    /// Point the client at a different base URL (used by tests).
    pub fn with_api_base(
        token: impl Into<String>,
        include_archived: bool,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent("projdeck")
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            token: token.into(),
            include_archived,
        })
    }

    /// List every repository the authenticated user can see, normalized to
    /// canonical identities. One paginated pass, no retries: a failure
    /// degrades the whole overlay rather than looping.
    pub fn list_known_repos(&self) -> Result<BTreeSet<RemoteIdentity>> {
        let mut identities = BTreeSet::new();

        for page in 1.. {
            let url = format!(
                "{}/user/repos?per_page={}&page={}",
                self.api_base, PAGE_SIZE, page
            );
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .header("Accept", "application/vnd.github+json")
                .send()?;

            let status = response.status();
            if !status.is_success() {
                return Err(crate::Error::Status(status.as_u16()));
            }

            let repos: Vec<RawRepo> = response.json()?;
            let last_page = repos.len() < PAGE_SIZE;

            identities.extend(collect_identities(repos, self.include_archived));

            if last_page {
                break;
            }
        }

        Ok(identities)
    }
}

fn collect_identities(repos: Vec<RawRepo>, include_archived: bool) -> Vec<RemoteIdentity> {
    repos
        .into_iter()
        .filter(|r| include_archived || !r.archived)
        .filter_map(|r| {
            let (owner, name) = r.full_name.split_once('/')?;
            Some(RemoteIdentity::new("github.com", owner, name))
        })
        .collect()
}
