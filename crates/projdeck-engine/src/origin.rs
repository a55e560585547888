use projdeck_types::RemoteIdentity;
use std::path::Path;

/// Outcome of inspecting a project root's version-control remote
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginResolution {
    /// No remote configuration, or an ambiguous one (multiple remotes).
    /// The project stays local-only.
    None,
    /// A single remote URL that normalized to a canonical identity.
    Identity(RemoteIdentity),
    /// A single remote URL that matched none of the accepted forms.
    Unparsable(String),
}

/// Inspect `<root>/.git/config` and normalize the remote URL.
///
/// The resolver only accepts an unambiguous configuration: exactly one
/// remote section. No config, no remote, or several remotes all resolve to
/// `OriginResolution::None` without a warning; an unparsable URL is
/// surfaced so the scanner can report it.
pub fn resolve_origin(project_root: &Path) -> OriginResolution {
    let config_path = project_root.join(".git").join("config");
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(_) => return OriginResolution::None,
    };

    let urls = remote_urls(&content);
    match urls.as_slice() {
        [url] => match parse_remote_url(url) {
            Some(identity) => OriginResolution::Identity(identity),
            None => OriginResolution::Unparsable(url.clone()),
        },
        _ => OriginResolution::None,
    }
}

/// Extract the `url` value of every `[remote "..."]` section. The git
/// config format consumed here is only two line shapes: bracketed section
/// headers and `key = value` assignments.
fn remote_urls(config: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut in_remote = false;

    for line in config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_remote = line.starts_with("[remote ");
            continue;
        }
        if in_remote
            && let Some((key, value)) = line.split_once('=')
            && key.trim() == "url"
        {
            urls.push(value.trim().to_string());
        }
    }

    urls
}

/// Normalize a remote URL to its `(host, owner, name)` triple.
///
/// Accepted forms (a fixed grammar, not general URL parsing):
/// - `git@host:owner/name(.git)` (SCP-like SSH)
/// - `ssh://git@host/owner/name(.git)`
/// - `http(s)://host/owner/name(.git)`
///
/// Anything else returns `None`: canonicalization documents failure, it
/// never throws.
pub fn parse_remote_url(url: &str) -> Option<RemoteIdentity> {
    let url = url.trim();

    let (host, path) = if let Some(rest) = url.strip_prefix("ssh://") {
        split_host_path(strip_user(rest), '/')?
    } else if let Some(rest) = url.strip_prefix("https://") {
        split_host_path(rest, '/')?
    } else if let Some(rest) = url.strip_prefix("http://") {
        split_host_path(rest, '/')?
    } else if url.contains('@') && !url.contains("://") {
        // SCP-like: user@host:path
        split_host_path(strip_user(url), ':')?
    } else {
        return None;
    };

    if host.is_empty() {
        return None;
    }

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    // Exactly two segments: owner/name. Case is preserved as declared.
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    Some(RemoteIdentity::new(host, owner, name))
}

fn strip_user(s: &str) -> &str {
    match s.split_once('@') {
        Some((_, rest)) => rest,
        None => s,
    }
}

fn split_host_path(s: &str, sep: char) -> Option<(&str, &str)> {
    s.split_once(sep)
}
