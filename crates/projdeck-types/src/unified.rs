use crate::identity::RemoteIdentity;
use crate::record::ProjectStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Whether a catalog entry is locally cloned somewhere or only known from
/// the remote hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Cloned,
    Available,
}

/// One merged, de-duplicated catalog record spanning all machines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedEntry {
    /// Identity string, or `local:<id>` for projects without a parseable
    /// remote (excluded from cross-machine merging).
    pub key: String,
    pub identity: Option<RemoteIdentity>,
    pub title: String,
    pub one_liner: String,
    pub kind: String,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub status: ProjectStatus,
    pub presence: Presence,
    /// Max of last_opened/last_pushed across every machine reporting this
    /// identity. Missing timestamps sort after any present one.
    pub most_recent_activity: Option<DateTime<Utc>>,
    /// Names of machines reporting a local clone.
    pub machines: BTreeSet<String>,
    /// Names of machines whose state document is past the staleness
    /// threshold. Advisory only; stale data never drops an entry.
    pub stale_sources: BTreeSet<String>,
    /// Local view on this machine, when the project is cloned here.
    pub local_path: Option<PathBuf>,
    pub screenshot_path: Option<PathBuf>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl UnifiedEntry {
    /// Total order for the unified catalog: most recent activity first,
    /// entries without activity last, ties broken by title then key so the
    /// ordering is deterministic across runs.
    pub fn catalog_order(&self, other: &Self) -> Ordering {
        match (self.most_recent_activity, other.most_recent_activity) {
            (Some(a), Some(b)) => b
                .cmp(&a)
                .then_with(|| self.title.cmp(&other.title))
                .then_with(|| self.key.cmp(&other.key)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .title
                .cmp(&other.title)
                .then_with(|| self.key.cmp(&other.key)),
        }
    }
}
