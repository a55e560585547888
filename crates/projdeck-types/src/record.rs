use crate::identity::RemoteIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Lifecycle status declared in a project's catalogue file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    #[default]
    Unknown,
}

impl ProjectStatus {
    /// Lenient parse used by the metadata loader: anything unrecognized
    /// maps to `Unknown` rather than failing the scan.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => ProjectStatus::Active,
            "archived" => ProjectStatus::Archived,
            _ => ProjectStatus::Unknown,
        }
    }
}

/// One discovered local project, normalized from its declaration file plus
/// filesystem metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub one_liner: String,
    pub kind: String,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub status: ProjectStatus,
    pub local_path: PathBuf,
    pub screenshot_path: Option<PathBuf>,
    pub last_modified: DateTime<Utc>,
    pub origin: Option<RemoteIdentity>,
}

impl ProjectRecord {
    pub fn screenshot_present(&self) -> bool {
        self.screenshot_path.is_some()
    }
}
