use crate::identity::RemoteIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Per-machine activity for one remote identity. Overwritten in place on
/// every sync, never appended as history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MachineActivityEntry {
    #[serde(default)]
    pub local_path: Option<PathBuf>,
    #[serde(default)]
    pub last_opened: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_pushed: Option<DateTime<Utc>>,
}

impl MachineActivityEntry {
    /// Most recent of the two activity timestamps, if either is present.
    pub fn latest_activity(&self) -> Option<DateTime<Utc>> {
        match (self.last_opened, self.last_pushed) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// One machine's view of the repositories it knows about. Owned exclusively
/// by its originating machine; other machines only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineStateDocument {
    pub machine_id: String,
    pub machine_name: String,
    pub last_sync: DateTime<Utc>,
    #[serde(default)]
    pub repos: BTreeMap<RemoteIdentity, MachineActivityEntry>,
}

impl MachineStateDocument {
    pub fn new(machine_id: impl Into<String>, machine_name: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            machine_name: machine_name.into(),
            last_sync: DateTime::<Utc>::MIN_UTC,
            repos: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn latest_activity_prefers_max() {
        let t1 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let entry = MachineActivityEntry {
            local_path: None,
            last_opened: Some(t1),
            last_pushed: Some(t2),
        };
        assert_eq!(entry.latest_activity(), Some(t2));

        let entry = MachineActivityEntry {
            last_opened: None,
            last_pushed: Some(t1),
            ..Default::default()
        };
        assert_eq!(entry.latest_activity(), Some(t1));

        assert_eq!(MachineActivityEntry::default().latest_activity(), None);
    }

    #[test]
    fn document_serializes_identities_as_map_keys() {
        let mut doc = MachineStateDocument::new("m1", "laptop");
        doc.repos.insert(
            RemoteIdentity::new("github.com", "alice", "foo"),
            MachineActivityEntry {
                local_path: Some(PathBuf::from("/code/foo")),
                ..Default::default()
            },
        );

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"github.com/alice/foo\""));

        let back: MachineStateDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
