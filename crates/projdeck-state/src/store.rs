use crate::Result;
use chrono::{DateTime, Utc};
use projdeck_types::{
    MachineActivityEntry, MachineStateDocument, ProjectRecord, RemoteIdentity, ScanWarning,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All readable machine documents plus warnings for the unreadable ones.
/// A corrupt peer document never fails the load.
#[derive(Debug, Default)]
pub struct LoadedState {
    pub documents: Vec<MachineStateDocument>,
    pub warnings: Vec<ScanWarning>,
}

/// Store over a directory of `<machine_id>.json` documents.
pub struct StateStore {
    dir: PathBuf,
    machine_id: String,
}

impl StateStore {
    pub fn open(dir: impl Into<PathBuf>, machine_id: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            machine_id: machine_id.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn own_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.machine_id))
    }

    /// Read every machine's document, own included, sorted by machine id
    /// so the result is deterministic regardless of directory order.
    pub fn load_all(&self) -> Result<LoadedState> {
        let mut state = LoadedState::default();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }

            match read_document(&path) {
                Ok(doc) => state.documents.push(doc),
                Err(reason) => state.warnings.push(ScanWarning::Unreadable { path, reason }),
            }
        }

        state.documents.sort_by(|a, b| a.machine_id.cmp(&b.machine_id));
        Ok(state)
    }

    /// Read this machine's own document, if one has been written yet.
    pub fn load_own(&self) -> Result<Option<MachineStateDocument>> {
        let path = self.own_path();
        if !path.exists() {
            return Ok(None);
        }
        match read_document(&path) {
            Ok(doc) => Ok(Some(doc)),
            // Our own document being corrupt is recoverable: the next
            // refresh rewrites it wholesale.
            Err(_) => Ok(None),
        }
    }

    /// Write this machine's document wholesale. The serialized bytes land
    /// in a temp file first and are renamed over the target, so a killed
    /// process never leaves a truncated document behind.
    pub fn save_own(&self, doc: &MachineStateDocument) -> Result<()> {
        let path = self.own_path();
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Rebuild and persist this machine's document from the current
    /// catalog: `last_sync` moves to `now`, the repo map is replaced with
    /// the identities currently cloned here, and activity timestamps for
    /// retained identities are carried forward from the previous document.
    /// Identities no longer local are dropped; their history persists only
    /// if another machine still reports them.
    pub fn refresh_own(
        &self,
        machine_name: &str,
        catalog: &[ProjectRecord],
        now: DateTime<Utc>,
    ) -> Result<MachineStateDocument> {
        let previous = self.load_own()?.map(|d| d.repos).unwrap_or_default();

        let mut repos: BTreeMap<RemoteIdentity, MachineActivityEntry> = BTreeMap::new();
        for record in catalog {
            let Some(identity) = &record.origin else {
                // Local-only projects never enter cross-machine merging.
                continue;
            };
            let carried = previous.get(identity);
            repos.insert(
                identity.clone(),
                MachineActivityEntry {
                    local_path: Some(record.local_path.clone()),
                    last_opened: carried.and_then(|e| e.last_opened),
                    last_pushed: carried.and_then(|e| e.last_pushed),
                },
            );
        }

        let doc = MachineStateDocument {
            machine_id: self.machine_id.clone(),
            machine_name: machine_name.to_string(),
            last_sync: now,
            repos,
        };
        self.save_own(&doc)?;
        Ok(doc)
    }

    /// Record a launch event for an identity this machine knows about.
    /// Returns false (and writes nothing) when the identity is not in the
    /// own document.
    pub fn mark_opened(&self, identity: &RemoteIdentity, at: DateTime<Utc>) -> Result<bool> {
        let Some(mut doc) = self.load_own()? else {
            return Ok(false);
        };
        let Some(entry) = doc.repos.get_mut(identity) else {
            return Ok(false);
        };
        entry.last_opened = Some(at);
        doc.last_sync = at;
        self.save_own(&doc)?;
        Ok(true)
    }
}

fn read_document(path: &Path) -> std::result::Result<MachineStateDocument, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use projdeck_types::ProjectStatus;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn identity(name: &str) -> RemoteIdentity {
        RemoteIdentity::new("github.com", "alice", name)
    }

    fn record(id: &str, origin: Option<RemoteIdentity>) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            title: id.to_string(),
            one_liner: String::new(),
            kind: "project".to_string(),
            categories: BTreeSet::new(),
            tags: BTreeSet::new(),
            status: ProjectStatus::Unknown,
            local_path: PathBuf::from("/code").join(id),
            screenshot_path: None,
            last_modified: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            origin,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path(), "m1").unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let doc = store
            .refresh_own("laptop", &[record("foo", Some(identity("foo")))], now)
            .unwrap();

        let loaded = store.load_all().unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.documents, vec![doc]);
    }

    #[test]
    fn refresh_carries_forward_activity_and_drops_gone_identities() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path(), "m1").unwrap();

        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        store
            .refresh_own(
                "laptop",
                &[
                    record("keep", Some(identity("keep"))),
                    record("gone", Some(identity("gone"))),
                ],
                t0,
            )
            .unwrap();
        assert!(store.mark_opened(&identity("keep"), t0).unwrap());

        let doc = store
            .refresh_own("laptop", &[record("keep", Some(identity("keep")))], t1)
            .unwrap();

        assert_eq!(doc.last_sync, t1);
        assert_eq!(doc.repos.len(), 1);
        let entry = doc.repos.get(&identity("keep")).unwrap();
        assert_eq!(entry.last_opened, Some(t0));
        assert!(!doc.repos.contains_key(&identity("gone")));
    }

    #[test]
    fn local_only_projects_are_not_written() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path(), "m1").unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let doc = store.refresh_own("laptop", &[record("solo", None)], now).unwrap();
        assert!(doc.repos.is_empty());
    }

    #[test]
    fn corrupt_peer_document_is_a_warning_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path(), "m1").unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        store.refresh_own("laptop", &[], now).unwrap();
        std::fs::write(tmp.path().join("m2.json"), "{ not json").unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert!(matches!(
            loaded.warnings.as_slice(),
            [ScanWarning::Unreadable { .. }]
        ));
    }

    #[test]
    fn mark_opened_ignores_unknown_identities() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path(), "m1").unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        assert!(!store.mark_opened(&identity("nope"), now).unwrap());

        store.refresh_own("laptop", &[record("foo", Some(identity("foo")))], now).unwrap();
        assert!(!store.mark_opened(&identity("other"), now).unwrap());
        assert!(store.mark_opened(&identity("foo"), now).unwrap());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path(), "m1").unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        store.refresh_own("laptop", &[], now).unwrap();

        let names: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["m1.json".to_string()]);
    }
}
