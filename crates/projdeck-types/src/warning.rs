use std::fmt;
use std::path::PathBuf;

/// Per-item problems collected during a scan. Every variant skips or flags
/// only the affected item; none of them aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// Declaration file present but unparsable; directory excluded.
    MalformedDeclaration { path: PathBuf, reason: String },

    /// A later-discovered project declared an id already in the catalog.
    /// The first-seen record is kept.
    DuplicateId {
        id: String,
        kept: PathBuf,
        rejected: PathBuf,
    },

    /// A directory could not be read (typically permissions).
    Unreadable { path: PathBuf, reason: String },

    /// A remote URL was present but did not match any accepted form.
    UnparsableRemote { path: PathBuf, url: String },

    /// The hosting-provider overlay could not be fetched; the run degrades
    /// to the local-only view.
    RemoteEnrichment { reason: String },

    /// A machine state document is older than the staleness threshold.
    /// Advisory: the document is still merged.
    StaleMachine {
        machine_name: String,
        last_sync: String,
    },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::MalformedDeclaration { path, reason } => {
                write!(f, "malformed declaration at {}: {}", path.display(), reason)
            }
            ScanWarning::DuplicateId { id, kept, rejected } => write!(
                f,
                "duplicate project id '{}': keeping {}, rejecting {}",
                id,
                kept.display(),
                rejected.display()
            ),
            ScanWarning::Unreadable { path, reason } => {
                write!(f, "skipping unreadable {}: {}", path.display(), reason)
            }
            ScanWarning::UnparsableRemote { path, url } => {
                write!(f, "unparsable remote url '{}' at {}", url, path.display())
            }
            ScanWarning::RemoteEnrichment { reason } => {
                write!(f, "remote enrichment unavailable: {}", reason)
            }
            ScanWarning::StaleMachine {
                machine_name,
                last_sync,
            } => write!(
                f,
                "machine '{}' last synced {} (past staleness threshold)",
                machine_name, last_sync
            ),
        }
    }
}
