use crate::loader::{self, SCREENSHOT_FILE};
use crate::origin::{OriginResolution, resolve_origin};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use projdeck_types::{ProjectRecord, ScanWarning};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never descended into: dependency trees, build output, VCS
/// internals. Hidden directories are skipped as well.
const IGNORE_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "venv",
    "env",
    "__pycache__",
    "build",
    "dist",
];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Root directories to scan. Roots that do not exist are skipped; zero
    /// existing roots is a configuration error.
    pub roots: Vec<PathBuf>,
    /// Maximum traversal depth below each root.
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            max_depth: 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Discovered records, sorted by local path. Two scans of an unchanged
    /// tree yield identical outcomes.
    pub records: Vec<ProjectRecord>,
    pub warnings: Vec<ScanWarning>,
}

/// Walk the configured roots and produce one normalized record per project.
///
/// A directory qualifies as a project root the first time a declaration
/// file is found directly inside it; traversal does not descend further
/// into a qualified root. Per-item failures become warnings, never errors.
pub fn scan(options: &ScanOptions) -> Result<ScanOutcome> {
    let existing_roots: Vec<&PathBuf> =
        options.roots.iter().filter(|r| r.is_dir()).collect();
    if existing_roots.is_empty() {
        return Err(Error::Config(format!(
            "no configured root directory exists (checked {})",
            options
                .roots
                .iter()
                .map(|r| r.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let mut outcome = ScanOutcome::default();
    let mut seen_paths: BTreeSet<PathBuf> = BTreeSet::new();
    let mut seen_ids: BTreeSet<String> = BTreeSet::new();

    for root in existing_roots {
        scan_root(root, options.max_depth, &mut outcome, &mut seen_paths, &mut seen_ids);
    }

    outcome.records.sort_by(|a, b| a.local_path.cmp(&b.local_path));
    Ok(outcome)
}

fn scan_root(
    root: &Path,
    max_depth: usize,
    outcome: &mut ScanOutcome,
    seen_paths: &mut BTreeSet<PathBuf>,
    seen_ids: &mut BTreeSet<String>,
) {
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                outcome.warnings.push(ScanWarning::Unreadable {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || IGNORE_DIRS.contains(&name.as_ref()) {
            walker.skip_current_dir();
            continue;
        }

        let dir = entry.path();
        if !dir.join(loader::DECLARATION_FILE).is_file() {
            continue;
        }

        // Qualified project root: never descend further (projects are not
        // nested for discovery purposes), whatever happens below.
        walker.skip_current_dir();

        let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        if !seen_paths.insert(canonical.clone()) {
            continue;
        }

        match build_record(dir, canonical) {
            Ok((record, warning)) => {
                if let Some(w) = warning {
                    outcome.warnings.push(w);
                }
                if seen_ids.insert(record.id.clone()) {
                    outcome.records.push(record);
                } else {
                    let kept = outcome
                        .records
                        .iter()
                        .find(|r| r.id == record.id)
                        .map(|r| r.local_path.clone())
                        .unwrap_or_default();
                    outcome.warnings.push(ScanWarning::DuplicateId {
                        id: record.id,
                        kept,
                        rejected: record.local_path,
                    });
                }
            }
            Err(Error::Parse(reason)) => {
                outcome.warnings.push(ScanWarning::MalformedDeclaration {
                    path: dir.join(loader::DECLARATION_FILE),
                    reason,
                });
            }
            Err(err) => {
                outcome.warnings.push(ScanWarning::Unreadable {
                    path: dir.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

fn build_record(
    dir: &Path,
    local_path: PathBuf,
) -> Result<(ProjectRecord, Option<ScanWarning>)> {
    let decl = loader::load_declaration(dir)?
        .ok_or_else(|| Error::Parse("declaration vanished mid-scan".to_string()))?;

    let screenshot = dir.join(SCREENSHOT_FILE);
    let screenshot_path = screenshot.is_file().then_some(screenshot);

    let (origin, warning) = match resolve_origin(dir) {
        OriginResolution::Identity(identity) => (Some(identity), None),
        OriginResolution::None => (None, None),
        OriginResolution::Unparsable(url) => (
            None,
            Some(ScanWarning::UnparsableRemote {
                path: dir.to_path_buf(),
                url,
            }),
        ),
    };

    let record = ProjectRecord {
        id: decl.id,
        title: decl.title,
        one_liner: decl.one_liner,
        kind: decl.kind,
        categories: decl.categories,
        tags: decl.tags,
        status: decl.status,
        local_path,
        screenshot_path,
        last_modified: folder_mtime(dir),
        origin,
    };

    Ok((record, warning))
}

/// Most recent modification time of the project root and its direct
/// children. Bounded on purpose: a deep recursive stat would dominate scan
/// cost on large dependency trees.
fn folder_mtime(dir: &Path) -> DateTime<Utc> {
    let mut latest = mtime_of(dir);

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            if let Some(t) = entry.metadata().ok().and_then(|m| m.modified().ok()) {
                let t: DateTime<Utc> = t.into();
                if latest.is_none_or(|l| t > l) {
                    latest = Some(t);
                }
            }
        }
    }

    latest.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn mtime_of(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(Into::into)
}
