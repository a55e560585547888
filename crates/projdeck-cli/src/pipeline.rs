use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use projdeck_engine::{ScanOptions, aggregate};
use projdeck_remote::GithubClient;
use projdeck_state::StateStore;
use projdeck_types::{ProjectRecord, RemoteIdentity, ScanWarning, UnifiedEntry};
use std::collections::BTreeSet;
use std::path::Path;

/// One invocation's worth of catalog: the local records, the merged
/// unified entries, and every per-item warning collected along the way.
pub struct CatalogBuild {
    pub records: Vec<ProjectRecord>,
    pub entries: Vec<UnifiedEntry>,
    pub warnings: Vec<ScanWarning>,
}

/// Run the full engine: scan, refresh our own machine document, read every
/// machine's document, fetch the remote overlay when configured, and
/// aggregate. Per-item problems accumulate as warnings; only
/// configuration-level failures return an error.
pub fn build(config: &Config, data_dir: &Path) -> Result<CatalogBuild> {
    let outcome = projdeck_engine::scan(&ScanOptions {
        roots: config.scan.roots.clone(),
        max_depth: config.scan.max_depth,
    })?;
    let mut warnings = outcome.warnings;

    let store = StateStore::open(config.state_dir(data_dir), config.machine_id())
        .context("state directory is not writable")?;
    store
        .refresh_own(&config.machine_name(), &outcome.records, Utc::now())
        .context("failed to write machine state document")?;

    let loaded = store.load_all().context("failed to read machine state")?;
    warnings.extend(loaded.warnings);

    let remote_known = fetch_remote_overlay(config, &mut warnings);

    let aggregated = aggregate(&projdeck_engine::AggregateInput {
        catalog: &outcome.records,
        local_machine_name: &config.machine_name(),
        machines: &loaded.documents,
        remote_known: &remote_known,
        stale_after: config.state.stale_after_days.map(Duration::days),
        now: Utc::now(),
    });
    warnings.extend(aggregated.warnings);

    Ok(CatalogBuild {
        records: outcome.records,
        entries: aggregated.entries,
        warnings,
    })
}

/// Scan and refresh the own machine document only (the `sync` command).
pub fn sync_only(config: &Config, data_dir: &Path) -> Result<(usize, Vec<ScanWarning>)> {
    let outcome = projdeck_engine::scan(&ScanOptions {
        roots: config.scan.roots.clone(),
        max_depth: config.scan.max_depth,
    })?;

    let store = StateStore::open(config.state_dir(data_dir), config.machine_id())
        .context("state directory is not writable")?;
    let doc = store
        .refresh_own(&config.machine_name(), &outcome.records, Utc::now())
        .context("failed to write machine state document")?;

    Ok((doc.repos.len(), outcome.warnings))
}

/// Fetch the remotely-known identity set. Every failure mode degrades to
/// an empty set: no token means the feature is simply off, an API failure
/// is reported once and the run continues local-only.
fn fetch_remote_overlay(
    config: &Config,
    warnings: &mut Vec<ScanWarning>,
) -> BTreeSet<RemoteIdentity> {
    if !config.remote.enabled {
        return BTreeSet::new();
    }
    let Some(token) = config.remote_token() else {
        return BTreeSet::new();
    };

    let result = GithubClient::new(token, config.remote.include_archived)
        .and_then(|client| client.list_known_repos());
    overlay_or_warn(result, warnings)
}

/// Collapse an overlay fetch result: a failure becomes exactly one
/// `RemoteEnrichment` warning and the empty set, never an error.
fn overlay_or_warn(
    result: projdeck_remote::Result<BTreeSet<RemoteIdentity>>,
    warnings: &mut Vec<ScanWarning>,
) -> BTreeSet<RemoteIdentity> {
    match result {
        Ok(identities) => identities,
        Err(err) => {
            warnings.push(ScanWarning::RemoteEnrichment {
                reason: err.to_string(),
            });
            BTreeSet::new()
        }
    }
}

/// Persist content via temp-file-then-rename so readers never observe a
/// partially written artifact.
pub fn write_swap(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)
        .with_context(|| format!("output path {} is not writable", path.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
