use chrono::{DateTime, Duration, Utc};
use projdeck_types::{
    MachineStateDocument, Presence, ProjectRecord, ProjectStatus, RemoteIdentity, ScanWarning,
    UnifiedEntry,
};
use std::collections::{BTreeMap, BTreeSet};

/// Everything the aggregator merges: the local catalog, every readable
/// machine state document, and (optionally) the remotely-known identity
/// set. `now` is passed in so the reduction itself stays pure.
#[derive(Debug)]
pub struct AggregateInput<'a> {
    pub catalog: &'a [ProjectRecord],
    pub local_machine_name: &'a str,
    pub machines: &'a [MachineStateDocument],
    pub remote_known: &'a BTreeSet<RemoteIdentity>,
    /// No threshold means no staleness flagging; there is no assumed
    /// default.
    pub stale_after: Option<Duration>,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct AggregateOutcome {
    pub entries: Vec<UnifiedEntry>,
    pub warnings: Vec<ScanWarning>,
}

/// Merge N machine state documents plus the remotely-known repository set
/// into one ordered, de-duplicated catalog.
///
/// The activity merge is a pure max-of-timestamps reduction, so it is
/// associative and commutative across machine documents: document order
/// never changes the outcome. Running twice on unchanged inputs yields
/// identical entries.
pub fn aggregate(input: &AggregateInput) -> AggregateOutcome {
    let mut warnings = Vec::new();

    // Machines past the staleness threshold are flagged, never dropped.
    let mut stale_machines: BTreeSet<String> = BTreeSet::new();
    if let Some(threshold) = input.stale_after {
        for doc in input.machines {
            if input.now.signed_duration_since(doc.last_sync) > threshold {
                stale_machines.insert(doc.machine_name.clone());
                warnings.push(ScanWarning::StaleMachine {
                    machine_name: doc.machine_name.clone(),
                    last_sync: doc.last_sync.to_rfc3339(),
                });
            }
        }
    }

    let mut entries: BTreeMap<String, UnifiedEntry> = BTreeMap::new();

    // Local catalog first: the richest metadata source wins the title and
    // descriptive fields for its identity.
    for record in input.catalog {
        let key = entry_key(record);
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| blank_entry(key, record.origin.clone()));

        entry.title = record.title.clone();
        entry.one_liner = record.one_liner.clone();
        entry.kind = record.kind.clone();
        entry.categories = record.categories.clone();
        entry.tags = record.tags.clone();
        entry.status = record.status;
        entry.local_path = Some(record.local_path.clone());
        entry.screenshot_path = record.screenshot_path.clone();
        entry.last_modified = Some(record.last_modified);
        entry.machines.insert(input.local_machine_name.to_string());
    }

    // Machine documents: presence and the cross-machine activity maximum.
    for doc in input.machines {
        for (identity, activity) in &doc.repos {
            let key = identity.to_string();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| blank_entry(key, Some(identity.clone())));

            if entry.title.is_empty() {
                entry.title = identity.name.clone();
            }
            if activity.local_path.is_some() {
                entry.machines.insert(doc.machine_name.clone());
            }
            if stale_machines.contains(&doc.machine_name) {
                entry.stale_sources.insert(doc.machine_name.clone());
            }

            // Missing timestamps are earlier than any present one, so the
            // max over Options does the right thing.
            entry.most_recent_activity =
                max_option(entry.most_recent_activity, activity.latest_activity());
        }
    }

    // Remote overlay: identities known to the hosting provider but cloned
    // nowhere become "available" entries.
    for identity in input.remote_known {
        let key = identity.to_string();
        entries
            .entry(key.clone())
            .or_insert_with(|| blank_entry(key, Some(identity.clone())));
    }

    let mut entries: Vec<UnifiedEntry> = entries
        .into_values()
        .filter_map(|mut entry| {
            if !entry.machines.is_empty() {
                entry.presence = Presence::Cloned;
                Some(entry)
            } else if entry
                .identity
                .as_ref()
                .is_some_and(|id| input.remote_known.contains(id))
            {
                entry.presence = Presence::Available;
                Some(entry)
            } else {
                // In neither the local state of any machine nor the remote
                // set: the identity does not appear.
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| a.catalog_order(b));

    AggregateOutcome { entries, warnings }
}

fn entry_key(record: &ProjectRecord) -> String {
    match &record.origin {
        Some(identity) => identity.to_string(),
        None => format!("local:{}", record.id),
    }
}

fn blank_entry(key: String, identity: Option<RemoteIdentity>) -> UnifiedEntry {
    let title = identity
        .as_ref()
        .map(|id| id.name.clone())
        .unwrap_or_default();
    UnifiedEntry {
        key,
        identity,
        title,
        one_liner: String::new(),
        kind: "project".to_string(),
        categories: BTreeSet::new(),
        tags: BTreeSet::new(),
        status: ProjectStatus::Unknown,
        presence: Presence::Available,
        most_recent_activity: None,
        machines: BTreeSet::new(),
        stale_sources: BTreeSet::new(),
        local_path: None,
        screenshot_path: None,
        last_modified: None,
    }
}

fn max_option(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}
