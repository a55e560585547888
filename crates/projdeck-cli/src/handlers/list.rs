use crate::config::Config;
use crate::types::OutputFormat;
use crate::{pipeline, report};
use anyhow::Result;
use projdeck_types::{Presence, UnifiedEntry};
use std::path::Path;

pub fn run(config: &Config, data_dir: &Path, format: OutputFormat) -> Result<()> {
    let build = pipeline::build(config, data_dir)?;
    report::warnings(&build.warnings);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&build.entries)?);
        }
        OutputFormat::Plain => {
            for entry in &build.entries {
                report::info(&plain_line(entry));
            }
            report::info(&format!("{} projects", build.entries.len()));
        }
    }
    Ok(())
}

fn plain_line(entry: &UnifiedEntry) -> String {
    let presence = match entry.presence {
        Presence::Cloned => "cloned",
        Presence::Available => "available",
    };
    let activity = entry
        .most_recent_activity
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let machines = if entry.machines.is_empty() {
        "-".to_string()
    } else {
        entry
            .machines
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "{:<32} {:<10} {:<12} {}",
        entry.title, presence, activity, machines
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use projdeck_types::ProjectStatus;
    use std::collections::BTreeSet;

    fn entry(title: &str, presence: Presence) -> UnifiedEntry {
        UnifiedEntry {
            key: format!("github.com/acme/{}", title),
            identity: None,
            title: title.to_string(),
            one_liner: String::new(),
            kind: "project".to_string(),
            categories: BTreeSet::new(),
            tags: BTreeSet::new(),
            status: ProjectStatus::Unknown,
            presence,
            most_recent_activity: None,
            machines: BTreeSet::new(),
            stale_sources: BTreeSet::new(),
            local_path: None,
            screenshot_path: None,
            last_modified: None,
        }
    }

    #[test]
    fn plain_line_marks_presence_and_missing_activity() {
        let line = plain_line(&entry("widget", Presence::Available));
        assert!(line.contains("widget"));
        assert!(line.contains("available"));
        assert!(line.contains(" - "));
    }
}
