use crate::config::Config;
use crate::{pipeline, render, report};
use anyhow::Result;
use projdeck_types::Presence;
use std::path::Path;

pub fn run(config: &Config, data_dir: &Path, verbose: bool) -> Result<()> {
    let build = pipeline::build(config, data_dir)?;
    report::warnings(&build.warnings);

    let html = render::render_dashboard(&build.entries);
    let output = config.output_path(data_dir);
    pipeline::write_swap(&output, &html)?;

    let cloned = build
        .entries
        .iter()
        .filter(|e| e.presence == Presence::Cloned)
        .count();
    report::success(&format!(
        "{} projects ({} cloned, {} available) written to {}",
        build.entries.len(),
        cloned,
        build.entries.len() - cloned,
        output.display()
    ));

    if verbose {
        for entry in &build.entries {
            report::info(&format!("  {}  [{}]", entry.title, entry.key));
        }
    }
    Ok(())
}
