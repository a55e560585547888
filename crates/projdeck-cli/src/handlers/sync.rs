use crate::config::Config;
use crate::{pipeline, report};
use anyhow::Result;
use std::path::Path;

pub fn run(config: &Config, data_dir: &Path) -> Result<()> {
    let (count, warnings) = pipeline::sync_only(config, data_dir)?;
    report::warnings(&warnings);
    report::success(&format!(
        "machine state refreshed: {} tracked identities",
        count
    ));
    Ok(())
}
