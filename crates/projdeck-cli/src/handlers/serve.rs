use crate::config::Config;
use crate::relay::{self, RelayState};
use crate::{pipeline, render, report};
use anyhow::{Context, Result};
use projdeck_state::StateStore;
use std::path::Path;

/// Generate once, then serve the result with the editor-launch relay.
pub fn run(config: &Config, data_dir: &Path, port: Option<u16>) -> Result<()> {
    let build = pipeline::build(config, data_dir)?;
    report::warnings(&build.warnings);

    let html = render::render_dashboard(&build.entries);
    let output = config.output_path(data_dir);
    pipeline::write_swap(&output, &html)?;

    let store = StateStore::open(config.state_dir(data_dir), config.machine_id())
        .context("state directory is not writable")?;
    let state = RelayState::new(
        output,
        &build.records,
        store,
        config.serve.editor_command.clone(),
    );

    relay::serve(state, port.unwrap_or(config.serve.port))
}
