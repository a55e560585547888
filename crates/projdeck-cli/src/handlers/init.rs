use crate::config::Config;
use crate::report;
use anyhow::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub fn run(data_dir: &Path, config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    let mut config = Config::default();
    config.machine_id = Some(Uuid::new_v4().to_string());
    config.machine_name = std::env::var("HOSTNAME").ok().filter(|s| !s.is_empty());
    config.scan.roots = vec![default_root()];
    config.save_to(config_path)?;

    report::success(&format!("wrote starter config to {}", config_path.display()));
    report::info(&format!(
        "data directory: {}\nedit [scan] roots, then run `projdeck generate`",
        data_dir.display()
    ));
    Ok(())
}

fn default_root() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let coding = home.join("Coding");
    if coding.is_dir() { coding } else { home }
}
