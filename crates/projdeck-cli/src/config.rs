use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolve the data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. PROJDECK_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.projdeck (fallback for systems without XDG)
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("PROJDECK_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("projdeck"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".projdeck"));
    }

    anyhow::bail!("could not determine data directory: no HOME or XDG data directory found")
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

fn default_max_depth() -> usize {
    3
}

fn default_port() -> u16 {
    8847
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root directories to scan. The only required run-time configuration.
    pub roots: Vec<PathBuf>,
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Dashboard path; defaults to `<data-dir>/dashboard.html`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StateConfig {
    /// Shared state directory; defaults to `<data-dir>/state`.
    pub dir: Option<PathBuf>,
    /// Staleness threshold for peer documents. Unset means no flagging;
    /// there is deliberately no assumed default.
    pub stale_after_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    /// Falls back to the GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    pub include_archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Command to launch instead of the platform opener.
    pub editor_command: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            editor_command: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub machine_id: Option<String>,
    pub machine_name: Option<String>,
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub state: StateConfig,
    pub remote: RemoteConfig,
    pub serve: ServeConfig,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    pub fn output_path(&self, data_dir: &Path) -> PathBuf {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join("dashboard.html"))
    }

    pub fn state_dir(&self, data_dir: &Path) -> PathBuf {
        self.state
            .dir
            .clone()
            .unwrap_or_else(|| data_dir.join("state"))
    }

    /// Effective machine identity: the configured id, or the machine name
    /// as a fallback so an uninitialized run still writes a valid
    /// document.
    pub fn machine_id(&self) -> String {
        self.machine_id
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.machine_name())
    }

    pub fn machine_name(&self) -> String {
        self.machine_name
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("HOSTNAME").ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "local".to_string())
    }

    /// Token for the hosting-provider overlay, if any.
    pub fn remote_token(&self) -> Option<String> {
        self.remote
            .token
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_nonexistent_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(&tmp.path().join("missing.toml")).unwrap();
        assert!(config.scan.roots.is_empty());
        assert_eq!(config.scan.max_depth, 3);
        assert_eq!(config.serve.port, 8847);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.machine_id = Some("m-1".to_string());
        config.scan.roots = vec![PathBuf::from("/code")];
        config.scan.max_depth = 4;
        config.state.stale_after_days = Some(14);

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.machine_id.as_deref(), Some("m-1"));
        assert_eq!(loaded.scan.roots, vec![PathBuf::from("/code")]);
        assert_eq!(loaded.scan.max_depth, 4);
        assert_eq!(loaded.state.stale_after_days, Some(14));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[scan]\nroots = [\"/code\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scan.max_depth, 3);
        assert_eq!(config.serve.port, 8847);
        assert!(config.state.stale_after_days.is_none());
        assert!(!config.remote.enabled);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "scan = \"not a table\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
