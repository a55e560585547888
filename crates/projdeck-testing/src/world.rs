use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Machine id the world's own config uses.
pub const TEST_MACHINE_ID: &str = "test-machine";

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use projdeck_testing::TestWorld;
///
/// let world = TestWorld::new();
/// world.add_project("alpha", r#"{"id": "alpha"}"#);
/// world.command().arg("generate").assert().success();
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    root: PathBuf,
    state_dir: PathBuf,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create an isolated environment with a written config.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let data_dir = base.join(".projdeck");
        let root = base.join("Coding");
        let state_dir = base.join("state");

        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        std::fs::create_dir_all(&root).expect("Failed to create scan root");
        std::fs::create_dir_all(&state_dir).expect("Failed to create state dir");

        let world = Self {
            temp_dir,
            data_dir,
            root,
            state_dir,
        };
        world.write_default_config();
        world
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.data_dir.join("dashboard.html")
    }

    fn write_default_config(&self) {
        self.write_config(&format!(
            r#"machine_id = "{TEST_MACHINE_ID}"
machine_name = "test-laptop"

[scan]
roots = [{root:?}]
max_depth = 3

[state]
dir = {state:?}
"#,
            root = self.root.display().to_string(),
            state = self.state_dir.display().to_string(),
        ));
    }

    /// Overwrite the config file wholesale.
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.data_dir.join("config.toml"), content)
            .expect("Failed to write config");
    }

    /// Create a project directory with the given declaration content.
    pub fn add_project(&self, name: &str, declaration: &str) -> PathBuf {
        let dir = self.root.join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create project dir");
        std::fs::write(dir.join("catalogue.json"), declaration)
            .expect("Failed to write declaration");
        dir
    }

    /// Drop a screenshot asset into an existing project directory.
    pub fn add_screenshot(&self, name: &str) {
        // A tiny valid PNG header is enough: presence is binary-detected,
        // never content-validated.
        let bytes: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        std::fs::write(self.root.join(name).join("screenshot.png"), bytes)
            .expect("Failed to write screenshot");
    }

    /// Give an existing project a git remote via a minimal `.git/config`.
    pub fn add_git_remote(&self, name: &str, url: &str) {
        let git_dir = self.root.join(name).join(".git");
        std::fs::create_dir_all(&git_dir).expect("Failed to create .git dir");
        std::fs::write(
            git_dir.join("config"),
            format!("[remote \"origin\"]\n\turl = {}\n", url),
        )
        .expect("Failed to write git config");
    }

    /// Write a peer machine's state document into the state directory.
    pub fn write_machine_doc(&self, machine_id: &str, content: &str) {
        std::fs::write(self.state_dir.join(format!("{}.json", machine_id)), content)
            .expect("Failed to write machine doc");
    }

    /// Read this world's own machine document, if written.
    pub fn read_own_machine_doc(&self) -> Result<serde_json::Value> {
        let path = self.state_dir.join(format!("{}.json", TEST_MACHINE_ID));
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// A `projdeck` command pointed at this world's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("projdeck").expect("binary exists");
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd.current_dir(self.temp_dir.path());
        cmd
    }
}
