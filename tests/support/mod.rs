#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;
use tt::task::{decode_tasks, Task};

/// Isolated config + data directory for one test
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn init() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("data"))?;
        fs::write(
            dir.path().join("config.toml"),
            "[storage]\nkey = \"tasks\"\n\n[defaults]\npriority = \"Medium\"\n",
        )?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir().join("tasks.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<()> {
        fs::write(self.config_path(), contents)
    }

    pub fn write_tasks_raw(&self, contents: &str) -> std::io::Result<()> {
        fs::write(self.tasks_file(), contents)
    }

    pub fn read_tasks(&self) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.tasks_file())?;
        Ok(decode_tasks(&raw)?)
    }

    pub fn tt(&self) -> Command {
        let mut cmd = Command::cargo_bin("tt").expect("binary");
        cmd.env("TT_CONFIG", self.config_path())
            .env("TT_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG")
            .current_dir(self.path());
        cmd
    }

    /// Run a command with `--json` and return the `data` field
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.tt().args(args).arg("--json").output()?;
        if !output.status.success() {
            return Err(format!(
                "command {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            )
            .into());
        }
        let envelope: Value = serde_json::from_slice(&output.stdout)?;
        Ok(envelope["data"].clone())
    }

    /// Create a task and return its id
    pub fn add(&self, title: &str, priority: &str) -> Result<String, Box<dyn std::error::Error>> {
        let data = self.json(&["add", title, "--priority", priority])?;
        Ok(data["id"].as_str().ok_or("missing id")?.to_string())
    }

    /// Titles of the listed tasks, in display order
    pub fn listed_titles(&self, extra: &[&str]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let mut args = vec!["list"];
        args.extend_from_slice(extra);
        let data = self.json(&args)?;
        let tasks = data["tasks"].as_array().ok_or("missing tasks")?;
        Ok(tasks
            .iter()
            .filter_map(|task| task["title"].as_str().map(str::to_string))
            .collect())
    }
}
