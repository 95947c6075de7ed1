use anyhow::{Context, Result};
use fresh_core::StoryConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG_FILE: &str = "story.toml";

/// Isolated directory holding the story config a scenario runs with
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Create workspace with the given story config text
    pub fn with_config(toml: &str) -> Result<Self> {
        let workspace = Self::empty()?;
        fs::write(workspace.config_path(), toml).context("Failed to write story config")?;
        Ok(workspace)
    }

    /// Load workspace from fixtures directory
    pub fn from_fixture(name: &str) -> Result<Self> {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
            .join(CONFIG_FILE);

        if !fixture.exists() {
            anyhow::bail!("Fixture not found: {}", fixture.display());
        }

        let workspace = Self::empty()?;
        fs::copy(&fixture, workspace.config_path())
            .with_context(|| format!("Failed to copy fixture {}", fixture.display()))?;
        Ok(workspace)
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the story config file
    pub fn config_path(&self) -> PathBuf {
        self.path().join(CONFIG_FILE)
    }

    /// Load the story config
    pub fn load_config(&self) -> Result<StoryConfig> {
        Ok(StoryConfig::load(&self.config_path())?)
    }
}
