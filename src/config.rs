use anyhow::{Context, Result};
use std::path::PathBuf;

pub const COMMAND: &str = "mq-task";
pub const REPO: &str = "mqtask/mq-task";

/// Everything the pipeline needs to know about what it installs and where.
/// Built once at process start and passed by reference to every stage; the
/// stages themselves read no ambient state.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Canonical command name exposed on PATH.
    pub command: String,
    /// GitHub `owner/name` repository identifier.
    pub repo: String,
    /// Releases API root. Overridable so tests can point at a local server.
    pub api_base: String,
    /// Release asset host.
    pub download_base: String,
    /// Root directory the tool is installed under.
    pub install_root: PathBuf,
    /// Name of the checksum manifest asset attached to each release.
    pub manifest_name: String,
    /// Template for manifest lookup keys; `{command}` and `{artifact}` are
    /// substituted. Release packaging prefixes entries with the command
    /// name, but the convention is not guaranteed stable, hence a template.
    pub manifest_key_template: String,
    /// User's home directory, for shell profile selection.
    pub home: PathBuf,
    /// Shell program from `$SHELL`, if set.
    pub shell: Option<String>,
}

impl InstallConfig {
    /// Production configuration: GitHub hosts and `~/.mq-task`.
    pub fn standard() -> Result<Self> {
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(Self {
            command: COMMAND.to_string(),
            repo: REPO.to_string(),
            api_base: "https://api.github.com".to_string(),
            download_base: "https://github.com".to_string(),
            install_root: home.join(".mq-task"),
            manifest_name: "checksums.txt".to_string(),
            manifest_key_template: "{command}/{artifact}".to_string(),
            shell: std::env::var("SHELL").ok(),
            home,
        })
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.install_root.join("bin")
    }

    /// Render the manifest lookup key for an artifact file name.
    pub fn manifest_key(&self, artifact: &str) -> String {
        self.manifest_key_template
            .replace("{command}", &self.command)
            .replace("{artifact}", artifact)
    }
}
