//! Configuration file loading for htmlsync.
//!
//! Discovers and loads `htmlsync.toml` from the repository root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use htmlsync_edit::FirmwareConvention;
use htmlsync_types::convention::{
    DEFAULT_HANDLER, DEFAULT_VARIABLE, FIRMWARE_FILE, STANDALONE_FILE,
};
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "htmlsync.toml";

/// Top-level configuration from htmlsync.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HtmlsyncConfig {
    /// Locations of the two documents, relative to the repository root.
    pub files: FilesConfig,

    /// Where the firmware keeps its copy of the page.
    pub firmware: FirmwareConfig,

    /// Write strategy for `update`.
    pub update: UpdateConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub standalone: Utf8PathBuf,
    pub firmware: Utf8PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            standalone: Utf8PathBuf::from(STANDALONE_FILE),
            firmware: Utf8PathBuf::from(FIRMWARE_FILE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    /// Handler routine containing the literal (`void <handler>() {`).
    pub handler: String,

    /// Variable assigned the literal (`String <variable> = R"(`).
    pub variable: String,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            handler: DEFAULT_HANDLER.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Replace the firmware file through a temporary file and rename.
    pub atomic: bool,

    /// Whether to copy the firmware file aside before rewriting it.
    pub backup: bool,

    /// Suffix for backup files.
    pub backup_suffix: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            atomic: true,
            backup: false,
            backup_suffix: ".htmlsync.bak".to_string(),
        }
    }
}

/// Discover the htmlsync.toml config file.
///
/// Returns `None` if no config file is found in the repository root.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a htmlsync.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<HtmlsyncConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<HtmlsyncConfig> {
    let config: HtmlsyncConfig = toml::from_str(contents).context("invalid TOML")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &HtmlsyncConfig) -> anyhow::Result<()> {
    if config.firmware.handler.trim().is_empty() {
        anyhow::bail!("firmware.handler must not be empty");
    }
    if config.firmware.variable.trim().is_empty() {
        anyhow::bail!("firmware.variable must not be empty");
    }
    if config.update.backup_suffix.is_empty() {
        anyhow::bail!("update.backup_suffix must not be empty");
    }
    Ok(())
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<HtmlsyncConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(HtmlsyncConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Standalone page, resolved against the repository root.
    pub standalone: Utf8PathBuf,

    /// Firmware source, resolved against the repository root.
    pub firmware: Utf8PathBuf,

    pub convention: FirmwareConvention,

    /// Whether to write through a temporary file.
    pub atomic: bool,

    /// Backup suffix when backups are enabled.
    pub backup_suffix: Option<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: HtmlsyncConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: HtmlsyncConfig) -> Self {
        Self { config }
    }

    /// Merge with check command CLI arguments.
    ///
    /// CLI file paths replace the config file paths.
    pub fn merge_check_args(
        self,
        repo_root: &Utf8Path,
        cli_standalone: Option<&Utf8Path>,
        cli_firmware: Option<&Utf8Path>,
    ) -> MergedConfig {
        let standalone = cli_standalone.unwrap_or(self.config.files.standalone.as_path());
        let firmware = cli_firmware.unwrap_or(self.config.files.firmware.as_path());

        MergedConfig {
            standalone: resolve(repo_root, standalone),
            firmware: resolve(repo_root, firmware),
            convention: FirmwareConvention {
                handler: self.config.firmware.handler.clone(),
                variable: self.config.firmware.variable.clone(),
            },
            atomic: self.config.update.atomic,
            backup_suffix: self
                .config
                .update
                .backup
                .then(|| self.config.update.backup_suffix.clone()),
        }
    }

    /// Merge with update command CLI arguments.
    ///
    /// `--no-atomic` turns atomic writes off; `--backup` turns backups on. Neither flag can
    /// undo the opposite setting from the config file.
    pub fn merge_update_args(
        self,
        repo_root: &Utf8Path,
        cli_standalone: Option<&Utf8Path>,
        cli_firmware: Option<&Utf8Path>,
        cli_no_atomic: bool,
        cli_backup: bool,
    ) -> MergedConfig {
        let atomic = self.config.update.atomic && !cli_no_atomic;
        let backup = self.config.update.backup || cli_backup;
        let suffix = self.config.update.backup_suffix.clone();

        let mut merged = self.merge_check_args(repo_root, cli_standalone, cli_firmware);
        merged.atomic = atomic;
        merged.backup_suffix = backup.then_some(suffix);
        merged
    }
}

fn resolve(repo_root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() || repo_root.as_str() == "." {
        rel.to_path_buf()
    } else {
        repo_root.join(rel)
    }
}
