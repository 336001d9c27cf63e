//! Domain types and validators for deploy configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::profile::PlatformProfile;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, loaded once and threaded into every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub service: ServiceConfig,
    pub paths: PathsConfig,
    pub swap: SwapConfig,
    pub runtime: RuntimeConfig,
    pub verify: VerifyConfig,
    /// Profiles the update dispatcher may select.
    pub profiles: Vec<PlatformProfile>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            paths: PathsConfig::default(),
            swap: SwapConfig::default(),
            runtime: RuntimeConfig::default(),
            verify: VerifyConfig::default(),
            profiles: PlatformProfile::ALL.to_vec(),
        }
    }
}

/// The single service container and its image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Reserved container name.
    pub container_name: String,
    pub image_tag: String,
    /// Port mapped 1:1 host-to-container.
    pub port: u16,
    /// Mount point of the persistent config dir inside every container.
    pub container_config_dir: String,
    /// Long-running subcommand of the service container.
    pub command: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            container_name: "nanobot".to_string(),
            image_tag: "nanobot".to_string(),
            port: 18790,
            container_config_dir: "/root/.nanobot".to_string(),
            command: "gateway".to_string(),
        }
    }
}

/// Host paths. Relative `config_dir` is under `$HOME`; relative `source_dir`
/// is under the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub config_dir: PathBuf,
    /// File inside `config_dir` whose presence means "already configured".
    pub marker_file: String,
    /// Source checkout used as build context and `git pull` target.
    pub source_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(".nanobot"),
            marker_file: "config.json".to_string(),
            source_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    pub swap_file: PathBuf,
    pub mount_table: PathBuf,
    /// Swap-size manager executable looked up on `PATH`.
    pub manager_command: String,
    pub manager_config: PathBuf,
    pub manager_service: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            swap_file: PathBuf::from("/swapfile"),
            mount_table: PathBuf::from("/etc/fstab"),
            manager_command: "dphys-swapfile".to_string(),
            manager_config: PathBuf::from("/etc/dphys-swapfile"),
            manager_service: "dphys-swapfile".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Container runtime executable.
    pub command: String,
    /// Vendor install script fetched when the runtime is missing.
    pub installer_url: String,
    /// Group granting non-root access to the runtime.
    pub group: String,
    pub command_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: "docker".to_string(),
            installer_url: "https://get.docker.com".to_string(),
            group: "docker".to_string(),
            command_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Delay before the single "is it running" query.
    pub settle_secs: u64,
    /// Log lines dumped when verification fails.
    pub log_tail: u32,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            settle_secs: 3,
            log_tail: 50,
        }
    }
}

impl DeployConfig {
    /// Anchor relative paths: `config_dir` under `home`, `source_dir` under `cwd`.
    #[must_use]
    pub fn resolve(mut self, home: &Path, cwd: &Path) -> Self {
        if self.paths.config_dir.is_relative() {
            self.paths.config_dir = home.join(&self.paths.config_dir);
        }
        if self.paths.source_dir.is_relative() {
            self.paths.source_dir = cwd.join(&self.paths.source_dir);
        }
        self
    }

    /// Path of the first-run marker artifact.
    #[must_use]
    pub fn marker_path(&self) -> PathBuf {
        self.paths.config_dir.join(&self.paths.marker_file)
    }

    /// Validate values that would otherwise surface as confusing runtime errors.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.container_name.trim().is_empty() {
            return Err(invalid("service.container_name", "", "Must not be empty."));
        }
        if self.service.image_tag.trim().is_empty() {
            return Err(invalid("service.image_tag", "", "Must not be empty."));
        }
        if self.service.port == 0 {
            return Err(invalid("service.port", "0", "Must be between 1 and 65535."));
        }
        if !self.service.container_config_dir.starts_with('/') {
            return Err(invalid(
                "service.container_config_dir",
                &self.service.container_config_dir,
                "Must be an absolute path inside the container.",
            ));
        }
        let marker = &self.paths.marker_file;
        if marker.is_empty() || marker.contains('/') || marker == "." || marker == ".." {
            return Err(invalid(
                "paths.marker_file",
                marker,
                "Must be a plain file name inside paths.config_dir.",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
