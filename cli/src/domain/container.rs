//! Container value types: run specs, listing rows, and best-effort outcomes.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::config::DeployConfig;

/// `--format` template used when listing containers; one row per container,
/// tab-separated in [`ContainerSummary`] field order.
pub const LIST_FORMAT: &str = "{{.ID}}\t{{.Names}}\t{{.Image}}\t{{.State}}\t{{.Status}}";

/// Restart policy attached to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    Always,
}

impl RestartPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
        }
    }
}

/// Everything needed to start one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub image: String,
    pub name: Option<String>,
    pub detach: bool,
    /// Discard the container when it exits.
    pub remove_on_exit: bool,
    pub restart: Option<RestartPolicy>,
    /// `(host, container)` port pairs.
    pub ports: Vec<(u16, u16)>,
    /// `(host path, container path)` bind mounts.
    pub volumes: Vec<(PathBuf, String)>,
    pub command: Vec<String>,
}

impl RunSpec {
    /// The long-running service container.
    #[must_use]
    pub fn service(config: &DeployConfig) -> Self {
        Self {
            image: config.service.image_tag.clone(),
            name: Some(config.service.container_name.clone()),
            detach: true,
            remove_on_exit: false,
            restart: Some(RestartPolicy::Always),
            ports: vec![(config.service.port, config.service.port)],
            volumes: vec![config_volume(config)],
            command: vec![config.service.command.clone()],
        }
    }

    /// A disposable, attached container running one app subcommand
    /// (`onboard`, `status`, `agent -m ..`) against the persisted config.
    #[must_use]
    pub fn one_shot(config: &DeployConfig, command: &[&str]) -> Self {
        Self {
            image: config.service.image_tag.clone(),
            name: None,
            detach: false,
            remove_on_exit: true,
            restart: None,
            ports: Vec::new(),
            volumes: vec![config_volume(config)],
            command: command.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

fn config_volume(config: &DeployConfig) -> (PathBuf, String) {
    (
        config.paths.config_dir.clone(),
        config.service.container_config_dir.clone(),
    )
}

/// One row of a container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Machine state, e.g. `running`, `exited`.
    pub state: String,
    /// Human status, e.g. `Up 3 seconds`.
    pub status: String,
}

impl ContainerSummary {
    /// Parse one [`LIST_FORMAT`] row.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
        let summary = Self {
            id: fields.next()?.trim().to_string(),
            name: fields.next()?.trim().to_string(),
            image: fields.next()?.trim().to_string(),
            state: fields.next()?.trim().to_string(),
            status: fields.next()?.trim().to_string(),
        };
        (!summary.id.is_empty()).then_some(summary)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Rows of `listing` whose name is exactly `name`.
///
/// Runtime name filters match by regex/substring, so the exact comparison
/// happens here.
#[must_use]
pub fn find_by_name(listing: &str, name: &str) -> Option<ContainerSummary> {
    listing
        .lines()
        .filter_map(ContainerSummary::parse_line)
        .find(|c| c.name == name)
}

/// Result of an operation whose failure is absorbed because the desired end
/// state may already hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BestEffort {
    /// Nothing to act on.
    NotNeeded,
    Done,
    /// Attempted and failed; treated the same as `Done`.
    Ignored { reason: String },
}
