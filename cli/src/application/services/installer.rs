//! Dependency installer: make the container runtime callable.
//!
//! A fresh install for a non-root user ends the run: the new group
//! membership only applies to the next login session.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{PackageInstaller, ProgressReporter};
use crate::application::services::{exit_detail, failure_detail};
use crate::domain::{DeployConfig, Host, SetupError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InstallOutcome {
    AlreadyInstalled,
    /// Installed as root; no group activation gap.
    Installed,
}

/// Ensure the runtime is installed.
///
/// `resume` is the command the operator runs after re-authenticating.
///
/// # Errors
///
/// Returns `SetupError::InstallFatal` if the install script or the group
/// grant fails, and `SetupError::DependencyCheckpoint` after a successful
/// install by a non-root user.
pub async fn ensure_runtime(
    installer: &impl PackageInstaller,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    host: &Host,
    resume: &str,
) -> Result<InstallOutcome> {
    let runtime = &config.runtime;
    if host.runtime_installed {
        if host.lacks_runtime_access() {
            reporter.warn(&format!(
                "'{}' is not in the '{}' group; {} commands may be denied",
                host.user, runtime.group, runtime.command
            ));
        }
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    reporter.step(&format!("{} not found, running the vendor installer...", runtime.command));
    let status = installer
        .install(&runtime.installer_url)
        .await
        .map_err(|e| SetupError::InstallFatal {
            detail: format!("{e:#}"),
        })?;
    if !status.success() {
        return Err(SetupError::InstallFatal {
            detail: format!("install script failed ({})", exit_detail(status)),
        }
        .into());
    }
    reporter.success(&format!("{} installed", runtime.command));

    if host.is_root {
        return Ok(InstallOutcome::Installed);
    }

    let output = installer
        .add_user_to_group(&host.user, &runtime.group)
        .await
        .context("granting runtime group membership")?;
    if !output.status.success() {
        return Err(SetupError::InstallFatal {
            detail: format!(
                "adding '{}' to the '{}' group failed: {}",
                host.user,
                runtime.group,
                failure_detail(&output)
            ),
        }
        .into());
    }

    Err(SetupError::DependencyCheckpoint {
        user: host.user.clone(),
        group: runtime.group.clone(),
        resume: resume.to_string(),
    }
    .into())
}
