//! Config bootstrapper: first-run onboarding, gated on the marker artifact.
//!
//! `DirectoryAbsent → DirectoryCreated → MarkerAbsent → OnboardRun →
//! AwaitingOperatorAck → Ready`, or straight to `Ready` when the marker
//! exists. The marker is never overwritten or removed here.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{ContainerRuntime, LocalFs, OperatorPrompt, ProgressReporter};
use crate::application::services::exit_detail;
use crate::domain::{DeployConfig, RunSpec, SetupError};

/// Container subcommand that writes the first-run configuration.
pub const ONBOARD_COMMAND: &str = "onboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// Marker already present; nothing was run.
    AlreadyConfigured,
    /// `onboard` produced the marker and the operator was given a chance to
    /// edit it.
    Onboarded {
        created_directory: bool,
        /// `false` when running non-interactively.
        acknowledged: bool,
    },
}

/// Ensure the persistent config directory holds a configuration.
///
/// A non-interactive prompt skips the post-onboard pause with a warning.
///
/// # Errors
///
/// Returns `SetupError::BootstrapFatal` if the config directory cannot be
/// created, or `onboard` fails or does not produce the marker. The
/// acknowledgment itself has no timeout.
pub async fn ensure_config(
    host: &(impl ContainerRuntime + LocalFs),
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<BootstrapOutcome> {
    let dir = &config.paths.config_dir;
    let fatal = |detail: String| SetupError::BootstrapFatal {
        detail,
        config_dir: dir.display().to_string(),
    };
    let created_directory = !host.exists(dir);
    if created_directory {
        host.create_dir_all(dir).map_err(|e| fatal(format!("{e:#}")))?;
    }

    let marker = config.marker_path();
    if host.exists(&marker) {
        return Ok(BootstrapOutcome::AlreadyConfigured);
    }

    reporter.step("no configuration found, running first-time onboarding...");
    let status = host
        .run_attached(&RunSpec::one_shot(config, &[ONBOARD_COMMAND]))
        .await
        .map_err(|e| fatal(format!("{e:#}")))?;
    if !status.success() {
        return Err(fatal(format!("'{ONBOARD_COMMAND}' failed ({})", exit_detail(status))).into());
    }
    if !host.exists(&marker) {
        return Err(fatal(format!(
            "'{ONBOARD_COMMAND}' finished but {} was not created",
            marker.display()
        ))
        .into());
    }
    reporter.success(&format!("configuration created at {}", marker.display()));

    if !prompt.is_interactive() {
        reporter.warn(&format!(
            "non-interactive run: starting with the generated {}; add provider credentials before use",
            marker.display()
        ));
        return Ok(BootstrapOutcome::Onboarded {
            created_directory,
            acknowledged: false,
        });
    }

    prompt
        .acknowledge(&format!(
            "Edit {} to add your API keys and channel settings, then press Enter to continue",
            marker.display()
        ))
        .context("waiting for operator acknowledgment")?;
    Ok(BootstrapOutcome::Onboarded {
        created_directory,
        acknowledged: true,
    })
}
