//! Setup pipeline: the fixed stage sequence shared by both setup profiles
//! and by `update`.
//!
//! Stages run strictly in order and the first failure ends the run. Every
//! stage re-inspects live state, so re-running after a fix is always safe.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{HostSystem, OperatorPrompt, ProgressReporter};
use crate::application::services::bootstrap::{BootstrapOutcome, ensure_config};
use crate::application::services::host::inspect_host;
use crate::application::services::image::build_image;
use crate::application::services::installer::{InstallOutcome, ensure_runtime};
use crate::application::services::lifecycle::{ReplaceOutcome, replace_container};
use crate::application::services::preflight::{PreflightOutcome, ensure_swap};
use crate::application::services::verify::{VerifyReport, verify_running};
use crate::domain::{DeployConfig, Host, PlatformProfile};

/// Binary name used in operator-facing resume instructions.
pub const BIN_NAME: &str = "nanobot-deploy";

/// Per-stage record of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub profile: PlatformProfile,
    pub host: Host,
    pub preflight: PreflightOutcome,
    pub runtime: InstallOutcome,
    pub image: String,
    pub bootstrap: BootstrapOutcome,
    pub container: ReplaceOutcome,
    pub verify: VerifyReport,
}

/// Converge the host onto a running service container for `profile`.
///
/// # Errors
///
/// Returns the first stage failure. `SetupError::DependencyCheckpoint` is a
/// planned stop, not a fault: the operator re-runs after logging back in.
pub async fn run_setup(
    sys: &impl HostSystem,
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    profile: PlatformProfile,
) -> Result<SetupReport> {
    let host = inspect_host(sys, config).await?;
    if host.architecture != profile.architecture() {
        reporter.warn(&format!(
            "profile '{profile}' targets {} but this host is {} ({})",
            profile.architecture(),
            host.architecture,
            host.machine
        ));
    }

    let preflight = ensure_swap(sys, prompt, reporter, config, profile, host.swap_total_kib).await?;
    let resume = format!("{BIN_NAME} {}", profile.setup_command());
    let runtime = ensure_runtime(sys, reporter, config, &host, &resume).await?;
    let image = build_image(sys, reporter, config).await?;
    let bootstrap = ensure_config(sys, prompt, reporter, config).await?;
    let container = replace_container(sys, reporter, config).await?;
    let verify = verify_running(sys, reporter, config).await?;

    Ok(SetupReport {
        profile,
        host,
        preflight,
        runtime,
        image,
        bootstrap,
        container,
        verify,
    })
}
