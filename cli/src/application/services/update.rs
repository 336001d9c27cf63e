//! Update dispatcher: resolve the profile, refuse unconfigured hosts, pull
//! the latest source, then re-run the matching setup pipeline.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{HostSystem, OperatorPrompt, ProgressReporter};
use crate::application::services::failure_detail;
use crate::application::services::pipeline::{SetupReport, run_setup};
use crate::domain::profile::{choose_profile, profile_for_architecture};
use crate::domain::{DeployConfig, DispatchError, PlatformProfile, ProfileChoice, SetupError, UpdateTarget};

/// How the dispatcher picked the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    Argument,
    /// Only one profile is enabled.
    OnlyProfile,
    Architecture,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub profile: PlatformProfile,
    pub resolved_by: ResolvedBy,
    pub setup: SetupReport,
}

/// Pick the profile for `requested`, sniffing the host only when needed.
///
/// # Errors
///
/// Returns `DispatchError` when no usable profile exists, or an error if the
/// architecture probe fails.
pub async fn resolve_profile(
    sys: &impl HostSystem,
    config: &DeployConfig,
    requested: Option<UpdateTarget>,
) -> Result<(PlatformProfile, ResolvedBy)> {
    match choose_profile(requested, &config.profiles).map_err(SetupError::from)? {
        ProfileChoice::Resolved(profile) if requested.is_some() => Ok((profile, ResolvedBy::Argument)),
        ProfileChoice::Resolved(profile) => Ok((profile, ResolvedBy::OnlyProfile)),
        ProfileChoice::NeedsArchitecture => {
            let machine = sys.machine().await?;
            let profile = profile_for_architecture(&machine);
            tracing::debug!(%machine, %profile, "profile resolved from architecture");
            Ok((profile, ResolvedBy::Architecture))
        }
    }
}

/// Refresh an already-configured host to the latest source.
///
/// # Errors
///
/// Returns `SetupError::DispatchPrecondition` before any fetch when the host
/// has never been set up, `SetupError::SourceFetchFatal` if the pull fails,
/// and otherwise whatever the pipeline returns.
pub async fn run_update(
    sys: &impl HostSystem,
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    requested: Option<UpdateTarget>,
) -> Result<UpdateReport> {
    let (profile, resolved_by) = resolve_profile(sys, config, requested).await?;
    reporter.step(&format!("updating with profile '{profile}'..."));

    let marker = config.marker_path();
    if !sys.exists(&marker) {
        return Err(SetupError::from(DispatchError::NotConfigured {
            marker: marker.display().to_string(),
        })
        .into());
    }

    let source_dir = &config.paths.source_dir;
    reporter.step(&format!("pulling latest source in {}...", source_dir.display()));
    let fatal = |detail: String| SetupError::SourceFetchFatal {
        detail,
        source_dir: source_dir.display().to_string(),
    };
    let output = sys.pull(source_dir).await.map_err(|e| fatal(format!("{e:#}")))?;
    if !output.status.success() {
        return Err(fatal(failure_detail(&output)).into());
    }
    reporter.success("source updated");

    let setup = run_setup(sys, prompt, reporter, config, profile).await?;
    Ok(UpdateReport {
        profile,
        resolved_by,
        setup,
    })
}
