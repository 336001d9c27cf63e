//! `status`: runtime view of the service container, then the app's own
//! status report from a one-shot container.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::ContainerRuntime;
use crate::application::services::{exit_detail, failure_detail};
use crate::domain::container::find_by_name;
use crate::domain::{ContainerSummary, DeployConfig, RunSpec};
use crate::output::json;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Show chat channel status instead of provider status
    #[arg(long)]
    pub channels: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub name: String,
    pub container: Option<ContainerSummary>,
    pub status_command: String,
}

/// In-container subcommand for the requested view.
#[must_use]
pub fn status_command(channels: bool) -> &'static [&'static str] {
    if channels {
        &["channels", "status"]
    } else {
        &["status"]
    }
}

/// The container holding the reserved name, running or not.
///
/// # Errors
///
/// Returns an error if the runtime cannot be queried.
pub async fn find_container(
    runtime: &impl ContainerRuntime,
    name: &str,
) -> Result<Option<ContainerSummary>> {
    let listing = runtime
        .list_by_name(name, true)
        .await
        .context("listing containers")?;
    if !listing.status.success() {
        anyhow::bail!(
            "listing containers failed: {}\n\nCheck that the container runtime is running",
            failure_detail(&listing)
        );
    }
    Ok(find_by_name(&String::from_utf8_lossy(&listing.stdout), name))
}

/// Run the app's status report in a one-shot container.
///
/// # Errors
///
/// Returns an error if the one-shot container cannot start or exits
/// non-zero.
pub async fn run_status_command(
    runtime: &impl ContainerRuntime,
    config: &DeployConfig,
    channels: bool,
) -> Result<String> {
    let command = status_command(channels);
    let status = runtime
        .run_attached(&RunSpec::one_shot(config, command))
        .await
        .context("running in-container status")?;
    if !status.success() {
        anyhow::bail!(
            "in-container status failed ({})\n\nBuild the image first: nanobot-deploy setup-amd2gb or setup-rpi4gb",
            exit_detail(status)
        );
    }
    Ok(command.join(" "))
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the runtime cannot be queried or the in-container
/// status command fails.
pub async fn run(app: &AppContext, args: &StatusArgs) -> Result<()> {
    let config = app.load_config()?;
    let host = app.host(&config).await?;
    let name = config.service.container_name.as_str();

    let container = find_container(&host, name).await?;
    if !app.is_json() {
        app.renderer().render_container(name, container.as_ref());
    }

    // In JSON mode the child's stdout is attached to stderr.
    let status_command = run_status_command(&host, &config, args.channels).await?;
    if app.is_json() {
        json::print(&StatusReport {
            name: name.to_string(),
            container,
            status_command,
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{FakeHost, test_config};

    #[test]
    fn channel_view_uses_channels_subcommand() {
        assert_eq!(status_command(false), ["status"]);
        assert_eq!(status_command(true), ["channels", "status"]);
    }

    #[tokio::test]
    async fn stopped_container_is_still_reported() {
        let fake = FakeHost::new().with_container("nanobot", false);
        let container = find_container(&fake, "nanobot").await.unwrap().unwrap();
        assert!(!container.is_running());
    }

    #[tokio::test]
    async fn unreachable_runtime_is_an_error() {
        let fake = FakeHost {
            ps_succeeds: false,
            ..FakeHost::new()
        };
        let err = find_container(&fake, "nanobot").await.expect_err("ps fails");
        assert!(err.to_string().contains("Cannot connect"), "got: {err}");
    }

    #[tokio::test]
    async fn status_command_runs_in_one_shot_container() {
        let fake = FakeHost::new();
        let ran = run_status_command(&fake, &test_config(), true).await.unwrap();
        assert_eq!(ran, "channels status");
        assert_eq!(fake.count_calls("run_attached channels status"), 1);
    }

    #[tokio::test]
    async fn failing_status_command_is_an_error() {
        let fake = FakeHost {
            onboard_code: 1,
            ..FakeHost::new()
        };
        let err = run_status_command(&fake, &test_config(), false)
            .await
            .expect_err("exit 1");
        assert!(err.to_string().contains("exit code 1"), "got: {err}");
    }
}
