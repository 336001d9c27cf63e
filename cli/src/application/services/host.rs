//! Host inspection: snapshot of the facts every later stage decides on.

use anyhow::{Context, Result};

use crate::application::ports::{HostProbe, PackageInstaller};
use crate::domain::{Architecture, DeployConfig, Host};

/// Read the live host state.
///
/// # Errors
///
/// Returns an error if any probe command fails.
pub async fn inspect_host(
    probe: &(impl HostProbe + PackageInstaller),
    config: &DeployConfig,
) -> Result<Host> {
    let machine = probe.machine().await.context("detecting architecture")?;
    let swap_total_kib = probe.swap_total_kib().await.context("reading swap total")?;
    let is_root = probe.is_root().await.context("detecting user id")?;
    let user = probe.current_user().await.context("detecting user name")?;
    let group = &config.runtime.group;
    let in_runtime_group = probe
        .groups()
        .await
        .context("listing user groups")?
        .iter()
        .any(|g| g == group);

    tracing::debug!(%machine, swap_total_kib, is_root, %user, in_runtime_group, "host inspected");

    Ok(Host {
        architecture: Architecture::from_machine(&machine),
        machine,
        swap_total_kib,
        runtime_installed: probe.is_installed(&config.runtime.command),
        is_root,
        user,
        in_runtime_group,
    })
}
