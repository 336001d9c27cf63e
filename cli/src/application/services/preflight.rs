//! Resource preflight: guarantee swap capacity before the heavy stages.
//!
//! Creation is guarded by the live swap total, not by the swap file's
//! existence, so a manually removed swap is recreated on the next run.

use std::path::PathBuf;
use std::process::Output;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{OperatorPrompt, ProgressReporter, SwapProvisioner};
use crate::application::services::failure_detail;
use crate::domain::swap::{backup_path, below_threshold, has_mount_entry, mount_entry, set_swap_size};
use crate::domain::{DeployConfig, PlatformProfile, SetupError, SwapPolicy};

/// What preflight did to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PreflightOutcome {
    /// Existing swap already meets the profile's requirement.
    Sufficient { swap_total_kib: u64 },
    /// A swap file was created and activated.
    Created {
        swap_file: PathBuf,
        size_mib: u64,
        /// `false` when the mount table already carried the entry.
        mount_entry_added: bool,
    },
    /// The swap-size manager was reconfigured and restarted.
    Resized { target_mib: u64, backup: PathBuf },
    /// The operator declined the resize; continuing under-provisioned.
    Declined { swap_total_kib: u64 },
    /// No swap-size manager on this host; continuing under-provisioned.
    ManagerUnavailable { swap_total_kib: u64 },
}

/// Ensure swap meets `profile`'s minimum.
///
/// # Errors
///
/// Returns `SetupError::PreflightFatal` if any swap command fails. Nothing
/// already done is rolled back.
pub async fn ensure_swap(
    swap: &impl SwapProvisioner,
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    profile: PlatformProfile,
    swap_total_kib: u64,
) -> Result<PreflightOutcome> {
    match profile.swap_policy() {
        SwapPolicy::CreateIfAbsent { size_mib } => {
            if swap_total_kib > 0 {
                return Ok(PreflightOutcome::Sufficient { swap_total_kib });
            }
            create_swap_file(swap, reporter, config, size_mib).await
        }
        SwapPolicy::ResizeManaged {
            threshold_kib,
            target_mib,
        } => {
            if !below_threshold(swap_total_kib, threshold_kib) {
                return Ok(PreflightOutcome::Sufficient { swap_total_kib });
            }
            resize_managed_swap(swap, prompt, reporter, config, swap_total_kib, target_mib).await
        }
    }
}

async fn create_swap_file(
    swap: &impl SwapProvisioner,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    size_mib: u64,
) -> Result<PreflightOutcome> {
    let file = config.swap.swap_file.as_path();
    reporter.step(&format!("no swap detected, creating {size_mib} MiB swap file at {}...", file.display()));

    checked("allocate the swap file", swap.allocate(file, size_mib).await)?;
    checked("restrict swap file permissions", swap.restrict_permissions(file).await)?;
    checked("format the swap file", swap.format(file).await)?;
    checked("activate the swap file", swap.activate(file).await)?;

    let table = config.swap.mount_table.as_path();
    let existing = swap
        .read_mount_table(table)
        .await
        .map_err(|e| fatal("read the mount table", &format!("{e:#}")))?;
    let mount_entry_added = !has_mount_entry(&existing, file);
    if mount_entry_added {
        checked(
            "persist the swap file in the mount table",
            swap.append_mount_entry(table, &mount_entry(file)).await,
        )?;
    }

    reporter.success(&format!("swap file active ({size_mib} MiB)"));
    Ok(PreflightOutcome::Created {
        swap_file: file.to_path_buf(),
        size_mib,
        mount_entry_added,
    })
}

async fn resize_managed_swap(
    swap: &impl SwapProvisioner,
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    swap_total_kib: u64,
    target_mib: u64,
) -> Result<PreflightOutcome> {
    let current_mib = swap_total_kib / 1024;
    if !swap.manager_available(&config.swap.manager_command) {
        reporter.warn(&format!(
            "swap is {current_mib} MiB (recommended {target_mib} MiB) and {} is not installed; \
             set up swap manually to avoid out-of-memory builds",
            config.swap.manager_command
        ));
        return Ok(PreflightOutcome::ManagerUnavailable { swap_total_kib });
    }

    let question =
        format!("Swap is {current_mib} MiB, below the recommended {target_mib} MiB. Increase it now?");
    if !prompt.confirm(&question, true).context("asking to resize swap")? {
        reporter.warn("continuing without resizing swap; the image build may run out of memory");
        return Ok(PreflightOutcome::Declined { swap_total_kib });
    }

    let manager_config = config.swap.manager_config.as_path();
    reporter.step(&format!("resizing swap to {target_mib} MiB..."));
    let current = swap
        .read_manager_config(manager_config)
        .await
        .map_err(|e| fatal("read the swap manager config", &format!("{e:#}")))?;
    let backup = backup_path(manager_config, &chrono::Local::now().format("%Y%m%d%H%M%S").to_string());
    checked(
        "back up the swap manager config",
        swap.backup_manager_config(manager_config, &backup).await,
    )?;
    checked(
        "rewrite the swap manager config",
        swap.write_manager_config(manager_config, &set_swap_size(&current, target_mib))
            .await,
    )?;
    checked(
        "restart the swap manager",
        swap.restart_manager(&config.swap.manager_service).await,
    )?;

    reporter.success(&format!("swap resized to {target_mib} MiB (backup: {})", backup.display()));
    Ok(PreflightOutcome::Resized { target_mib, backup })
}

fn checked(step: &'static str, result: Result<Output>) -> Result<()> {
    let output = result.map_err(|e| fatal(step, &format!("{e:#}")))?;
    if !output.status.success() {
        return Err(fatal(step, &failure_detail(&output)).into());
    }
    Ok(())
}

fn fatal(step: &'static str, detail: &str) -> SetupError {
    SetupError::PreflightFatal {
        step,
        detail: detail.to_string(),
    }
}
