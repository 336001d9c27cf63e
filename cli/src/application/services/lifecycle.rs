//! Lifecycle manager: replace any prior instance with a fresh service
//! container.
//!
//! Stopping and removing the prior instance are best-effort: "already gone"
//! and "removed" both leave the name free.

use std::process::Output;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{ContainerRuntime, ProgressReporter};
use crate::application::services::failure_detail;
use crate::domain::container::find_by_name;
use crate::domain::{BestEffort, ContainerSummary, DeployConfig, RunSpec, SetupError};

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceOutcome {
    /// Container that held the reserved name before this run.
    pub prior: Option<ContainerSummary>,
    pub stop: BestEffort,
    pub remove: BestEffort,
    /// ID printed by the runtime for the new container.
    pub container_id: String,
}

/// Remove any container holding the reserved name, then start the service.
///
/// # Errors
///
/// Returns an error if listing containers fails or exits non-zero, or
/// `SetupError::LifecycleFatal` if the new container fails to start.
pub async fn replace_container(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<ReplaceOutcome> {
    let service = &config.service;
    let name = service.container_name.as_str();

    let listing = runtime
        .list_by_name(name, true)
        .await
        .context("listing existing containers")?;
    if !listing.status.success() {
        anyhow::bail!(
            "listing existing containers failed: {}\n\nCheck that the container runtime is running: {} ps",
            failure_detail(&listing),
            config.runtime.command
        );
    }
    let prior = find_by_name(&String::from_utf8_lossy(&listing.stdout), name);

    let (stop, remove) = match &prior {
        Some(existing) => {
            reporter.step(&format!("removing previous '{name}' container ({})...", existing.status));
            let stop = best_effort(runtime.stop(name).await);
            let remove = best_effort(runtime.remove(name).await);
            for outcome in [&stop, &remove] {
                if let BestEffort::Ignored { reason } = outcome {
                    tracing::debug!(container = name, %reason, "ignored cleanup failure");
                }
            }
            (stop, remove)
        }
        None => (BestEffort::NotNeeded, BestEffort::NotNeeded),
    };

    reporter.step(&format!("starting '{name}' on port {}...", service.port));
    let fatal = |detail: String| SetupError::LifecycleFatal {
        name: name.to_string(),
        port: service.port,
        detail,
    };
    let output = runtime
        .run(&RunSpec::service(config))
        .await
        .map_err(|e| fatal(format!("{e:#}")))?;
    if !output.status.success() {
        return Err(fatal(failure_detail(&output)).into());
    }

    let container_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    reporter.success(&format!("container '{name}' started"));
    Ok(ReplaceOutcome {
        prior,
        stop,
        remove,
        container_id,
    })
}

/// Classify a cleanup attempt without propagating its failure.
fn best_effort(result: Result<Output>) -> BestEffort {
    match result {
        Ok(output) if output.status.success() => BestEffort::Done,
        Ok(output) => BestEffort::Ignored {
            reason: failure_detail(&output),
        },
        Err(e) => BestEffort::Ignored {
            reason: format!("{e:#}"),
        },
    }
}
