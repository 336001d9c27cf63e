//! Verifier: confirm the service container is running, or dump its logs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{ContainerRuntime, ProgressReporter};
use crate::application::services::failure_detail;
use crate::domain::container::find_by_name;
use crate::domain::{DeployConfig, SetupError};

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub container_id: String,
    /// Runtime status string, e.g. `Up 3 seconds`.
    pub status: String,
    pub logs_command: String,
    pub config_path: PathBuf,
}

/// Query the runtime once for a running container with the reserved name.
///
/// # Errors
///
/// Returns `SetupError::VerificationFailure` with the container's recent
/// logs when no running instance is found.
pub async fn verify_running(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<VerifyReport> {
    let name = config.service.container_name.as_str();
    reporter.step(&format!("verifying '{name}' is running..."));
    if config.verify.settle_secs > 0 {
        tokio::time::sleep(Duration::from_secs(config.verify.settle_secs)).await;
    }

    let running = match runtime.list_by_name(name, false).await {
        Ok(out) if out.status.success() => {
            find_by_name(&String::from_utf8_lossy(&out.stdout), name).filter(|c| c.is_running())
        }
        Ok(out) => {
            tracing::debug!(detail = %failure_detail(&out), "container query failed");
            None
        }
        Err(e) => {
            tracing::debug!(error = %format!("{e:#}"), "container query failed");
            None
        }
    };

    match running {
        Some(container) => {
            reporter.success(&format!("'{name}' is running"));
            Ok(VerifyReport {
                container_id: container.id,
                status: container.status,
                logs_command: format!("{} logs -f {name}", config.runtime.command),
                config_path: config.marker_path(),
            })
        }
        None => {
            let logs = match runtime.logs(name, config.verify.log_tail).await {
                Ok(out) => {
                    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                    text.push_str(&String::from_utf8_lossy(&out.stderr));
                    text.trim_end().to_string()
                }
                Err(e) => format!("(logs unavailable: {e:#})"),
            };
            Err(SetupError::VerificationFailure {
                name: name.to_string(),
                logs,
                config_dir: config.paths.config_dir.display().to_string(),
            }
            .into())
        }
    }
}
