//! Image builder: rebuild the service image from the source tree every run.

use anyhow::Result;

use crate::application::ports::{ContainerRuntime, ProgressReporter};
use crate::application::services::exit_detail;
use crate::domain::{DeployConfig, SetupError};

/// Build the service image under its configured tag. Returns the tag.
///
/// # Errors
///
/// Returns `SetupError::BuildFatal` if the build cannot run or exits non-zero.
pub async fn build_image(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<String> {
    let tag = &config.service.image_tag;
    let context = &config.paths.source_dir;
    reporter.step(&format!("building image '{tag}' from {}...", context.display()));

    let status = runtime
        .build(tag, context)
        .await
        .map_err(|e| SetupError::BuildFatal {
            tag: tag.clone(),
            detail: format!("{e:#}"),
        })?;
    if !status.success() {
        return Err(SetupError::BuildFatal {
            tag: tag.clone(),
            detail: exit_detail(status),
        }
        .into());
    }

    reporter.success(&format!("image '{tag}' built"));
    Ok(tag.clone())
}
