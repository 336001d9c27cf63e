//! `logs`: show or stream the service container's logs.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ContainerRuntime;
use crate::application::services::{exit_detail, failure_detail};

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    /// Stream logs in real time
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show (defaults to the configured verification tail)
    #[arg(long)]
    pub tail: Option<u32>,
}

/// Run the logs command.
///
/// # Errors
///
/// Returns an error if the runtime cannot read the container's logs.
pub async fn run(app: &AppContext, args: &LogsArgs) -> Result<()> {
    let config = app.load_config()?;
    let host = app.host(&config).await?;
    let name = config.service.container_name.as_str();
    let tail = args.tail.unwrap_or(config.verify.log_tail);

    if args.follow {
        let status = host.follow_logs(name, tail).await?;
        // Interrupting the stream is the normal way out.
        if !status.success() && status.code().is_some() {
            anyhow::bail!("logs for '{name}' ended with {}", exit_detail(status));
        }
        return Ok(());
    }

    let output = host.logs(name, tail).await?;
    if !output.status.success() {
        anyhow::bail!(
            "cannot read logs for '{name}': {}\n\nRun setup first if the container does not exist.",
            failure_detail(&output)
        );
    }
    // Container logs carry the app's stdout and stderr streams separately.
    std::io::stdout()
        .write_all(&output.stdout)
        .context("writing logs")?;
    std::io::stderr()
        .write_all(&output.stderr)
        .context("writing logs")?;
    Ok(())
}
