//! `agent -m <text>`: send one message through a one-shot container.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ContainerRuntime;
use crate::application::services::exit_detail;
use crate::domain::RunSpec;

/// Arguments for the agent command.
#[derive(Args)]
pub struct AgentArgs {
    /// Message to send to the agent
    #[arg(short, long)]
    pub message: String,
}

/// Run the agent command.
///
/// # Errors
///
/// Returns an error if the one-shot container cannot run or exits non-zero.
pub async fn run(app: &AppContext, args: &AgentArgs) -> Result<()> {
    let config = app.load_config()?;
    let host = app.host(&config).await?;

    let spec = RunSpec::one_shot(&config, &["agent", "-m", &args.message]);
    let status = host.run_attached(&spec).await.context("running agent")?;
    if !status.success() {
        anyhow::bail!(
            "agent exited with {}\n\nCheck provider credentials in {}",
            exit_detail(status),
            config.marker_path().display()
        );
    }
    Ok(())
}
