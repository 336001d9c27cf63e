//! `update [amd|rpi]`: pull the latest source and re-run setup.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::update::run_update;
use crate::domain::UpdateTarget;
use crate::output::json;

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Platform to update (`amd` or `rpi`); detected from the host if omitted
    pub target: Option<UpdateTarget>,
}

/// Run the update dispatcher.
///
/// # Errors
///
/// Returns a dispatch precondition error on a host that was never set up,
/// or the failing stage's error.
pub async fn run(app: &AppContext, args: &UpdateArgs) -> Result<()> {
    let config = app.load_config()?;
    let host = app.host(&config).await?;

    let report = run_update(&host, &app.prompt(), &app.reporter(), &config, args.target).await?;

    if app.is_json() {
        json::print(&report)
    } else {
        app.renderer().render_update(&report);
        Ok(())
    }
}
