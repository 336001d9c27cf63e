//! `setup-amd2gb` / `setup-rpi4gb`: first-time setup for one profile.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::pipeline::run_setup;
use crate::domain::PlatformProfile;
use crate::output::json;

/// Run the setup pipeline for `profile`.
///
/// # Errors
///
/// Returns the first failing stage's error.
pub async fn run(app: &AppContext, profile: PlatformProfile) -> Result<()> {
    let config = app.load_config()?;
    let host = app.host(&config).await?;
    if !app.is_json() {
        app.output.header(&format!("Setting up nanobot ({profile})"));
    }

    let report = run_setup(&host, &app.prompt(), &app.reporter(), &config, profile).await?;

    if app.is_json() {
        json::print(&report)
    } else {
        app.renderer().render_setup(&report);
        Ok(())
    }
}
