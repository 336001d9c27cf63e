//! `PackageInstaller` for `LinuxHost`: vendor install script plus group grant.

use std::io::{Read, Write};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::application::ports::{CommandRunner, PackageInstaller};
use crate::infra::host::LinuxHost;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_SCRIPT_BYTES: u64 = 4 * 1024 * 1024;

impl<R: CommandRunner> PackageInstaller for LinuxHost<R> {
    fn is_installed(&self, command: &str) -> bool {
        which::which(command).is_ok()
    }

    async fn install(&self, installer_url: &str) -> Result<ExitStatus> {
        let url = installer_url.to_string();
        let script = tokio::task::spawn_blocking(move || download_script(&url))
            .await
            .context("installer download task failed")??;

        let path = script.path().display().to_string();
        let status = self.run_privileged_status("sh", &[&path]).await;
        script.close().context("removing installer script")?;
        status
    }

    async fn add_user_to_group(&self, user: &str, group: &str) -> Result<Output> {
        self.run_privileged("usermod", &["-aG", group, user])
            .await
            .context("usermod")
    }
}

/// Fetch the install script into a temp file that is deleted on drop.
fn download_script(url: &str) -> Result<NamedTempFile> {
    let response = match ureq::get(url).timeout(DOWNLOAD_TIMEOUT).call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("downloading {url}: HTTP {code}"),
        Err(e) => return Err(e).with_context(|| format!("downloading {url}")),
    };
    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_SCRIPT_BYTES)
        .read_to_end(&mut body)
        .with_context(|| format!("reading {url}"))?;

    let mut script = tempfile::Builder::new()
        .prefix("install-runtime-")
        .suffix(".sh")
        .tempfile()
        .context("creating installer temp file")?;
    script.write_all(&body).context("writing installer script")?;
    script.flush().context("writing installer script")?;
    Ok(script)
}
