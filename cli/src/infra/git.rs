//! `SourceFetcher` for `LinuxHost`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, SourceFetcher};
use crate::infra::host::{LinuxHost, arg};

const PULL_TIMEOUT: Duration = Duration::from_secs(300);

impl<R: CommandRunner> SourceFetcher for LinuxHost<R> {
    async fn pull(&self, dir: &Path) -> Result<Output> {
        self.runner()
            .run_with_timeout("git", &["-C", &arg(dir), "pull", "--ff-only"], PULL_TIMEOUT)
            .await
            .context("git pull")
    }
}
