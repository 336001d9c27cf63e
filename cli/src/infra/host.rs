//! `LinuxHost`: the production host adapter.
//!
//! One struct implements every host port; each port's impl lives in its own
//! module (`swap`, `installer`, `docker`, `git`, `fs`). This module holds the
//! shared privilege handling and the `HostProbe` impl.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostProbe};
use crate::domain::DeployConfig;
use crate::domain::swap::parse_swap_total_kib;

const MEMINFO: &str = "/proc/meminfo";

/// Routes host commands through a `CommandRunner`, prefixing system
/// mutations with `sudo` when not running as root.
pub struct LinuxHost<R: CommandRunner> {
    runner: R,
    runtime: String,
    root: bool,
}

impl<R: CommandRunner> LinuxHost<R> {
    /// Build the adapter, detecting whether the invoking user is root.
    ///
    /// # Errors
    ///
    /// Returns an error if `id -u` cannot be run or parsed.
    pub async fn detect(runner: R, config: &DeployConfig) -> Result<Self> {
        let output = runner.run("id", &["-u"]).await.context("detecting user id")?;
        let uid: u32 = stdout_text(&output, "id -u")?
            .parse()
            .context("parsing user id")?;
        Ok(Self::new(runner, config, uid == 0))
    }

    pub(crate) fn new(runner: R, config: &DeployConfig, root: bool) -> Self {
        Self {
            runner,
            runtime: config.runtime.command.clone(),
            root,
        }
    }

    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Container runtime executable.
    pub(crate) fn runtime(&self) -> &str {
        &self.runtime
    }

    fn elevate<'a>(&self, program: &'a str, args: &[&'a str]) -> (&'a str, Vec<&'a str>) {
        if self.root {
            (program, args.to_vec())
        } else {
            let mut full = Vec::with_capacity(args.len() + 1);
            full.push(program);
            full.extend_from_slice(args);
            ("sudo", full)
        }
    }

    pub(crate) async fn run_privileged(&self, program: &str, args: &[&str]) -> Result<Output> {
        let (program, args) = self.elevate(program, args);
        self.runner.run(program, &args).await
    }

    pub(crate) async fn run_privileged_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output> {
        let (program, args) = self.elevate(program, args);
        self.runner.run_with_timeout(program, &args, timeout).await
    }

    pub(crate) async fn run_privileged_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<Output> {
        let (program, args) = self.elevate(program, args);
        self.runner.run_with_stdin(program, &args, input).await
    }

    pub(crate) async fn run_privileged_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        let (program, args) = self.elevate(program, args);
        self.runner.run_status(program, &args).await
    }
}

/// Trimmed stdout of a successful command.
pub(crate) fn stdout_text(output: &Output, what: &str) -> Result<String> {
    if !output.status.success() {
        anyhow::bail!(
            "{what} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Display form of a path for use as a command argument.
pub(crate) fn arg(path: &Path) -> String {
    path.display().to_string()
}

impl<R: CommandRunner> HostProbe for LinuxHost<R> {
    async fn machine(&self) -> Result<String> {
        let output = self.runner.run("uname", &["-m"]).await?;
        stdout_text(&output, "uname -m")
    }

    async fn swap_total_kib(&self) -> Result<u64> {
        let meminfo = tokio::fs::read_to_string(MEMINFO)
            .await
            .with_context(|| format!("reading {MEMINFO}"))?;
        parse_swap_total_kib(&meminfo).with_context(|| format!("no SwapTotal in {MEMINFO}"))
    }

    async fn is_root(&self) -> Result<bool> {
        Ok(self.root)
    }

    async fn current_user(&self) -> Result<String> {
        let output = self.runner.run("id", &["-un"]).await?;
        stdout_text(&output, "id -un")
    }

    async fn groups(&self) -> Result<Vec<String>> {
        let output = self.runner.run("id", &["-nG"]).await?;
        Ok(stdout_text(&output, "id -nG")?
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infra::test_runner::RecordingRunner;

    #[tokio::test]
    async fn detect_reads_uid() {
        let runner = RecordingRunner::default().reply(0, "0\n");
        let host = LinuxHost::detect(runner, &DeployConfig::default()).await.unwrap();
        assert!(host.is_root().await.unwrap());
    }

    #[tokio::test]
    async fn non_root_mutations_use_sudo() {
        let runner = RecordingRunner::default();
        let host = LinuxHost::new(runner.clone(), &DeployConfig::default(), false);
        host.run_privileged("swapon", &["/swapfile"]).await.unwrap();
        assert_eq!(runner.lines(), ["sudo swapon /swapfile"]);
    }

    #[tokio::test]
    async fn root_mutations_run_directly() {
        let runner = RecordingRunner::default();
        let host = LinuxHost::new(runner.clone(), &DeployConfig::default(), true);
        host.run_privileged("swapon", &["/swapfile"]).await.unwrap();
        assert_eq!(runner.lines(), ["swapon /swapfile"]);
    }

    #[tokio::test]
    async fn groups_are_split() {
        let runner = RecordingRunner::default().reply(0, "pi adm docker\n");
        let host = LinuxHost::new(runner, &DeployConfig::default(), false);
        assert_eq!(host.groups().await.unwrap(), ["pi", "adm", "docker"]);
    }

    #[tokio::test]
    async fn failed_probe_is_an_error() {
        let runner = RecordingRunner::default().reply(1, "");
        let host = LinuxHost::new(runner, &DeployConfig::default(), false);
        assert!(host.machine().await.is_err());
    }
}
