//! `SwapProvisioner` for `LinuxHost`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, SwapProvisioner};
use crate::infra::host::{LinuxHost, arg};

/// `dphys-swapfile` allocates the whole new file on restart, which is slow
/// on SD cards.
const MANAGER_RESTART_TIMEOUT: Duration = Duration::from_secs(600);

impl<R: CommandRunner> SwapProvisioner for LinuxHost<R> {
    async fn allocate(&self, path: &Path, size_mib: u64) -> Result<Output> {
        self.run_privileged("fallocate", &["-l", &format!("{size_mib}M"), &arg(path)])
            .await
            .context("fallocate")
    }

    async fn restrict_permissions(&self, path: &Path) -> Result<Output> {
        self.run_privileged("chmod", &["600", &arg(path)])
            .await
            .context("chmod")
    }

    async fn format(&self, path: &Path) -> Result<Output> {
        self.run_privileged("mkswap", &[&arg(path)])
            .await
            .context("mkswap")
    }

    async fn activate(&self, path: &Path) -> Result<Output> {
        self.run_privileged("swapon", &[&arg(path)])
            .await
            .context("swapon")
    }

    async fn read_mount_table(&self, table: &Path) -> Result<String> {
        match tokio::fs::read_to_string(table).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", table.display())),
        }
    }

    async fn append_mount_entry(&self, table: &Path, entry: &str) -> Result<Output> {
        self.run_privileged_with_stdin("tee", &["-a", &arg(table)], format!("{entry}\n").as_bytes())
            .await
            .context("appending mount entry")
    }

    fn manager_available(&self, command: &str) -> bool {
        which::which(command).is_ok()
    }

    async fn read_manager_config(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }

    async fn backup_manager_config(&self, path: &Path, backup: &Path) -> Result<Output> {
        self.run_privileged("cp", &["-p", &arg(path), &arg(backup)])
            .await
            .context("backing up swap manager config")
    }

    async fn write_manager_config(&self, path: &Path, contents: &str) -> Result<Output> {
        self.run_privileged_with_stdin("tee", &[&arg(path)], contents.as_bytes())
            .await
            .context("writing swap manager config")
    }

    async fn restart_manager(&self, service: &str) -> Result<Output> {
        self.run_privileged_with_timeout("systemctl", &["restart", service], MANAGER_RESTART_TIMEOUT)
            .await
            .with_context(|| format!("restarting {service}"))
    }
}
