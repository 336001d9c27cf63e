//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{DeployConfig, RunSpec};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// No timeout: used for builds, installers and attached containers whose
    /// output the operator watches live.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// Read-only facts about the live host.
#[allow(async_fn_in_trait)]
pub trait HostProbe {
    /// Machine architecture string, as `uname -m` prints it.
    async fn machine(&self) -> Result<String>;
    /// Total active swap in KiB.
    async fn swap_total_kib(&self) -> Result<u64>;
    /// Whether the invoking user is root.
    async fn is_root(&self) -> Result<bool>;
    /// Login name of the invoking user.
    async fn current_user(&self) -> Result<String>;
    /// Groups of the invoking user in the current session.
    async fn groups(&self) -> Result<Vec<String>>;
}

/// Swap file and swap-size manager mutations. Every method that changes
/// system state runs with root privileges.
#[allow(async_fn_in_trait)]
pub trait SwapProvisioner {
    /// Allocate a backing file of `size_mib`.
    async fn allocate(&self, path: &Path, size_mib: u64) -> Result<Output>;
    /// Restrict the backing file to owner read/write.
    async fn restrict_permissions(&self, path: &Path) -> Result<Output>;
    /// Write a swap signature to the backing file.
    async fn format(&self, path: &Path) -> Result<Output>;
    /// Enable the backing file as swap.
    async fn activate(&self, path: &Path) -> Result<Output>;
    /// Read the boot-time mount table.
    async fn read_mount_table(&self, table: &Path) -> Result<String>;
    /// Append one line to the boot-time mount table.
    async fn append_mount_entry(&self, table: &Path, entry: &str) -> Result<Output>;
    /// Whether the swap-size manager executable is on `PATH`.
    fn manager_available(&self, command: &str) -> bool;
    async fn read_manager_config(&self, path: &Path) -> Result<String>;
    async fn backup_manager_config(&self, path: &Path, backup: &Path) -> Result<Output>;
    async fn write_manager_config(&self, path: &Path, contents: &str) -> Result<Output>;
    /// Restart the swap-size manager service so the new size applies.
    async fn restart_manager(&self, service: &str) -> Result<Output>;
}

/// Container runtime installation.
#[allow(async_fn_in_trait)]
pub trait PackageInstaller {
    /// Whether `command` is callable from `PATH`.
    fn is_installed(&self, command: &str) -> bool;
    /// Fetch and run the vendor install script, deleting it afterward.
    async fn install(&self, installer_url: &str) -> Result<ExitStatus>;
    /// Add `user` to `group` (effective from the next login).
    async fn add_user_to_group(&self, user: &str, group: &str) -> Result<Output>;
}

/// Container runtime operations against the local daemon.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Build `tag` from `context`, streaming build output.
    async fn build(&self, tag: &str, context: &Path) -> Result<ExitStatus>;
    /// Start a detached container; stdout carries the new container ID.
    async fn run(&self, spec: &RunSpec) -> Result<Output>;
    /// Run an attached container to completion with inherited stdio.
    async fn run_attached(&self, spec: &RunSpec) -> Result<ExitStatus>;
    async fn stop(&self, name: &str) -> Result<Output>;
    async fn remove(&self, name: &str) -> Result<Output>;
    /// List containers named `name` in `LIST_FORMAT`; stopped ones too when `all`.
    async fn list_by_name(&self, name: &str, all: bool) -> Result<Output>;
    /// Last `tail` lines of the container's logs.
    async fn logs(&self, name: &str, tail: u32) -> Result<Output>;
    /// Stream the container's logs to the terminal.
    async fn follow_logs(&self, name: &str, tail: u32) -> Result<ExitStatus>;
}

/// Local filesystem checks used by the bootstrapper and dispatcher.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

/// Pulls the latest revision into the source checkout.
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    async fn pull(&self, dir: &Path) -> Result<Output>;
}

/// Composite trait: any type implementing every host port is a `HostSystem`.
pub trait HostSystem:
    HostProbe + SwapProvisioner + PackageInstaller + ContainerRuntime + LocalFs + SourceFetcher
{
}

/// Blanket implementation: any type implementing all host ports is a `HostSystem`.
impl<T> HostSystem for T where
    T: HostProbe + SwapProvisioner + PackageInstaller + ContainerRuntime + LocalFs + SourceFetcher
{
}

// ── Operator Prompt Port ──────────────────────────────────────────────────────

/// Blocking human-in-the-loop pauses. No timeout: a call returns only on
/// operator input or fails on interruption.
pub trait OperatorPrompt {
    /// Whether a human is answering. Non-interactive prompts return each
    /// question's default.
    fn is_interactive(&self) -> bool;
    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
    /// Wait until the operator acknowledges `prompt`.
    fn acknowledge(&self, prompt: &str) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads the deploy configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<DeployConfig>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
