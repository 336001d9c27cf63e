//! Shared test helpers for pipeline service tests.
//!
//! `FakeHost` implements every host port against in-memory state so a whole
//! pipeline run can be asserted on: swap files, mount-table lines, containers,
//! and the order of calls.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{
    ContainerRuntime, HostProbe, LocalFs, OperatorPrompt, PackageInstaller, ProgressReporter,
    SourceFetcher, SwapProvisioner,
};
use crate::domain::{DeployConfig, RunSpec};

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// Config with a fixed home-anchored config dir and no verification delay.
pub fn test_config() -> DeployConfig {
    let mut cfg = DeployConfig::default().resolve(Path::new("/home/operator"), Path::new("/src"));
    cfg.paths.source_dir = PathBuf::from("/src/nanobot");
    cfg.verify.settle_secs = 0;
    cfg
}

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Build number of the image this container started from.
    pub build: u32,
    pub running: bool,
}

/// In-memory host. Defaults describe a ready non-root x86_64 host with
/// Docker installed, no swap, no config yet, and every command succeeding.
pub struct FakeHost {
    pub machine: String,
    pub root: bool,
    pub user: String,
    pub groups: RefCell<Vec<String>>,
    pub swap_total_kib: Cell<u64>,
    pub swap_files: RefCell<Vec<PathBuf>>,
    pub mount_table: RefCell<String>,
    /// Swap step that fails: `allocate`, `chmod`, `mkswap`, `swapon`, `restart`.
    pub failing_swap_step: Option<&'static str>,
    pub manager_installed: bool,
    pub manager_config: RefCell<String>,
    pub manager_backups: RefCell<Vec<PathBuf>>,
    pub runtime_installed: Cell<bool>,
    pub install_succeeds: bool,
    pub builds_succeed: bool,
    pub builds: Cell<u32>,
    pub onboard_code: i32,
    pub onboard_writes_marker: bool,
    pub run_succeeds: bool,
    /// Whether a started service container keeps running.
    pub stays_running: bool,
    pub pull_succeeds: bool,
    /// Whether container listing reaches the daemon.
    pub ps_succeeds: bool,
    pub mkdir_succeeds: bool,
    pub containers: RefCell<Vec<FakeContainer>>,
    pub paths: RefCell<HashSet<PathBuf>>,
    pub marker: PathBuf,
    pub calls: RefCell<Vec<String>>,
    pub next_id: Cell<u32>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            machine: "x86_64".to_string(),
            root: false,
            user: "operator".to_string(),
            groups: RefCell::new(vec!["operator".to_string(), "docker".to_string()]),
            swap_total_kib: Cell::new(0),
            swap_files: RefCell::new(Vec::new()),
            mount_table: RefCell::new("UUID=abcd / ext4 defaults 0 1\n".to_string()),
            failing_swap_step: None,
            manager_installed: true,
            manager_config: RefCell::new("CONF_SWAPSIZE=100\n".to_string()),
            manager_backups: RefCell::new(Vec::new()),
            runtime_installed: Cell::new(true),
            install_succeeds: true,
            builds_succeed: true,
            builds: Cell::new(0),
            onboard_code: 0,
            onboard_writes_marker: true,
            run_succeeds: true,
            stays_running: true,
            pull_succeeds: true,
            ps_succeeds: true,
            mkdir_succeeds: true,
            containers: RefCell::new(Vec::new()),
            paths: RefCell::new(HashSet::new()),
            marker: test_config().marker_path(),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Host that already went through a successful setup.
    pub fn configured() -> Self {
        let host = Self::new();
        host.swap_total_kib.set(1024 * 1024);
        host.paths.borrow_mut().insert(test_config().paths.config_dir);
        host.paths.borrow_mut().insert(host.marker.clone());
        host
    }

    /// Seed an existing container.
    pub fn with_container(self, name: &str, running: bool) -> Self {
        let id = self.next_container_id();
        self.containers.borrow_mut().push(FakeContainer {
            id,
            name: name.to_string(),
            image: "nanobot:old".to_string(),
            build: 0,
            running,
        });
        self
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.starts_with(prefix))
    }

    pub fn containers_named(&self, name: &str) -> Vec<FakeContainer> {
        self.containers
            .borrow()
            .iter()
            .filter(|c| c.name == name)
            .cloned()
            .collect()
    }

    pub fn mount_lines(&self, entry: &str) -> usize {
        self.mount_table
            .borrow()
            .lines()
            .filter(|l| l.trim() == entry)
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn next_container_id(&self) -> String {
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        format!("c0ffee{n:06}")
    }

    fn swap_step(&self, step: &'static str, path: &Path) -> Output {
        self.record(format!("{step} {}", path.display()));
        if self.failing_swap_step == Some(step) {
            err_output(1, format!("{step}: operation not permitted").as_bytes())
        } else {
            ok_output(b"")
        }
    }
}

impl HostProbe for FakeHost {
    async fn machine(&self) -> Result<String> {
        self.record("uname");
        Ok(self.machine.clone())
    }
    async fn swap_total_kib(&self) -> Result<u64> {
        Ok(self.swap_total_kib.get())
    }
    async fn is_root(&self) -> Result<bool> {
        Ok(self.root)
    }
    async fn current_user(&self) -> Result<String> {
        Ok(self.user.clone())
    }
    async fn groups(&self) -> Result<Vec<String>> {
        Ok(self.groups.borrow().clone())
    }
}

impl SwapProvisioner for FakeHost {
    async fn allocate(&self, path: &Path, size_mib: u64) -> Result<Output> {
        let out = self.swap_step("allocate", path);
        if out.status.success() {
            self.swap_files.borrow_mut().push(path.to_path_buf());
            self.record(format!("allocated {size_mib}M"));
        }
        Ok(out)
    }
    async fn restrict_permissions(&self, path: &Path) -> Result<Output> {
        Ok(self.swap_step("chmod", path))
    }
    async fn format(&self, path: &Path) -> Result<Output> {
        Ok(self.swap_step("mkswap", path))
    }
    async fn activate(&self, path: &Path) -> Result<Output> {
        let out = self.swap_step("swapon", path);
        if out.status.success() {
            self.swap_total_kib.set(1024 * 1024);
        }
        Ok(out)
    }
    async fn read_mount_table(&self, _: &Path) -> Result<String> {
        Ok(self.mount_table.borrow().clone())
    }
    async fn append_mount_entry(&self, _: &Path, entry: &str) -> Result<Output> {
        self.record(format!("fstab {entry}"));
        let mut table = self.mount_table.borrow_mut();
        table.push_str(entry);
        table.push('\n');
        Ok(ok_output(b""))
    }
    fn manager_available(&self, _: &str) -> bool {
        self.manager_installed
    }
    async fn read_manager_config(&self, _: &Path) -> Result<String> {
        Ok(self.manager_config.borrow().clone())
    }
    async fn backup_manager_config(&self, _: &Path, backup: &Path) -> Result<Output> {
        self.record(format!("backup {}", backup.display()));
        self.manager_backups.borrow_mut().push(backup.to_path_buf());
        Ok(ok_output(b""))
    }
    async fn write_manager_config(&self, _: &Path, contents: &str) -> Result<Output> {
        self.record("write manager config");
        *self.manager_config.borrow_mut() = contents.to_string();
        Ok(ok_output(b""))
    }
    async fn restart_manager(&self, service: &str) -> Result<Output> {
        let out = self.swap_step("restart", Path::new(service));
        if out.status.success() {
            self.swap_total_kib.set(2048 * 1024);
        }
        Ok(out)
    }
}

impl PackageInstaller for FakeHost {
    fn is_installed(&self, _: &str) -> bool {
        self.runtime_installed.get()
    }
    async fn install(&self, url: &str) -> Result<ExitStatus> {
        self.record(format!("install {url}"));
        if self.install_succeeds {
            self.runtime_installed.set(true);
            Ok(exit_status(0))
        } else {
            Ok(exit_status(1))
        }
    }
    async fn add_user_to_group(&self, user: &str, group: &str) -> Result<Output> {
        self.record(format!("usermod {user} {group}"));
        Ok(ok_output(b""))
    }
}

impl ContainerRuntime for FakeHost {
    async fn build(&self, tag: &str, _: &Path) -> Result<ExitStatus> {
        self.record(format!("build {tag}"));
        if self.builds_succeed {
            self.builds.set(self.builds.get() + 1);
            Ok(exit_status(0))
        } else {
            Ok(exit_status(1))
        }
    }
    async fn run(&self, spec: &RunSpec) -> Result<Output> {
        let name = spec.name.clone().unwrap_or_default();
        self.record(format!("run {name} {}", spec.command.join(" ")));
        if !self.run_succeeds {
            return Ok(err_output(125, b"Bind for 0.0.0.0:18790 failed: port is already allocated"));
        }
        if self.containers.borrow().iter().any(|c| c.name == name) {
            return Ok(err_output(125, b"Conflict. The container name is already in use"));
        }
        let id = self.next_container_id();
        self.containers.borrow_mut().push(FakeContainer {
            id: id.clone(),
            name,
            image: spec.image.clone(),
            build: self.builds.get(),
            running: self.stays_running,
        });
        Ok(ok_output(format!("{id}\n").as_bytes()))
    }
    async fn run_attached(&self, spec: &RunSpec) -> Result<ExitStatus> {
        self.record(format!("run_attached {}", spec.command.join(" ")));
        if spec.command.first().map(String::as_str) == Some("onboard")
            && self.onboard_code == 0
            && self.onboard_writes_marker
        {
            self.paths.borrow_mut().insert(self.marker.clone());
        }
        Ok(exit_status(self.onboard_code))
    }
    async fn stop(&self, name: &str) -> Result<Output> {
        self.record(format!("stop {name}"));
        let mut containers = self.containers.borrow_mut();
        match containers.iter_mut().find(|c| c.name == name) {
            Some(c) => {
                c.running = false;
                Ok(ok_output(name.as_bytes()))
            }
            None => Ok(err_output(1, b"Error response from daemon: No such container")),
        }
    }
    async fn remove(&self, name: &str) -> Result<Output> {
        self.record(format!("rm {name}"));
        let mut containers = self.containers.borrow_mut();
        match containers.iter().position(|c| c.name == name) {
            Some(i) if containers[i].running => Ok(err_output(1, b"cannot remove a running container")),
            Some(i) => {
                containers.remove(i);
                Ok(ok_output(name.as_bytes()))
            }
            None => Ok(err_output(1, b"Error response from daemon: No such container")),
        }
    }
    async fn list_by_name(&self, name: &str, all: bool) -> Result<Output> {
        self.record(format!("ps {name} all={all}"));
        if !self.ps_succeeds {
            return Ok(err_output(1, b"Cannot connect to the Docker daemon at unix:///var/run/docker.sock"));
        }
        let rows: String = self
            .containers
            .borrow()
            .iter()
            .filter(|c| c.name.contains(name) && (all || c.running))
            .map(|c| {
                let (state, status) = if c.running {
                    ("running", "Up 3 seconds")
                } else {
                    ("exited", "Exited (1) 2 seconds ago")
                };
                format!("{}\t{}\t{}\t{state}\t{status}\n", c.id, c.name, c.image)
            })
            .collect();
        Ok(ok_output(rows.as_bytes()))
    }
    async fn logs(&self, name: &str, tail: u32) -> Result<Output> {
        self.record(format!("logs {name} {tail}"));
        Ok(ok_output(b"Error: no API key configured for provider\n"))
    }
    async fn follow_logs(&self, name: &str, _: u32) -> Result<ExitStatus> {
        self.record(format!("logs -f {name}"));
        Ok(exit_status(0))
    }
}

impl LocalFs for FakeHost {
    fn exists(&self, path: &Path) -> bool {
        self.paths.borrow().contains(path)
    }
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.record(format!("mkdir {}", path.display()));
        if !self.mkdir_succeeds {
            anyhow::bail!("creating {}: Permission denied (os error 13)", path.display());
        }
        self.paths.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }
}

impl SourceFetcher for FakeHost {
    async fn pull(&self, dir: &Path) -> Result<Output> {
        self.record(format!("git pull {}", dir.display()));
        if self.pull_succeeds {
            Ok(ok_output(b"Already up to date.\n"))
        } else {
            Ok(err_output(1, b"fatal: Not possible to fast-forward, aborting."))
        }
    }
}

/// Prompt answering `confirm` from a script (falling back to the default)
/// and counting acknowledgments.
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: RefCell<VecDeque<bool>>,
    pub confirms: Cell<usize>,
    pub acks: Cell<usize>,
    pub non_interactive: bool,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn is_interactive(&self) -> bool {
        !self.non_interactive
    }
    fn confirm(&self, _: &str, default: bool) -> Result<bool> {
        self.confirms.set(self.confirms.get() + 1);
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(default))
    }
    fn acknowledge(&self, _: &str) -> Result<()> {
        self.acks.set(self.acks.get() + 1);
        Ok(())
    }
}

/// Reporter that keeps every message for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }
    fn success(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}
