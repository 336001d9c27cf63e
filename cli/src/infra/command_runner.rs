//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs host commands with a bounded wait and kills the
//! child when the deadline passes.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;

/// Default timeout for short host and runtime queries.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `CommandRunner` backed by `tokio::process`.
pub struct TokioCommandRunner {
    timeout: Duration,
    /// Send attached children's stdout to our stderr.
    attached_to_stderr: bool,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            attached_to_stderr: false,
        }
    }

    /// Keep stdout free for a machine-readable document.
    #[must_use]
    pub fn attached_to_stderr(mut self, enabled: bool) -> Self {
        self.attached_to_stderr = enabled;
        self
    }

    fn spawn_piped(program: &str, args: &[&str], stdin: bool) -> Result<Child> {
        tracing::debug!(program, ?args, "running");
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if stdin {
            cmd.stdin(Stdio::piped());
        }
        cmd.spawn().with_context(|| format!("failed to spawn {program}"))
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

/// Drain stdout/stderr while waiting so a chatty child never blocks on a
/// full pipe. Kills the child if `timeout` elapses first.
async fn collect(mut child: Child, program: &str, timeout: Duration) -> Result<Output> {
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    tokio::select! {
        result = async {
            let (status, stdout, stderr) =
                tokio::join!(child.wait(), drain(stdout.as_mut()), drain(stderr.as_mut()));
            Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        } => result,
        () = tokio::time::sleep(timeout) => {
            let _ = child.kill().await;
            anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
        }
    }
}

async fn drain<S: AsyncRead + Unpin>(stream: Option<&mut S>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(s) = stream {
        let _ = s.read_to_end(&mut buf).await;
    }
    buf
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let child = Self::spawn_piped(program, args, false)?;
        collect(child, program, timeout).await
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        let mut child = Self::spawn_piped(program, args, true)?;

        // Feed stdin from its own task; the child may not read it until its
        // output is drained.
        let stdin = child.stdin.take();
        let input = input.to_vec();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(&input).await;
            }
        });

        let output = collect(child, program, self.timeout).await;
        let _ = writer.await;
        output
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        tracing::debug!(program, ?args, "running attached");
        let mut cmd = Command::new(program);
        cmd.args(args).kill_on_drop(true);
        if self.attached_to_stderr {
            cmd.stdout(Stdio::from(std::io::stderr()));
        }
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
