//! `ContainerRuntime` for `LinuxHost`, driving the Docker CLI.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ContainerRuntime};
use crate::domain::RunSpec;
use crate::domain::container::LIST_FORMAT;
use crate::infra::host::{LinuxHost, arg};

/// Arguments for `docker run` from a spec, image and command last.
#[must_use]
pub fn run_args(spec: &RunSpec) -> Vec<String> {
    let mut args = vec!["run".to_string()];
    if spec.detach {
        args.push("-d".to_string());
    }
    if spec.remove_on_exit {
        args.push("--rm".to_string());
    }
    if let Some(name) = &spec.name {
        args.extend(["--name".to_string(), name.clone()]);
    }
    if let Some(policy) = spec.restart {
        args.extend(["--restart".to_string(), policy.as_str().to_string()]);
    }
    for (host, container) in &spec.ports {
        args.extend(["-p".to_string(), format!("{host}:{container}")]);
    }
    for (host, container) in &spec.volumes {
        args.extend(["-v".to_string(), format!("{}:{container}", host.display())]);
    }
    args.push(spec.image.clone());
    args.extend(spec.command.iter().cloned());
    args
}

/// Anchored so `nanobot` does not also match `nanobot-dev`.
fn name_filter(name: &str) -> String {
    format!("name=^{name}$")
}

impl<R: CommandRunner> LinuxHost<R> {
    async fn docker(&self, args: &[&str]) -> Result<Output> {
        self.runner().run(self.runtime(), args).await
    }

    async fn docker_attached(&self, args: &[&str]) -> Result<ExitStatus> {
        self.runner().run_status(self.runtime(), args).await
    }
}

impl<R: CommandRunner> ContainerRuntime for LinuxHost<R> {
    async fn build(&self, tag: &str, context: &Path) -> Result<ExitStatus> {
        self.docker_attached(&["build", "-t", tag, &arg(context)])
            .await
            .context("docker build")
    }

    async fn run(&self, spec: &RunSpec) -> Result<Output> {
        let args = run_args(spec);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.docker(&args).await.context("docker run")
    }

    async fn run_attached(&self, spec: &RunSpec) -> Result<ExitStatus> {
        let args = run_args(spec);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.docker_attached(&args).await.context("docker run")
    }

    async fn stop(&self, name: &str) -> Result<Output> {
        self.docker(&["stop", name]).await.context("docker stop")
    }

    async fn remove(&self, name: &str) -> Result<Output> {
        self.docker(&["rm", name]).await.context("docker rm")
    }

    async fn list_by_name(&self, name: &str, all: bool) -> Result<Output> {
        let filter = name_filter(name);
        let mut args = vec!["ps"];
        if all {
            args.push("-a");
        }
        args.extend(["--filter", filter.as_str(), "--format", LIST_FORMAT]);
        self.docker(&args).await.context("docker ps")
    }

    async fn logs(&self, name: &str, tail: u32) -> Result<Output> {
        self.docker(&["logs", "--tail", &tail.to_string(), name])
            .await
            .context("docker logs")
    }

    async fn follow_logs(&self, name: &str, tail: u32) -> Result<ExitStatus> {
        self.docker_attached(&["logs", "-f", "--tail", &tail.to_string(), name])
            .await
            .context("docker logs -f")
    }
}
