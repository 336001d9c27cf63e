//! Human-readable terminal renderer.

use crate::application::services::bootstrap::BootstrapOutcome;
use crate::application::services::installer::InstallOutcome;
use crate::application::services::pipeline::SetupReport;
use crate::application::services::preflight::PreflightOutcome;
use crate::application::services::update::{ResolvedBy, UpdateReport};
use crate::domain::ContainerSummary;
use crate::output::OutputContext;

/// Renders reports as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_version(&self, version: &str) {
        if !self.ctx.quiet {
            println!("nanobot-deploy {version}");
        }
    }

    /// Summary printed after a successful setup run.
    pub fn render_setup(&self, report: &SetupReport) {
        println!();
        self.ctx.header(&format!("nanobot is running ({})", report.profile));
        self.ctx.kv("Container:", &short_id(&report.verify.container_id));
        self.ctx.kv("Status:", &report.verify.status);
        self.ctx.kv("Swap:", &preflight_display(&report.preflight));
        self.ctx.kv("Runtime:", install_display(&report.runtime));
        self.ctx.kv("Config:", &report.verify.config_path.display().to_string());
        if let Some(note) = bootstrap_note(&report.bootstrap) {
            self.ctx.info(note);
        }
        println!();
        self.ctx.info(&format!("Follow logs: {}", report.verify.logs_command));
    }

    pub fn render_update(&self, report: &UpdateReport) {
        let how = match report.resolved_by {
            ResolvedBy::Argument => "requested",
            ResolvedBy::OnlyProfile => "only enabled profile",
            ResolvedBy::Architecture => "detected from architecture",
        };
        self.ctx.success(&format!("updated with profile '{}' ({how})", report.profile));
        self.render_setup(&report.setup);
    }

    /// Runtime view of the service container.
    pub fn render_container(&self, name: &str, container: Option<&ContainerSummary>) {
        match container {
            Some(c) if c.is_running() => {
                self.ctx.success(&format!("container '{name}' is running"));
                self.ctx.kv("ID:", &short_id(&c.id));
                self.ctx.kv("Image:", &c.image);
                self.ctx.kv("Status:", &c.status);
            }
            Some(c) => {
                self.ctx.warn(&format!("container '{name}' exists but is {}", c.state));
                self.ctx.kv("Status:", &c.status);
            }
            None => self.ctx.warn(&format!("no container named '{name}'")),
        }
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

fn preflight_display(outcome: &PreflightOutcome) -> String {
    match outcome {
        PreflightOutcome::Sufficient { swap_total_kib } => {
            format!("{} MiB (unchanged)", swap_total_kib / 1024)
        }
        PreflightOutcome::Created { swap_file, size_mib, .. } => {
            format!("{size_mib} MiB created at {}", swap_file.display())
        }
        PreflightOutcome::Resized { target_mib, .. } => format!("resized to {target_mib} MiB"),
        PreflightOutcome::Declined { swap_total_kib } => {
            format!("{} MiB (resize declined)", swap_total_kib / 1024)
        }
        PreflightOutcome::ManagerUnavailable { swap_total_kib } => {
            format!("{} MiB (no swap manager)", swap_total_kib / 1024)
        }
    }
}

fn install_display(outcome: &InstallOutcome) -> &'static str {
    match outcome {
        InstallOutcome::AlreadyInstalled => "already installed",
        InstallOutcome::Installed => "installed",
    }
}

/// Reminder for a config generated without pausing for the operator.
fn bootstrap_note(outcome: &BootstrapOutcome) -> Option<&'static str> {
    match outcome {
        BootstrapOutcome::Onboarded {
            acknowledged: false,
            ..
        } => Some("Fresh configuration: add provider keys there, then re-run setup."),
        _ => None,
    }
}
