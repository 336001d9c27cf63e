//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Setup pipeline errors ─────────────────────────────────────────────────────

/// Fatal outcomes of the setup pipeline and the update dispatcher.
///
/// Every message carries the next step the operator should take.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "Swap preflight failed while trying to {step}: {detail}\n\nNo partial cleanup was attempted. Fix the cause, then re-run setup."
    )]
    PreflightFatal { step: &'static str, detail: String },

    #[error(
        "Docker is installed and '{user}' was added to the '{group}' group.\n\nGroup membership only applies to new login sessions. Log out and back in (or run 'newgrp {group}'), then run:\n  {resume}"
    )]
    DependencyCheckpoint {
        user: String,
        group: String,
        resume: String,
    },

    #[error(
        "Container runtime installation failed: {detail}\n\nInstall Docker manually (https://docs.docker.com/engine/install/), then re-run setup."
    )]
    InstallFatal { detail: String },

    #[error("Image build for '{tag}' failed: {detail}\n\nCheck the build output above, then re-run setup.")]
    BuildFatal { tag: String, detail: String },

    #[error("First-run onboarding failed: {detail}\n\nInspect {config_dir}, then re-run setup.")]
    BootstrapFatal { detail: String, config_dir: String },

    #[error("Container '{name}' failed to start: {detail}\n\nCheck that port {port} is free, then re-run setup.")]
    LifecycleFatal {
        name: String,
        port: u16,
        detail: String,
    },

    #[error(
        "Container '{name}' is not running.\n\nRecent logs:\n{logs}\n\nFix the configuration in {config_dir}, then re-run setup."
    )]
    VerificationFailure {
        name: String,
        logs: String,
        config_dir: String,
    },

    #[error("Fetching the latest source failed: {detail}\n\nResolve the git state in {source_dir}, then re-run update.")]
    SourceFetchFatal { detail: String, source_dir: String },

    #[error(transparent)]
    DispatchPrecondition(#[from] DispatchError),
}

impl SetupError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DependencyCheckpoint { .. } => 3,
            Self::DispatchPrecondition(_) => 4,
            Self::VerificationFailure { .. } => 5,
            _ => 1,
        }
    }

    /// Stable machine-readable identifier used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PreflightFatal { .. } => "preflight_failed",
            Self::DependencyCheckpoint { .. } => "relogin_required",
            Self::InstallFatal { .. } => "install_failed",
            Self::BuildFatal { .. } => "build_failed",
            Self::BootstrapFatal { .. } => "bootstrap_failed",
            Self::LifecycleFatal { .. } => "start_failed",
            Self::VerificationFailure { .. } => "not_running",
            Self::SourceFetchFatal { .. } => "fetch_failed",
            Self::DispatchPrecondition(_) => "precondition_failed",
        }
    }
}

// ── Dispatch errors ───────────────────────────────────────────────────────────

/// Reasons the update dispatcher refuses to run, raised before any source
/// fetch or pipeline stage.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "No configuration found at {marker}.\n\nThis host has not been set up yet. Run first-time setup instead:\n  nanobot-deploy setup-amd2gb   (x86_64, 2 GB RAM)\n  nanobot-deploy setup-rpi4gb   (Raspberry Pi, 4 GB RAM)"
    )]
    NotConfigured { marker: String },

    #[error("No setup profile is available.\n\nEnable at least one of 'amd2gb', 'rpi4gb' under 'profiles' in the deploy config.")]
    NoProfile,

    #[error("Profile '{profile}' is not enabled.\n\nEnabled profiles: {enabled}")]
    ProfileDisabled { profile: String, enabled: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to deploy configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'\n\n{reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
