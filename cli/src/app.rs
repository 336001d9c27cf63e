//! Application context: unified state passed to every command handler.
//!
//! Built once from the top-level flags. Command handlers ask it for the
//! config, the host adapter, the prompt and the progress reporter instead of
//! constructing their own.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::DeployConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::host::LinuxHost;
use crate::infra::prompt::TerminalPrompt;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Environment variable that forces non-interactive mode, like `CI`.
pub const YES_ENV: &str = "NANOBOT_DEPLOY_YES";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `NANOBOT_DEPLOY_YES`).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    /// When `true`, prompts take their defaults without reading stdin.
    pub non_interactive: bool,
    config_store: YamlConfigStore,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var_os("CI").is_some() || std::env::var_os(YES_ENV).is_some();
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            non_interactive: flags.behaviour.yes || ci_env,
            config_store: YamlConfigStore::from_env(),
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Load and validate the deploy config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or validated.
    pub fn load_config(&self) -> Result<DeployConfig> {
        let config = self.config_store.load()?;
        tracing::debug!(path = ?self.config_store.path().ok(), "config loaded");
        Ok(config)
    }

    /// Production host adapter for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoking user cannot be identified.
    pub async fn host(&self, config: &DeployConfig) -> Result<LinuxHost<TokioCommandRunner>> {
        let runner = TokioCommandRunner::new(Duration::from_secs(config.runtime.command_timeout_secs))
            .attached_to_stderr(self.is_json());
        LinuxHost::detect(runner, config)
            .await
            .context("inspecting the invoking user")
    }

    #[must_use]
    pub fn prompt(&self) -> TerminalPrompt {
        TerminalPrompt::new(self.non_interactive)
    }

    /// Stage reporter; writes to stderr in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        if self.is_json() {
            TerminalReporter::stderr(&self.output)
        } else {
            TerminalReporter::new(&self.output)
        }
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }
}
