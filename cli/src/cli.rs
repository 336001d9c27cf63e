//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::{PlatformProfile, SetupError};

/// Converge this host to a running nanobot gateway container
#[derive(Parser)]
#[command(
    name = "nanobot-deploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Never prompt; take every default (also set by CI or NANOBOT_DEPLOY_YES)
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// First-time setup on an x86_64 host with 2 GB RAM
    #[command(name = "setup-amd2gb")]
    SetupAmd2gb,

    /// First-time setup on a Raspberry Pi with 4 GB RAM
    #[command(name = "setup-rpi4gb")]
    SetupRpi4gb,

    /// Pull the latest source and re-run setup
    Update(commands::update::UpdateArgs),

    /// Show container and gateway status
    ///
    /// With --json, the in-container report goes to stderr and stdout
    /// carries only the JSON summary.
    Status(commands::status::StatusArgs),

    /// Send one message to the agent
    Agent(commands::agent::AgentArgs),

    /// Show gateway logs
    Logs(commands::logs::LogsArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags { yes: self.yes },
        });

        match self.command {
            Command::SetupAmd2gb => commands::setup::run(&app, PlatformProfile::Amd2gb).await,
            Command::SetupRpi4gb => commands::setup::run(&app, PlatformProfile::Rpi4gb).await,
            Command::Update(args) => commands::update::run(&app, &args).await,
            Command::Status(args) => commands::status::run(&app, &args).await,
            Command::Agent(args) => commands::agent::run(&app, &args).await,
            Command::Logs(args) => commands::logs::run(&app, &args).await,
            Command::Version => commands::version::run(&app),
        }
    }
}

fn setup_error(err: &anyhow::Error) -> Option<&SetupError> {
    err.chain().find_map(|cause| cause.downcast_ref::<SetupError>())
}

/// Process exit code for a failed run.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    setup_error(err)
        .and_then(|e| u8::try_from(e.exit_code()).ok())
        .unwrap_or(1)
}

/// Machine-readable error code for `--json` output.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    setup_error(err).map_or("error", SetupError::code)
}
