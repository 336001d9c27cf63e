//! nanobot-deploy - converge a host to a running nanobot gateway container

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nanobot_deploy::cli::{Cli, error_code, exit_code};
use nanobot_deploy::output::json;

fn init_tracing(verbose: bool) {
    let default = if verbose { "nanobot_deploy=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_errors = cli.json;

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            match json_errors.then(|| json::format_error(&message, error_code(&e))) {
                Some(Ok(doc)) => println!("{doc}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::from(exit_code(&e))
        }
    }
}
