//! Command line interface for lambda_packager.
//!
//! This module parses arguments, runs the selected subcommand against the
//! provider, and maps the outcome to an exit code.

pub mod args;
pub mod commands;
pub mod output;

pub use args::{Args, Command};

use crate::error::Result;
use crate::provider::LambdaPackagerProvider;
use anyhow::Context;
use tokio::io::AsyncReadExt;

/// Version reported in the provider metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    execute(Args::parse_args()).await
}

/// Runs already-parsed arguments.
pub async fn execute(args: Args) -> Result<i32> {
    let provider = LambdaPackagerProvider::new(VERSION);

    match args.command {
        Command::Package(package) => commands::package::run(provider, package).await,
        Command::External(output_args) => {
            let query = read_stdin().await?;
            commands::external::run(provider, output_args, &query).await
        }
        Command::Read(output_args) => {
            let request = serde_json::from_str(&read_stdin().await?)?;
            let provider = match output_args.output_dir {
                Some(dir) => provider.with_output_dir(dir),
                None => provider,
            };
            let response = provider.read(request).await;
            output::print_json(&response)?;
            Ok(output::exit_code(&response.diagnostics))
        }
        Command::Schema => {
            output::print_json(&serde_json::json!({
                "metadata": provider.metadata(),
                "schema": provider.schema(),
            }))?;
            Ok(0)
        }
    }
}

async fn read_stdin() -> Result<String> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("reading request from stdin")?;
    Ok(input)
}
