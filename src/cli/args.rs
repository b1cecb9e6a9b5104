//! Command line argument parsing.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Packages a Lambda entrypoint with esbuild into a reproducible zip
#[derive(Parser, Debug)]
#[command(
    name = "lambda_packager",
    version,
    about = "Packages a Lambda entrypoint with esbuild into a reproducible zip",
    long_about = "Bundles a JavaScript/TypeScript entrypoint with esbuild, zips the bundle as a single
index.js entry with a pinned timestamp, and reports the zip path and its base64 SHA-256.

Usage:
  lambda_packager package --entrypoint lambda/src/index.ts --working-directory lambda -- --bundle --platform=node
  lambda_packager external < query.json      # Terraform `external` data source program
  lambda_packager read < request.json        # full provider + data source request
  lambda_packager schema

Exit code 0 = the zip exists at the reported path."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package one entrypoint and print the resulting state as JSON
    Package(PackageArgs),

    /// Speak the Terraform `external` data source protocol on stdin/stdout
    External(OutputArgs),

    /// Read a JSON read request on stdin and write the JSON response
    Read(OutputArgs),

    /// Print the provider and data source schema as JSON
    Schema,
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Directory to write the zip into (default: system temp directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct PackageArgs {
    /// Path to the Lambda function entrypoint
    #[arg(short, long, value_name = "PATH")]
    pub entrypoint: String,

    /// Folder containing the package.json of the Lambda project
    #[arg(short = 'w', long, value_name = "DIR")]
    pub working_directory: String,

    /// esbuild executable (default: $LAMBDA_PACKAGER_ESBUILD_BINARY, then esbuild on PATH)
    #[arg(long, value_name = "PATH")]
    pub esbuild_binary: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Flags forwarded to esbuild unmodified
    #[arg(last = true, value_name = "ESBUILD_ARGS", allow_hyphen_values = true)]
    pub esbuild_args: Vec<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
