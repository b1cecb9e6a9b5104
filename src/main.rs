//! lambda_packager - esbuild Lambda packager for Terraform.
//!
//! This binary bundles a Lambda entrypoint with esbuild, zips it reproducibly
//! and reports the zip path and its source code hash.

use lambda_packager::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
