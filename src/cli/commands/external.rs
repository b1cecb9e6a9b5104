//! `lambda_packager external`: Terraform `external` data source program.
//!
//! The `external` provider sends a flat JSON object of strings on stdin and
//! expects a flat JSON object of strings on stdout. `args` therefore arrives
//! JSON-encoded, e.g. `jsonencode(["--bundle", "--platform=node"])`.

use crate::cli::{args::OutputArgs, output};
use crate::error::{CliError, PackagerError, Result};
use crate::packager::PackageRequest;
use crate::provider::{LambdaPackagerProvider, ProviderConfig, ReadRequest};
use std::collections::BTreeMap;

/// Turns the string-only query into a read request.
pub fn parse_query(query: &str) -> Result<ReadRequest> {
    let mut fields: BTreeMap<String, String> = serde_json::from_str(query)?;

    let mut take = |name: &str| {
        fields.remove(name).ok_or_else(|| {
            PackagerError::Cli(CliError::MissingArgument {
                argument: name.to_string(),
            })
        })
    };

    let raw_args = take("args")?;
    let entrypoint = take("entrypoint")?;
    let working_directory = take("working_directory")?;
    let esbuild_binary = fields.remove("esbuild_binary");

    let args: Vec<String> = serde_json::from_str(&raw_args).map_err(|e| {
        PackagerError::Cli(CliError::InvalidArguments {
            reason: format!("args must be a JSON-encoded list of strings: {e}"),
        })
    })?;

    for unknown in fields.keys() {
        log::warn!("Ignoring unknown query key: {}", unknown);
    }

    Ok(ReadRequest {
        provider: ProviderConfig { esbuild_binary },
        config: PackageRequest {
            args,
            entrypoint,
            working_directory,
        },
    })
}

pub async fn run(provider: LambdaPackagerProvider, args: OutputArgs, query: &str) -> Result<i32> {
    let provider = match args.output_dir {
        Some(dir) => provider.with_output_dir(dir),
        None => provider,
    };

    let response = provider.read(parse_query(query)?).await;
    output::print_diagnostics(&response.diagnostics)?;

    if let Some(state) = response.state {
        let result = BTreeMap::from([
            ("filename", state.filename),
            ("source_code_hash", state.source_code_hash),
        ]);
        output::print_json(&result)?;
    }

    Ok(output::exit_code(&response.diagnostics))
}
