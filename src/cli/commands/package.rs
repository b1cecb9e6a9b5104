//! `lambda_packager package`: one-shot packaging from command line flags.

use crate::cli::args::PackageArgs;
use crate::cli::output;
use crate::error::Result;
use crate::packager::PackageRequest;
use crate::provider::{LambdaPackagerProvider, ProviderConfig, ReadRequest};

pub async fn run(provider: LambdaPackagerProvider, args: PackageArgs) -> Result<i32> {
    let provider = match args.output.output_dir {
        Some(dir) => provider.with_output_dir(dir),
        None => provider,
    };

    let request = ReadRequest {
        provider: ProviderConfig {
            esbuild_binary: args.esbuild_binary,
        },
        config: PackageRequest {
            args: args.esbuild_args,
            entrypoint: args.entrypoint,
            working_directory: args.working_directory,
        },
    };

    let response = provider.read(request).await;
    output::print_diagnostics(&response.diagnostics)?;

    if let Some(state) = &response.state {
        output::print_json(state)?;
    }

    Ok(output::exit_code(&response.diagnostics))
}
