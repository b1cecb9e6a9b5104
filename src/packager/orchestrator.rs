//! The packaging pipeline.
//!
//! resolve paths → build with esbuild → zip the first output → hash the zip.
//! The first error diagnostic ends the request; warnings are carried along.

use super::{
    Diagnostics, Error, Result, archive, checksum,
    diagnostics::relay_messages,
    esbuild::{BuildOptions, Bundler},
    paths,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inputs of one packaging request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    /// Flags forwarded to esbuild, in order.
    pub args: Vec<String>,
    pub entrypoint: String,
    pub working_directory: String,
}

/// The finished package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageResult {
    pub filename: PathBuf,
    pub source_code_hash: String,
}

/// What a request produced: a result only if no error was reported.
#[derive(Debug, Default)]
pub struct PackageOutcome {
    pub result: Option<PackageResult>,
    pub diagnostics: Diagnostics,
}

/// Runs packaging requests against a [`Bundler`].
#[derive(Debug, Clone)]
pub struct Packager<B> {
    bundler: B,
    output_dir: Option<PathBuf>,
}

impl<B: Bundler> Packager<B> {
    pub fn new(bundler: B) -> Self {
        Self {
            bundler,
            output_dir: None,
        }
    }

    /// Writes packages into `dir` instead of the system temp directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn bundler(&self) -> &B {
        &self.bundler
    }

    /// Packages one Lambda.
    ///
    /// Resolves the entrypoint and working directory, bundles with the
    /// configured [`Bundler`], zips the first output file and hashes the zip.
    /// Never fails outright: every failure becomes an error diagnostic.
    ///
    /// # Arguments
    ///
    /// * `request` - esbuild flags, entrypoint and working directory
    ///
    /// # Returns
    ///
    /// A [`PackageOutcome`] whose `result` is set only when no error was
    /// reported. esbuild warnings are included either way.
    pub async fn package(&self, request: &PackageRequest) -> PackageOutcome {
        let mut diagnostics = Diagnostics::new();

        match self.run(request, &mut diagnostics).await {
            Ok(Some(result)) => PackageOutcome {
                result: Some(result),
                diagnostics,
            },
            Ok(None) => PackageOutcome {
                result: None,
                diagnostics,
            },
            Err(err) => {
                log::debug!("Packaging failed: {err}");
                diagnostics.push((&err).into());
                PackageOutcome {
                    result: None,
                    diagnostics,
                }
            }
        }
    }

    /// `Ok(None)` means esbuild reported errors, already in `diagnostics`.
    async fn run(
        &self,
        request: &PackageRequest,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<PackageResult>> {
        let entrypoint = paths::resolve_entrypoint(&request.entrypoint).await?;
        let working_directory =
            paths::resolve_working_directory(&request.working_directory).await?;

        let options = BuildOptions::parse(&request.args, &entrypoint, working_directory);
        let build = self.bundler.build(&options).await?;

        diagnostics.append(relay_messages(&build.errors, &build.warnings));
        if !build.errors.is_empty() {
            return Ok(None);
        }

        let bundle = build
            .output_files
            .into_iter()
            .next()
            .ok_or(Error::NoOutputFiles)?;

        let filename = archive::write_package(bundle.contents, self.output_dir.clone()).await?;
        let source_code_hash = checksum::calculate_source_code_hash(&filename).await?;

        log::info!(
            "Packaged {} into {} ({})",
            entrypoint.display(),
            filename.display(),
            source_code_hash
        );

        Ok(Some(PackageResult {
            filename,
            source_code_hash,
        }))
    }
}
