//! Lambda packaging: esbuild bundle → reproducible zip → source code hash.
//!
//! # Overview
//!
//! The [`Packager`]:
//! 1. Resolves the entrypoint and working directory ([`paths`])
//! 2. Forwards the user's flags plus the entrypoint to a [`Bundler`]
//! 3. Relays esbuild errors and warnings as [`Diagnostics`]
//! 4. Writes the first output into a single-entry zip ([`archive`])
//! 5. Hashes the zip as written ([`checksum`])
//!
//! # Example
//!
//! ```no_run
//! use lambda_packager::packager::{EsbuildCli, PackageRequest, Packager};
//!
//! # async fn example() {
//! let packager = Packager::new(EsbuildCli::new("esbuild"));
//! let outcome = packager
//!     .package(&PackageRequest {
//!         args: vec!["--bundle".into(), "--platform=node".into()],
//!         entrypoint: "lambda/src/index.ts".into(),
//!         working_directory: "lambda".into(),
//!     })
//!     .await;
//!
//! for diagnostic in &outcome.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! if let Some(result) = outcome.result {
//!     println!("{} {}", result.filename.display(), result.source_code_hash);
//! }
//! # }
//! ```

pub mod archive;
pub mod checksum;
pub mod diagnostics;
pub mod error;
pub mod esbuild;
mod orchestrator;
pub mod paths;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use esbuild::{BuildOptions, BuildResult, Bundler, EsbuildCli};
pub use orchestrator::{PackageOutcome, PackageRequest, PackageResult, Packager};
