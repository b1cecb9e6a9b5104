//! Lambda packaging with esbuild for Terraform.
//!
//! This library bundles a JavaScript/TypeScript entrypoint with esbuild and
//! produces:
//! - a zip holding a single `index.js` with a pinned timestamp
//! - the base64 SHA-256 of that zip, for `source_code_hash`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod packager;
pub mod provider;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
