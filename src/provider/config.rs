//! Provider configuration: locating the esbuild executable.

use crate::packager::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable consulted when `esbuild_binary` is not configured.
pub const ESBUILD_BINARY_ENV: &str = "LAMBDA_PACKAGER_ESBUILD_BINARY";

/// Executable looked up on `PATH` when no override is given.
pub const DEFAULT_ESBUILD_BINARY: &str = "esbuild";

/// Provider-level configuration block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Explicit path to the esbuild executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esbuild_binary: Option<String>,
}

/// Why the esbuild executable could not be located.
#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error(
        "You specified the {binary} esbuild_binary and we could not find the file or do not have permission to view it: {source}"
    )]
    OverrideNotFound {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("You specified the {binary} esbuild_binary and it's a directory, not a file.")]
    OverrideIsDirectory { binary: String },

    #[error("Could not find the esbuild binary. Is it installed and in your path? Error: {0}")]
    NotOnPath(#[from] which::Error),
}

impl ConfigureError {
    pub fn summary(&self) -> &'static str {
        match self {
            Self::OverrideNotFound { .. } | Self::OverrideIsDirectory { .. } => {
                "An override esbuild_binary was set and is invalid"
            }
            Self::NotOnPath(_) => "Could not find the esbuild binary",
        }
    }
}

impl From<&ConfigureError> for Diagnostic {
    fn from(err: &ConfigureError) -> Self {
        Diagnostic::error(err.summary(), err.to_string())
    }
}

impl ProviderConfig {
    /// Resolves the esbuild executable, reading [`ESBUILD_BINARY_ENV`] from the environment.
    pub fn resolve_esbuild_binary(&self) -> Result<PathBuf, ConfigureError> {
        self.resolve_esbuild_binary_with(std::env::var(ESBUILD_BINARY_ENV).ok())
    }

    /// Resolves the esbuild executable.
    ///
    /// Precedence: `esbuild_binary`, then `env_override`, then `esbuild` on
    /// `PATH`. An override must exist and must not be a directory.
    pub fn resolve_esbuild_binary_with(
        &self,
        env_override: Option<String>,
    ) -> Result<PathBuf, ConfigureError> {
        let override_binary = self
            .esbuild_binary
            .clone()
            .filter(|b| !b.is_empty())
            .or_else(|| env_override.filter(|b| !b.is_empty()));

        let Some(binary) = override_binary else {
            let path = which::which(DEFAULT_ESBUILD_BINARY)?;
            log::debug!("Found esbuild at: {}", path.display());
            return Ok(path);
        };

        let metadata = std::fs::metadata(&binary).map_err(|source| {
            ConfigureError::OverrideNotFound {
                binary: binary.clone(),
                source,
            }
        })?;

        if metadata.is_dir() {
            return Err(ConfigureError::OverrideIsDirectory { binary });
        }

        log::debug!("Using esbuild override: {}", binary);
        Ok(PathBuf::from(binary))
    }
}
