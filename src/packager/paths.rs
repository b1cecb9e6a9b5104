//! Resolution of the entrypoint and working directory inputs.
//!
//! Relative paths are made absolute against the process's current directory,
//! then `stat`ed so a bad input is reported before esbuild ever runs.

use crate::packager::error::{Error, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Resolves the entrypoint to an absolute path and checks it can be `stat`ed.
pub async fn resolve_entrypoint(raw: &str) -> Result<PathBuf> {
    let resolved = Path::new(raw)
        .absolutize()
        .map(|p| p.into_owned())
        .map_err(|source| Error::EntrypointAbsolutize {
            raw: raw.to_string(),
            source,
        })?;

    log::debug!("Resolved entrypoint {} to {}", raw, resolved.display());

    if let Err(source) = tokio::fs::metadata(&resolved).await {
        return Err(Error::EntrypointNotFound {
            raw: raw.to_string(),
            resolved,
            source,
        });
    }

    Ok(resolved)
}

/// Resolves the working directory to an absolute path and checks that it is
/// an existing directory.
pub async fn resolve_working_directory(raw: &str) -> Result<PathBuf> {
    let resolved = Path::new(raw)
        .absolutize()
        .map(|p| p.into_owned())
        .map_err(|source| Error::WorkingDirectoryAbsolutize {
            raw: raw.to_string(),
            source,
        })?;

    log::debug!("Resolved working directory {} to {}", raw, resolved.display());

    let source = match tokio::fs::metadata(&resolved).await {
        Ok(metadata) if metadata.is_dir() => return Ok(resolved),
        Ok(_) => std::io::Error::from(std::io::ErrorKind::NotADirectory),
        Err(source) => source,
    };

    Err(Error::WorkingDirectoryNotFound {
        raw: raw.to_string(),
        resolved,
        source,
    })
}
