//! Error types for the packaging pipeline.
//!
//! Every variant knows the short, user-facing summary it is reported under,
//! so the host boundary can turn any failure into exactly one diagnostic.

use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving, bundling, zipping or hashing.
#[derive(Error, Debug)]
pub enum Error {
    /// The entrypoint could not be turned into an absolute path.
    #[error(
        "You specified the {raw} entrypoint which could not be resolved into an absolute path: {source}"
    )]
    EntrypointAbsolutize {
        raw: String,
        #[source]
        source: io::Error,
    },

    /// The entrypoint could not be stat'ed (missing or permission denied).
    #[error(
        "You specified the {raw} entrypoint which was resolved to {} and we could not find the file or do not have permission to view it: stat {}: {}",
        .resolved.display(),
        .resolved.display(),
        describe_io(.source)
    )]
    EntrypointNotFound {
        raw: String,
        resolved: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The working directory could not be turned into an absolute path.
    #[error(
        "You specified the {raw} working_directory which could not be resolved into an absolute path: {source}"
    )]
    WorkingDirectoryAbsolutize {
        raw: String,
        #[source]
        source: io::Error,
    },

    /// The working directory is missing, unreadable or not a directory.
    #[error(
        "You specified the {raw} working_directory which was resolved to {} and we could not find the directory or do not have permission to view it: stat {}: {}",
        .resolved.display(),
        .resolved.display(),
        describe_io(.source)
    )]
    WorkingDirectoryNotFound {
        raw: String,
        resolved: PathBuf,
        #[source]
        source: io::Error,
    },

    /// esbuild rejected the forwarded flags before building.
    #[error("Error: {0}")]
    InvalidBuildOptions(String),

    /// The esbuild executable could not be started.
    #[error("Failed to execute {}: {source}", .binary.display())]
    EsbuildSpawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    /// esbuild finished without producing anything to package.
    #[error("esbuild produced no output files")]
    NoOutputFiles,

    /// The temp file holding the package could not be created.
    #[error("Error: {0}")]
    CreatePackageFile(#[source] io::Error),

    /// The zip entry header could not be written.
    #[error("Error: {0}")]
    CreateZipEntry(#[source] zip::result::ZipError),

    /// The bundle could not be written into the zip entry.
    #[error("Error: {0}")]
    WriteZipEntry(#[source] io::Error),

    /// The zip central directory could not be written or flushed.
    #[error("Error: {0}")]
    CloseZip(#[source] zip::result::ZipError),

    /// The finished package could not be read back for hashing.
    #[error("Error: {0}")]
    ReadBackPackage(#[source] io::Error),

    /// IO error with the operation and path it happened on.
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// The one-line summary a host diagnostic is reported under.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::EntrypointAbsolutize { .. } => "Could not find the full entrypoint path",
            Self::EntrypointNotFound { .. } => "Could not find entrypoint file",
            Self::WorkingDirectoryAbsolutize { .. } => {
                "Could not find the full working directory path"
            }
            Self::WorkingDirectoryNotFound { .. } => "Could not find working directory",
            Self::InvalidBuildOptions(_) => "Failed to parse build options",
            Self::EsbuildSpawn { .. } => "Failed to run esbuild",
            Self::NoOutputFiles => "esbuild did not produce a bundle",
            Self::CreatePackageFile(_) => "Failed to create temporary file for packaged Lambda",
            Self::CreateZipEntry(_) => "Failed to create ZIP with our Lambda bundle",
            Self::WriteZipEntry(_) => "Failed to compress Lambda bundle into zip",
            Self::CloseZip(_) => "Failed to close Lambda package zip",
            Self::ReadBackPackage(_) => "Failed to read back Lambda package zip to hash it",
            Self::Fs { .. } | Self::GenericError(_) => {
                "Failed to package Lambda"
            }
        }
    }
}

/// Renders the common IO error kinds the way `stat(2)` reports them.
fn describe_io(error: &io::Error) -> String {
    match error.kind() {
        io::ErrorKind::NotFound => "no such file or directory".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::NotADirectory => "not a directory".to_string(),
        _ => error.to_string(),
    }
}

/// Attaches an operation and path to IO errors.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::packager::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::packager::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
