//! Reproducible single-entry zip packaging.
//!
//! The archive always holds exactly one deflated `index.js` whose timestamp
//! and permissions are pinned, so identical bundles give identical bytes.

use crate::{
    bail,
    packager::error::{Error, Result},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

/// Name of the only entry in the package.
pub const ENTRY_NAME: &str = "index.js";

/// Prefix of the generated package file name.
pub const PACKAGE_PREFIX: &str = "esbuild-lambda-packager-";

/// 2020-08-31 00:00:00
const MODIFIED: (u16, u8, u8, u8, u8, u8) = (2020, 8, 31, 0, 0, 0);

const ENTRY_PERMISSIONS: u32 = 0o644;

fn entry_options() -> Result<SimpleFileOptions> {
    let (year, month, day, hour, minute, second) = MODIFIED;
    let modified = match DateTime::from_date_and_time(year, month, day, hour, minute, second) {
        Ok(modified) => modified,
        Err(e) => bail!("invalid package timestamp: {}", e),
    };

    Ok(SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(modified)
        .unix_permissions(ENTRY_PERMISSIONS))
}

fn write_zip(bundle: &[u8], output_dir: Option<&Path>) -> Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(PACKAGE_PREFIX).suffix(".zip");
    let temp = match output_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(Error::CreatePackageFile)?;

    // The package outlives this process; the host reads it after we return.
    let (file, path) = temp
        .keep()
        .map_err(|e| Error::CreatePackageFile(e.error))?;

    let mut writer = ZipWriter::new(file);
    writer
        .start_file(ENTRY_NAME, entry_options()?)
        .map_err(Error::CreateZipEntry)?;
    writer.write_all(bundle).map_err(Error::WriteZipEntry)?;

    let mut file = writer.finish().map_err(Error::CloseZip)?;
    file.flush()
        .map_err(|e| Error::CloseZip(zip::result::ZipError::Io(e)))?;
    file.sync_all()
        .map_err(|e| Error::CloseZip(zip::result::ZipError::Io(e)))?;

    Ok(path)
}

/// Writes `bundle` into a new zip package and returns its path.
///
/// The zip work is blocking, so it runs on tokio's blocking pool. The file is
/// created in `output_dir` when given, otherwise in the system temp
/// directory, and is left on disk for the caller.
///
/// # Arguments
///
/// * `bundle` - Bundled JavaScript, stored as the single `index.js` entry
/// * `output_dir` - Directory to create the package in
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the finished `esbuild-lambda-packager-*.zip`
/// * `Err` - If the file cannot be created, or the zip cannot be written or
///   closed; each case carries its own diagnostic summary
pub async fn write_package(bundle: Vec<u8>, output_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = tokio::task::spawn_blocking(move || write_zip(&bundle, output_dir.as_deref()))
        .await
        .map_err(|e| Error::GenericError(format!("Package write task panicked: {}", e)))??;

    log::debug!("Wrote Lambda package {}", path.display());

    Ok(path)
}
