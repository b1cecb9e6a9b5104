//! The bundler capability and esbuild's structured build result.
//!
//! Packaging only ever talks to [`Bundler::build`]; [`EsbuildCli`] is the
//! production implementation and tests substitute their own.

mod cli;
pub mod log_parser;

pub use cli::EsbuildCli;

use crate::packager::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options handed to the bundler for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// User flags followed by the resolved entrypoint, in order.
    pub args: Vec<String>,
    /// Directory esbuild resolves relative paths against.
    pub abs_working_dir: PathBuf,
}

impl BuildOptions {
    /// Forwards `flags` unmodified and appends the entrypoint as the last argument.
    pub fn parse(flags: &[String], entrypoint: &Path, abs_working_dir: PathBuf) -> Self {
        let mut args = Vec::with_capacity(flags.len() + 1);
        args.extend(flags.iter().cloned());
        args.push(entrypoint.to_string_lossy().into_owned());

        Self {
            args,
            abs_working_dir,
        }
    }

    /// Value of the last `--outfile=` flag, if any.
    pub fn outfile(&self) -> Option<&str> {
        self.flag("--outfile=")
    }

    /// Value of the last `--outdir=` flag, if any.
    pub fn outdir(&self) -> Option<&str> {
        self.flag("--outdir=")
    }

    /// The entrypoint, always the last argument.
    pub fn entrypoint(&self) -> Option<&Path> {
        self.args.last().map(Path::new)
    }

    /// Where esbuild writes the bundle when told to write to disk.
    ///
    /// `--outfile` names it directly. With `--outdir` the bundle lands at
    /// `<outdir>/<entry dir relative to --outbase>/<entry stem><ext>`, where
    /// the extension honours `--out-extension:.js=`. Without `--outbase` a
    /// single entrypoint is its own base, so it sits directly in the outdir.
    /// `None` means the bundle goes to stdout.
    pub fn bundle_path(&self) -> Option<PathBuf> {
        if let Some(outfile) = self.outfile() {
            return Some(self.abs_working_dir.join(outfile));
        }

        let outdir = self.abs_working_dir.join(self.outdir()?);
        let entrypoint = self.entrypoint()?;
        let stem = entrypoint.file_stem()?.to_string_lossy();
        let extension = self.flag("--out-extension:.js=").unwrap_or(".js");

        let nested = match (self.flag("--outbase="), entrypoint.parent()) {
            (Some(outbase), Some(parent)) => parent
                .strip_prefix(self.abs_working_dir.join(outbase))
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            _ => PathBuf::new(),
        };

        Some(outdir.join(nested).join(format!("{stem}{extension}")))
    }

    fn flag(&self, prefix: &str) -> Option<&str> {
        self.args
            .iter()
            .rev()
            .find_map(|arg| arg.strip_prefix(prefix))
    }
}

/// A source position attached to a message or note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    /// 1-based
    pub line: u32,
    /// 0-based, in bytes
    pub column: u32,
    pub line_text: String,
    pub suggestion: String,
}

/// Additional context esbuild prints below a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub location: Option<Location>,
}

/// One error or warning reported by esbuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id such as `unsupported-require-call`, empty when not printed.
    pub id: String,
    pub plugin_name: String,
    pub text: String,
    pub location: Option<Location>,
    pub notes: Vec<Note>,
}

/// One produced file, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Everything a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
    pub output_files: Vec<OutputFile>,
}

/// Something that can turn [`BuildOptions`] into bundled output.
///
/// Build errors and warnings come back inside [`BuildResult`]; the `Err` path
/// is reserved for failures to run the bundler at all, or for options it
/// refused to parse.
pub trait Bundler {
    fn build(
        &self,
        options: &BuildOptions,
    ) -> impl std::future::Future<Output = Result<BuildResult>> + Send;
}
