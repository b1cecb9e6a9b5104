//! [`Bundler`] backed by the esbuild executable.

use super::{BuildOptions, BuildResult, Bundler, Message, OutputFile, log_parser};
use crate::packager::error::{Error, ErrorExt, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Flags placed before the user's so that the user's can override them.
const BASE_FLAGS: &[&str] = &["--color=false", "--log-level=warning", "--log-limit=0"];

/// Errors esbuild reports while parsing its command line, before any build.
const OPTION_ERROR_PREFIXES: &[&str] = &[
    "Invalid build flag",
    "Invalid value",
    "Must use",
    "Unexpected",
];

/// Runs the esbuild executable as a child process.
#[derive(Debug, Clone)]
pub struct EsbuildCli {
    binary: PathBuf,
}

impl EsbuildCli {
    /// Creates a bundler that runs `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the esbuild executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, options: &BuildOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(BASE_FLAGS)
            .args(&options.args)
            .current_dir(&options.abs_working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn collect_outputs(
        &self,
        options: &BuildOptions,
        stdout: Vec<u8>,
    ) -> Result<Vec<OutputFile>> {
        let Some(path) = options.bundle_path() else {
            if stdout.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![OutputFile {
                path: PathBuf::from("<stdout>"),
                contents: stdout,
            }]);
        };

        let contents = tokio::fs::read(&path)
            .await
            .fs_context("reading esbuild output", &path)?;
        let mut outputs = vec![OutputFile { path, contents }];

        let map_path = PathBuf::from(format!("{}.map", outputs[0].path.display()));
        if tokio::fs::try_exists(&map_path).await.unwrap_or(false) {
            let contents = tokio::fs::read(&map_path)
                .await
                .fs_context("reading esbuild source map", &map_path)?;
            outputs.push(OutputFile {
                path: map_path,
                contents,
            });
        }

        Ok(outputs)
    }
}

fn is_option_error(message: &Message) -> bool {
    message.location.is_none()
        && OPTION_ERROR_PREFIXES
            .iter()
            .any(|prefix| message.text.starts_with(prefix))
}

impl Bundler for EsbuildCli {
    async fn build(&self, options: &BuildOptions) -> Result<BuildResult> {
        log::debug!(
            "Running {} {} {} in {}",
            self.binary.display(),
            BASE_FLAGS.join(" "),
            options.args.join(" "),
            options.abs_working_dir.display()
        );

        let output = self
            .command(options)
            .output()
            .await
            .map_err(|source| Error::EsbuildSpawn {
                binary: self.binary.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let parsed = log_parser::parse(&stderr);

        if !output.status.success() {
            if let Some(message) = parsed.errors.iter().find(|m| is_option_error(m)) {
                return Err(Error::InvalidBuildOptions(message.text.clone()));
            }

            let mut errors = parsed.errors;
            if errors.is_empty() {
                // esbuild died without a structured message, relay what it printed
                let text = match stderr.trim() {
                    "" => format!("esbuild exited with {}", output.status),
                    raw => raw.to_string(),
                };
                errors.push(Message {
                    text,
                    ..Message::default()
                });
            }

            return Ok(BuildResult {
                errors,
                warnings: parsed.warnings,
                output_files: Vec::new(),
            });
        }

        let output_files = self.collect_outputs(options, output.stdout).await?;

        Ok(BuildResult {
            errors: parsed.errors,
            warnings: parsed.warnings,
            output_files,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_esbuild(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("esbuild");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn options(dir: &Path, flags: &[&str]) -> BuildOptions {
        let flags: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
        BuildOptions::parse(&flags, &dir.join("index.ts"), dir.to_path_buf())
    }

    #[tokio::test]
    async fn stdout_becomes_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(dir.path(), "printf 'exports.handler=()=>1;'");

        let result = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &["--bundle"]))
            .await
            .unwrap();

        assert!(result.errors.is_empty());
        assert_eq!(result.output_files.len(), 1);
        assert_eq!(result.output_files[0].contents, b"exports.handler=()=>1;");
    }

    #[tokio::test]
    async fn arguments_and_working_directory_are_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(dir.path(), "printf '%s|' \"$@\"; pwd -P");

        let result = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &["--bundle", "--minify"]))
            .await
            .unwrap();

        let printed = String::from_utf8(result.output_files[0].contents.clone()).unwrap();
        let expected_args = format!(
            "--color=false|--log-level=warning|--log-limit=0|--bundle|--minify|{}|",
            dir.path().join("index.ts").display()
        );
        assert!(printed.starts_with(&expected_args), "{printed}");
        let cwd = std::fs::canonicalize(dir.path()).unwrap();
        assert!(printed.trim_end().ends_with(cwd.to_str().unwrap()), "{printed}");
    }

    #[tokio::test]
    async fn unknown_flag_is_an_option_error() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(
            dir.path(),
            "printf '✘ [ERROR] Invalid build flag: \"--nope\"\\n\\n1 error\\n' >&2; exit 1",
        );

        let err = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &["--nope"]))
            .await
            .unwrap_err();

        assert_eq!(err.summary(), "Failed to parse build options");
        assert_eq!(err.to_string(), "Error: Invalid build flag: \"--nope\"");
    }

    #[tokio::test]
    async fn build_errors_are_returned_in_the_result() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(
            dir.path(),
            "printf '✘ [ERROR] Could not resolve \"foo\"\\n\\n    index.ts:1:16:\\n      1 │ import foo from \"foo\";\\n        ╵                 ~~~~~\\n\\n1 error\\n' >&2; exit 1",
        );

        let result = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &["--bundle"]))
            .await
            .unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].text, "Could not resolve \"foo\"");
        assert!(result.output_files.is_empty());
    }

    #[tokio::test]
    async fn unstructured_failure_is_relayed() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(dir.path(), "echo 'segfault' >&2; exit 2");

        let result = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &[]))
            .await
            .unwrap();

        assert_eq!(result.errors[0].text, "segfault");
    }

    #[tokio::test]
    async fn outfile_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(dir.path(), "printf 'bundle' > out.js; printf 'map' > out.js.map");

        let result = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &["--bundle", "--outfile=out.js"]))
            .await
            .unwrap();

        assert_eq!(result.output_files.len(), 2);
        assert_eq!(result.output_files[0].contents, b"bundle");
        assert_eq!(result.output_files[1].contents, b"map");
    }

    #[tokio::test]
    async fn outdir_bundle_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let esbuild = fake_esbuild(dir.path(), "mkdir -p dist; printf 'bundle' > dist/index.js");

        let result = EsbuildCli::new(esbuild)
            .build(&options(dir.path(), &["--bundle", "--outdir=dist"]))
            .await
            .unwrap();

        assert_eq!(result.output_files.len(), 1);
        assert_eq!(result.output_files[0].path, dir.path().join("dist/index.js"));
        assert_eq!(result.output_files[0].contents, b"bundle");
    }

    #[tokio::test]
    async fn missing_binary_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let err = EsbuildCli::new(dir.path().join("no-esbuild"))
            .build(&options(dir.path(), &[]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EsbuildSpawn { .. }));
    }
}
