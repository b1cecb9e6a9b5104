//! The `lambdapackager_package` data source.

use crate::packager::{Bundler, Diagnostics, PackageRequest, Packager};
use serde::{Deserialize, Serialize};

/// Full attribute set of the data source after a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageState {
    pub args: Vec<String>,
    pub entrypoint: String,
    pub working_directory: String,
    pub filename: String,
    pub source_code_hash: String,
}

/// Outcome of a read: state only when no error diagnostic was raised.
#[derive(Debug, Default, Serialize)]
pub struct ReadResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PackageState>,
    pub diagnostics: Diagnostics,
}

/// Data source that packages a Lambda on every read.
#[derive(Debug, Clone)]
pub struct LambdaPackageDataSource<B> {
    packager: Packager<B>,
}

impl<B: Bundler> LambdaPackageDataSource<B> {
    pub const TYPE_SUFFIX: &'static str = "_package";

    pub fn new(packager: Packager<B>) -> Self {
        Self { packager }
    }

    /// `<provider>_package`
    pub fn type_name(provider_type_name: &str) -> String {
        format!("{provider_type_name}{}", Self::TYPE_SUFFIX)
    }

    pub fn packager(&self) -> &Packager<B> {
        &self.packager
    }

    /// Packages the configured entrypoint and fills in the computed attributes.
    pub async fn read(&self, config: PackageRequest) -> ReadResponse {
        let outcome = self.packager.package(&config).await;

        let state = outcome.result.map(|result| PackageState {
            args: config.args,
            entrypoint: config.entrypoint,
            working_directory: config.working_directory,
            filename: result.filename.to_string_lossy().into_owned(),
            source_code_hash: result.source_code_hash,
        });

        ReadResponse {
            state,
            diagnostics: outcome.diagnostics,
        }
    }
}
