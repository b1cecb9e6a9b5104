//! Host plugin boundary.
//!
//! The provider is configured once (locating esbuild) and then serves reads
//! of its single data source. Everything crossing this boundary is plain
//! request/response data plus [`Diagnostics`].

pub mod config;
pub mod data_source;
pub mod schema;

pub use config::{ConfigureError, ESBUILD_BINARY_ENV, ProviderConfig};
pub use data_source::{LambdaPackageDataSource, PackageState, ReadResponse};
pub use schema::ProviderSchema;

use crate::packager::{Diagnostics, EsbuildCli, PackageRequest, Packager};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Type name the host addresses this provider by.
pub const PROVIDER_TYPE_NAME: &str = "lambdapackager";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: &'static str,
    pub version: String,
    pub data_sources: Vec<String>,
}

/// A read request carrying both the provider and the data source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadRequest {
    #[serde(default)]
    pub provider: ProviderConfig,
    pub config: PackageRequest,
}

#[derive(Debug, Clone)]
pub struct LambdaPackagerProvider {
    version: String,
    output_dir: Option<PathBuf>,
}

impl LambdaPackagerProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            output_dir: None,
        }
    }

    /// Writes packages into `dir` instead of the system temp directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME,
            version: self.version.clone(),
            data_sources: vec![LambdaPackageDataSource::<EsbuildCli>::type_name(
                PROVIDER_TYPE_NAME,
            )],
        }
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: schema::provider_schema(),
            data_sources: BTreeMap::from([(
                LambdaPackageDataSource::<EsbuildCli>::type_name(PROVIDER_TYPE_NAME),
                schema::package_schema(),
            )]),
        }
    }

    /// Locates esbuild and hands back the configured data source.
    pub fn configure(
        &self,
        config: &ProviderConfig,
    ) -> Result<LambdaPackageDataSource<EsbuildCli>, Diagnostics> {
        let binary = config.resolve_esbuild_binary().map_err(|err| {
            let mut diagnostics = Diagnostics::new();
            diagnostics.push((&err).into());
            diagnostics
        })?;

        let mut packager = Packager::new(EsbuildCli::new(binary));
        if let Some(dir) = &self.output_dir {
            packager = packager.with_output_dir(dir);
        }

        Ok(LambdaPackageDataSource::new(packager))
    }

    /// Configures the provider and performs one data source read.
    pub async fn read(&self, request: ReadRequest) -> ReadResponse {
        match self.configure(&request.provider) {
            Ok(data_source) => data_source.read(request.config).await,
            Err(diagnostics) => ReadResponse {
                state: None,
                diagnostics,
            },
        }
    }
}
