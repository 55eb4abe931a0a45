//! Pipeline configuration

use chrono::NaiveDate;
use config::{Config, Environment, File};
use data_validator::ValidationConfig;
use feature_engine::GeoFeatureConfig;
use listings::ListingColumns;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variable overrides, e.g. `CHURN_GEO__NEIGHBOR_RADIUS_KM`
pub const ENV_PREFIX: &str = "CHURN";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw listing/performance CSV
    pub input: PathBuf,
    /// Augmented CSV to write
    pub output: PathBuf,
    /// Optional JSON run summary
    pub summary: Option<PathBuf>,

    pub columns: ListingColumns,
    pub geo: GeoFeatureConfig,
    pub validation: ValidationConfig,

    /// Add the churn target and drop censored rows
    pub label_churn: bool,
    /// Censor month for labelling; latest month in the data when unset
    pub censor_month: Option<NaiveDate>,
    /// Bedrooms column to clean, skipped when absent from the table
    pub bedrooms_column: Option<String>,
    /// Columns removed before writing
    pub drop_columns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/BrightonPerformanceData.csv"),
            output: PathBuf::from("data/listings_features.csv"),
            summary: None,
            columns: ListingColumns::default(),
            geo: GeoFeatureConfig::default(),
            validation: ValidationConfig::default(),
            label_churn: true,
            censor_month: None,
            bedrooms_column: Some("bedrooms".to_string()),
            drop_columns: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then the optional config file, then `CHURN_*` variables.
    ///
    /// The file format follows its extension (`.toml`, `.yaml`, `.json`).
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    /// `CHURN_*` variable source: `_` after the prefix, `__` between nested keys
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("drop_columns")
    }

    /// Load defaults, then the optional config file, then `env`
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading pipeline config from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(env);

        builder.build()?.try_deserialize()
    }
}
