//! Configuration management for the empowerment predictor

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::types::NumericField;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable that overrides the configuration file location
pub const CONFIG_PATH_ENV: &str = "PREDICTOR_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub scaling: ScalingConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject the form publishes submissions to
    pub request_subject: String,
    /// Optional queue group so several instances can share the load
    #[serde(default)]
    pub queue_group: Option<String>,
}

impl NatsConfig {
    /// Subject answering form schema requests
    pub fn schema_subject(&self) -> String {
        format!("{}.schema", self.request_subject)
    }
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the model artifact (`.onnx` or `.json`)
    pub path: String,
    /// Class-1 probability above which a submission is labelled Empowered
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_onnx_threads() -> usize {
    1
}

/// Standardization parameters for one numeric field
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScaleParams {
    pub mean: f64,
    pub std: f64,
}

impl ScaleParams {
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }
}

/// Fixed scaling parameters for the numeric survey inputs
#[derive(Debug, Clone, Deserialize)]
pub struct ScalingConfig {
    #[serde(default = "default_business_ownership")]
    pub business_ownership: ScaleParams,
    #[serde(default = "default_employment_rates")]
    pub employment_rates: ScaleParams,
    #[serde(default = "default_women_in_leadership")]
    pub women_in_leadership: ScaleParams,
    #[serde(default = "default_tariff_rates")]
    pub tariff_rates: ScaleParams,
}

fn default_business_ownership() -> ScaleParams {
    ScaleParams::new(250.0, 150.0)
}

fn default_employment_rates() -> ScaleParams {
    ScaleParams::new(55.0, 20.0)
}

fn default_women_in_leadership() -> ScaleParams {
    ScaleParams::new(30.0, 20.0)
}

fn default_tariff_rates() -> ScaleParams {
    ScaleParams::new(12.0, 8.0)
}

impl ScalingConfig {
    pub fn params(&self, field: NumericField) -> ScaleParams {
        match field {
            NumericField::BusinessOwnership => self.business_ownership,
            NumericField::EmploymentRates => self.employment_rates,
            NumericField::WomenInLeadership => self.women_in_leadership,
            NumericField::TariffRates => self.tariff_rates,
        }
    }
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            business_ownership: default_business_ownership(),
            employment_rates: default_employment_rates(),
            women_in_leadership: default_women_in_leadership(),
            tariff_rates: default_tariff_rates(),
        }
    }
}

/// Category table configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesConfig {
    /// JSON file replacing the built-in category table
    #[serde(default)]
    pub path: Option<String>,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of submissions handled concurrently
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
    /// Directory for the log file; console only when unset
    #[serde(default)]
    pub directory: Option<String>,
    /// Log file name inside `directory`
    #[serde(default = "default_log_file")]
    pub file_name: String,
}

fn default_log_file() -> String {
    "app_logs.log".to_string()
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between periodic summaries; 0 disables them
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: u64,
}

fn default_report_interval() -> u64 {
    60
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `PREDICTOR_CONFIG` or the default file
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path, with `PREDICTOR__*` overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("PREDICTOR").separator("__"))
            .build()
            .with_context(|| format!("Failed to build configuration from {}", path.display()))?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.model.threshold) {
            anyhow::bail!(
                "model.threshold must be within [0, 1], got {}",
                self.model.threshold
            );
        }
        if self.pipeline.workers == 0 {
            anyhow::bail!("pipeline.workers must be at least 1");
        }
        for field in NumericField::ALL {
            let params = self.scaling.params(field);
            if !params.mean.is_finite() || !params.std.is_finite() || params.std < 0.0 {
                anyhow::bail!(
                    "invalid scaling parameters for '{}': mean={} std={}",
                    field.label(),
                    params.mean,
                    params.std
                );
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "empowerment.predict".to_string(),
                queue_group: Some("empowerment-predictor".to_string()),
            },
            model: ModelConfig {
                path: "models/logistic_regression.json".to_string(),
                threshold: default_threshold(),
                onnx_threads: 1,
            },
            scaling: ScalingConfig::default(),
            categories: CategoriesConfig::default(),
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                directory: Some("Logs".to_string()),
                file_name: default_log_file(),
            },
            metrics: MetricsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.schema_subject(), "empowerment.predict.schema");
        assert_eq!(config.model.threshold, 0.5);
        assert_eq!(
            config.scaling.params(NumericField::EmploymentRates),
            ScaleParams::new(55.0, 20.0)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_minimal_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[nats]
url = "nats://bus:4222"
request_subject = "forms.predict"

[model]
path = "models/model.onnx"

[scaling.tariff_rates]
mean = 10.0
std = 5.0

[pipeline]
workers = 2

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.nats.request_subject, "forms.predict");
        assert_eq!(config.nats.queue_group, None);
        assert_eq!(config.model.threshold, 0.5);
        assert_eq!(config.scaling.tariff_rates, ScaleParams::new(10.0, 5.0));
        assert_eq!(config.scaling.business_ownership, ScaleParams::new(250.0, 150.0));
        assert_eq!(config.categories.path, None);
        assert_eq!(config.logging.directory, None);
        assert_eq!(config.logging.file_name, "app_logs.log");
        assert_eq!(config.metrics.report_interval_secs, 60);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.model.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.pipeline.workers = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scaling.tariff_rates = ScaleParams::new(1.0, -2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = AppConfig::load_from_path(path).unwrap();
        let defaults = AppConfig::default();

        assert_eq!(config.nats.request_subject, defaults.nats.request_subject);
        assert_eq!(config.model.path, defaults.model.path);
        for field in NumericField::ALL {
            assert_eq!(config.scaling.params(field), defaults.scaling.params(field));
        }
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);

        // Only this test touches pipeline.workers through the environment
        std::env::set_var("PREDICTOR__PIPELINE__WORKERS", "7");
        let result = AppConfig::load_from_path(&path);
        std::env::remove_var("PREDICTOR__PIPELINE__WORKERS");

        let config = result.unwrap();
        assert_eq!(config.pipeline.workers, 7);
        assert_eq!(config.nats.request_subject, "empowerment.predict");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load_from_path("/nonexistent/config.toml").is_err());
    }
}
