use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{CASH_PAYMENT_ID, DEFAULT_BATCH_SIZE, E_PAYMENT_IDS};
use crate::error::{ExporterError, Result};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    /// Page size when draining the event store.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Directory the JSONL datasets are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
    /// Directory holding one JSON array file per source collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentConfig {
    /// Payment method id classified as cash on delivery.
    #[serde(default = "default_cash_id")]
    pub cash_id: String,
    /// Payment method ids classified as e-payment.
    #[serde(default = "default_epayment_ids")]
    pub epayment_ids: Vec<String>,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_cash_id() -> String {
    CASH_PAYMENT_ID.to_string()
}

fn default_epayment_ids() -> Vec<String> {
    E_PAYMENT_IDS.iter().map(|id| id.to_string()).collect()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            cash_id: default_cash_id(),
            epayment_ids: default_epayment_ids(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory; every field has a
    /// default, so a missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ExporterError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.export.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.export.output_dir, "output");
        assert_eq!(config.payment.cash_id, CASH_PAYMENT_ID);
        assert_eq!(config.payment.epayment_ids.len(), E_PAYMENT_IDS.len());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [export]
            batch_size = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.export.batch_size, 250);
        assert_eq!(config.export.output_dir, "output");
        assert_eq!(config.sources.data_dir, "data");
    }
}
