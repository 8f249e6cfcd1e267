//! Configuration module for ingestion-service.

use rust_decimal::Decimal;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

use crate::ingestion::validate::{DuplicateKey, ValidationPolicy};

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub policy: ValidationPolicy,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl IngestionConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let amount_tolerance = match env::var("AMOUNT_TOLERANCE") {
            Ok(raw) => Decimal::from_str(&raw).map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!("AMOUNT_TOLERANCE is not a decimal"))
            })?,
            Err(_) => ValidationPolicy::default().amount_tolerance,
        };

        let duplicate_key = env::var("DUPLICATE_KEY")
            .map(|raw| DuplicateKey::from_str(&raw))
            .unwrap_or(DuplicateKey::UtrAndAmount);

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "ingestion-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
                })?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            },
            policy: ValidationPolicy {
                amount_tolerance,
                duplicate_key,
            },
        })
    }
}
