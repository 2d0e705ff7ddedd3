//! Configuration module
//!
//! The worker reads its settings from the process environment once at startup
//! and passes the resulting [`WorkerConfig`] to every component that needs it.
//! [`WorkerConfig::from_lookup`] builds the same struct from any key lookup,
//! which keeps tests away from the real environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const DEFAULT_MEDIAINFO_PATH: &str = "/opt/bin/mediainfo";
const DEFAULT_MEDIAINFO_OUTPUT_FORMAT: &str = "EBUCore_JSON";
/// Signed artifact URLs stay valid for 12 hours unless configured otherwise.
const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 12 * 3600;

/// How the worker authenticates against the job service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServicesAuthType {
    None,
    Bearer,
    ApiKey,
}

impl FromStr for ServicesAuthType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(ServicesAuthType::None),
            "bearer" => Ok(ServicesAuthType::Bearer),
            "api-key" | "apikey" | "api_key" => Ok(ServicesAuthType::ApiKey),
            _ => Err(anyhow::anyhow!("Invalid services auth type: {}", s)),
        }
    }
}

/// Storage backend selection and connection settings.
#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub local_path: Option<String>,
    pub local_base_url: Option<String>,
}

impl StorageSettings {
    /// Read everything except the bucket, which callers supply.
    pub fn from_lookup<F>(bucket: String, lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let settings = StorageSettings {
            backend,
            bucket,
            region: lookup("S3_REGION").or_else(|| lookup("AWS_REGION")),
            endpoint: lookup("S3_ENDPOINT"),
            local_path: lookup("LOCAL_STORAGE_PATH"),
            local_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.backend {
            StorageBackend::S3 => {
                if self.bucket.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "A bucket name is required when using S3 storage backend"
                    ));
                }
                if self.region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Worker configuration
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Bucket receiving extraction artifacts.
    pub output_bucket: String,
    /// Namespace prepended to every artifact key; may be empty.
    pub output_prefix: String,
    pub mediainfo_path: String,
    pub mediainfo_output_format: String,
    pub signed_url_expiry: Duration,
    pub storage: StorageSettings,
    pub services_url: Option<String>,
    pub services_auth_type: ServicesAuthType,
    pub services_api_key: Option<String>,
    pub environment: String,
    pub log_json: bool,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let output_bucket = lookup("OUTPUT_BUCKET")
            .ok_or_else(|| anyhow::anyhow!("OUTPUT_BUCKET must be set"))?;

        let signed_url_expiry_secs = match lookup("SIGNED_URL_EXPIRY_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("SIGNED_URL_EXPIRY_SECS must be a valid number"))?,
            None => DEFAULT_SIGNED_URL_EXPIRY_SECS,
        };

        let services_auth_type = match lookup("SERVICES_AUTH_TYPE") {
            Some(value) => value.parse()?,
            None => ServicesAuthType::None,
        };

        let config = WorkerConfig {
            storage: StorageSettings::from_lookup(output_bucket.clone(), lookup)?,
            output_bucket,
            output_prefix: lookup("OUTPUT_PREFIX").unwrap_or_default(),
            mediainfo_path: lookup("MEDIAINFO_PATH")
                .unwrap_or_else(|| DEFAULT_MEDIAINFO_PATH.to_string()),
            mediainfo_output_format: lookup("MEDIAINFO_OUTPUT_FORMAT")
                .unwrap_or_else(|| DEFAULT_MEDIAINFO_OUTPUT_FORMAT.to_string()),
            signed_url_expiry: Duration::from_secs(signed_url_expiry_secs),
            services_url: lookup("SERVICES_URL"),
            services_auth_type,
            services_api_key: lookup("SERVICES_API_KEY"),
            environment: lookup("ENVIRONMENT")
                .or_else(|| lookup("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            log_json: lookup("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.signed_url_expiry.is_zero() {
            return Err(anyhow::anyhow!(
                "SIGNED_URL_EXPIRY_SECS must be greater than zero"
            ));
        }

        if self.services_auth_type != ServicesAuthType::None && self.services_api_key.is_none() {
            return Err(anyhow::anyhow!(
                "SERVICES_API_KEY must be set when SERVICES_AUTH_TYPE is {:?}",
                self.services_auth_type
            ));
        }

        self.storage.validate()
    }

    /// Check if the worker is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }
}
