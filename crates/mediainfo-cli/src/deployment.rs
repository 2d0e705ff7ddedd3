//! Deployment outputs written by `terraform output -json`.

use std::path::Path;

use anyhow::{Context, Result};
use mediainfo_core::ServicesAuthType;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Output<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct ServiceRegistry {
    services_url: String,
    #[serde(default)]
    auth_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOutputs {
    service_registry: Output<ServiceRegistry>,
    upload_bucket: Output<String>,
}

/// What the driver needs to know about a deployment.
#[derive(Debug, Clone)]
pub struct DeploymentOutputs {
    pub services_url: String,
    pub services_auth_type: ServicesAuthType,
    pub upload_bucket: String,
}

impl DeploymentOutputs {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawOutputs =
            serde_json::from_str(json).context("Failed to parse deployment outputs")?;

        let services_auth_type = match raw.service_registry.value.auth_type {
            Some(auth_type) => auth_type
                .parse()
                .with_context(|| format!("Unsupported services auth type '{}'", auth_type))?,
            None => ServicesAuthType::None,
        };

        Ok(Self {
            services_url: raw.service_registry.value.services_url,
            services_auth_type,
            upload_bucket: raw.upload_bucket.value,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deployment outputs {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_terraform_output() {
        let outputs = DeploymentOutputs::from_json(
            r#"{
                "service_registry": {
                    "sensitive": false,
                    "type": ["object", {}],
                    "value": {"services_url": "https://services.example.com/api", "auth_type": "bearer"}
                },
                "upload_bucket": {"sensitive": false, "type": "string", "value": "mediainfo-upload"}
            }"#,
        )
        .unwrap();

        assert_eq!(outputs.services_url, "https://services.example.com/api");
        assert_eq!(outputs.services_auth_type, ServicesAuthType::Bearer);
        assert_eq!(outputs.upload_bucket, "mediainfo-upload");
    }

    #[test]
    fn missing_auth_type_is_none() {
        let outputs = DeploymentOutputs::from_json(
            r#"{"service_registry":{"value":{"services_url":"http://localhost"}},"upload_bucket":{"value":"b"}}"#,
        )
        .unwrap();
        assert_eq!(outputs.services_auth_type, ServicesAuthType::None);
    }

    #[test]
    fn signing_auth_types_are_rejected() {
        let err = DeploymentOutputs::from_json(
            r#"{"service_registry":{"value":{"services_url":"http://localhost","auth_type":"AWS4"}},"upload_bucket":{"value":"b"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("AWS4"));
    }

    #[test]
    fn missing_bucket_is_an_error() {
        assert!(DeploymentOutputs::from_json(
            r#"{"service_registry":{"value":{"services_url":"http://localhost"}}}"#
        )
        .is_err());
    }
}
