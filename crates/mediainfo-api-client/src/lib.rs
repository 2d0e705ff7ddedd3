//! HTTP client for the job-orchestration service.
//!
//! Provides a minimal client with configurable auth (Bearer token, X-API-Key
//! or none), generic GET/POST/PATCH helpers, and domain methods for job
//! profiles, jobs and job assignments. The worker and the test driver use
//! this client directly.

pub mod api;

use anyhow::{Context, Result};
use mediainfo_core::{ServicesAuthType, WorkerConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the job service.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
    None,
}

impl Auth {
    pub fn from_settings(auth_type: ServicesAuthType, api_key: Option<String>) -> Result<Self> {
        match auth_type {
            ServicesAuthType::None => Ok(Auth::None),
            ServicesAuthType::Bearer => api_key
                .map(Auth::Bearer)
                .context("Missing token. Set SERVICES_API_KEY"),
            ServicesAuthType::ApiKey => api_key
                .map(Auth::XApiKey)
                .context("Missing API key. Set SERVICES_API_KEY"),
        }
    }
}

/// HTTP client for the job service with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from worker configuration: SERVICES_URL, SERVICES_AUTH_TYPE, SERVICES_API_KEY.
    pub fn from_config(config: &WorkerConfig) -> Result<Self> {
        let base_url = config
            .services_url
            .clone()
            .context("Missing job service URL. Set SERVICES_URL")?;
        let auth = Auth::from_settings(config.services_auth_type, config.services_api_key.clone())?;

        Self::new(base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs are used as-is; anything else is relative to the base URL.
    pub fn build_url(&self, path: &str) -> String {
        if is_absolute(path) {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// URL of one resource in a collection. Resource ids handed out by the
    /// job service may already be full URLs or collection paths.
    pub fn resource_url(&self, collection: &str, id: &str) -> String {
        if is_absolute(id) || in_collection(id, collection) {
            self.build_url(id)
        } else {
            format!(
                "{}{}/{}",
                self.base_url,
                collection,
                urlencoding::encode(id)
            )
        }
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
            Auth::None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = self.apply_auth(request);
        let response = request.send().await.context("Failed to send request")?;
        parse_response(response).await
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);

        if !query.is_empty() {
            request = request.query(query);
        }

        tracing::debug!(method = "GET", url = %url, "Job service request");
        self.send(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        tracing::debug!(method = "POST", url = %url, "Job service request");
        self.send(self.client.post(&url).json(body)).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        tracing::debug!(method = "PATCH", url = %url, "Job service request");
        self.send(self.client.patch(&url).json(body)).await
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// `/jobs/7` and `jobs/7` are both paths inside `/jobs`.
fn in_collection(id: &str, collection: &str) -> bool {
    id.trim_start_matches('/')
        .strip_prefix(collection.trim_matches('/'))
        .is_some_and(|rest| rest.starts_with('/'))
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(
            "API request failed with status {}: {}",
            status,
            error_text
        ));
    }

    let body: T = response
        .json()
        .await
        .context("Failed to parse response as JSON")?;

    Ok(body)
}
