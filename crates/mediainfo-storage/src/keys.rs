//! Artifact key derivation.
//!
//! Key format: `{prefix}{timestamp bucket}/{file stem}`, where the timestamp
//! bucket is the UTC time of derivation to the second with `:` replaced by `-`.
//! Callers append the artifact extension.
//!
//! Two derivations of the same URL and prefix within the same second produce
//! the same key.

use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// `chrono` format of the timestamp bucket (`2024-01-02T03-04-05`).
pub const TIMESTAMP_BUCKET_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Cannot derive artifact key: invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cannot derive artifact key: URL '{0}' has no file name")]
    NoFileName(String),
}

/// Derive the artifact key for `url` using the current time.
pub fn derive_artifact_key(url: &str, prefix: &str) -> Result<String, KeyError> {
    derive_artifact_key_at(url, prefix, Utc::now())
}

/// Derive the artifact key for `url` at a given instant.
pub fn derive_artifact_key_at(
    url: &str,
    prefix: &str,
    at: DateTime<Utc>,
) -> Result<String, KeyError> {
    let stem = artifact_file_stem(url)?;
    Ok(format!("{}{}/{}", prefix, timestamp_bucket(at), stem))
}

pub fn timestamp_bucket(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_BUCKET_FORMAT).to_string()
}

/// Last segment of the percent-decoded URL path, without its last extension.
///
/// Query string and fragment are never part of the parsed path.
pub fn artifact_file_stem(url: &str) -> Result<String, KeyError> {
    let parsed = Url::parse(url).map_err(|source| KeyError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let path = percent_decode_str(parsed.path()).decode_utf8_lossy();
    let file_name = match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => &path[..],
    };

    if file_name.is_empty() {
        return Err(KeyError::NoFileName(url.to_string()));
    }

    Ok(strip_extension(file_name).to_string())
}

/// Everything before the last `.`; unchanged when there is none.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) => &file_name[..pos],
        None => file_name,
    }
}
