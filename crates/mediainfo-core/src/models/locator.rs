use serde::{Deserialize, Serialize};

/// Type tag written on locators produced by this service.
pub const S3_LOCATOR_TYPE: &str = "S3Locator";

/// Reference to a remotely stored object.
///
/// `url` is the only field every locator carries; `bucket` and `key` are set
/// when the object lives in a bucket this service can address directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locator {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub locator_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub url: String,
}

impl Locator {
    /// Locator holding only a URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            locator_type: None,
            bucket: None,
            key: None,
            url: url.into(),
        }
    }

    /// Locator for an object in a bucket, with a retrieval URL.
    pub fn for_object(bucket: Option<String>, key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            locator_type: Some(S3_LOCATOR_TYPE.to_string()),
            bucket,
            key: Some(key.into()),
            url: url.into(),
        }
    }

    /// The URL, or `None` when it is blank.
    pub fn resolvable_url(&self) -> Option<&str> {
        let url = self.url.trim();
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }
}
