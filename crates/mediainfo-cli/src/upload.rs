use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::io::AsyncRead;

use mediainfo_core::Locator;
use mediainfo_storage::Storage;

/// Validity of the signed URL handed to the worker as job input.
pub const MEDIA_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Content type of a media file, from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mxf") => "application/mxf",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("ts") => "video/mp2t",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("flac") => "audio/flac",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Upload `path` under its file name unless an object with that key already
/// exists, then return a locator with a signed URL valid for `expiry`.
pub async fn upload_file_if_absent(
    storage: &dyn Storage,
    path: &Path,
    expiry: Duration,
) -> Result<Locator> {
    let key = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid media file path: {}", path.display()))?
        .to_string();

    tracing::info!(key = %key, "Checking if file is already present");
    if storage.exists(&key).await? {
        tracing::info!(key = %key, "Already present, not uploading again");
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open media file {}", path.display()))?;
        let content_length = file.metadata().await.ok().map(|m| m.len());
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(file);

        tracing::info!(
            key = %key,
            size_bytes = ?content_length,
            "Not present, uploading"
        );
        storage
            .upload_stream(&key, content_type_for(path), content_length, reader)
            .await?;
    }

    let url = storage.get_presigned_url(&key, expiry).await?;
    Ok(Locator::for_object(
        storage.bucket().map(String::from),
        storage.object_key(&key),
        url,
    ))
}
