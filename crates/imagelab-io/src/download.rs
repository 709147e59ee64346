//! File download via Blob URLs.
//!
//! Dioxus has no built-in file download API.  This module triggers
//! downloads by creating a `Blob`, generating an object URL, and
//! programmatically clicking a temporary `<a>` element.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use imagelab_core::{ArtifactError, ProcessedArtifact};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use crate::notify;
use crate::object_url::{ObjectUrl, ObjectUrlError};

/// Errors that can occur when saving a processed image.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The artifact could not be decoded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The Blob or its URL could not be created.
    #[error(transparent)]
    ObjectUrl(#[from] ObjectUrlError),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Trigger a file download in the browser.
///
/// Creates a `Blob` from `bytes`, generates an object URL, and
/// programmatically clicks a temporary `<a download="filename">` element.
/// The object URL is revoked when this function returns, whether or not
/// the click happened.
///
/// # Errors
///
/// Returns [`DownloadError`] if any browser API call fails
/// (e.g., `Blob` creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(bytes: &[u8], filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let url = ObjectUrl::from_bytes(bytes, mime_type)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;

    anchor.set_href(url.as_str());
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download is already initiated; a failed removal is not a
    // failed download.
    let _ = body.remove_child(&anchor);

    Ok(())
}

/// Decode `artifact` and download it as `<stem><suffix>.png`.
///
/// Failures are reported with a blocking alert and never propagated.
/// Returns `true` if the download was triggered.
pub fn save_artifact(artifact: &ProcessedArtifact, suffix: &str) -> bool {
    let outcome = artifact
        .prepare(suffix)
        .map_err(DownloadError::from)
        .and_then(|d| {
            trigger_download(&d.bytes, &d.file_name, d.mime_type)?;
            Ok(d.file_name)
        });

    match outcome {
        Ok(file_name) => {
            tracing::info!(%file_name, "download triggered");
            true
        }
        Err(e) => {
            tracing::warn!("download failed: {e}");
            notify::alert(&format!("Failed to download image: {e}"));
            false
        }
    }
}
