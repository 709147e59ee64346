//! Blob object URLs with scoped lifetimes.
//!
//! An [`ObjectUrl`] revokes itself when dropped, so a URL created for a
//! download or a preview is released on every exit path.  A
//! [`PreviewSlot`] holds at most one preview URL and releases the old one
//! whenever it is replaced.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur while creating an object URL.
#[derive(Debug, thiserror::Error)]
pub enum ObjectUrlError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for ObjectUrlError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Wrap `bytes` in a `Blob` of the given MIME type.
///
/// An empty `mime_type` leaves the Blob untyped.
///
/// # Errors
///
/// Returns [`ObjectUrlError::JsError`] if `Blob` construction fails.
pub fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> Result<web_sys::Blob, ObjectUrlError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    if !mime_type.is_empty() {
        opts.set_type(mime_type);
    }
    Ok(web_sys::Blob::new_with_u8_array_sequence_and_options(
        &parts, &opts,
    )?)
}

/// An object URL that is revoked on drop.
#[derive(Debug, PartialEq, Eq)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Create a URL for `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectUrlError::JsError`] if Blob or URL creation fails.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self, ObjectUrlError> {
        let blob = bytes_to_blob(bytes, mime_type)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;
        Ok(Self(url))
    }

    /// The `blob:` URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        // Revocation failing only leaks the blob until page unload.
        if let Err(e) = web_sys::Url::revoke_object_url(&self.0) {
            tracing::debug!("failed to revoke object URL: {e:?}");
        }
    }
}

/// Holder for the single live preview URL of an upload.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<ObjectUrl>,
}

impl PreviewSlot {
    /// Store `url`, revoking the previous one.
    pub fn replace(&mut self, url: ObjectUrl) {
        self.current = Some(url);
    }

    /// Revoke the current URL, if any.
    pub fn release(&mut self) {
        self.current = None;
    }

    /// The live URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.current.as_ref().map(ObjectUrl::as_str)
    }
}
