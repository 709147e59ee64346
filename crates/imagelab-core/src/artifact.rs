//! Processed image artifacts and download preparation.
//!
//! The backend embeds result images as `data:image/png;base64,...` URIs.
//! A [`ProcessedArtifact`] pairs one with the name of the file the user
//! uploaded; [`ProcessedArtifact::prepare`] decodes it into bytes and
//! derives the download name.  Writing the bytes somewhere (a browser
//! download, a file on disk) is the caller's job.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// MIME type of every downloaded artifact.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Errors that can occur while decoding an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// There is no payload to decode.
    #[error("no processed image is available")]
    Absent,

    /// The data URI declares a non-base64 encoding.
    #[error("data URI is not base64 encoded")]
    NotBase64,

    /// The payload is not valid base64.
    #[error("malformed base64 payload: {0}")]
    MalformedBase64(#[from] base64::DecodeError),
}

/// Return the base64 payload of a data URI.
///
/// Text without a `data:` scheme is returned unchanged so bare base64
/// payloads are accepted too.
///
/// # Errors
///
/// Returns [`ArtifactError::NotBase64`] for a data URI whose metadata
/// does not end in `;base64`.
pub fn data_uri_payload(data_uri: &str) -> Result<&str, ArtifactError> {
    let trimmed = data_uri.trim();
    let Some(rest) = trimmed.strip_prefix("data:") else {
        return Ok(trimmed);
    };
    match rest.split_once(',') {
        Some((meta, payload)) if meta.ends_with(";base64") => Ok(payload),
        _ => Err(ArtifactError::NotBase64),
    }
}

/// Decode a base64 data URI into raw bytes.
///
/// # Errors
///
/// Returns [`ArtifactError::Absent`] for an empty payload,
/// [`ArtifactError::NotBase64`] for a non-base64 data URI, and
/// [`ArtifactError::MalformedBase64`] if decoding fails.
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, ArtifactError> {
    let payload = data_uri_payload(data_uri)?;
    if payload.is_empty() {
        return Err(ArtifactError::Absent);
    }
    Ok(STANDARD.decode(payload)?)
}

/// Encode PNG bytes as a data URI.
#[must_use]
pub fn encode_png_data_uri(bytes: &[u8]) -> String {
    format!("data:{PNG_MIME_TYPE};base64,{}", STANDARD.encode(bytes))
}

/// Derive a download name: the source name without its final
/// extension, then `suffix`, then `.png`.
///
/// A name with no extension (no `.`, a leading `.` only, or a trailing
/// `.`) keeps its full text as the stem.
#[must_use]
pub fn derive_file_name(source_filename: &str, suffix: &str) -> String {
    let stem = match source_filename.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < source_filename.len() => &source_filename[..dot],
        _ => source_filename,
    };
    format!("{stem}{suffix}.png")
}

/// An image returned by the backend, tied to the upload it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedArtifact {
    data_uri: String,
    source_filename: String,
}

/// Bytes and name ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDownload {
    /// Derived file name.
    pub file_name: String,
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
    /// Always [`PNG_MIME_TYPE`].
    pub mime_type: &'static str,
}

impl ProcessedArtifact {
    /// Pair a data URI with its source filename.
    #[must_use]
    pub fn new(data_uri: impl Into<String>, source_filename: impl Into<String>) -> Self {
        Self {
            data_uri: data_uri.into(),
            source_filename: source_filename.into(),
        }
    }

    /// The data URI, suitable for an `<img src>`.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Download name for the given operation suffix.
    #[must_use]
    pub fn file_name(&self, suffix: &str) -> String {
        derive_file_name(&self.source_filename, suffix)
    }

    /// Decode the payload and derive the download name.
    ///
    /// # Errors
    ///
    /// See [`decode_data_uri`].
    pub fn prepare(&self, suffix: &str) -> Result<PreparedDownload, ArtifactError> {
        Ok(PreparedDownload {
            file_name: self.file_name(suffix),
            bytes: decode_data_uri(&self.data_uri)?,
            mime_type: PNG_MIME_TYPE,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn derives_names_from_source() {
        assert_eq!(
            derive_file_name("photo.jpg", "_bilateral"),
            "photo_bilateral.png"
        );
        assert_eq!(derive_file_name("scan.png", "_median_5"), "scan_median_5.png");
    }

    #[test]
    fn strips_only_final_extension() {
        assert_eq!(
            derive_file_name("holiday.2024.jpeg", "_noisy"),
            "holiday.2024_noisy.png"
        );
    }

    #[test]
    fn names_without_extension_keep_stem() {
        assert_eq!(derive_file_name("README", "_x"), "README_x.png");
        assert_eq!(derive_file_name(".hidden", "_x"), ".hidden_x.png");
        assert_eq!(derive_file_name("trailing.", "_x"), "trailing._x.png");
    }

    #[test]
    fn decodes_png_data_uri() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let uri = encode_png_data_uri(&bytes);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), bytes);
    }

    #[test]
    fn accepts_other_image_types_and_bare_payloads() {
        assert_eq!(decode_data_uri("data:image/jpeg;base64,AAEC").unwrap(), [0, 1, 2]);
        assert_eq!(decode_data_uri("AAEC").unwrap(), [0, 1, 2]);
    }

    #[test]
    fn malformed_base64_is_reported() {
        let err = decode_data_uri("data:image/png;base64,@@not base64@@").unwrap_err();
        assert!(matches!(err, ArtifactError::MalformedBase64(_)));
    }

    #[test]
    fn empty_payload_is_absent() {
        assert!(matches!(
            decode_data_uri("data:image/png;base64,"),
            Err(ArtifactError::Absent)
        ));
        assert!(matches!(decode_data_uri(""), Err(ArtifactError::Absent)));
    }

    #[test]
    fn non_base64_data_uri_is_rejected() {
        assert!(matches!(
            decode_data_uri("data:text/plain,hello"),
            Err(ArtifactError::NotBase64)
        ));
    }

    #[test]
    fn prepare_combines_name_and_bytes() {
        let artifact = ProcessedArtifact::new(encode_png_data_uri(b"png"), "cat.webp");
        let download = artifact.prepare("_equalized").unwrap();
        assert_eq!(download.file_name, "cat_equalized.png");
        assert_eq!(download.bytes, b"png");
        assert_eq!(download.mime_type, PNG_MIME_TYPE);
    }
}
