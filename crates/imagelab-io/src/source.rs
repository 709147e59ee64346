//! Images chosen by the user.

use std::rc::Rc;

use imagelab_core::Dimensions;

/// An uploaded image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Original file name, used to name downloads.
    pub name: String,
    /// Encoded file contents.
    pub bytes: Rc<[u8]>,
    /// Natural size from the file header, if it could be read.
    pub dimensions: Option<Dimensions>,
}

impl UploadedImage {
    /// Wrap uploaded bytes, reading the natural size from the header.
    #[must_use]
    pub fn new(name: String, bytes: Vec<u8>) -> Self {
        let dimensions = match imagelab_core::types::read_dimensions(&bytes) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(%name, "could not read image dimensions: {e}");
                None
            }
        };
        Self {
            name,
            bytes: bytes.into(),
            dimensions,
        }
    }
}
