//! Backend operation identifiers and metadata.
//!
//! Each [`Operation`] is one page of the client: it names the endpoint
//! the submission goes to, the image fields it uploads, and the shape of
//! the JSON the backend answers with.

use std::fmt;

/// How an operation's JSON response is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `processedImage` plus original/processed histogram pairs.
    Histogram,
    /// `magnitudeSpectrum` plus original/spectrum histogram pairs.
    Spectrum,
    /// `filteredImage` plus optional `filteredSpectrum`.
    Filtered,
    /// `processedImage` only.
    Image,
    /// `processedImage` plus `transformationMatrix`.
    Transform,
    /// Gaussian/Laplacian pyramids plus `reconstructedImage`.
    Pyramid,
    /// Two input pyramids, the blended pyramid, and `result`.
    Blend,
    /// Both inputs, `transformedImage`, per-input histograms, and the
    /// intensity `mapping`.
    Matching,
}

/// Identifier for an operation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Histogram equalization.
    Equalize,
    /// Convolution with a preset or custom kernel.
    Convolution,
    /// Edge-preserving bilateral filter.
    Bilateral,
    /// Median filter.
    Median,
    /// Synthetic noise.
    Noise,
    /// Fourier magnitude spectrum.
    Fourier,
    /// Frequency-domain low/high/band pass filter.
    FourierFilter,
    /// Canny edge detection.
    Canny,
    /// Rotation, translation, scaling, or shearing.
    Transform,
    /// Gaussian and Laplacian pyramids.
    Pyramids,
    /// Laplacian pyramid blending of two images.
    Blend,
    /// Two-pointer histogram matching of one image onto another.
    HistogramMatch,
    /// A sequence of 3×3 min (erode) and max (dilate) filters.
    MinMaxFilter,
}

impl Operation {
    /// All operations, in navigation order.
    pub const ALL: [Self; 13] = [
        Self::Equalize,
        Self::Convolution,
        Self::Bilateral,
        Self::Median,
        Self::MinMaxFilter,
        Self::Noise,
        Self::Fourier,
        Self::FourierFilter,
        Self::Canny,
        Self::Transform,
        Self::Pyramids,
        Self::Blend,
        Self::HistogramMatch,
    ];

    /// Page title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equalize => "Histogram Equalization",
            Self::Convolution => "Convolution Masks",
            Self::Bilateral => "Bilateral Filter",
            Self::Median => "Median Filter",
            Self::Noise => "Noise",
            Self::Fourier => "Fourier Transform",
            Self::FourierFilter => "Fourier Filters",
            Self::Canny => "Canny Edge Detection",
            Self::Transform => "Transformations",
            Self::Pyramids => "Image Pyramids",
            Self::Blend => "Multi-Band Blending",
            Self::HistogramMatch => "Histogram Matching",
            Self::MinMaxFilter => "Min/Max Filters",
        }
    }

    /// Short label for compact navigation.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Equalize => "Equal",
            Self::Convolution => "Conv",
            Self::Bilateral => "Bilat",
            Self::Median => "Median",
            Self::Noise => "Noise",
            Self::Fourier => "FFT",
            Self::FourierFilter => "FFT Filt",
            Self::Canny => "Canny",
            Self::Transform => "Xform",
            Self::Pyramids => "Pyr",
            Self::Blend => "Blend",
            Self::HistogramMatch => "Match",
            Self::MinMaxFilter => "Min/Max",
        }
    }

    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Equalize => "/api/equalize",
            Self::Convolution => "/api/convolution",
            Self::Bilateral => "/api/bilateral",
            Self::Median => "/api/median-filter",
            Self::Noise => "/api/add-noise",
            Self::Fourier => "/api/fourier",
            Self::FourierFilter => "/api/fourier-filter",
            Self::Canny => "/api/canny-edge",
            Self::Transform => "/api/transform",
            Self::Pyramids => "/api/pyramids",
            Self::Blend => "/image/blend",
            Self::HistogramMatch => "/api/2pointer",
            Self::MinMaxFilter => "/api/apply-filter",
        }
    }

    /// Multipart field names for the uploaded images, in upload order.
    #[must_use]
    pub const fn image_fields(self) -> &'static [&'static str] {
        match self {
            Self::Blend => &["image1", "image2"],
            Self::HistogramMatch => &["image_a", "image_b"],
            _ => &["image"],
        }
    }

    /// Upload captions, parallel to [`Operation::image_fields`].
    #[must_use]
    pub const fn image_labels(self) -> &'static [&'static str] {
        match self {
            Self::Blend => &["First Image", "Second Image"],
            Self::HistogramMatch => &["Image A", "Image B (reference)"],
            _ => &["Image"],
        }
    }

    /// Layout of the JSON response.
    #[must_use]
    pub const fn response_shape(self) -> ResponseShape {
        match self {
            Self::Equalize
            | Self::Convolution
            | Self::Bilateral
            | Self::Median
            | Self::MinMaxFilter
            | Self::Noise => ResponseShape::Histogram,
            Self::Fourier => ResponseShape::Spectrum,
            Self::FourierFilter => ResponseShape::Filtered,
            Self::Canny => ResponseShape::Image,
            Self::Transform => ResponseShape::Transform,
            Self::Pyramids => ResponseShape::Pyramid,
            Self::Blend => ResponseShape::Blend,
            Self::HistogramMatch => ResponseShape::Matching,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_variant() {
        // If you add a variant to Operation, update ALL and this count.
        assert_eq!(Operation::ALL.len(), 13);
        let mut seen = std::collections::HashSet::new();
        for op in Operation::ALL {
            assert!(seen.insert(op), "Duplicate operation in ALL: {op}");
        }
    }

    #[test]
    fn endpoints_are_unique_absolute_paths() {
        let mut seen = std::collections::HashSet::new();
        for op in Operation::ALL {
            let endpoint = op.endpoint();
            assert!(endpoint.starts_with('/'), "{op} endpoint {endpoint:?}");
            assert!(seen.insert(endpoint), "Duplicate endpoint {endpoint}");
        }
    }

    #[test]
    fn blend_and_matching_upload_two_images() {
        for op in Operation::ALL {
            let expected = match op {
                Operation::Blend | Operation::HistogramMatch => 2,
                _ => 1,
            };
            assert_eq!(op.image_fields().len(), expected, "{op}");
            assert_eq!(op.image_labels().len(), expected, "{op}");
        }
        assert_eq!(Operation::HistogramMatch.image_fields(), ["image_a", "image_b"]);
    }

    #[test]
    fn short_labels_are_compact() {
        for op in Operation::ALL {
            let short = op.short_label();
            assert!(!short.is_empty());
            assert!(short.len() <= 8, "{op} short label {short:?} too long");
        }
    }
}
