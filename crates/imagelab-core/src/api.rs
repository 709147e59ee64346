//! Backend response payloads and error classification.
//!
//! Everything here is transport-agnostic: callers hand over the status
//! code, content type, and body text of a finished HTTP exchange and get
//! back either a decoded [`OperationOutcome`] or a [`ClientError`] whose
//! `Display` is the message shown to the user.

use serde::{Deserialize, Serialize};

use crate::histogram::HistogramPair;
use crate::operation::{Operation, ResponseShape};
use crate::transform::TransformMatrix;

/// Message used when a failed response carries no usable explanation.
pub const GENERIC_FAILURE: &str = "Failed to process image";

/// Errors from a round trip to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status and a JSON explanation.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// `error` or `detail` from the body, or [`GENERIC_FAILURE`].
        message: String,
    },

    /// The backend answered with a non-2xx status and a non-JSON body.
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// A successful response was not JSON.
    #[error("received non-JSON response from server")]
    NotJson,

    /// A JSON response did not have the expected shape.
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),

    /// A browser API call failed while building or sending the request.
    #[error("browser error: {0}")]
    Browser(String),
}

/// `true` if a `Content-Type` header value denotes JSON.
#[must_use]
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

/// JSON body of a failed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Handler-level error message.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    /// Framework-level error (a string, or a list of validation errors).
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// First usable message: `error`, then `detail`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        [&self.error, &self.detail]
            .into_iter()
            .flatten()
            .find_map(value_message)
    }
}

fn value_message(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Classify a non-2xx response.
#[must_use]
pub fn error_from_response(status: u16, content_type: Option<&str>, body: &str) -> ClientError {
    if !is_json_content_type(content_type) {
        return ClientError::HttpStatus { status };
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
    ClientError::Backend { status, message }
}

/// Histogram-bearing response (equalize, convolution, bilateral, median,
/// min/max, noise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramResponse {
    /// Result image as a data URI.
    pub processed_image: String,
    /// Bins of the uploaded image.
    #[serde(default)]
    pub original_histogram: Vec<f64>,
    /// Running sum of `original_histogram`.
    #[serde(default)]
    pub original_cumulative: Vec<f64>,
    /// Bins of the result.
    #[serde(default)]
    pub processed_histogram: Vec<f64>,
    /// Running sum of `processed_histogram`.
    #[serde(default)]
    pub processed_cumulative: Vec<f64>,
    /// Filter steps the backend ran (min/max sequence only).
    #[serde(default)]
    pub applied_filters: Vec<String>,
}

/// Fourier magnitude spectrum response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrumResponse {
    /// Spectrum rendered as a data URI.
    #[serde(alias = "processedImage")]
    pub magnitude_spectrum: String,
    #[serde(default)]
    pub original_histogram: Vec<f64>,
    #[serde(default)]
    pub original_cumulative: Vec<f64>,
    #[serde(default)]
    pub spectrum_histogram: Vec<f64>,
    #[serde(default)]
    pub spectrum_cumulative: Vec<f64>,
}

/// Fourier filter response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    /// Filtered image.
    #[serde(alias = "processedImage")]
    pub filtered_image: String,
    /// Spectrum after filtering.
    #[serde(default)]
    pub filtered_spectrum: Option<String>,
    /// Spectrum of the input.
    #[serde(default)]
    pub original_spectrum: Option<String>,
}

/// Single-image response (Canny).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub processed_image: String,
}

/// Geometric transformation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub processed_image: String,
    /// Homogeneous matrix that was applied.
    #[serde(default)]
    pub transformation_matrix: Option<TransformMatrix>,
}

/// Gaussian/Laplacian pyramid response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidResponse {
    /// One data URI per Gaussian level, finest first.
    #[serde(default)]
    pub gaussian_pyramid: Vec<String>,
    /// One data URI per Laplacian level, finest first.
    #[serde(default)]
    pub laplacian_pyramid: Vec<String>,
    /// Image rebuilt from the Laplacian pyramid.
    pub reconstructed_image: String,
}

/// Pyramid blending response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendResponse {
    #[serde(default)]
    pub pyramid1: Vec<String>,
    #[serde(default)]
    pub pyramid2: Vec<String>,
    #[serde(default)]
    pub blended_pyramid: Vec<String>,
    /// Final blended image.
    pub result: String,
}

/// Two-pointer histogram matching response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// Grayscale image A as a data URI.
    #[serde(rename = "imageA")]
    pub image_a: String,
    /// Grayscale image B as a data URI.
    #[serde(rename = "imageB")]
    pub image_b: String,
    /// Image A remapped onto B's distribution.
    pub transformed_image: String,
    #[serde(default, rename = "histogramA")]
    pub histogram_a: Vec<f64>,
    #[serde(default, rename = "histogramB")]
    pub histogram_b: Vec<f64>,
    #[serde(default, rename = "cumulativeA")]
    pub cumulative_a: Vec<f64>,
    #[serde(default, rename = "cumulativeB")]
    pub cumulative_b: Vec<f64>,
    /// Target intensity in B for each intensity in A; `-1` where none.
    #[serde(default)]
    pub mapping: Vec<i64>,
}

/// Histogram of an uploaded image before any processing.
///
/// The series arrive nested under `data`, or at the top level from older
/// backends; `image` is a rendered plot that the client does not use.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComputedHistogram {
    #[serde(default)]
    data: Option<HistogramPair>,
    #[serde(default)]
    histogram: Vec<f64>,
    #[serde(default)]
    cumulative: Vec<f64>,
}

impl ComputedHistogram {
    /// The nested pair if present, otherwise the top-level series.
    #[must_use]
    pub fn into_pair(self) -> HistogramPair {
        match self.data {
            Some(pair) => pair,
            None => HistogramPair {
                histogram: self.histogram,
                cumulative: self.cumulative,
            },
        }
    }

    /// Decode a successful response body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotJson`] for a non-JSON content type and
    /// [`ClientError::Decode`] for malformed JSON.
    pub fn from_success(
        content_type: Option<&str>,
        body: &str,
    ) -> Result<HistogramPair, ClientError> {
        if !is_json_content_type(content_type) {
            return Err(ClientError::NotJson);
        }
        let computed: Self = serde_json::from_str(body)?;
        Ok(computed.into_pair())
    }
}

/// Preset lookup response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskResponse {
    /// Row-major N×N grid.
    pub mask: Vec<Vec<f64>>,
}

/// A labelled histogram for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledHistogram {
    /// Chart title.
    pub label: &'static str,
    /// Bins and running sum.
    pub series: HistogramPair,
}

/// A labelled row of pyramid levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gallery<'a> {
    /// Row title.
    pub label: &'static str,
    /// Data URIs, one per level.
    pub images: &'a [String],
}

/// A decoded successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Histogram(HistogramResponse),
    Spectrum(SpectrumResponse),
    Filtered(FilterResponse),
    Image(ImageResponse),
    Transform(TransformResponse),
    Pyramid(PyramidResponse),
    Blend(BlendResponse),
    Matching(MatchResponse),
}

impl OperationOutcome {
    /// Decode `body` according to `operation`'s response shape.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if the JSON does not match.
    pub fn decode(operation: Operation, body: &str) -> Result<Self, ClientError> {
        Ok(match operation.response_shape() {
            ResponseShape::Histogram => Self::Histogram(serde_json::from_str(body)?),
            ResponseShape::Spectrum => Self::Spectrum(serde_json::from_str(body)?),
            ResponseShape::Filtered => Self::Filtered(serde_json::from_str(body)?),
            ResponseShape::Image => Self::Image(serde_json::from_str(body)?),
            ResponseShape::Transform => Self::Transform(serde_json::from_str(body)?),
            ResponseShape::Pyramid => Self::Pyramid(serde_json::from_str(body)?),
            ResponseShape::Blend => Self::Blend(serde_json::from_str(body)?),
            ResponseShape::Matching => Self::Matching(serde_json::from_str(body)?),
        })
    }

    /// Decode a successful response, rejecting non-JSON content.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotJson`] for a non-JSON content type and
    /// [`ClientError::Decode`] for a body of the wrong shape.
    pub fn from_success(
        operation: Operation,
        content_type: Option<&str>,
        body: &str,
    ) -> Result<Self, ClientError> {
        if !is_json_content_type(content_type) {
            return Err(ClientError::NotJson);
        }
        Self::decode(operation, body)
    }

    /// The image offered for download.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        match self {
            Self::Histogram(r) => &r.processed_image,
            Self::Spectrum(r) => &r.magnitude_spectrum,
            Self::Filtered(r) => &r.filtered_image,
            Self::Image(r) => &r.processed_image,
            Self::Transform(r) => &r.processed_image,
            Self::Pyramid(r) => &r.reconstructed_image,
            Self::Blend(r) => &r.result,
            Self::Matching(r) => &r.transformed_image,
        }
    }

    /// Additional single images shown alongside the primary one.
    #[must_use]
    pub fn secondary_images(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Filtered(r) => [
                ("Original Spectrum", r.original_spectrum.as_deref()),
                ("Filtered Spectrum", r.filtered_spectrum.as_deref()),
            ]
            .into_iter()
            .filter_map(|(label, uri)| uri.map(|u| (label, u)))
            .collect(),
            Self::Matching(r) => vec![
                ("Image A", r.image_a.as_str()),
                ("Image B", r.image_b.as_str()),
            ],
            _ => Vec::new(),
        }
    }

    /// Histograms to chart, in display order.
    #[must_use]
    pub fn histograms(&self) -> Vec<LabelledHistogram> {
        let pair = |histogram: &[f64], cumulative: &[f64]| HistogramPair {
            histogram: histogram.to_vec(),
            cumulative: cumulative.to_vec(),
        };
        match self {
            Self::Histogram(r) => vec![
                LabelledHistogram {
                    label: "Original",
                    series: pair(&r.original_histogram, &r.original_cumulative),
                },
                LabelledHistogram {
                    label: "Processed",
                    series: pair(&r.processed_histogram, &r.processed_cumulative),
                },
            ],
            Self::Spectrum(r) => vec![
                LabelledHistogram {
                    label: "Original",
                    series: pair(&r.original_histogram, &r.original_cumulative),
                },
                LabelledHistogram {
                    label: "Spectrum",
                    series: pair(&r.spectrum_histogram, &r.spectrum_cumulative),
                },
            ],
            Self::Matching(r) => vec![
                LabelledHistogram {
                    label: "Image A",
                    series: pair(&r.histogram_a, &r.cumulative_a),
                },
                LabelledHistogram {
                    label: "Image B",
                    series: pair(&r.histogram_b, &r.cumulative_b),
                },
            ],
            _ => Vec::new(),
        }
    }

    /// Pyramid rows, in display order.
    #[must_use]
    pub fn galleries(&self) -> Vec<Gallery<'_>> {
        match self {
            Self::Pyramid(r) => vec![
                Gallery {
                    label: "Gaussian Pyramid",
                    images: &r.gaussian_pyramid,
                },
                Gallery {
                    label: "Laplacian Pyramid",
                    images: &r.laplacian_pyramid,
                },
            ],
            Self::Blend(r) => vec![
                Gallery {
                    label: "First Image Pyramid",
                    images: &r.pyramid1,
                },
                Gallery {
                    label: "Second Image Pyramid",
                    images: &r.pyramid2,
                },
                Gallery {
                    label: "Blended Pyramid",
                    images: &r.blended_pyramid,
                },
            ],
            _ => Vec::new(),
        }
    }

    /// Applied transformation matrix, if any.
    #[must_use]
    pub const fn matrix(&self) -> Option<&TransformMatrix> {
        match self {
            Self::Transform(r) => r.transformation_matrix.as_ref(),
            _ => None,
        }
    }

    /// Intensity mapping from a histogram matching run.
    #[must_use]
    pub fn mapping(&self) -> Option<&[i64]> {
        match self {
            Self::Matching(r) if !r.mapping.is_empty() => Some(r.mapping.as_slice()),
            _ => None,
        }
    }

    /// Filter steps the backend reports having run.
    #[must_use]
    pub fn applied_filters(&self) -> &[String] {
        match self {
            Self::Histogram(r) => r.applied_filters.as_slice(),
            _ => &[],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");

    #[test]
    fn error_field_wins_over_detail() {
        let err = error_from_response(400, JSON, r#"{"error":"Invalid image file","detail":"x"}"#);
        assert_eq!(err.to_string(), "Invalid image file");
    }

    #[test]
    fn detail_is_used_when_error_absent() {
        let err = error_from_response(
            500,
            Some("application/json; charset=utf-8"),
            r#"{"detail":"levels too large"}"#,
        );
        assert!(matches!(err, ClientError::Backend { status: 500, .. }));
        assert_eq!(err.to_string(), "levels too large");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let err = error_from_response(422, JSON, r#"{"detail":[{"msg":"field required"}]}"#);
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn empty_error_body_is_generic() {
        assert_eq!(error_from_response(500, JSON, "{}").to_string(), GENERIC_FAILURE);
        assert_eq!(error_from_response(500, JSON, "oops").to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn non_json_failure_reports_status() {
        let err = error_from_response(502, Some("text/html"), "<html>");
        assert_eq!(err.to_string(), "HTTP error! status: 502");
        assert!(matches!(
            error_from_response(404, None, ""),
            ClientError::HttpStatus { status: 404 }
        ));
    }

    #[test]
    fn non_json_success_is_an_error() {
        let err = OperationOutcome::from_success(Operation::Canny, Some("text/plain"), "ok");
        assert!(matches!(err, Err(ClientError::NotJson)));
    }

    #[test]
    fn decodes_histogram_response() {
        let body = r#"{
            "processedImage": "data:image/png;base64,AAAA",
            "originalHistogram": [1, 2, 3],
            "originalCumulative": [1, 3, 6],
            "processedHistogram": [0, 0, 6],
            "processedCumulative": [0, 0, 6]
        }"#;
        let outcome = OperationOutcome::decode(Operation::Bilateral, body).unwrap();
        assert_eq!(outcome.primary_image(), "data:image/png;base64,AAAA");
        let charts = outcome.histograms();
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[1].label, "Processed");
        assert_eq!(charts[0].series.cumulative, vec![1.0, 3.0, 6.0]);
        assert!(outcome.galleries().is_empty());
    }

    #[test]
    fn decodes_spectrum_response() {
        let body = r#"{"magnitudeSpectrum":"data:image/png;base64,BB==","spectrumHistogram":[4]}"#;
        let outcome = OperationOutcome::decode(Operation::Fourier, body).unwrap();
        assert_eq!(outcome.primary_image(), "data:image/png;base64,BB==");
        assert_eq!(outcome.histograms()[1].series.histogram, vec![4.0]);
    }

    #[test]
    fn decodes_filter_response_with_spectra() {
        let body = r#"{"filteredImage":"a","filteredSpectrum":"b"}"#;
        let outcome = OperationOutcome::decode(Operation::FourierFilter, body).unwrap();
        assert_eq!(outcome.primary_image(), "a");
        assert_eq!(outcome.secondary_images(), vec![("Filtered Spectrum", "b")]);
    }

    #[test]
    fn decodes_transform_matrix() {
        let body = r#"{"processedImage":"x","transformationMatrix":[[1,0,10],[0,1,0],[0,0,1]]}"#;
        let outcome = OperationOutcome::decode(Operation::Transform, body).unwrap();
        let m = outcome.matrix().unwrap();
        assert!((m[0][2] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decodes_pyramids_and_blend() {
        let body = r#"{"gaussianPyramid":["g0","g1"],"laplacianPyramid":["l0"],"reconstructedImage":"r"}"#;
        let outcome = OperationOutcome::decode(Operation::Pyramids, body).unwrap();
        assert_eq!(outcome.primary_image(), "r");
        let rows = outcome.galleries();
        assert_eq!(rows[0].images.len(), 2);
        assert_eq!(rows[1].label, "Laplacian Pyramid");

        let body = r#"{"pyramid1":["a"],"pyramid2":["b"],"blendedPyramid":["c"],"result":"d"}"#;
        let outcome = OperationOutcome::decode(Operation::Blend, body).unwrap();
        assert_eq!(outcome.primary_image(), "d");
        assert_eq!(outcome.galleries().len(), 3);
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = OperationOutcome::decode(Operation::Pyramids, r#"{"processedImage":"x"}"#);
        assert!(matches!(err, Err(ClientError::Decode(_))));
    }

    #[test]
    fn decodes_matching_response() {
        let body = r#"{
            "imageA": "a", "imageB": "b", "transformedImage": "t",
            "histogramA": [1, 0], "histogramB": [0, 1],
            "cumulativeA": [1, 1], "cumulativeB": [0, 1],
            "mapping": [1, -1]
        }"#;
        let outcome = OperationOutcome::decode(Operation::HistogramMatch, body).unwrap();
        assert_eq!(outcome.primary_image(), "t");
        assert_eq!(outcome.secondary_images(), vec![("Image A", "a"), ("Image B", "b")]);
        let charts = outcome.histograms();
        assert_eq!(charts[0].label, "Image A");
        assert_eq!(charts[1].series.histogram, vec![0.0, 1.0]);
        assert_eq!(outcome.mapping(), Some(&[1, -1][..]));
    }

    #[test]
    fn applied_filters_are_reported() {
        let body = r#"{"processedImage":"p","appliedFilters":["min","max"]}"#;
        let outcome = OperationOutcome::decode(Operation::MinMaxFilter, body).unwrap();
        assert_eq!(outcome.applied_filters(), ["min", "max"]);
        assert_eq!(outcome.mapping(), None);

        let outcome = OperationOutcome::decode(Operation::Median, r#"{"processedImage":"p"}"#).unwrap();
        assert!(outcome.applied_filters().is_empty());
    }

    #[test]
    fn computed_histogram_accepts_nested_and_flat() {
        let nested = r#"{"image":"iVBOR","data":{"histogram":[1,2],"cumulative":[1,3]}}"#;
        let pair = ComputedHistogram::from_success(JSON, nested).unwrap();
        assert_eq!(pair.cumulative, vec![1.0, 3.0]);

        let flat = r#"{"histogram":[4],"cumulative":[4]}"#;
        let pair = ComputedHistogram::from_success(JSON, flat).unwrap();
        assert_eq!(pair.histogram, vec![4.0]);

        assert!(ComputedHistogram::from_success(JSON, "{}").unwrap().is_blank());
        assert!(matches!(
            ComputedHistogram::from_success(Some("text/html"), "{}"),
            Err(ClientError::NotJson)
        ));
    }

    #[test]
    fn mask_response_decodes() {
        let r: MaskResponse = serde_json::from_str(r#"{"mask":[[0,0,0],[0,1,0],[0,0,0]]}"#).unwrap();
        assert!((r.mask[1][1] - 1.0).abs() < f64::EPSILON);
    }
}
