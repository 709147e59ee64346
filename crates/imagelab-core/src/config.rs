//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::mask::{KernelSize, PresetKind};
use crate::operation::Operation;

/// Backend location used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Scheme, host, and optional path prefix; no trailing slash needed.
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Configuration for a given base URL.  Blank input falls back to
    /// [`DEFAULT_API_BASE_URL`].
    #[must_use]
    pub fn with_base_url(base: &str) -> Self {
        let trimmed = base.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self {
                api_base_url: trimmed.to_owned(),
            }
        }
    }

    /// Parse a JSON configuration document.  Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Absolute URL for `path` (which starts with `/`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url.trim_end_matches('/'))
    }

    /// Endpoint URL for `operation`.
    #[must_use]
    pub fn operation_url(&self, operation: Operation) -> String {
        self.url(operation.endpoint())
    }

    /// Preset lookup URL.
    #[must_use]
    pub fn mask_url(&self, kind: PresetKind, size: KernelSize) -> String {
        self.url(&format!("/api/get-mask?type={kind}&size={size}"))
    }

    /// Histogram lookup URL for a freshly uploaded image.
    #[must_use]
    pub fn histogram_url(&self) -> String {
        self.url("/api/compute-histogram")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(
            config.operation_url(Operation::Bilateral),
            "http://localhost:8000/api/bilateral"
        );
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let config = ClientConfig::with_base_url("https://lab.example.org/backend/");
        assert_eq!(
            config.operation_url(Operation::Blend),
            "https://lab.example.org/backend/image/blend"
        );
    }

    #[test]
    fn blank_base_falls_back() {
        assert_eq!(ClientConfig::with_base_url("  "), ClientConfig::default());
    }

    #[test]
    fn mask_url_carries_query() {
        let config = ClientConfig::default();
        assert_eq!(
            config.mask_url(PresetKind::Gaussian, KernelSize::new(5)),
            "http://localhost:8000/api/get-mask?type=gaussian&size=5"
        );
    }

    #[test]
    fn histogram_and_matching_urls() {
        let config = ClientConfig::with_base_url("http://lab:8000/");
        assert_eq!(config.histogram_url(), "http://lab:8000/api/compute-histogram");
        assert_eq!(
            config.operation_url(Operation::HistogramMatch),
            "http://lab:8000/api/2pointer"
        );
    }

    #[test]
    fn json_with_missing_keys_uses_defaults() {
        assert_eq!(ClientConfig::from_json("{}").unwrap(), ClientConfig::default());
        let config = ClientConfig::from_json(r#"{"apiBaseUrl":"http://10.0.0.2:9000"}"#).unwrap();
        assert_eq!(config.url("/x"), "http://10.0.0.2:9000/x");
    }
}
