//! Backend requests over `fetch`.
//!
//! [`RequestDispatcher`] turns a [`Submission`] plus the uploaded images
//! into a multipart `POST` and classifies the answer.  It also fetches
//! preset masks and the histogram of a freshly uploaded image.  Staleness is the
//! caller's concern: take a token from a
//! [`RequestTracker`](imagelab_core::RequestTracker) before awaiting and
//! check it afterwards.

use imagelab_core::api::{MaskResponse, error_from_response};
use imagelab_core::{
    ClientConfig, ClientError, ComputedHistogram, HistogramPair, KernelSize, OperationOutcome,
    PresetKind, Submission,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestInit, RequestMode};

use crate::object_url::bytes_to_blob;
use crate::source::UploadedImage;

fn browser_error(value: JsValue) -> ClientError {
    ClientError::Browser(format!("{value:?}"))
}

/// A finished HTTP exchange.
struct RawResponse {
    ok: bool,
    status: u16,
    content_type: Option<String>,
    body: String,
}

impl RawResponse {
    /// Pass a 2xx response through; classify anything else.
    fn success(self) -> Result<Self, ClientError> {
        if self.ok {
            Ok(self)
        } else {
            Err(error_from_response(
                self.status,
                self.content_type.as_deref(),
                &self.body,
            ))
        }
    }
}

fn append_image(
    form: &web_sys::FormData,
    field: &str,
    image: &UploadedImage,
) -> Result<(), ClientError> {
    let blob =
        bytes_to_blob(&image.bytes, "").map_err(|e| ClientError::Browser(e.to_string()))?;
    form.append_with_blob_and_filename(field, &blob, &image.name)
        .map_err(browser_error)
}

/// Sends submissions to the configured backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDispatcher {
    config: ClientConfig,
}

impl RequestDispatcher {
    /// Dispatcher for the backend described by `config`.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Send `submission` with `images` attached in upload order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request cannot be built or sent,
    /// if the backend reports a failure, or if the response is not the
    /// JSON the operation expects.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
    pub async fn submit(
        &self,
        submission: &Submission,
        images: &[&UploadedImage],
    ) -> Result<OperationOutcome, ClientError> {
        let operation = submission.operation();
        let form = web_sys::FormData::new().map_err(browser_error)?;

        for (field, image) in operation.image_fields().iter().zip(images) {
            append_image(&form, field, image)?;
        }
        for field in submission.fields() {
            form.append_with_str(field.name, &field.value)
                .map_err(browser_error)?;
        }

        let url = self.config.operation_url(operation);
        tracing::debug!(%url, fields = submission.fields().len(), "submitting");

        let raw = post_form(&url, form).await?.success()?;
        OperationOutcome::from_success(operation, raw.content_type.as_deref(), &raw.body)
    }

    /// Ask the backend for the histogram of an unprocessed upload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures, backend errors, or
    /// a body that is not a histogram.
    #[allow(clippy::future_not_send)]
    pub async fn compute_histogram(
        &self,
        image: &UploadedImage,
    ) -> Result<HistogramPair, ClientError> {
        let form = web_sys::FormData::new().map_err(browser_error)?;
        append_image(&form, "image", image)?;

        let url = self.config.histogram_url();
        tracing::debug!(%url, name = %image.name, "requesting source histogram");
        let raw = post_form(&url, form).await?.success()?;
        ComputedHistogram::from_success(raw.content_type.as_deref(), &raw.body)
    }

    /// Look up the preset grid for `kind` at `size`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures, backend errors, or
    /// a body that is not `{"mask": [[...]]}`.
    #[allow(clippy::future_not_send)]
    pub async fn fetch_mask(
        &self,
        kind: PresetKind,
        size: KernelSize,
    ) -> Result<Vec<Vec<f64>>, ClientError> {
        let url = self.config.mask_url(kind, size);
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let raw = send(&url, &opts).await?.success()?;
        let parsed: MaskResponse = serde_json::from_str(&raw.body)?;
        Ok(parsed.mask)
    }
}

#[allow(clippy::future_not_send)]
async fn post_form(url: &str, form: web_sys::FormData) -> Result<RawResponse, ClientError> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form.into());
    send(url, &opts).await
}

#[allow(clippy::future_not_send)]
async fn send(url: &str, opts: &RequestInit) -> Result<RawResponse, ClientError> {
    let window = web_sys::window().ok_or_else(|| ClientError::Browser("no global window".into()))?;
    let request = web_sys::Request::new_with_str_and_init(url, opts).map_err(browser_error)?;

    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ClientError::Network(format!("{e:?}")))?
        .dyn_into()
        .map_err(browser_error)?;

    let content_type = response.headers().get("content-type").ok().flatten();
    let text_promise = response.text().map_err(browser_error)?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(|e| ClientError::Network(format!("{e:?}")))?
        .as_string()
        .unwrap_or_default();

    Ok(RawResponse {
        ok: response.ok(),
        status: response.status(),
        content_type,
        body,
    })
}
