use std::rc::Rc;

use dioxus::prelude::*;
use imagelab_core::mask::PresetRequest;
use imagelab_core::{
    ClientConfig, HistogramPair, MaskMode, Operation, OperationOutcome, ParamBook, RequestTracker,
};
use imagelab_io::{
    FileUpload, HistogramChart, MaskEditor, OperationControls, OperationTabs, ParamEdit,
    RequestDispatcher, ResultPanel, UploadedImage,
};

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(app);
}

/// Backend location, overridable at build time with `IMAGELAB_API_URL`.
fn load_config() -> ClientConfig {
    option_env!("IMAGELAB_API_URL").map_or_else(ClientConfig::default, ClientConfig::with_base_url)
}

/// The most recent successful response and what is needed to save it.
#[derive(Clone, PartialEq)]
struct ShownResult {
    operation: Operation,
    outcome: Rc<OperationOutcome>,
    source_filename: String,
    suffix: String,
}

/// Root application component.
///
/// Owns the uploaded images, per-page parameters, request tracking, the
/// source histogram, and the last result, and wires them into the
/// upload, navigation, controls, mask editor, and result components.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let dispatcher = use_signal(|| RequestDispatcher::new(load_config()));
    let mut operation = use_signal(|| Operation::Equalize);
    let mut primary = use_signal(|| Option::<UploadedImage>::None);
    let mut secondary = use_signal(|| Option::<UploadedImage>::None);
    let mut book = use_signal(ParamBook::default);
    let mut tracker = use_signal(RequestTracker::new);
    let mut shown = use_signal(|| Option::<ShownResult>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut source_histogram = use_signal(|| Option::<HistogramPair>::None);
    let mut histogram_tracker = use_signal(RequestTracker::new);

    // --- Preset lookup ---
    // The builder ignores answers to lookups it no longer waits for.
    let request_preset = move |request: PresetRequest| {
        let dispatcher = dispatcher.read().clone();
        spawn(async move {
            let outcome = dispatcher.fetch_mask(request.kind, request.size).await;
            book.write().convolution.mask.apply_preset(&request, outcome);
        });
    };

    // --- Source histogram ---
    // Only the answer for the most recent upload is kept; failures leave
    // the chart empty.
    let mut request_histogram = move |image: UploadedImage| {
        source_histogram.set(None);
        let token = histogram_tracker.write().begin();
        let dispatcher = dispatcher.read().clone();
        spawn(async move {
            let result = dispatcher.compute_histogram(&image).await;
            if !histogram_tracker.write().complete(token) {
                return;
            }
            match result {
                Ok(pair) => source_histogram.set(Some(pair)),
                Err(e) => tracing::warn!(name = %image.name, "source histogram failed: {e}"),
            }
        });
    };

    // --- Upload handlers ---
    let on_primary_upload = move |image: UploadedImage| {
        tracker.write().invalidate();
        shown.set(None);
        error.set(None);
        let request = {
            let mut b = book.write();
            if let Some(dimensions) = image.dimensions {
                b.blend.budget.on_image_loaded(dimensions);
            }
            b.convolution.mask.reset()
        };
        primary.set(Some(image.clone()));
        request_preset(request);
        request_histogram(image);
    };

    let on_secondary_upload = move |image: UploadedImage| {
        tracker.write().invalidate();
        shown.set(None);
        secondary.set(Some(image));
    };

    // --- Mask editor handlers ---
    let on_kernel_size = move |n: usize| {
        book.write().convolution.mask.set_kernel_size(n);
    };

    let on_mask_mode = move |mode: MaskMode| match mode {
        MaskMode::Custom => book.write().convolution.mask.select_custom(),
        MaskMode::Preset(kind) => {
            let request = book.write().convolution.mask.select_preset(kind);
            request_preset(request);
        }
    };

    let on_cell = move |(row, col, text): (usize, usize, String)| {
        if let Err(e) = book.write().convolution.mask.edit_cell(row, col, &text) {
            tracing::warn!("mask edit rejected: {e}");
        }
    };

    // --- Submission ---
    let on_submit = move |_: MouseEvent| {
        let op = operation();
        let Some(first) = primary() else {
            return;
        };
        let second = secondary();
        let needs_second = op.image_fields().len() > 1;
        if needs_second && second.is_none() {
            let label = op.image_labels().get(1).copied().unwrap_or("a second image");
            error.set(Some(format!("Select {label} first.")));
            return;
        }
        if !book.read().is_ready(op) {
            return;
        }

        let (submission, suffix) = {
            let b = book.read();
            (b.submission(op), b.download_suffix(op))
        };
        let token = tracker.write().begin();
        error.set(None);
        let dispatcher = dispatcher.read().clone();

        spawn(async move {
            let mut images = vec![&first];
            if needs_second {
                images.extend(second.as_ref());
            }
            let result = dispatcher.submit(&submission, &images).await;

            // A newer submission or a new image supersedes this one.
            if !tracker.write().complete(token) {
                return;
            }

            match result {
                Ok(outcome) => shown.set(Some(ShownResult {
                    operation: op,
                    outcome: Rc::new(outcome),
                    source_filename: first.name.clone(),
                    suffix,
                })),
                Err(e) => {
                    tracing::warn!(operation = %op, "request failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let on_select = move |op: Operation| {
        operation.set(op);
        error.set(None);
    };

    let current = operation();
    let pending = tracker.read().is_pending();
    let ready = book.read().is_ready(current);
    let can_submit = primary.read().is_some() && ready && !pending;
    let result_for_page = shown().filter(|r| r.operation == current);
    let labels = current.image_labels();
    let primary_label = labels.first().copied().unwrap_or("Image");
    let secondary_label = labels.get(1).copied();

    // --- Layout ---
    rsx! {
        // Utility classes are resolved in the browser; theme variables
        // come from the bundled stylesheet.
        script { src: "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" }
        style { dangerous_inner_html: include_str!("../assets/theme.css") }

        div { class: "min-h-screen bg-[var(--bg)] text-[var(--text)] flex flex-col",
            header { class: "px-6 py-4 border-b border-[var(--border)]",
                h1 { class: "text-2xl font-semibold", "imagelab" }
                p { class: "text-[var(--muted)] text-sm",
                    "Filters, transforms, and frequency-domain tools for your images"
                }
            }

            div { class: "px-6",
                OperationTabs { selected: current, on_select: on_select }
            }

            div { class: "flex-1 flex flex-col lg:flex-row gap-6 p-6",
                // Left column: inputs and controls
                div { class: "lg:w-96 flex-shrink-0 flex flex-col gap-4",
                    FileUpload {
                        label: primary_label.to_owned(),
                        on_upload: on_primary_upload,
                    }

                    if let Some(pair) = source_histogram() {
                        HistogramChart {
                            title: "Uploaded Image Histogram".to_owned(),
                            series: pair,
                        }
                    }

                    if let Some(label) = secondary_label {
                        FileUpload {
                            label: label.to_owned(),
                            on_upload: on_secondary_upload,
                        }
                    }

                    div { class: "bg-[var(--surface)] rounded p-4 space-y-4",
                        h3 { class: "text-sm font-semibold text-[var(--text-heading)]",
                            "{current} Controls"
                        }

                        if current == Operation::Convolution {
                            MaskEditor {
                                mask: book.read().convolution.mask.clone(),
                                on_kernel_size: on_kernel_size,
                                on_mode: on_mask_mode,
                                on_cell: on_cell,
                            }
                        }

                        OperationControls {
                            operation: current,
                            book: book(),
                            on_edit: move |edit: ParamEdit| edit.apply(&mut book.write()),
                        }

                        if !ready {
                            p { class: "text-xs text-[var(--text-secondary)]",
                                "Add at least one filter to apply."
                            }
                        }

                        button {
                            class: if can_submit {
                                "w-full px-4 py-2 bg-[var(--btn-primary)] hover:bg-[var(--btn-primary-hover)] rounded text-white font-medium transition-colors cursor-pointer"
                            } else {
                                "w-full px-4 py-2 bg-[var(--btn-disabled)] rounded text-[var(--text-disabled)] cursor-not-allowed"
                            },
                            disabled: !can_submit,
                            onclick: on_submit,
                            if pending { "Processing..." } else { "Apply {current}" }
                        }
                    }
                }

                // Right column: results
                div { class: "flex-1 flex flex-col gap-4",
                    if let Some(ref err) = error() {
                        div { class: "bg-[var(--error-bg)] border border-[var(--error-border)] rounded p-3",
                            p { class: "text-[var(--text-error)] text-sm", "{err}" }
                        }
                    }

                    if pending {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-[var(--text-secondary)] text-lg animate-pulse",
                                "Processing..."
                            }
                        }
                    } else if let Some(result) = result_for_page {
                        ResultPanel {
                            outcome: result.outcome,
                            source_filename: result.source_filename,
                            suffix: result.suffix,
                        }
                    } else if primary.read().is_some() {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-[var(--muted)] text-lg",
                                "Adjust the parameters and apply {current}"
                            }
                        }
                    } else {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-[var(--text-placeholder)] text-lg",
                                "Upload an image to get started"
                            }
                        }
                    }
                }
            }
        }
    }
}
