//! Operation result display with download.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdDownload;
use imagelab_core::api::Gallery;
use imagelab_core::{OperationOutcome, ProcessedArtifact};

use super::histogram::HistogramChart;
use super::mapping::MappingChart;
use super::transform::render_matrix;
use crate::download;

/// Props for the [`ResultPanel`] component.
#[derive(Props, Clone)]
pub struct ResultPanelProps {
    /// Decoded response.  Wrapped in `Rc` so re-renders do not copy the
    /// embedded images.
    outcome: Rc<OperationOutcome>,
    /// Name of the uploaded file the result came from.
    source_filename: String,
    /// Operation-specific download suffix, e.g. `_bilateral`.
    suffix: String,
}

impl PartialEq for ResultPanelProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.outcome, &other.outcome)
            && self.source_filename == other.source_filename
            && self.suffix == other.suffix
    }
}

/// Primary image with its download button, plus whatever else the
/// operation returned: spectra, pyramid rows, the applied filter
/// sequence, the intensity mapping, histograms.
#[component]
pub fn ResultPanel(props: ResultPanelProps) -> Element {
    let outcome = &props.outcome;
    let artifact = ProcessedArtifact::new(outcome.primary_image(), props.source_filename.clone());
    let file_name = artifact.file_name(&props.suffix);
    let image_src = artifact.data_uri().to_owned();
    let suffix = props.suffix.clone();

    let secondary: Vec<(&'static str, String)> = outcome
        .secondary_images()
        .into_iter()
        .map(|(label, uri)| (label, uri.to_owned()))
        .collect();
    let histograms = outcome.histograms();
    let mapping = outcome.mapping().map(<[i64]>::to_vec);
    let applied_filters = outcome.applied_filters().join(" → ");
    let applied = outcome
        .matrix()
        .copied()
        .map(|m| m.map(|row| row.map(|v| format!("{v:.3}"))));

    rsx! {
        div { class: "space-y-6",
            div { class: "space-y-2",
                img {
                    src: "{image_src}",
                    class: "w-full max-h-[60vh] object-contain rounded bg-[var(--preview-bg)]",
                    alt: "Processed result",
                }
                button {
                    class: "w-full flex items-center justify-center gap-2 px-4 py-2 bg-[var(--btn-primary)]
                            hover:bg-[var(--btn-primary-hover)] rounded text-white font-medium transition-colors cursor-pointer",
                    title: "Save as {file_name}",
                    onclick: move |_| {
                        download::save_artifact(&artifact, &suffix);
                    },
                    Icon { width: 16, height: 16, icon: LdDownload }
                    "Download"
                }
            }

            if !secondary.is_empty() {
                div { class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                    for (label, uri) in secondary {
                        figure { key: "{label}", class: "space-y-1",
                            img { src: "{uri}", class: "w-full rounded", alt: "{label}" }
                            figcaption { class: "text-xs text-center text-[var(--text-secondary)]", "{label}" }
                        }
                    }
                }
            }

            if let Some(ref cells) = applied {
                {render_matrix("Applied Matrix", cells)}
            }

            if !applied_filters.is_empty() {
                p { class: "text-sm text-[var(--text-secondary)]",
                    "Applied filters: "
                    span { class: "font-mono text-[var(--text)]", "{applied_filters}" }
                }
            }

            if let Some(mapping) = mapping {
                MappingChart { mapping: mapping }
            }

            for gallery in outcome.galleries() {
                {render_gallery(gallery)}
            }

            for chart in histograms {
                HistogramChart { key: "{chart.label}", title: chart.label.to_owned(), series: chart.series }
            }
        }
    }
}

fn render_gallery(gallery: Gallery<'_>) -> Element {
    let label = gallery.label;
    let images = gallery.images.to_vec();
    rsx! {
        div { class: "space-y-2",
            h4 { class: "text-sm font-semibold text-[var(--text-heading)]", "{label}" }
            div { class: "flex flex-nowrap overflow-x-auto gap-3 py-1 scrollbar-thin",
                for (i, uri) in images.into_iter().enumerate() {
                    figure { key: "{i}", class: "flex-shrink-0 space-y-1",
                        img { src: "{uri}", class: "h-32 rounded object-contain bg-[var(--preview-bg)]", alt: "{label} level {i + 1}" }
                        figcaption { class: "text-xs text-center text-[var(--text-secondary)]", "Level {i + 1}" }
                    }
                }
            }
        }
    }
}
