//! Intensity mapping plot for histogram matching.

use dioxus::prelude::*;
use imagelab_core::histogram::{MAX_INTENSITY, mapping_path};

/// Props for the [`MappingChart`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MappingChartProps {
    /// Target intensity in B for each intensity in A; `-1` where none.
    mapping: Vec<i64>,
}

/// Line plot of intensity in A (x) against intensity in B (y).
///
/// Unmapped intensities are skipped.  Nothing is drawn when no intensity
/// is mapped.
#[component]
pub fn MappingChart(props: MappingChartProps) -> Element {
    let Some(d) = mapping_path(&props.mapping) else {
        return rsx! {};
    };
    let view_box = format!("0 0 {MAX_INTENSITY} {MAX_INTENSITY}");
    let diagonal = format!("M0,{MAX_INTENSITY} L{MAX_INTENSITY},0");

    rsx! {
        figure { class: "space-y-2",
            h4 { class: "text-sm font-semibold text-[var(--text-heading)]", "Intensity Mapping" }
            p { class: "text-xs text-[var(--text-secondary)]",
                "x: intensity in Image A, y: intensity in Image B. The dashed line is the identity."
            }
            svg {
                xmlns: "http://www.w3.org/2000/svg",
                view_box: "{view_box}",
                class: "w-full max-w-md aspect-square rounded bg-[var(--preview-bg)]",
                "preserveAspectRatio": "none",

                path {
                    d: "{diagonal}",
                    fill: "none",
                    stroke: "var(--border)",
                    stroke_width: "1",
                    "stroke-dasharray": "4 4",
                }
                path {
                    d: "{d}",
                    fill: "none",
                    stroke: "var(--btn-primary)",
                    stroke_width: "2",
                    "vector-effect": "non-scaling-stroke",
                }
            }
        }
    }
}
