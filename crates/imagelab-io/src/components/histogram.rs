//! Histogram bar charts.
//!
//! Bars are plain `div`s sized as a percentage of the tallest bin, which
//! keeps the chart responsive without a canvas.  Series with nothing to
//! draw are left out, and a pair with nothing to draw renders nothing.

use dioxus::prelude::*;
use imagelab_core::{HistogramPair, Panel};

/// Props for the [`HistogramChart`] component.
#[derive(Props, Clone, PartialEq)]
pub struct HistogramChartProps {
    /// Chart title, e.g. "Original".
    title: String,
    /// Bins and running sum from the backend.
    series: HistogramPair,
}

/// Histogram and cumulative histogram side by side.
#[component]
pub fn HistogramChart(props: HistogramChartProps) -> Element {
    if props.series.is_blank() {
        return rsx! {};
    }
    let panels = props.series.panels();

    rsx! {
        div { class: "space-y-2",
            h4 { class: "text-sm font-semibold text-[var(--text-heading)]", "{props.title}" }
            div { class: "grid grid-cols-1 md:grid-cols-2 gap-3",
                for panel in panels {
                    {render_bars(panel)}
                }
            }
        }
    }
}

fn render_bars(panel: Panel) -> Element {
    let Panel { caption, bars } = panel;
    rsx! {
        figure { key: "{caption}", class: "space-y-1",
            div { class: "h-32 flex items-end gap-px rounded bg-[var(--surface)] p-1",
                for bar in bars {
                    div {
                        key: "{bar.intensity}",
                        class: "flex-1 bg-[var(--btn-primary)] hover:bg-[var(--btn-primary-hover)]",
                        style: "height: {bar.height_percent}%",
                        title: "{bar.tooltip()}",
                    }
                }
            }
            figcaption { class: "text-xs text-center text-[var(--text-secondary)]", "{caption}" }
        }
    }
}
