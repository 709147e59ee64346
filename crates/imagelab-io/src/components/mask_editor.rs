//! Convolution kernel editor.
//!
//! Shows the current N×N grid with a kernel size picker and a mask type
//! picker.  Preset grids are read-only; choosing "Custom" unlocks the
//! cells.  Lookups and edits are reported to the parent, which owns the
//! [`MaskMatrixBuilder`] and the backend connection.

use dioxus::prelude::*;
use imagelab_core::{KernelSize, MaskMatrixBuilder, MaskMode};

use super::widgets::{Field, choice};

/// Props for the [`MaskEditor`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MaskEditorProps {
    /// Current mask state (read-only).
    mask: MaskMatrixBuilder,
    /// Fired with the requested kernel size.
    on_kernel_size: EventHandler<usize>,
    /// Fired when the user picks a preset or custom mode.
    on_mode: EventHandler<MaskMode>,
    /// Fired with `(row, col, text)` when a custom cell is edited.
    on_cell: EventHandler<(usize, usize, String)>,
}

/// Kernel size and mask type pickers above an editable coefficient grid.
#[component]
pub fn MaskEditor(props: MaskEditorProps) -> Element {
    let on_kernel_size = props.on_kernel_size;
    let on_mode = props.on_mode;
    let on_cell = props.on_cell;
    let mode = props.mask.mode();
    let read_only = !mode.is_custom();
    let size = props.mask.size();

    let rows: Vec<Vec<String>> = props
        .mask
        .mask()
        .rows()
        .map(|row| row.iter().map(|cell| cell.text().to_owned()).collect())
        .collect();

    rsx! {
        div { class: "space-y-3",
            div { class: "grid grid-cols-2 gap-3",
                {choice(
                    Field::new("kernel_size", "Kernel Size"),
                    size,
                    move |k: KernelSize| on_kernel_size.call(k.get()),
                )}
                {choice(
                    Field::new("mask_type", "Mask Type"),
                    mode,
                    move |m: MaskMode| on_mode.call(m),
                )}
            }

            if read_only {
                p { class: "text-xs text-[var(--text-secondary)]",
                    "Preset masks are read-only. Choose Custom Mask to edit coefficients."
                }
            } else {
                p { class: "text-xs text-[var(--text-secondary)]",
                    "Enter integers, decimals, or fractions such as 1/16. Anything else counts as 0."
                }
            }

            table { class: "mx-auto border-collapse",
                tbody {
                    for (i, row) in rows.into_iter().enumerate() {
                        tr { key: "{i}",
                            for (j, text) in row.into_iter().enumerate() {
                                td { key: "{j}", class: "p-0.5",
                                    input {
                                        r#type: "text",
                                        value: "{text}",
                                        readonly: read_only,
                                        aria_label: "Coefficient row {i + 1} column {j + 1}",
                                        class: "w-14 px-1 py-1 text-center font-mono text-sm rounded
                                                border border-[var(--border)] bg-[var(--surface)]
                                                text-[var(--text)]",
                                        oninput: move |e| on_cell.call((i, j, e.value())),
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
