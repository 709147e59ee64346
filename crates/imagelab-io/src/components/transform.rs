//! Geometric transformation controls and matrix display.

use dioxus::prelude::*;
use imagelab_core::{TransformField, TransformKind, TransformParameters};

use super::controls::{ParamEdit, emit};
use super::widgets::{Field, Span, choice, slider};

/// Props for the [`TransformControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TransformControlsProps {
    /// Current parameters (read-only).
    params: TransformParameters,
    /// Fired when the kind or a value changes.
    on_edit: EventHandler<ParamEdit>,
}

/// Kind selector, sliders for the active kind, and the symbolic matrix
/// of the active kind.
#[component]
pub fn TransformControls(props: TransformControlsProps) -> Element {
    let params = &props.params;
    let on_edit = props.on_edit;
    let active = params.active();
    let format = active.matrix_format();

    rsx! {
        div { class: "space-y-3",
            {choice(
                Field::new("transform_type", "Transformation"),
                active,
                move |kind: TransformKind| emit(on_edit, move |b| b.transform.select(kind)),
            )}

            for &field in active.fields() {
                {render_field(params, field, on_edit)}
            }

            {render_matrix("Matrix Format", &format.map(|row| row.map(str::to_owned)))}
        }
    }
}

fn render_field(
    params: &TransformParameters,
    field: TransformField,
    on_edit: EventHandler<ParamEdit>,
) -> Element {
    let step = field.step();
    slider(
        Field::new(field.form_name(), field.label()),
        params.get(field),
        Span::new(field.range(), step).decimals(usize::from(step < 1.0)),
        move |v| emit(on_edit, move |b| {
            b.transform.set(field, v);
        }),
    )
}

/// Render a 3×3 matrix as a small table.
pub(super) fn render_matrix(title: &str, cells: &[[String; 3]; 3]) -> Element {
    let title = title.to_string();
    let cells = cells.clone();
    rsx! {
        div { class: "space-y-1",
            h4 { class: "text-sm font-medium text-[var(--text-heading)]", "{title}" }
            table { class: "font-mono text-sm text-[var(--text)]",
                tbody {
                    for row in cells.iter() {
                        tr {
                            for cell in row.iter() {
                                td { class: "px-3 py-1 text-right border border-[var(--border)]",
                                    "{cell}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
