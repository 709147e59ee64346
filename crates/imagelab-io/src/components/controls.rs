//! Per-operation parameter controls.
//!
//! Renders the sliders, menus, and toggles for the currently selected
//! operation.  Values are clamped by the parameter types in
//! `imagelab-core`; the controls only describe what the user changed, as
//! a [`ParamEdit`] the owner applies to its live [`ParamBook`].

use dioxus::prelude::*;
use imagelab_core::params::{
    BilateralParams, BlendKind, BlendParams, CannyParams, FourierFilterKind, FourierFilterParams,
    NoiseKind, ParamBook, PyramidParams,
};
use imagelab_core::pyramid::MIN_LEVELS;
use imagelab_core::{KernelSize, MinMaxKind, Operation};

use super::transform::TransformControls;
use super::widgets::{Field, Span, choice, slider, toggle, whole_slider};

/// One change to the parameter book.
///
/// Edits are applied to the owner's current book, not to the book the
/// controls were rendered from.
pub struct ParamEdit(Box<dyn FnOnce(&mut ParamBook)>);

impl ParamEdit {
    /// Wrap a mutation of the book.
    pub fn new(edit: impl FnOnce(&mut ParamBook) + 'static) -> Self {
        Self(Box::new(edit))
    }

    /// Run the mutation against `book`.
    pub fn apply(self, book: &mut ParamBook) {
        (self.0)(book);
    }
}

/// Send `edit` to the owner.
pub(super) fn emit(on_edit: EventHandler<ParamEdit>, edit: impl FnOnce(&mut ParamBook) + 'static) {
    on_edit.call(ParamEdit::new(edit));
}

/// Props for the [`OperationControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct OperationControlsProps {
    /// Operation whose controls are shown.
    operation: Operation,
    /// Parameter state for every page (read-only).
    book: ParamBook,
    /// Fired with each change the user makes.
    on_edit: EventHandler<ParamEdit>,
}

/// Renders parameter controls for the selected operation.
///
/// The convolution kernel itself is edited with
/// [`MaskEditor`](super::MaskEditor); only its offset toggle lives here.
#[component]
#[allow(clippy::too_many_lines)]
pub fn OperationControls(props: OperationControlsProps) -> Element {
    let book = &props.book;
    let on_edit = props.on_edit;

    match props.operation {
        Operation::Equalize => no_parameters("Equalization spreads the intensity histogram evenly."),

        Operation::HistogramMatch => no_parameters(
            "Image A is remapped so its cumulative histogram follows the reference image B.",
        ),

        Operation::Convolution => toggle(
            Field::new("add_128", "Add 128")
                .hint("Offset the result so negative responses stay visible."),
            book.convolution.add_128,
            move |v| emit(on_edit, move |b| b.convolution.add_128 = v),
        ),

        Operation::Bilateral => {
            let p = book.bilateral;
            rsx! {
                div { class: "space-y-2",
                    {whole_slider(
                        Field::new("bilateral_d", "Diameter")
                            .hint("Neighborhood size in pixels (odd)."),
                        p.diameter(),
                        Span::whole(BilateralParams::DIAMETER_RANGE, 2),
                        move |v| emit(on_edit, move |b| {
                            b.bilateral.set_diameter(v);
                        }),
                    )}
                    {slider(
                        Field::new("sigma_color", "Sigma Color")
                            .hint("How different intensities may be and still mix."),
                        p.sigma_color(),
                        Span::new(BilateralParams::SIGMA_RANGE, 1.0),
                        move |v| emit(on_edit, move |b| {
                            b.bilateral.set_sigma_color(v);
                        }),
                    )}
                    {slider(
                        Field::new("sigma_space", "Sigma Space")
                            .hint("How far apart pixels may be and still mix."),
                        p.sigma_space(),
                        Span::new(BilateralParams::SIGMA_RANGE, 1.0),
                        move |v| emit(on_edit, move |b| {
                            b.bilateral.set_sigma_space(v);
                        }),
                    )}
                }
            }
        }

        Operation::Median => choice(
            Field::new("median_kernel", "Kernel Size")
                .hint("Window over which the median is taken."),
            book.median.kernel_size,
            move |k: KernelSize| emit(on_edit, move |b| b.median.kernel_size = k),
        ),

        Operation::MinMaxFilter => render_min_max(book, on_edit),

        Operation::Noise => {
            let p = book.noise;
            let kind = p.kind();
            let (hint, decimals) = match kind {
                NoiseKind::SaltPepper => ("Fraction of pixels replaced.", 2),
                NoiseKind::Gaussian => ("Standard deviation of the added noise.", 0),
            };
            rsx! {
                div { class: "space-y-2",
                    {choice(
                        Field::new("noise_type", "Noise Type"),
                        kind,
                        move |k: NoiseKind| emit(on_edit, move |b| b.noise.select(k)),
                    )}
                    {slider(
                        Field::new("noise_intensity", "Intensity").hint(hint),
                        p.intensity(),
                        Span::new(kind.intensity_range(), kind.intensity_step()).decimals(decimals),
                        move |v| emit(on_edit, move |b| {
                            b.noise.set_intensity(v);
                        }),
                    )}
                }
            }
        }

        Operation::Fourier => {
            let p = book.fourier;
            rsx! {
                div { class: "space-y-2",
                    {toggle(
                        Field::new("center_spectrum", "Center Spectrum")
                            .hint("Move the zero frequency to the middle."),
                        p.center_spectrum,
                        move |v| emit(on_edit, move |b| b.fourier.center_spectrum = v),
                    )}
                    {toggle(
                        Field::new("apply_log", "Log Scale")
                            .hint("Compress the magnitude range for display."),
                        p.apply_log,
                        move |v| emit(on_edit, move |b| b.fourier.apply_log = v),
                    )}
                }
            }
        }

        Operation::FourierFilter => render_fourier_filter(book.fourier_filter, on_edit),

        Operation::Canny => {
            let p = book.canny;
            rsx! {
                div { class: "space-y-2",
                    {slider(
                        Field::new("canny_low", "Low Threshold")
                            .hint("Weak edges below this threshold are discarded."),
                        p.low(),
                        Span::new(CannyParams::LOW_RANGE, 1.0),
                        move |v| emit(on_edit, move |b| {
                            b.canny.set_low(v);
                        }),
                    )}
                    {slider(
                        Field::new("canny_high", "High Threshold")
                            .hint("Strong edges above this are always kept."),
                        p.high(),
                        Span::new(CannyParams::HIGH_RANGE, 1.0),
                        move |v| emit(on_edit, move |b| {
                            b.canny.set_high(v);
                        }),
                    )}
                    {slider(
                        Field::new("canny_sigma", "Sigma")
                            .hint("Gaussian smoothing before gradient estimation."),
                        p.sigma(),
                        Span::new(CannyParams::SIGMA_RANGE, 0.1).decimals(1),
                        move |v| emit(on_edit, move |b| {
                            b.canny.set_sigma(v);
                        }),
                    )}
                }
            }
        }

        Operation::Transform => rsx! {
            TransformControls { params: book.transform.clone(), on_edit: on_edit }
        },

        Operation::Pyramids => whole_slider(
            Field::new("pyramid_levels", "Levels").hint("Number of pyramid levels to build."),
            book.pyramids.levels(),
            Span::whole(PyramidParams::LEVEL_RANGE, 1),
            move |v| emit(on_edit, move |b| {
                b.pyramids.set_levels(v);
            }),
        ),

        Operation::Blend => render_blend(book.blend, on_edit),
    }
}

fn no_parameters(summary: &str) -> Element {
    rsx! {
        p { class: "text-sm text-[var(--text-secondary)] italic",
            "{summary} No adjustable parameters."
        }
    }
}

fn render_fourier_filter(p: FourierFilterParams, on_edit: EventHandler<ParamEdit>) -> Element {
    let kind = p.kind();
    let radius = Span::new(FourierFilterParams::RADIUS_RANGE, 1.0);
    let outer = Span::new(p.inner_radius()..=*FourierFilterParams::RADIUS_RANGE.end(), 1.0);

    rsx! {
        div { class: "space-y-2",
            {choice(
                Field::new("filter_type", "Filter Type"),
                kind,
                move |k: FourierFilterKind| emit(on_edit, move |b| b.fourier_filter.select(k)),
            )}
            if kind == FourierFilterKind::BandPass {
                {slider(
                    Field::new("inner_radius", "Inner Radius"),
                    p.inner_radius(),
                    radius,
                    move |v| emit(on_edit, move |b| {
                        b.fourier_filter.set_inner_radius(v);
                    }),
                )}
                {slider(
                    Field::new("outer_radius", "Outer Radius")
                        .hint("Never smaller than the inner radius."),
                    p.outer_radius(),
                    outer,
                    move |v| emit(on_edit, move |b| {
                        b.fourier_filter.set_outer_radius(v);
                    }),
                )}
            } else {
                {slider(
                    Field::new("radius", "Cutoff Radius"),
                    p.radius(),
                    radius,
                    move |v| emit(on_edit, move |b| {
                        b.fourier_filter.set_radius(v);
                    }),
                )}
            }
            {toggle(
                Field::new("gaussian", "Gaussian Edge")
                    .hint("Smooth the cutoff instead of an ideal step."),
                p.gaussian,
                move |v| emit(on_edit, move |b| b.fourier_filter.gaussian = v),
            )}
            {toggle(
                Field::new("add_dc", "Keep DC")
                    .hint("Restore the mean brightness after filtering."),
                p.add_dc,
                move |v| emit(on_edit, move |b| b.fourier_filter.add_dc = v),
            )}
        }
    }
}

fn render_blend(p: BlendParams, on_edit: EventHandler<ParamEdit>) -> Element {
    rsx! {
        div { class: "space-y-2",
            {whole_slider(
                Field::new("blend_levels", "Pyramid Levels")
                    .hint("Limited by the smaller side of the first image."),
                p.budget.selected(),
                Span::whole(MIN_LEVELS..=p.budget.max_levels(), 1),
                move |v| emit(on_edit, move |b| {
                    b.blend.budget.select(v);
                }),
            )}
            {slider(
                Field::new("blend_position", "Blend Position")
                    .hint("Where the seam sits, as a fraction of the width."),
                p.position(),
                Span::new(BlendParams::POSITION_RANGE, 0.01).decimals(2),
                move |v| emit(on_edit, move |b| {
                    b.blend.set_position(v);
                }),
            )}
            {choice(
                Field::new("blend_type", "Blend Type"),
                p.kind,
                move |k: BlendKind| emit(on_edit, move |b| b.blend.kind = k),
            )}
        }
    }
}

/// Buttons that grow and shrink the min/max sequence, and the sequence
/// itself as a row of chips.
fn render_min_max(book: &ParamBook, on_edit: EventHandler<ParamEdit>) -> Element {
    let steps = book.min_max.steps().to_vec();
    let empty = steps.is_empty();

    rsx! {
        div { class: "space-y-3",
            p { class: "text-xs text-[var(--text-secondary)]",
                "Each step is a 3×3 minimum (erode) or maximum (dilate), applied in order."
            }
            div { class: "flex flex-wrap gap-2",
                for kind in MinMaxKind::ALL {
                    button {
                        key: "{kind.as_str()}",
                        class: "px-3 py-1 rounded text-sm text-white bg-[var(--btn-primary)]
                                hover:bg-[var(--btn-primary-hover)]",
                        onclick: move |_| emit(on_edit, move |b| b.min_max.push(kind)),
                        "Add {kind.label()}"
                    }
                }
                button {
                    class: "px-3 py-1 rounded text-sm border border-[var(--border)]
                            text-[var(--text)] disabled:opacity-50 disabled:cursor-not-allowed",
                    disabled: empty,
                    onclick: move |_| emit(on_edit, |b| {
                        b.min_max.undo();
                    }),
                    "Remove Last Filter"
                }
            }
            if empty {
                p { class: "text-sm text-[var(--text-placeholder)] italic",
                    "No filters added yet."
                }
            } else {
                ol { class: "flex flex-wrap items-center gap-1 text-sm",
                    for (i, kind) in steps.into_iter().enumerate() {
                        li {
                            key: "{i}",
                            class: "px-2 py-0.5 rounded-full bg-[var(--surface-active)]
                                    text-[var(--text)] font-mono",
                            "{i + 1}. {kind.as_str()}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagelab_core::params::OperationParams;

    #[test]
    fn edit_keeps_changes_made_after_render() {
        let rendered = ParamBook::default();
        let edit = ParamEdit::new(|b| b.convolution.add_128 = true);

        let mut live = rendered.clone();
        live.convolution.mask.select_custom();
        assert!(live.convolution.mask.edit_cell(1, 1, "5").is_ok());

        edit.apply(&mut live);
        assert!(live.convolution.add_128);
        assert_eq!(
            live.convolution.mask.to_submission_matrix(),
            vec![vec![0.0, 0.0, 0.0], vec![0.0, 5.0, 0.0], vec![0.0, 0.0, 0.0]]
        );
        assert_ne!(live, rendered);
    }

    #[test]
    fn edits_compose_in_order() {
        let mut book = ParamBook::default();
        for edit in [
            ParamEdit::new(|b| b.min_max.push(MinMaxKind::Min)),
            ParamEdit::new(|b| b.min_max.push(MinMaxKind::Max)),
            ParamEdit::new(|b| {
                b.min_max.undo();
            }),
            ParamEdit::new(|b| b.min_max.push(MinMaxKind::Min)),
        ] {
            edit.apply(&mut book);
        }
        assert_eq!(book.min_max.download_suffix(), "_filtered_min-min");
    }
}
