//! Typed form widgets for the parameter panels.
//!
//! Every widget is described by a [`Field`] and reports values in the
//! parameter's own type: sliders hand back `f64` or `u32`, and menus hand
//! back the [`Choice`] that was picked.  Values the browser reports that
//! do not map back to a known option are logged and dropped.

use std::ops::RangeInclusive;

use dioxus::prelude::*;
use imagelab_core::params::{BlendKind, FourierFilterKind, NoiseKind};
use imagelab_core::{KernelSize, MaskMode, PresetKind, TransformKind};

/// Element id and captions of one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Field {
    id: &'static str,
    label: &'static str,
    hint: Option<&'static str>,
}

impl Field {
    pub(super) const fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            hint: None,
        }
    }

    /// Attach a one-line explanation shown under the control.
    pub(super) const fn hint(self, hint: &'static str) -> Self {
        Self {
            hint: Some(hint),
            ..self
        }
    }
}

/// Bounds, step, and readout precision of a slider.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Span {
    range: RangeInclusive<f64>,
    step: f64,
    decimals: usize,
}

impl Span {
    pub(super) fn new(range: RangeInclusive<f64>, step: f64) -> Self {
        Self {
            range,
            step,
            decimals: 0,
        }
    }

    /// Span over whole numbers.
    pub(super) fn whole(range: RangeInclusive<u32>, step: u32) -> Self {
        Self::new(
            f64::from(*range.start())..=f64::from(*range.end()),
            f64::from(step),
        )
    }

    /// Digits shown after the decimal point in the readout.
    pub(super) fn decimals(self, decimals: usize) -> Self {
        Self { decimals, ..self }
    }

    fn readout(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.decimals)
    }
}

/// An option of a drop-down menu.
pub(super) trait Choice: Copy + PartialEq + 'static {
    /// Every option, in menu order.
    fn options() -> Vec<Self>;

    /// Value of the `<option>` element.
    fn wire(self) -> String;

    /// Text shown to the user.
    fn caption(self) -> String;

    /// The option whose [`Choice::wire`] is `value`.
    fn from_wire(value: &str) -> Option<Self> {
        Self::options().into_iter().find(|c| c.wire() == value)
    }
}

impl Choice for KernelSize {
    fn options() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    fn wire(self) -> String {
        self.to_string()
    }

    fn caption(self) -> String {
        format!("{self}×{self}")
    }
}

impl Choice for MaskMode {
    fn options() -> Vec<Self> {
        PresetKind::ALL
            .into_iter()
            .map(MaskMode::Preset)
            .chain([MaskMode::Custom])
            .collect()
    }

    fn wire(self) -> String {
        self.as_str().to_owned()
    }

    fn caption(self) -> String {
        match self {
            Self::Preset(kind) => kind.label().to_owned(),
            Self::Custom => "Custom Mask".to_owned(),
        }
    }
}

/// `Choice` for the parameter enums that carry `ALL`, `as_str`, and `label`.
macro_rules! labelled_choice {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Choice for $ty {
                fn options() -> Vec<Self> {
                    Self::ALL.to_vec()
                }

                fn wire(self) -> String {
                    self.as_str().to_owned()
                }

                fn caption(self) -> String {
                    self.label().to_owned()
                }
            }
        )+
    };
}

labelled_choice!(NoiseKind, FourierFilterKind, BlendKind, TransformKind);

/// Slider values for integer parameters arrive as floats.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u32(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

fn hint(field: Field) -> Element {
    match field.hint {
        Some(text) => rsx! {
            p { class: "text-xs text-[var(--text-secondary)]", "{text}" }
        },
        None => rsx! {},
    }
}

/// Range slider with the current value read out beside its label.
pub(super) fn slider(
    field: Field,
    value: f64,
    span: Span,
    on_input: impl Fn(f64) + 'static,
) -> Element {
    let readout = span.readout(value);
    let (min, max, step) = (*span.range.start(), *span.range.end(), span.step);
    let (id, label) = (field.id, field.label);

    rsx! {
        div { class: "flex flex-col gap-1",
            div { class: "flex items-baseline justify-between text-sm",
                label { r#for: "{id}", class: "font-medium text-[var(--text-heading)]",
                    "{label}"
                }
                span { class: "tabular-nums text-[var(--text-secondary)]", "{readout}" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                class: "w-full accent-[var(--btn-primary)]",
                oninput: move |e| match e.value().parse::<f64>() {
                    Ok(v) => on_input(v),
                    Err(err) => tracing::warn!(field = id, "slider value {:?}: {err}", e.value()),
                },
            }
            {hint(field)}
        }
    }
}

/// [`slider`] for whole-number parameters.
pub(super) fn whole_slider(
    field: Field,
    value: u32,
    span: Span,
    on_input: impl Fn(u32) + 'static,
) -> Element {
    slider(field, f64::from(value), span, move |v| on_input(to_u32(v)))
}

/// Checkbox with its label on the right.
pub(super) fn toggle(field: Field, checked: bool, on_toggle: impl Fn(bool) + 'static) -> Element {
    let (id, label) = (field.id, field.label);
    rsx! {
        div { class: "flex flex-col gap-1",
            label { r#for: "{id}", class: "inline-flex items-center gap-2 cursor-pointer text-sm",
                input {
                    r#type: "checkbox",
                    id: "{id}",
                    checked: checked,
                    class: "w-4 h-4 accent-[var(--btn-primary)]",
                    onchange: move |e| on_toggle(e.checked()),
                }
                span { class: "font-medium text-[var(--text-heading)]", "{label}" }
            }
            {hint(field)}
        }
    }
}

/// Drop-down over every option of `C`, with `selected` highlighted.
pub(super) fn choice<C: Choice>(
    field: Field,
    selected: C,
    on_pick: impl Fn(C) + 'static,
) -> Element {
    let (id, label) = (field.id, field.label);
    let selected_wire = selected.wire();
    let options: Vec<(String, String, bool)> = C::options()
        .into_iter()
        .map(|c| (c.wire(), c.caption(), c == selected))
        .collect();

    rsx! {
        div { class: "flex flex-col gap-1",
            label { r#for: "{id}", class: "text-sm font-medium text-[var(--text-heading)]",
                "{label}"
            }
            select {
                id: "{id}",
                class: "px-2 py-1 rounded border border-[var(--border)] bg-[var(--surface)]
                        text-sm text-[var(--text)]",
                value: "{selected_wire}",
                onchange: move |e| match C::from_wire(&e.value()) {
                    Some(picked) => on_pick(picked),
                    None => tracing::warn!(field = id, "unknown option {:?}", e.value()),
                },
                for (wire, caption, is_selected) in options {
                    option { key: "{wire}", value: "{wire}", selected: is_selected, "{caption}" }
                }
            }
            {hint(field)}
        }
    }
}
