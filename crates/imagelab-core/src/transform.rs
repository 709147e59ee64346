//! Geometric transformation parameters.
//!
//! Each [`TransformKind`] owns its own fields.  Switching the active
//! kind never touches the others, so a user can tweak a rotation, look
//! at scaling, and come back to the same angle.  Only the active kind's
//! fields are submitted.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::params::{OperationParams, Submission};

/// 3×3 homogeneous transformation matrix returned by the backend.
pub type TransformMatrix = [[f64; 3]; 3];

/// The four supported transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Rotation about the image center.
    #[default]
    Rotation,
    /// Translation in pixels.
    Translation,
    /// Axis-aligned scaling.
    Scaling,
    /// Shear along both axes.
    Shearing,
}

impl TransformKind {
    /// All kinds in menu order.
    pub const ALL: [Self; 4] = [
        Self::Rotation,
        Self::Translation,
        Self::Scaling,
        Self::Shearing,
    ];

    /// Wire name (`type` form field).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::Translation => "translation",
            Self::Scaling => "scaling",
            Self::Shearing => "shearing",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rotation => "Rotation",
            Self::Translation => "Translation",
            Self::Scaling => "Scaling",
            Self::Shearing => "Shearing",
        }
    }

    /// Fields belonging to this kind, in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [TransformField] {
        match self {
            Self::Rotation => &[TransformField::Angle],
            Self::Translation => &[TransformField::Tx, TransformField::Ty],
            Self::Scaling => &[TransformField::ScaleX, TransformField::ScaleY],
            Self::Shearing => &[TransformField::ShearX, TransformField::ShearY],
        }
    }

    /// Symbolic matrix layout, for display next to the controls.
    #[must_use]
    pub const fn matrix_format(self) -> [[&'static str; 3]; 3] {
        match self {
            Self::Rotation => [
                ["cos(θ)", "-sin(θ)", "0"],
                ["sin(θ)", "cos(θ)", "0"],
                ["0", "0", "1"],
            ],
            Self::Translation => [["1", "0", "tx"], ["0", "1", "ty"], ["0", "0", "1"]],
            Self::Scaling => [["sx", "0", "0"], ["0", "sy", "0"], ["0", "0", "1"]],
            Self::Shearing => [["1", "shx", "0"], ["shy", "1", "0"], ["0", "0", "1"]],
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown transformation: {s:?}"))
    }
}

/// A single numeric transformation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformField {
    /// Rotation angle in degrees.
    Angle,
    /// Horizontal translation in pixels.
    Tx,
    /// Vertical translation in pixels.
    Ty,
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
    /// Horizontal shear factor.
    ShearX,
    /// Vertical shear factor.
    ShearY,
}

impl TransformField {
    /// The kind this field belongs to.
    #[must_use]
    pub const fn kind(self) -> TransformKind {
        match self {
            Self::Angle => TransformKind::Rotation,
            Self::Tx | Self::Ty => TransformKind::Translation,
            Self::ScaleX | Self::ScaleY => TransformKind::Scaling,
            Self::ShearX | Self::ShearY => TransformKind::Shearing,
        }
    }

    /// Form field name.
    #[must_use]
    pub const fn form_name(self) -> &'static str {
        match self {
            Self::Angle => "angle",
            Self::Tx => "tx",
            Self::Ty => "ty",
            Self::ScaleX => "scale_x",
            Self::ScaleY => "scale_y",
            Self::ShearX => "shear_x",
            Self::ShearY => "shear_y",
        }
    }

    /// Control label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Angle => "Rotation Angle (degrees)",
            Self::Tx => "Translation X",
            Self::Ty => "Translation Y",
            Self::ScaleX => "Scale X",
            Self::ScaleY => "Scale Y",
            Self::ShearX => "Shear X",
            Self::ShearY => "Shear Y",
        }
    }

    /// Legal values.
    #[must_use]
    pub const fn range(self) -> RangeInclusive<f64> {
        match self {
            Self::Angle => -180.0..=180.0,
            Self::Tx | Self::Ty => -100.0..=100.0,
            Self::ScaleX | Self::ScaleY => 0.1..=3.0,
            Self::ShearX | Self::ShearY => -2.0..=2.0,
        }
    }

    /// Slider step.
    #[must_use]
    pub const fn step(self) -> f64 {
        match self {
            Self::Angle | Self::Tx | Self::Ty => 1.0,
            Self::ScaleX | Self::ScaleY | Self::ShearX | Self::ShearY => 0.1,
        }
    }

    /// Value before any edit.
    #[must_use]
    pub const fn default_value(self) -> f64 {
        match self {
            Self::ScaleX | Self::ScaleY => 1.0,
            _ => 0.0,
        }
    }
}

/// Parameter state for all four kinds plus which one is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformParameters {
    active: TransformKind,
    angle: f64,
    tx: f64,
    ty: f64,
    scale_x: f64,
    scale_y: f64,
    shear_x: f64,
    shear_y: f64,
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self {
            active: TransformKind::default(),
            angle: TransformField::Angle.default_value(),
            tx: TransformField::Tx.default_value(),
            ty: TransformField::Ty.default_value(),
            scale_x: TransformField::ScaleX.default_value(),
            scale_y: TransformField::ScaleY.default_value(),
            shear_x: TransformField::ShearX.default_value(),
            shear_y: TransformField::ShearY.default_value(),
        }
    }
}

impl TransformParameters {
    /// The kind that will be submitted.
    #[must_use]
    pub const fn active(&self) -> TransformKind {
        self.active
    }

    /// Make `kind` active.  Values of every kind are retained.
    pub const fn select(&mut self, kind: TransformKind) {
        self.active = kind;
    }

    /// Current value of `field`, whether or not its kind is active.
    #[must_use]
    pub const fn get(&self, field: TransformField) -> f64 {
        match field {
            TransformField::Angle => self.angle,
            TransformField::Tx => self.tx,
            TransformField::Ty => self.ty,
            TransformField::ScaleX => self.scale_x,
            TransformField::ScaleY => self.scale_y,
            TransformField::ShearX => self.shear_x,
            TransformField::ShearY => self.shear_y,
        }
    }

    /// Set `field`, clamped into its range.  Non-finite input is ignored.
    /// Returns the stored value.
    pub fn set(&mut self, field: TransformField, value: f64) -> f64 {
        let slot = match field {
            TransformField::Angle => &mut self.angle,
            TransformField::Tx => &mut self.tx,
            TransformField::Ty => &mut self.ty,
            TransformField::ScaleX => &mut self.scale_x,
            TransformField::ScaleY => &mut self.scale_y,
            TransformField::ShearX => &mut self.shear_x,
            TransformField::ShearY => &mut self.shear_y,
        };
        if value.is_finite() {
            let range = field.range();
            *slot = value.clamp(*range.start(), *range.end());
        }
        *slot
    }

    /// Field/value pairs for `kind` only.
    #[must_use]
    pub fn build_submission(&self, kind: TransformKind) -> Vec<(TransformField, f64)> {
        kind.fields()
            .iter()
            .map(|&field| (field, self.get(field)))
            .collect()
    }
}

impl OperationParams for TransformParameters {
    const OPERATION: Operation = Operation::Transform;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("type", self.active);
        for (field, value) in self.build_submission(self.active) {
            submission.push(field.form_name(), value);
        }
    }

    fn download_suffix(&self) -> String {
        format!("_{}", self.active)
    }
}
