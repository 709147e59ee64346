//! Convolution kernel mask construction.
//!
//! [`MaskMatrixBuilder`] owns the N×N coefficient grid shown in the mask
//! editor.  The grid is either a server-supplied *preset* (read-only) or a
//! *custom* mask edited cell by cell.  Preset lookup goes through an
//! external provider, so selection is split into two halves:
//! [`MaskMatrixBuilder::select_preset`] returns a [`PresetRequest`] and
//! [`MaskMatrixBuilder::apply_preset`] resolves it once the provider
//! answers.  A failed, malformed, or superseded answer leaves the grid
//! untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coefficient::Coefficient;
use crate::params::Submission;

/// Errors raised by mask editing and submission building.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// Cells can only be edited in custom mode.
    #[error("mask is a read-only preset; switch to custom to edit cells")]
    ReadOnlyPreset,

    /// The addressed cell lies outside the current grid.
    #[error("cell ({row}, {col}) is outside a {size}x{size} mask")]
    CellOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Current kernel size.
        size: usize,
    },

    /// A grid did not have the expected N×N shape.
    #[error("expected a {expected}x{expected} mask, got {rows} rows")]
    ShapeMismatch {
        /// Kernel size the grid should have.
        expected: usize,
        /// Row count of the offending grid (a ragged row also reports here).
        rows: usize,
    },

    /// A preset name was not one of the known kinds.
    #[error("unknown mask preset: {0:?}")]
    UnknownPreset(String),
}

/// Odd kernel edge length in the supported range `3..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct KernelSize(usize);

impl KernelSize {
    /// Smallest supported kernel.
    pub const MIN: Self = Self(3);
    /// Largest supported kernel.
    pub const MAX: Self = Self(9);
    /// Every supported size, ascending.
    pub const ALL: [Self; 4] = [Self(3), Self(5), Self(7), Self(9)];

    /// Normalize a requested size: even values round up to the next odd
    /// value, then the result is clamped into `3..=9`.
    #[must_use]
    pub const fn new(n: usize) -> Self {
        let odd = if n % 2 == 0 { n + 1 } else { n };
        if odd < Self::MIN.0 {
            Self::MIN
        } else if odd > Self::MAX.0 {
            Self::MAX
        } else {
            Self(odd)
        }
    }

    /// Edge length in cells.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for KernelSize {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<usize> for KernelSize {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        let size = Self::new(n);
        if size.0 == n {
            Ok(size)
        } else {
            Err(format!("unsupported kernel size {n}"))
        }
    }
}

impl From<KernelSize> for usize {
    fn from(size: KernelSize) -> Self {
        size.0
    }
}

impl fmt::Display for KernelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named kernels the backend can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    /// Single 1 at the center.
    #[default]
    Identity,
    /// Single 1 in the top-right corner.
    Shift,
    /// Normalized Gaussian blur.
    Gaussian,
    /// 3×3 Laplacian sharpen, zero-padded.
    Sharpen,
}

impl PresetKind {
    /// All presets in menu order.
    pub const ALL: [Self; 4] = [Self::Identity, Self::Shift, Self::Gaussian, Self::Sharpen];

    /// Wire name used in the `type` / `mask_type` form fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Shift => "shift",
            Self::Gaussian => "gaussian",
            Self::Sharpen => "sharpen",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "Identity Mask",
            Self::Shift => "Shift Mask",
            Self::Gaussian => "Gaussian Mask",
            Self::Sharpen => "Sharpen Mask",
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetKind {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MaskError::UnknownPreset(s.to_owned()))
    }
}

/// Whether the grid mirrors a preset or is user-edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskMode {
    /// Read-only grid supplied for the given preset.
    Preset(PresetKind),
    /// Editable grid.
    Custom,
}

impl MaskMode {
    /// Value of the `mask_type` form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preset(kind) => kind.as_str(),
            Self::Custom => "custom",
        }
    }

    /// `true` for [`MaskMode::Custom`].
    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

/// One grid cell: the text as typed plus its classification.
///
/// The text is kept verbatim so the editor shows exactly what the user
/// typed (`1/16` stays `1/16`, not `0.0625`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskCell {
    text: String,
    coefficient: Coefficient,
}

impl MaskCell {
    /// Cell holding user-entered text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            coefficient: Coefficient::parse(text),
        }
    }

    /// Cell holding a numeric value (preset grids).
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        let coefficient = Coefficient::from(value);
        Self {
            text: coefficient.to_string(),
            coefficient,
        }
    }

    /// The text shown in the editor.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed coefficient.
    #[must_use]
    pub const fn coefficient(&self) -> Coefficient {
        self.coefficient
    }

    /// Reduced numeric value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.coefficient.value()
    }
}

impl Default for MaskCell {
    fn default() -> Self {
        Self::from_value(0.0)
    }
}

/// Square grid of [`MaskCell`]s stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelMask {
    size: KernelSize,
    cells: Vec<MaskCell>,
}

impl KernelMask {
    /// All-zero mask of the given size.
    #[must_use]
    pub fn zeros(size: KernelSize) -> Self {
        let n = size.get();
        Self {
            size,
            cells: vec![MaskCell::default(); n * n],
        }
    }

    /// Build a mask from numeric rows.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::ShapeMismatch`] unless `rows` is exactly
    /// `size × size`.
    pub fn from_rows(size: KernelSize, rows: &[Vec<f64>]) -> Result<Self, MaskError> {
        let n = size.get();
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            return Err(MaskError::ShapeMismatch {
                expected: n,
                rows: rows.len(),
            });
        }
        let cells = rows
            .iter()
            .flatten()
            .map(|&v| MaskCell::from_value(v))
            .collect();
        Ok(Self { size, cells })
    }

    /// Kernel size.
    #[must_use]
    pub const fn size(&self) -> KernelSize {
        self.size
    }

    /// Cell at `(row, col)`, if in range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&MaskCell> {
        let n = self.size.get();
        if row < n && col < n {
            self.cells.get(row * n + col)
        } else {
            None
        }
    }

    fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut MaskCell, MaskError> {
        let n = self.size.get();
        if row < n && col < n {
            if let Some(cell) = self.cells.get_mut(row * n + col) {
                return Ok(cell);
            }
        }
        Err(MaskError::CellOutOfRange { row, col, size: n })
    }

    /// Iterate rows as cell slices.
    pub fn rows(&self) -> impl Iterator<Item = &[MaskCell]> {
        self.cells.chunks(self.size.get())
    }

    /// Reduced numeric matrix.
    #[must_use]
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.rows()
            .map(|row| row.iter().map(MaskCell::value).collect())
            .collect()
    }
}

/// Source of preset grids.
///
/// The browser client answers asynchronously over HTTP and drives the
/// builder through [`MaskMatrixBuilder::select_preset`] /
/// [`MaskMatrixBuilder::apply_preset`].  Synchronous providers (the
/// built-in table in [`crate::presets`], test doubles) can use
/// [`MaskMatrixBuilder::select_preset_with`] directly.
pub trait MaskProvider {
    /// Why a lookup failed.
    type Error: fmt::Display;

    /// Fetch the `size × size` grid for `kind`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the grid is unavailable.
    fn fetch(&self, kind: PresetKind, size: KernelSize) -> Result<Vec<Vec<f64>>, Self::Error>;
}

/// An outstanding preset lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetRequest {
    /// Preset being fetched.
    pub kind: PresetKind,
    /// Kernel size at the time of the request.
    pub size: KernelSize,
    token: u64,
}

/// Editable kernel mask state for the convolution page.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskMatrixBuilder {
    mode: MaskMode,
    mask: KernelMask,
    next_token: u64,
    pending: Option<u64>,
}

impl Default for MaskMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskMatrixBuilder {
    /// Fresh builder: identity preset mode, 3×3, all zeros until the
    /// identity grid is fetched.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: MaskMode::Preset(PresetKind::Identity),
            mask: KernelMask::zeros(KernelSize::MIN),
            next_token: 0,
            pending: None,
        }
    }

    /// Return to the initial state for a newly selected image and request
    /// the identity preset.
    pub fn reset(&mut self) -> PresetRequest {
        self.mask = KernelMask::zeros(KernelSize::MIN);
        self.select_preset(PresetKind::Identity)
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Current kernel size.
    #[must_use]
    pub const fn size(&self) -> KernelSize {
        self.mask.size()
    }

    /// The grid as currently displayed.
    #[must_use]
    pub const fn mask(&self) -> &KernelMask {
        &self.mask
    }

    /// Change the kernel size.
    ///
    /// Even sizes round up to the next odd size; the grid is replaced by
    /// an all-zero grid of the new size.  Any outstanding preset lookup is
    /// abandoned because its answer would have the old shape.
    pub fn set_kernel_size(&mut self, n: usize) -> KernelSize {
        let size = KernelSize::new(n);
        self.mask = KernelMask::zeros(size);
        self.pending = None;
        size
    }

    /// Switch to a preset and describe the lookup the caller must perform.
    ///
    /// The grid is left as is until [`apply_preset`](Self::apply_preset)
    /// receives a successful answer for this request.
    pub fn select_preset(&mut self, kind: PresetKind) -> PresetRequest {
        self.mode = MaskMode::Preset(kind);
        self.next_token += 1;
        self.pending = Some(self.next_token);
        PresetRequest {
            kind,
            size: self.size(),
            token: self.next_token,
        }
    }

    /// Resolve a preset lookup.
    ///
    /// Replaces the grid verbatim and returns `true` only when `outcome`
    /// is a correctly shaped grid for the most recent outstanding request.
    /// Failures are logged and leave the grid untouched.
    pub fn apply_preset<E: fmt::Display>(
        &mut self,
        request: &PresetRequest,
        outcome: Result<Vec<Vec<f64>>, E>,
    ) -> bool {
        if self.pending != Some(request.token) {
            tracing::debug!(kind = %request.kind, "discarding superseded preset response");
            return false;
        }
        self.pending = None;

        let rows = match outcome {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(kind = %request.kind, size = %request.size, "preset fetch failed: {e}");
                return false;
            }
        };

        match KernelMask::from_rows(request.size, &rows) {
            Ok(mask) => {
                self.mask = mask;
                true
            }
            Err(e) => {
                tracing::warn!(kind = %request.kind, "preset rejected: {e}");
                false
            }
        }
    }

    /// Select a preset and resolve it immediately from `provider`.
    pub fn select_preset_with<P: MaskProvider>(&mut self, kind: PresetKind, provider: &P) -> bool {
        let request = self.select_preset(kind);
        let outcome = provider.fetch(request.kind, request.size);
        self.apply_preset(&request, outcome)
    }

    /// Switch to custom mode.  The grid already displayed becomes the
    /// editable baseline.
    pub fn select_custom(&mut self) {
        self.mode = MaskMode::Custom;
        self.pending = None;
    }

    /// Store user text for one cell.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::ReadOnlyPreset`] outside custom mode and
    /// [`MaskError::CellOutOfRange`] for indices beyond the grid.
    pub fn edit_cell(&mut self, row: usize, col: usize, text: &str) -> Result<(), MaskError> {
        if !self.mode.is_custom() {
            return Err(MaskError::ReadOnlyPreset);
        }
        *self.mask.get_mut(row, col)? = MaskCell::from_text(text);
        Ok(())
    }

    /// The fully reduced matrix sent to the backend.
    #[must_use]
    pub fn to_submission_matrix(&self) -> Vec<Vec<f64>> {
        self.mask.values()
    }

    /// Append the mask fields of a convolution submission.
    ///
    /// `custom_mask` is only attached in custom mode; presets are
    /// regenerated server-side from `mask_type` and `kernel_size`.
    pub fn write_fields(&self, submission: &mut Submission) {
        submission.push("kernel_size", self.size());
        submission.push("mask_type", self.mode.as_str());
        if self.mode.is_custom() {
            let matrix = serde_json::Value::from(self.to_submission_matrix());
            submission.push("custom_mask", matrix);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::params::{ConvolutionParams, OperationParams};

    struct Failing;

    impl MaskProvider for Failing {
        type Error = &'static str;

        fn fetch(&self, _: PresetKind, _: KernelSize) -> Result<Vec<Vec<f64>>, Self::Error> {
            Err("connection refused")
        }
    }

    fn ones(n: usize) -> Vec<Vec<f64>> {
        vec![vec![1.0; n]; n]
    }

    #[test]
    fn even_sizes_round_up() {
        for n in [2, 4, 6, 8] {
            assert_eq!(KernelSize::new(n).get(), n + 1);
        }
    }

    #[test]
    fn odd_sizes_in_range_unchanged() {
        for n in [3, 5, 7, 9] {
            assert_eq!(KernelSize::new(n).get(), n);
        }
    }

    #[test]
    fn out_of_range_sizes_clamp() {
        assert_eq!(KernelSize::new(0), KernelSize::MIN);
        assert_eq!(KernelSize::new(1), KernelSize::MIN);
        assert_eq!(KernelSize::new(10), KernelSize::MAX);
        assert_eq!(KernelSize::new(101), KernelSize::MAX);
    }

    #[test]
    fn kernel_size_change_reallocates_zero_grid() {
        let mut builder = MaskMatrixBuilder::new();
        builder.select_custom();
        builder.edit_cell(1, 1, "4").unwrap();

        let size = builder.set_kernel_size(4);
        assert_eq!(size.get(), 5);
        let values = builder.to_submission_matrix();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|row| row.len() == 5));
        assert!(values.iter().flatten().all(|v| v.abs() < f64::EPSILON));
    }

    #[test]
    fn edit_in_preset_mode_is_rejected() {
        let mut builder = MaskMatrixBuilder::new();
        let err = builder.edit_cell(0, 0, "7").unwrap_err();
        assert!(matches!(err, MaskError::ReadOnlyPreset));
        assert!(builder.mask().get(0, 0).unwrap().value().abs() < f64::EPSILON);
    }

    #[test]
    fn edit_out_of_range_is_rejected() {
        let mut builder = MaskMatrixBuilder::new();
        builder.select_custom();
        let err = builder.edit_cell(3, 0, "1").unwrap_err();
        assert!(matches!(err, MaskError::CellOutOfRange { row: 3, .. }));
    }

    #[test]
    fn edit_keeps_text_verbatim() {
        let mut builder = MaskMatrixBuilder::new();
        builder.select_custom();
        builder.edit_cell(0, 2, "1/16").unwrap();
        let cell = builder.mask().get(0, 2).unwrap();
        assert_eq!(cell.text(), "1/16");
        assert!((cell.value() - 0.0625).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_fetch_leaves_grid_unchanged() {
        let mut builder = MaskMatrixBuilder::new();
        let request = builder.select_preset(PresetKind::Identity);
        assert!(builder.apply_preset(&request, Ok::<_, String>(ones(3))));
        let before = builder.mask().clone();

        assert!(!builder.select_preset_with(PresetKind::Gaussian, &Failing));
        assert_eq!(builder.mask(), &before);
        assert_eq!(builder.mode(), MaskMode::Preset(PresetKind::Gaussian));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let mut builder = MaskMatrixBuilder::new();
        let request = builder.select_preset(PresetKind::Sharpen);
        assert!(!builder.apply_preset(&request, Ok::<_, String>(ones(5))));
        assert_eq!(builder.mask(), &KernelMask::zeros(KernelSize::MIN));
    }

    #[test]
    fn superseded_response_is_ignored() {
        let mut builder = MaskMatrixBuilder::new();
        let first = builder.select_preset(PresetKind::Gaussian);
        let second = builder.select_preset(PresetKind::Shift);

        assert!(!builder.apply_preset(&first, Ok::<_, String>(ones(3))));
        let mut shift = vec![vec![0.0; 3]; 3];
        shift[0][2] = 1.0;
        assert!(builder.apply_preset(&second, Ok::<_, String>(shift.clone())));
        assert_eq!(builder.to_submission_matrix(), shift);
    }

    #[test]
    fn response_after_size_change_is_ignored() {
        let mut builder = MaskMatrixBuilder::new();
        let request = builder.select_preset(PresetKind::Gaussian);
        builder.set_kernel_size(5);
        assert!(!builder.apply_preset(&request, Ok::<_, String>(ones(3))));
        assert_eq!(builder.size().get(), 5);
    }

    #[test]
    fn response_after_switching_to_custom_is_ignored() {
        let mut builder = MaskMatrixBuilder::new();
        let request = builder.select_preset(PresetKind::Gaussian);
        builder.select_custom();
        assert!(!builder.apply_preset(&request, Ok::<_, String>(ones(3))));
        assert!(builder.mode().is_custom());
    }

    #[test]
    fn custom_starts_from_preset_grid() {
        let mut builder = MaskMatrixBuilder::new();
        let request = builder.select_preset(PresetKind::Identity);
        let mut identity = vec![vec![0.0; 3]; 3];
        identity[1][1] = 1.0;
        builder.apply_preset(&request, Ok::<_, String>(identity.clone()));

        builder.select_custom();
        assert_eq!(builder.to_submission_matrix(), identity);
        builder.edit_cell(0, 0, "2").unwrap();
        assert!((builder.to_submission_matrix()[0][0] - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn submission_matrix_reduces_every_cell() {
        let mut builder = MaskMatrixBuilder::new();
        builder.select_custom();
        builder.edit_cell(0, 0, "1/4").unwrap();
        builder.edit_cell(0, 1, "abc").unwrap();
        builder.edit_cell(0, 2, "1/0").unwrap();
        builder.edit_cell(1, 0, "").unwrap();
        builder.edit_cell(1, 1, "-2.5").unwrap();

        let m = builder.to_submission_matrix();
        assert!((m[0][0] - 0.25).abs() < f64::EPSILON);
        assert!(m[0][1].abs() < f64::EPSILON);
        assert!(m[0][2].abs() < f64::EPSILON);
        assert!(m[1][0].abs() < f64::EPSILON);
        assert!((m[1][1] + 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn preset_submission_omits_custom_mask() {
        let params = ConvolutionParams::default();
        let submission = params.submission();
        assert_eq!(submission.get("mask_type"), Some("identity"));
        assert_eq!(submission.get("kernel_size"), Some("3"));
        assert_eq!(submission.get("add_128"), Some("false"));
        assert_eq!(submission.get("custom_mask"), None);
    }

    #[test]
    fn custom_submission_encodes_matrix() {
        let mut params = ConvolutionParams {
            add_128: true,
            ..ConvolutionParams::default()
        };
        params.mask.select_custom();
        params.mask.edit_cell(1, 1, "1/2").unwrap();
        let submission = params.submission();
        assert_eq!(submission.get("mask_type"), Some("custom"));
        assert_eq!(submission.get("add_128"), Some("true"));
        assert_eq!(
            submission.get("custom_mask"),
            Some("[[0.0,0.0,0.0],[0.0,0.5,0.0],[0.0,0.0,0.0]]")
        );
    }

    #[test]
    fn preset_kind_from_str() {
        assert_eq!("sharpen".parse::<PresetKind>().unwrap(), PresetKind::Sharpen);
        assert!("emboss".parse::<PresetKind>().is_err());
    }

    #[test]
    fn kernel_size_serde_rejects_even() {
        assert!(serde_json::from_str::<KernelSize>("4").is_err());
        assert_eq!(serde_json::from_str::<KernelSize>("7").unwrap().get(), 7);
    }
}
