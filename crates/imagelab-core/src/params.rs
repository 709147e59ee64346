//! Per-operation parameter state and form submissions.
//!
//! Every operation page owns one parameter struct implementing
//! [`OperationParams`].  The struct keeps its values in range, writes
//! its text form fields into a [`Submission`], and names the suffix used
//! for downloaded results.  Image uploads are attached by the dispatcher
//! using [`Operation::image_fields`].

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::mask::{KernelSize, MaskMatrixBuilder};
use crate::operation::Operation;
use crate::pyramid::PyramidBudget;
use crate::transform::TransformParameters;

/// One text field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name.
    pub name: &'static str,
    /// Field value as sent.
    pub value: String,
}

/// Text fields for one request to one operation's endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    operation: Operation,
    fields: Vec<FormField>,
}

impl Submission {
    /// Empty submission for `operation`.
    #[must_use]
    pub const fn new(operation: Operation) -> Self {
        Self {
            operation,
            fields: Vec::new(),
        }
    }

    /// Target operation.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Append a field.  Numbers and booleans use their `Display` form
    /// (`1`, `0.5`, `true`).
    pub fn push(&mut self, name: &'static str, value: impl fmt::Display) {
        self.fields.push(FormField {
            name,
            value: value.to_string(),
        });
    }

    /// All text fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Value of the first field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Parameter state for one operation.
pub trait OperationParams {
    /// The operation these parameters configure.
    const OPERATION: Operation;

    /// Append this operation's text fields.
    fn write_fields(&self, submission: &mut Submission);

    /// Suffix appended to the source file stem when downloading the
    /// result, e.g. `_bilateral`.
    fn download_suffix(&self) -> String;

    /// Whether the current state can be submitted.
    fn is_ready(&self) -> bool {
        true
    }

    /// A complete submission for the current state.
    fn submission(&self) -> Submission {
        let mut submission = Submission::new(Self::OPERATION);
        self.write_fields(&mut submission);
        submission
    }
}

/// Clamp `value` into `range`, keeping `current` for non-finite input.
fn clamp_into(value: f64, range: &RangeInclusive<f64>, current: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        current
    }
}

/// Round an integer up to odd and clamp it into `range` (whose bounds
/// are odd).
fn odd_within(n: u32, range: &RangeInclusive<u32>) -> u32 {
    let odd = if n % 2 == 0 { n.saturating_add(1) } else { n };
    odd.clamp(*range.start(), *range.end())
}

// --- Histogram equalization ---

/// Equalization takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualizeParams;

impl OperationParams for EqualizeParams {
    const OPERATION: Operation = Operation::Equalize;

    fn write_fields(&self, _submission: &mut Submission) {}

    fn download_suffix(&self) -> String {
        "_equalized".into()
    }
}

// --- Convolution ---

/// Convolution mask plus the "add 128" offset toggle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvolutionParams {
    /// Kernel mask state.
    pub mask: MaskMatrixBuilder,
    /// Shift the result by 128 so negative responses (edge kernels)
    /// remain visible.
    pub add_128: bool,
}

impl OperationParams for ConvolutionParams {
    const OPERATION: Operation = Operation::Convolution;

    fn write_fields(&self, submission: &mut Submission) {
        self.mask.write_fields(submission);
        submission.push("add_128", self.add_128);
    }

    fn download_suffix(&self) -> String {
        "_convolution".into()
    }
}

// --- Bilateral ---

/// Bilateral filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilateralParams {
    diameter: u32,
    sigma_color: f64,
    sigma_space: f64,
}

impl BilateralParams {
    /// Legal neighborhood diameters (odd only).
    pub const DIAMETER_RANGE: RangeInclusive<u32> = 3..=15;
    /// Legal range for both sigmas.
    pub const SIGMA_RANGE: RangeInclusive<f64> = 10.0..=150.0;

    /// Neighborhood diameter in pixels.
    #[must_use]
    pub const fn diameter(&self) -> u32 {
        self.diameter
    }

    /// Range (color) sigma.
    #[must_use]
    pub const fn sigma_color(&self) -> f64 {
        self.sigma_color
    }

    /// Spatial sigma.
    #[must_use]
    pub const fn sigma_space(&self) -> f64 {
        self.sigma_space
    }

    /// Set the diameter, rounding even values up to odd.
    pub fn set_diameter(&mut self, d: u32) -> u32 {
        self.diameter = odd_within(d, &Self::DIAMETER_RANGE);
        self.diameter
    }

    /// Set the color sigma.
    pub fn set_sigma_color(&mut self, v: f64) -> f64 {
        self.sigma_color = clamp_into(v, &Self::SIGMA_RANGE, self.sigma_color);
        self.sigma_color
    }

    /// Set the spatial sigma.
    pub fn set_sigma_space(&mut self, v: f64) -> f64 {
        self.sigma_space = clamp_into(v, &Self::SIGMA_RANGE, self.sigma_space);
        self.sigma_space
    }
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            diameter: 9,
            sigma_color: 75.0,
            sigma_space: 75.0,
        }
    }
}

impl OperationParams for BilateralParams {
    const OPERATION: Operation = Operation::Bilateral;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("d", self.diameter);
        submission.push("sigma_color", self.sigma_color);
        submission.push("sigma_space", self.sigma_space);
    }

    fn download_suffix(&self) -> String {
        "_bilateral".into()
    }
}

// --- Median ---

/// Median filter parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedianParams {
    /// Window size.
    pub kernel_size: KernelSize,
}

impl OperationParams for MedianParams {
    const OPERATION: Operation = Operation::Median;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("kernel_size", self.kernel_size);
    }

    fn download_suffix(&self) -> String {
        format!("_median_{}", self.kernel_size)
    }
}

// --- Min/max filter sequence ---

/// One step of a min/max filter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinMaxKind {
    /// 3×3 minimum (erosion).
    Min,
    /// 3×3 maximum (dilation).
    Max,
}

impl MinMaxKind {
    /// Both kinds, in button order.
    pub const ALL: [Self; 2] = [Self::Min, Self::Max];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Min => "Min Filter",
            Self::Max => "Max Filter",
        }
    }
}

/// Ordered min/max filters applied one after another.
///
/// The backend uses a fixed 3×3 structuring element, so no window size
/// is sent.  An empty sequence cannot be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSequenceParams {
    steps: Vec<MinMaxKind>,
}

impl FilterSequenceParams {
    /// Steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[MinMaxKind] {
        &self.steps
    }

    /// Append a step.
    pub fn push(&mut self, kind: MinMaxKind) {
        self.steps.push(kind);
    }

    /// Remove and return the last step.
    pub fn undo(&mut self) -> Option<MinMaxKind> {
        self.steps.pop()
    }

    /// Drop every step.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// No steps queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn joined(&self, separator: &str) -> String {
        self.steps
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl OperationParams for FilterSequenceParams {
    const OPERATION: Operation = Operation::MinMaxFilter;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("filter_sequence", self.joined(","));
    }

    fn download_suffix(&self) -> String {
        if self.is_empty() {
            "_filtered".into()
        } else {
            format!("_filtered_{}", self.joined("-"))
        }
    }

    fn is_ready(&self) -> bool {
        !self.is_empty()
    }
}

// --- Noise ---

/// Kind of synthetic noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Random black and white pixels; intensity is the affected fraction.
    #[default]
    SaltPepper,
    /// Additive Gaussian noise; intensity is the standard deviation.
    Gaussian,
}

impl NoiseKind {
    /// Both kinds, in menu order.
    pub const ALL: [Self; 2] = [Self::SaltPepper, Self::Gaussian];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SaltPepper => "salt-pepper",
            Self::Gaussian => "gaussian",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SaltPepper => "Salt & Pepper",
            Self::Gaussian => "Gaussian",
        }
    }

    /// Legal intensity values.
    #[must_use]
    pub const fn intensity_range(self) -> RangeInclusive<f64> {
        match self {
            Self::SaltPepper => 0.0..=1.0,
            Self::Gaussian => 1.0..=50.0,
        }
    }

    /// Slider step.
    #[must_use]
    pub const fn intensity_step(self) -> f64 {
        match self {
            Self::SaltPepper => 0.01,
            Self::Gaussian => 1.0,
        }
    }
}

/// Noise parameters.  Each kind keeps its own intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    kind: NoiseKind,
    salt_pepper_intensity: f64,
    gaussian_intensity: f64,
}

impl NoiseParams {
    /// Active kind.
    #[must_use]
    pub const fn kind(&self) -> NoiseKind {
        self.kind
    }

    /// Switch kinds; each kind's intensity is retained.
    pub const fn select(&mut self, kind: NoiseKind) {
        self.kind = kind;
    }

    /// Intensity of the active kind.
    #[must_use]
    pub const fn intensity(&self) -> f64 {
        match self.kind {
            NoiseKind::SaltPepper => self.salt_pepper_intensity,
            NoiseKind::Gaussian => self.gaussian_intensity,
        }
    }

    /// Set the active kind's intensity, clamped into its range.
    pub fn set_intensity(&mut self, v: f64) -> f64 {
        let range = self.kind.intensity_range();
        let slot = match self.kind {
            NoiseKind::SaltPepper => &mut self.salt_pepper_intensity,
            NoiseKind::Gaussian => &mut self.gaussian_intensity,
        };
        *slot = clamp_into(v, &range, *slot);
        *slot
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            kind: NoiseKind::SaltPepper,
            salt_pepper_intensity: 0.05,
            gaussian_intensity: 10.0,
        }
    }
}

impl OperationParams for NoiseParams {
    const OPERATION: Operation = Operation::Noise;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("noise_type", self.kind.as_str());
        submission.push("intensity", self.intensity());
    }

    fn download_suffix(&self) -> String {
        "_noisy".into()
    }
}

// --- Fourier spectrum ---

/// Magnitude spectrum display options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourierParams {
    /// Shift the zero frequency to the center.
    pub center_spectrum: bool,
    /// Log-scale magnitudes.
    pub apply_log: bool,
}

impl OperationParams for FourierParams {
    const OPERATION: Operation = Operation::Fourier;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("center_spectrum", self.center_spectrum);
        submission.push("apply_log", self.apply_log);
    }

    fn download_suffix(&self) -> String {
        let mut suffix = String::from("_magnitude_spectrum");
        if self.center_spectrum {
            suffix.push_str("_centered");
        }
        if self.apply_log {
            suffix.push_str("_log");
        }
        suffix
    }
}

// --- Fourier filters ---

/// Frequency-domain filter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FourierFilterKind {
    /// Keep frequencies inside the radius.
    #[default]
    LowPass,
    /// Keep frequencies outside the radius.
    HighPass,
    /// Keep frequencies between the inner and outer radius.
    BandPass,
}

impl FourierFilterKind {
    /// All kinds, in menu order.
    pub const ALL: [Self; 3] = [Self::LowPass, Self::HighPass, Self::BandPass];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowPass => "low_pass",
            Self::HighPass => "high_pass",
            Self::BandPass => "band_pass",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowPass => "Low Pass",
            Self::HighPass => "High Pass",
            Self::BandPass => "Band Pass",
        }
    }
}

/// Fourier filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourierFilterParams {
    kind: FourierFilterKind,
    radius: f64,
    inner_radius: f64,
    outer_radius: f64,
    /// Use a smooth Gaussian edge instead of an ideal cutoff.
    pub gaussian: bool,
    /// Re-add the DC component after filtering.
    pub add_dc: bool,
}

impl FourierFilterParams {
    /// Legal radius values for all three radii.
    pub const RADIUS_RANGE: RangeInclusive<f64> = 10.0..=100.0;

    /// Active filter shape.
    #[must_use]
    pub const fn kind(&self) -> FourierFilterKind {
        self.kind
    }

    /// Change filter shape; radii are retained.
    pub const fn select(&mut self, kind: FourierFilterKind) {
        self.kind = kind;
    }

    /// Cutoff radius for low/high pass.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Inner band-pass radius.
    #[must_use]
    pub const fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Outer band-pass radius.
    #[must_use]
    pub const fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Set the low/high pass radius.
    pub fn set_radius(&mut self, v: f64) -> f64 {
        self.radius = clamp_into(v, &Self::RADIUS_RANGE, self.radius);
        self.radius
    }

    /// Set the inner radius, pushing the outer radius up if needed.
    pub fn set_inner_radius(&mut self, v: f64) -> f64 {
        self.inner_radius = clamp_into(v, &Self::RADIUS_RANGE, self.inner_radius);
        if self.outer_radius < self.inner_radius {
            self.outer_radius = self.inner_radius;
        }
        self.inner_radius
    }

    /// Set the outer radius, never below the inner radius.
    pub fn set_outer_radius(&mut self, v: f64) -> f64 {
        let range = self.inner_radius..=*Self::RADIUS_RANGE.end();
        self.outer_radius = clamp_into(v, &range, self.outer_radius);
        self.outer_radius
    }
}

impl Default for FourierFilterParams {
    fn default() -> Self {
        Self {
            kind: FourierFilterKind::LowPass,
            radius: 30.0,
            inner_radius: 20.0,
            outer_radius: 40.0,
            gaussian: false,
            add_dc: false,
        }
    }
}

impl OperationParams for FourierFilterParams {
    const OPERATION: Operation = Operation::FourierFilter;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("filter_type", self.kind.as_str());
        submission.push("gaussian", self.gaussian);
        submission.push("add_dc", self.add_dc);
        if self.kind == FourierFilterKind::BandPass {
            submission.push("inner_radius", self.inner_radius);
            submission.push("outer_radius", self.outer_radius);
        } else {
            submission.push("radius", self.radius);
        }
    }

    fn download_suffix(&self) -> String {
        format!("_{}", self.kind.as_str())
    }
}

// --- Canny ---

/// Canny edge detector parameters.
///
/// `low <= high` is maintained by cross-clamping: raising `low` above
/// `high` drags `high` up, lowering `high` below `low` drags `low` down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannyParams {
    low: f64,
    high: f64,
    sigma: f64,
}

impl CannyParams {
    /// Legal low thresholds.
    pub const LOW_RANGE: RangeInclusive<f64> = 0.0..=100.0;
    /// Legal high thresholds.
    pub const HIGH_RANGE: RangeInclusive<f64> = 0.0..=200.0;
    /// Legal smoothing sigmas.
    pub const SIGMA_RANGE: RangeInclusive<f64> = 0.1..=5.0;

    /// Low hysteresis threshold.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// High hysteresis threshold.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Gaussian smoothing sigma.
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Set the low threshold.
    pub fn set_low(&mut self, v: f64) -> f64 {
        self.low = clamp_into(v, &Self::LOW_RANGE, self.low);
        if self.high < self.low {
            self.high = self.low;
        }
        self.low
    }

    /// Set the high threshold.
    pub fn set_high(&mut self, v: f64) -> f64 {
        self.high = clamp_into(v, &Self::HIGH_RANGE, self.high);
        if self.low > self.high {
            self.low = self.high;
        }
        self.high
    }

    /// Set the smoothing sigma.
    pub fn set_sigma(&mut self, v: f64) -> f64 {
        self.sigma = clamp_into(v, &Self::SIGMA_RANGE, self.sigma);
        self.sigma
    }
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
            sigma: 1.0,
        }
    }
}

impl OperationParams for CannyParams {
    const OPERATION: Operation = Operation::Canny;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("low_threshold", self.low);
        submission.push("high_threshold", self.high);
        submission.push("sigma", self.sigma);
    }

    fn download_suffix(&self) -> String {
        "_canny".into()
    }
}

// --- Pyramids ---

/// Gaussian/Laplacian pyramid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidParams {
    levels: u32,
}

impl PyramidParams {
    /// Legal level counts.
    pub const LEVEL_RANGE: RangeInclusive<u32> = 3..=6;

    /// Number of levels.
    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.levels
    }

    /// Set the level count, clamped into [`Self::LEVEL_RANGE`].
    pub fn set_levels(&mut self, levels: u32) -> u32 {
        self.levels = levels.clamp(*Self::LEVEL_RANGE.start(), *Self::LEVEL_RANGE.end());
        self.levels
    }
}

impl Default for PyramidParams {
    fn default() -> Self {
        Self { levels: 3 }
    }
}

impl OperationParams for PyramidParams {
    const OPERATION: Operation = Operation::Pyramids;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("levels", self.levels);
    }

    fn download_suffix(&self) -> String {
        "_reconstructed".into()
    }
}

// --- Blend ---

/// How the two images are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendKind {
    /// Smooth Gaussian-weighted blend across the whole image.
    #[default]
    Full,
    /// Hard left/right split at the blend position.
    Half,
}

impl BlendKind {
    /// Both kinds, in menu order.
    pub const ALL: [Self; 2] = [Self::Full, Self::Half];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Full => "Gaussian Blend",
            Self::Half => "Left-Right Split",
        }
    }
}

/// Pyramid blending parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendParams {
    /// Level budget derived from the first image.
    pub budget: PyramidBudget,
    position: f64,
    /// Blend style.
    pub kind: BlendKind,
}

impl BlendParams {
    /// Legal blend positions (fraction of the image width).
    pub const POSITION_RANGE: RangeInclusive<f64> = 0.0..=1.0;

    /// Blend seam position.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Set the seam position.
    pub fn set_position(&mut self, v: f64) -> f64 {
        self.position = clamp_into(v, &Self::POSITION_RANGE, self.position);
        self.position
    }
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            budget: PyramidBudget::default(),
            position: 0.5,
            kind: BlendKind::Full,
        }
    }
}

impl OperationParams for BlendParams {
    const OPERATION: Operation = Operation::Blend;

    fn write_fields(&self, submission: &mut Submission) {
        submission.push("levels", self.budget.selected());
        submission.push("blend_position", self.position);
        submission.push("blend_type", self.kind.as_str());
    }

    fn download_suffix(&self) -> String {
        "_blended".into()
    }
}

// --- Histogram matching ---

/// Two-pointer histogram matching takes no parameters; image A is
/// remapped onto the intensity distribution of image B.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistogramMatchParams;

impl OperationParams for HistogramMatchParams {
    const OPERATION: Operation = Operation::HistogramMatch;

    fn write_fields(&self, _submission: &mut Submission) {}

    fn download_suffix(&self) -> String {
        "_matched".into()
    }
}

// --- All pages ---

/// Parameter state for every operation page.
///
/// Each page keeps its own values while the user moves between pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBook {
    /// Histogram equalization (no fields).
    pub equalize: EqualizeParams,
    /// Kernel grid and offset toggle.
    pub convolution: ConvolutionParams,
    /// Bilateral diameter and sigmas.
    pub bilateral: BilateralParams,
    /// Median window size.
    pub median: MedianParams,
    /// Queued min/max filters.
    pub min_max: FilterSequenceParams,
    /// Noise kind and per-kind intensity.
    pub noise: NoiseParams,
    /// Spectrum centering and log scaling.
    pub fourier: FourierParams,
    /// Frequency filter shape and radii.
    pub fourier_filter: FourierFilterParams,
    /// Canny thresholds and blur.
    pub canny: CannyParams,
    /// Geometric transform kind and values.
    pub transform: TransformParameters,
    /// Pyramid depth.
    pub pyramids: PyramidParams,
    /// Blend levels, seam, and style.
    pub blend: BlendParams,
    /// Histogram matching (no fields).
    pub histogram_match: HistogramMatchParams,
}

impl ParamBook {
    /// Submission for `operation` from its page's current state.
    #[must_use]
    pub fn submission(&self, operation: Operation) -> Submission {
        match operation {
            Operation::Equalize => self.equalize.submission(),
            Operation::Convolution => self.convolution.submission(),
            Operation::Bilateral => self.bilateral.submission(),
            Operation::Median => self.median.submission(),
            Operation::Noise => self.noise.submission(),
            Operation::Fourier => self.fourier.submission(),
            Operation::FourierFilter => self.fourier_filter.submission(),
            Operation::Canny => self.canny.submission(),
            Operation::Transform => self.transform.submission(),
            Operation::Pyramids => self.pyramids.submission(),
            Operation::Blend => self.blend.submission(),
            Operation::HistogramMatch => self.histogram_match.submission(),
            Operation::MinMaxFilter => self.min_max.submission(),
        }
    }

    /// Download suffix for `operation`'s result.
    #[must_use]
    pub fn download_suffix(&self, operation: Operation) -> String {
        match operation {
            Operation::Equalize => self.equalize.download_suffix(),
            Operation::Convolution => self.convolution.download_suffix(),
            Operation::Bilateral => self.bilateral.download_suffix(),
            Operation::Median => self.median.download_suffix(),
            Operation::Noise => self.noise.download_suffix(),
            Operation::Fourier => self.fourier.download_suffix(),
            Operation::FourierFilter => self.fourier_filter.download_suffix(),
            Operation::Canny => self.canny.download_suffix(),
            Operation::Transform => self.transform.download_suffix(),
            Operation::Pyramids => self.pyramids.download_suffix(),
            Operation::Blend => self.blend.download_suffix(),
            Operation::HistogramMatch => self.histogram_match.download_suffix(),
            Operation::MinMaxFilter => self.min_max.download_suffix(),
        }
    }

    /// Whether `operation`'s page can be submitted as it stands.
    #[must_use]
    pub fn is_ready(&self, operation: Operation) -> bool {
        match operation {
            Operation::MinMaxFilter => self.min_max.is_ready(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimensions;

    #[test]
    fn bilateral_defaults_and_fields() {
        let s = BilateralParams::default().submission();
        assert_eq!(s.operation(), Operation::Bilateral);
        assert_eq!(s.get("d"), Some("9"));
        assert_eq!(s.get("sigma_color"), Some("75"));
        assert_eq!(s.get("sigma_space"), Some("75"));
    }

    #[test]
    fn bilateral_diameter_is_odd() {
        let mut p = BilateralParams::default();
        assert_eq!(p.set_diameter(4), 5);
        assert_eq!(p.set_diameter(1), 3);
        assert_eq!(p.set_diameter(40), 15);
        assert!((p.set_sigma_color(500.0) - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn median_suffix_includes_kernel() {
        let p = MedianParams {
            kernel_size: KernelSize::new(5),
        };
        assert_eq!(p.download_suffix(), "_median_5");
        assert_eq!(p.submission().get("kernel_size"), Some("5"));
    }

    #[test]
    fn noise_intensity_is_kept_per_kind() {
        let mut p = NoiseParams::default();
        p.set_intensity(0.2);
        p.select(NoiseKind::Gaussian);
        assert!((p.intensity() - 10.0).abs() < f64::EPSILON);
        assert!((p.set_intensity(0.2) - 1.0).abs() < f64::EPSILON);
        p.select(NoiseKind::SaltPepper);
        assert!((p.intensity() - 0.2).abs() < f64::EPSILON);

        let s = p.submission();
        assert_eq!(s.get("noise_type"), Some("salt-pepper"));
        assert_eq!(s.get("intensity"), Some("0.2"));
    }

    #[test]
    fn fourier_suffix_reflects_options() {
        let mut p = FourierParams::default();
        assert_eq!(p.download_suffix(), "_magnitude_spectrum");
        p.center_spectrum = true;
        p.apply_log = true;
        assert_eq!(p.download_suffix(), "_magnitude_spectrum_centered_log");
        assert_eq!(p.submission().get("apply_log"), Some("true"));
    }

    #[test]
    fn fourier_filter_sends_radius_for_shape() {
        let mut p = FourierFilterParams::default();
        let s = p.submission();
        assert_eq!(s.get("radius"), Some("30"));
        assert_eq!(s.get("inner_radius"), None);

        p.select(FourierFilterKind::BandPass);
        let s = p.submission();
        assert_eq!(s.get("filter_type"), Some("band_pass"));
        assert_eq!(s.get("radius"), None);
        assert_eq!(s.get("inner_radius"), Some("20"));
        assert_eq!(s.get("outer_radius"), Some("40"));
        assert_eq!(p.download_suffix(), "_band_pass");
    }

    #[test]
    fn fourier_band_keeps_inner_below_outer() {
        let mut p = FourierFilterParams::default();
        p.set_inner_radius(60.0);
        assert!((p.outer_radius() - 60.0).abs() < f64::EPSILON);
        assert!((p.set_outer_radius(15.0) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn canny_thresholds_cross_clamp() {
        let mut p = CannyParams::default();
        p.set_high(30.0);
        assert!((p.low() - 30.0).abs() < f64::EPSILON);
        p.set_low(90.0);
        assert!((p.high() - 90.0).abs() < f64::EPSILON);
        assert!((p.set_sigma(0.0) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn pyramid_levels_clamp() {
        let mut p = PyramidParams::default();
        assert_eq!(p.set_levels(10), 6);
        assert_eq!(p.set_levels(0), 3);
        assert_eq!(p.submission().get("levels"), Some("3"));
    }

    #[test]
    fn blend_sends_budgeted_levels() {
        let mut p = BlendParams::default();
        p.budget.on_image_loaded(Dimensions {
            width: 64,
            height: 64,
        });
        p.set_position(0.3);
        p.kind = BlendKind::Half;
        let s = p.submission();
        assert_eq!(s.operation().image_fields(), &["image1", "image2"]);
        assert_eq!(s.get("levels"), Some("4"));
        assert_eq!(s.get("blend_position"), Some("0.3"));
        assert_eq!(s.get("blend_type"), Some("half"));
    }

    #[test]
    fn equalize_has_no_fields() {
        let s = EqualizeParams.submission();
        assert!(s.fields().is_empty());
        assert_eq!(EqualizeParams.download_suffix(), "_equalized");
    }

    #[test]
    fn convolution_includes_add_128() {
        let params = ConvolutionParams {
            add_128: true,
            ..ConvolutionParams::default()
        };
        let s = params.submission();
        assert_eq!(s.get("add_128"), Some("true"));
        assert_eq!(s.get("mask_type"), Some("identity"));
        assert_eq!(params.download_suffix(), "_convolution");
    }

    #[test]
    fn book_dispatches_to_each_page() {
        let book = ParamBook::default();
        for op in Operation::ALL {
            assert_eq!(book.submission(op).operation(), op);
            let suffix = book.download_suffix(op);
            assert!(suffix.starts_with('_'), "{op}: {suffix}");
        }
        assert_eq!(book.download_suffix(Operation::Transform), "_rotation");
        assert_eq!(book.download_suffix(Operation::FourierFilter), "_low_pass");
        assert_eq!(book.download_suffix(Operation::HistogramMatch), "_matched");
    }

    #[test]
    fn filter_sequence_joins_steps() {
        let mut p = FilterSequenceParams::default();
        p.push(MinMaxKind::Min);
        p.push(MinMaxKind::Max);
        p.push(MinMaxKind::Min);
        assert_eq!(p.submission().get("filter_sequence"), Some("min,max,min"));
        assert_eq!(p.download_suffix(), "_filtered_min-max-min");
        assert_eq!(p.submission().get("kernel_size"), None);
    }

    #[test]
    fn filter_sequence_undo_removes_last() {
        let mut p = FilterSequenceParams::default();
        assert_eq!(p.undo(), None);
        p.push(MinMaxKind::Max);
        p.push(MinMaxKind::Min);
        assert_eq!(p.undo(), Some(MinMaxKind::Min));
        assert_eq!(p.steps(), &[MinMaxKind::Max]);
        p.clear();
        assert!(p.is_empty());
        assert_eq!(p.download_suffix(), "_filtered");
    }

    #[test]
    fn empty_filter_sequence_blocks_submit() {
        let mut book = ParamBook::default();
        assert!(!book.is_ready(Operation::MinMaxFilter));
        book.min_max.push(MinMaxKind::Max);
        assert!(book.is_ready(Operation::MinMaxFilter));
        for op in Operation::ALL {
            if op != Operation::MinMaxFilter {
                assert!(book.is_ready(op), "{op}");
            }
        }
    }

    #[test]
    fn histogram_match_sends_only_images() {
        let s = HistogramMatchParams.submission();
        assert!(s.fields().is_empty());
        assert_eq!(s.operation().image_fields(), &["image_a", "image_b"]);
    }
}
