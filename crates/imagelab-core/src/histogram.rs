//! Histogram display scaling.
//!
//! Bin counts always come from the backend; this module only turns them
//! into bar heights.  A series that is empty or entirely zero has nothing
//! to draw, which callers must distinguish from a series of short bars.
//!
//! Histogram matching also returns an intensity mapping, which is drawn
//! as an SVG path in a square view box.

use serde::{Deserialize, Serialize};

/// Number of intensity bins in every histogram the backend returns.
pub const BIN_COUNT: usize = 256;

/// Largest 8-bit intensity.
pub const MAX_INTENSITY: i64 = 255;

/// A raw series and its running sum, as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramPair {
    /// Per-intensity pixel counts.
    pub histogram: Vec<f64>,
    /// Running sum of `histogram`.
    pub cumulative: Vec<f64>,
}

impl HistogramPair {
    /// `true` if neither series has anything to draw.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        compute_bar_heights(&self.histogram).is_none()
            && compute_bar_heights(&self.cumulative).is_none()
    }

    /// The series that have something to draw, histogram first.
    ///
    /// Empty for a blank pair; a chart with no panels is not drawn at all.
    #[must_use]
    pub fn panels(&self) -> Vec<Panel> {
        [
            ("Histogram", self.histogram.as_slice()),
            ("Cumulative", self.cumulative.as_slice()),
        ]
        .into_iter()
        .filter_map(|(caption, series)| bars(series).map(|bars| Panel { caption, bars }))
        .collect()
    }
}

/// One drawable series of a [`HistogramPair`].
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// "Histogram" or "Cumulative".
    pub caption: &'static str,
    /// Scaled bars, one per bin.
    pub bars: Vec<Bar>,
}

/// One rendered bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Intensity value (bin index).
    pub intensity: usize,
    /// Height as a percentage of the tallest bar, `0.0..=100.0`.
    pub height_percent: f64,
    /// Raw bin value.
    pub value: f64,
}

impl Bar {
    /// Count shown in the tooltip, rounded to the nearest integer.
    #[must_use]
    pub fn rounded_count(self) -> f64 {
        self.value.round()
    }

    /// Hover text: intensity label and rounded count.
    #[must_use]
    pub fn tooltip(self) -> String {
        format!(
            "Intensity: {}\nCount: {}",
            self.intensity,
            self.rounded_count()
        )
    }
}

/// Scale each value as a percentage of the series maximum.
///
/// Returns `None` when there is nothing to draw: the series is empty or
/// its maximum is not positive (all zeros), which would otherwise divide
/// by zero.
#[must_use]
pub fn compute_bar_heights(series: &[f64]) -> Option<Vec<f64>> {
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if series.is_empty() || max.is_nan() || max <= 0.0 {
        return None;
    }
    Some(
        series
            .iter()
            .map(|&v| (v / max * 100.0).clamp(0.0, 100.0))
            .collect(),
    )
}

/// [`compute_bar_heights`] paired with intensity labels and raw values.
#[must_use]
pub fn bars(series: &[f64]) -> Option<Vec<Bar>> {
    let heights = compute_bar_heights(series)?;
    Some(
        heights
            .into_iter()
            .zip(series)
            .enumerate()
            .map(|(intensity, (height_percent, &value))| Bar {
                intensity,
                height_percent,
                value,
            })
            .collect(),
    )
}

/// `(a, b)` pairs of an intensity mapping, skipping unmapped entries.
#[must_use]
pub fn mapping_points(mapping: &[i64]) -> Vec<(usize, i64)> {
    mapping
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, b)| (0..=MAX_INTENSITY).contains(&b))
        .collect()
}

/// SVG path data for an intensity mapping in a 255×255 view box.
///
/// The y axis is flipped so intensity 0 sits at the bottom.  `None` when
/// no intensity is mapped.
#[must_use]
pub fn mapping_path(mapping: &[i64]) -> Option<String> {
    let points = mapping_points(mapping);
    if points.is_empty() {
        return None;
    }
    Some(
        points
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| {
                let command = if i == 0 { 'M' } else { 'L' };
                format!("{command}{a},{}", MAX_INTENSITY - b)
            })
            .collect::<Vec<_>>()
            .join(" "),
    )
}
