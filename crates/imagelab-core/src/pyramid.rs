//! Pyramid level budgeting.
//!
//! A pyramid halves the image at every level, so the number of useful
//! levels is bounded by the smaller image dimension.  The budget is
//! derived once per newly loaded primary image from its natural size.

use serde::{Deserialize, Serialize};

use crate::types::Dimensions;

/// Fewest levels a pyramid may have.
pub const MIN_LEVELS: u32 = 2;

/// Maximum legal level count for an image of the given size:
/// `max(2, floor(log2(min(width, height))) - 2)`.
///
/// A zero dimension yields [`MIN_LEVELS`].
#[must_use]
pub const fn compute_max_levels(width: u32, height: u32) -> u32 {
    let min_dimension = if width < height { width } else { height };
    if min_dimension == 0 {
        return MIN_LEVELS;
    }
    let levels = min_dimension.ilog2().saturating_sub(2);
    if levels < MIN_LEVELS { MIN_LEVELS } else { levels }
}

/// Lower `current` to `max_levels` if it exceeds it.  Never raises it.
#[must_use]
pub const fn clamp_selection(current: u32, max_levels: u32) -> u32 {
    if current > max_levels {
        max_levels
    } else {
        current
    }
}

/// Level budget plus the user's current choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidBudget {
    max_levels: u32,
    selected: u32,
}

impl PyramidBudget {
    /// Upper bound used before any image has been measured.
    pub const DEFAULT_MAX_LEVELS: u32 = 10;
    /// Initial selection.
    pub const DEFAULT_SELECTED: u32 = 4;

    /// Current upper bound.
    #[must_use]
    pub const fn max_levels(self) -> u32 {
        self.max_levels
    }

    /// Current selection, always within `[MIN_LEVELS, max_levels]`.
    #[must_use]
    pub const fn selected(self) -> u32 {
        self.selected
    }

    /// Recompute the bound for a newly loaded primary image.
    ///
    /// The selection is lowered if it no longer fits; a larger bound
    /// leaves it where it was.
    pub fn on_image_loaded(&mut self, dimensions: Dimensions) -> u32 {
        self.max_levels = compute_max_levels(dimensions.width, dimensions.height);
        let clamped = clamp_selection(self.selected, self.max_levels);
        if clamped != self.selected {
            tracing::debug!(
                from = self.selected,
                to = clamped,
                "pyramid level selection lowered to fit new image"
            );
        }
        self.selected = clamped;
        self.max_levels
    }

    /// Set the selection, clamped into `[MIN_LEVELS, max_levels]`.
    pub fn select(&mut self, levels: u32) -> u32 {
        self.selected = levels.clamp(MIN_LEVELS, self.max_levels);
        self.selected
    }
}

impl Default for PyramidBudget {
    fn default() -> Self {
        Self {
            max_levels: Self::DEFAULT_MAX_LEVELS,
            selected: Self::DEFAULT_SELECTED,
        }
    }
}
