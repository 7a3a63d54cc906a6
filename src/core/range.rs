use serde::{Deserialize, Serialize};

use crate::core::{CameraState, CanvasSize, Cell};

/// Upper bound of cell coordinates accepted by the remote store.
pub const MAX_UINT32: i64 = u32::MAX as i64;

/// Cell-space rectangle with inclusive edges.
///
/// Used both for the visible range and for the last fetched range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRange {
    pub upper_left_x: i64,
    pub upper_left_y: i64,
    pub lower_right_x: i64,
    pub lower_right_y: i64,
}

impl PixelRange {
    #[must_use]
    pub const fn new(
        upper_left_x: i64,
        upper_left_y: i64,
        lower_right_x: i64,
        lower_right_y: i64,
    ) -> Self {
        Self {
            upper_left_x,
            upper_left_y,
            lower_right_x,
            lower_right_y,
        }
    }

    #[must_use]
    pub fn width(self) -> i64 {
        self.lower_right_x.saturating_sub(self.upper_left_x)
    }

    #[must_use]
    pub fn height(self) -> i64 {
        self.lower_right_y.saturating_sub(self.upper_left_y)
    }

    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= self.upper_left_x
            && cell.x <= self.lower_right_x
            && cell.y >= self.upper_left_y
            && cell.y <= self.lower_right_y
    }

    /// Clamps every edge into `[0, MAX_UINT32]`.
    #[must_use]
    pub fn clamp_to_store_bounds(self) -> Self {
        Self {
            upper_left_x: self.upper_left_x.clamp(0, MAX_UINT32),
            upper_left_y: self.upper_left_y.clamp(0, MAX_UINT32),
            lower_right_x: self.lower_right_x.clamp(0, MAX_UINT32),
            lower_right_y: self.lower_right_y.clamp(0, MAX_UINT32),
        }
    }

    /// Largest absolute movement of any of the four edges.
    #[must_use]
    pub fn max_edge_shift(self, other: Self) -> u64 {
        [
            self.upper_left_x.abs_diff(other.upper_left_x),
            self.upper_left_y.abs_diff(other.upper_left_y),
            self.lower_right_x.abs_diff(other.lower_right_x),
            self.lower_right_y.abs_diff(other.lower_right_y),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Number of cells covered, edges inclusive; saturates at `u64::MAX`.
    #[must_use]
    pub fn cell_count(self) -> u64 {
        if self.lower_right_x < self.upper_left_x || self.lower_right_y < self.upper_left_y {
            return 0;
        }
        let columns = self.lower_right_x.abs_diff(self.upper_left_x).saturating_add(1);
        let rows = self.lower_right_y.abs_diff(self.upper_left_y).saturating_add(1);
        columns.saturating_mul(rows)
    }

    /// Cells covered, row by row.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.upper_left_y..=self.lower_right_y)
            .flat_map(move |y| (self.upper_left_x..=self.lower_right_x).map(move |x| Cell::new(x, y)))
    }
}

/// Cell rectangle covered by the canvas for the given camera.
#[must_use]
pub fn compute_visible_range(size: CanvasSize, camera: CameraState, cell_size: f64) -> PixelRange {
    let visible_width = f64::from(size.width) / camera.scale;
    let visible_height = f64::from(size.height) / camera.scale;

    PixelRange {
        upper_left_x: (camera.offset_x / cell_size).floor() as i64,
        upper_left_y: (camera.offset_y / cell_size).floor() as i64,
        lower_right_x: ((camera.offset_x + visible_width) / cell_size).ceil() as i64,
        lower_right_y: ((camera.offset_y + visible_height) / cell_size).ceil() as i64,
    }
}

/// Scale-adaptive limit on how many pixels a range query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBudget {
    pub base_limit: u32,
    pub max_limit: u32,
}

impl Default for ResultBudget {
    fn default() -> Self {
        Self {
            base_limit: 30,
            max_limit: 20_000,
        }
    }
}

impl ResultBudget {
    /// Grows cubically as `scale` approaches `min_scale`.
    ///
    /// At `max_scale` the budget is `base_limit`; at `min_scale` it is
    /// `max_limit`.
    #[must_use]
    pub fn for_scale(self, scale: f64, min_scale: f64, max_scale: f64) -> u32 {
        let span = max_scale - min_scale;
        let normalized = if span > 0.0 {
            ((max_scale - scale) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let base = f64::from(self.base_limit);
        let extra = f64::from(self.max_limit.saturating_sub(self.base_limit));
        (base + extra * normalized.powi(3)).round() as u32
    }
}
