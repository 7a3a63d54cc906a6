use serde::{Deserialize, Serialize};

use crate::core::{Cell, Color};

/// Sets (`Some`) or clears (`None`) one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPatch {
    pub cell: Cell,
    pub color: Option<Color>,
}

impl CellPatch {
    #[must_use]
    pub const fn set(cell: Cell, color: Color) -> Self {
        Self {
            cell,
            color: Some(color),
        }
    }

    #[must_use]
    pub const fn clear(cell: Cell) -> Self {
        Self { cell, color: None }
    }
}

/// Forward patch plus the inverse that undoes it, computed before mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchPair {
    pub forward: CellPatch,
    pub inverse: CellPatch,
}

impl PatchPair {
    /// Paint `color` over a cell whose current value is `before`.
    #[must_use]
    pub const fn paint(cell: Cell, before: Option<Color>, color: Color) -> Self {
        Self {
            forward: CellPatch::set(cell, color),
            inverse: CellPatch { cell, color: before },
        }
    }
}
