use serde::{Deserialize, Serialize};

use crate::core::{Cell, Color};

/// One painted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub cell: Cell,
    pub color: Color,
}

impl Pixel {
    #[must_use]
    pub const fn new(cell: Cell, color: Color) -> Self {
        Self { cell, color }
    }

    #[must_use]
    pub const fn at(x: i64, y: i64, color: Color) -> Self {
        Self::new(Cell::new(x, y), color)
    }
}
