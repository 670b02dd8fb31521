//! Drawing surface dimensions.

/// Size of a drawing surface in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport for a terminal area, scaling each cell to `cell_w × cell_h` pixels.
    pub fn from_cells(cols: u16, rows: u16, cell_w: u16, cell_h: u16) -> Self {
        Self {
            width: f64::from(cols) * f64::from(cell_w),
            height: f64::from(rows) * f64::from(cell_h),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}
