use crate::flds::field::{FieldDim, Pos};
use strength_reduce::StrengthReducedUsize;

/// Maps unwrapped (possibly negative or past-the-end) cell indices back
/// onto a periodic grid. Index `-i` aliases `size - i`, `size` aliases `0`.
#[derive(Clone, Copy, Debug)]
pub struct PeriodicIndex {
    dim: FieldDim,
    red_x: StrengthReducedUsize,
    red_y: StrengthReducedUsize,
}

#[inline(always)]
fn wrap_axis(raw: i64, size: usize, red: StrengthReducedUsize) -> usize {
    if raw >= 0 {
        raw as usize % red
    } else {
        let back = raw.unsigned_abs() as usize % red;
        if back == 0 {
            0
        } else {
            size - back
        }
    }
}

impl PeriodicIndex {
    pub fn new(dim: FieldDim) -> PeriodicIndex {
        PeriodicIndex {
            dim,
            red_x: StrengthReducedUsize::new(dim.size_x),
            red_y: StrengthReducedUsize::new(dim.size_y),
        }
    }

    pub fn dim(&self) -> FieldDim {
        self.dim
    }

    #[inline(always)]
    pub fn wrap(&self, raw_row: i64, raw_col: i64) -> Pos {
        Pos {
            row: wrap_axis(raw_row, self.dim.size_x, self.red_x),
            col: wrap_axis(raw_col, self.dim.size_y, self.red_y),
        }
    }

    /// The 3x3 block of cells around `(raw_row, raw_col)`, ghost cells
    /// included: entry `[a][b]` is the cell at offset `(a - 1, b - 1)`,
    /// wrapped across the grid edges.
    pub fn neighbourhood(&self, raw_row: i64, raw_col: i64) -> [[Pos; 3]; 3] {
        let mut cells = [[Pos { row: 0, col: 0 }; 3]; 3];
        for (a, line) in cells.iter_mut().enumerate() {
            for (b, cell) in line.iter_mut().enumerate() {
                *cell = self.wrap(raw_row + a as i64 - 1, raw_col + b as i64 - 1);
            }
        }
        cells
    }
}
