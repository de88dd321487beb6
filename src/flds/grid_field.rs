use crate::error::{FieldError, Result};
use crate::flds::field::{FieldDim, Grid, Pos};
use crate::flds::ghosts::PeriodicIndex;
use crate::maths::vector_vector_grid;
use crate::Float;
use once_cell::sync::OnceCell;

/// Physical bounds `(left, right, bottom, top)` of a grid. `left..right` is
/// spanned by the first axis, `bottom..top` by the second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub left: Float,
    pub right: Float,
    pub bottom: Float,
    pub top: Float,
}

impl Extent {
    pub fn new(left: Float, right: Float, bottom: Float, top: Float) -> Extent {
        Extent {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Box of side `side_x` by `side_y` centred on the origin.
    pub fn centred(side_x: Float, side_y: Float) -> Extent {
        Extent::new(-side_x / 2.0, side_x / 2.0, -side_y / 2.0, side_y / 2.0)
    }
}

impl Default for Extent {
    fn default() -> Extent {
        Extent::new(-1.0, 1.0, -1.0, 1.0)
    }
}

/// How a point lookup turns grid samples into a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Value of the cell containing the point.
    Cell,
    /// Bilinear interpolation between the surrounding cell centres, taken
    /// from the periodic 3x3 neighbourhood of the containing cell.
    Bilinear,
}

/// Samples at uniformly spaced positions over a rectangular extent.
///
/// Cell `(i, j)` covers `[left + i dx, left + (i + 1) dx) x [bottom + j dy, bottom + (j + 1) dy)`.
#[derive(Debug)]
pub struct GridField {
    grid: Grid<Float>,
    extent: Extent,
    sep_boxes_x: Float,
    sep_boxes_y: Float,
    index: PeriodicIndex,
    coordinates: OnceCell<Grid<Float>>,
}

impl GridField {
    pub fn new(grid: Grid<Float>, extent: Extent) -> Result<GridField> {
        if !(extent.left < extent.right && extent.bottom < extent.top) {
            return Err(FieldError::DegenerateInput(format!(
                "extent bounds must be ordered, got {:?}",
                extent
            )));
        }
        let dim = grid.dim();
        Ok(GridField {
            sep_boxes_x: (extent.right - extent.left) / dim.size_x as Float,
            sep_boxes_y: (extent.top - extent.bottom) / dim.size_y as Float,
            index: PeriodicIndex::new(dim),
            coordinates: OnceCell::new(),
            grid,
            extent,
        })
    }

    pub fn grid(&self) -> &Grid<Float> {
        &self.grid
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn dim(&self) -> FieldDim {
        self.grid.dim()
    }

    /// Distances between consecutive cells along each axis.
    pub fn box_separations(&self) -> (Float, Float) {
        (self.sep_boxes_x, self.sep_boxes_y)
    }

    /// True iff `(x, y)` lies in the closed extent rectangle.
    pub fn in_bounds(&self, x: Float, y: Float) -> bool {
        x >= self.extent.left
            && x <= self.extent.right
            && y >= self.extent.bottom
            && y <= self.extent.top
    }

    /// Unwrapped cell index of a coordinate.
    fn raw_index(&self, x: Float, y: Float) -> (i64, i64) {
        (
            ((x - self.extent.left) / self.sep_boxes_x).floor() as i64,
            ((y - self.extent.bottom) / self.sep_boxes_y).floor() as i64,
        )
    }

    fn cell_centre(&self, raw_row: i64, raw_col: i64) -> (Float, Float) {
        (
            self.extent.left + (raw_row as Float + 0.5) * self.sep_boxes_x,
            self.extent.bottom + (raw_col as Float + 0.5) * self.sep_boxes_y,
        )
    }

    /// Value at `(x, y)`, or `None` outside the extent. Points on the upper
    /// bounds wrap onto the first row or column.
    pub fn value_at_cartesian(&self, x: Float, y: Float, sampling: Sampling) -> Option<Vec<Float>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let (raw_row, raw_col) = self.raw_index(x, y);
        match sampling {
            Sampling::Cell => Some(self.grid.at(self.index.wrap(raw_row, raw_col)).to_vec()),
            Sampling::Bilinear => Some(self.bilinear(x, y, raw_row, raw_col)),
        }
    }

    /// Value at polar coordinates `(r, angle)` around `centre`, with the angle
    /// measured from the first axis.
    pub fn value_at_polar(
        &self,
        r: Float,
        angle: Float,
        centre: (Float, Float),
        sampling: Sampling,
    ) -> Option<Vec<Float>> {
        let x = centre.0 + r * angle.cos();
        let y = centre.1 + r * angle.sin();
        self.value_at_cartesian(x, y, sampling)
    }

    fn bilinear(&self, x: Float, y: Float, raw_row: i64, raw_col: i64) -> Vec<Float> {
        let cells = self.index.neighbourhood(raw_row, raw_col);
        let (cx, cy) = self.cell_centre(raw_row, raw_col);

        // offsets of the point from the containing cell centre, in cells,
        // each in [-0.5, 0.5]
        let fx = (x - cx) / self.sep_boxes_x;
        let fy = (y - cy) / self.sep_boxes_y;
        // lower corner of the square of centres around the point, in the
        // neighbourhood's 0..3 numbering
        let (a0, tx) = if fx < 0.0 { (0, fx + 1.0) } else { (1, fx) };
        let (b0, ty) = if fy < 0.0 { (0, fy + 1.0) } else { (1, fy) };

        let corners: [(Pos, Float); 4] = [
            (cells[a0][b0], (1.0 - tx) * (1.0 - ty)),
            (cells[a0 + 1][b0], tx * (1.0 - ty)),
            (cells[a0][b0 + 1], (1.0 - tx) * ty),
            (cells[a0 + 1][b0 + 1], tx * ty),
        ];
        let mut out = vec![0.0; self.grid.n_comp()];
        for (pos, w) in corners.iter() {
            for (o, v) in out.iter_mut().zip(self.grid.at(*pos)) {
                *o += w * v;
            }
        }
        out
    }

    /// `(size_x, size_y, 2)` grid of cell-centre coordinates, computed once.
    pub fn grid_coordinates(&self) -> Result<&Grid<Float>> {
        self.coordinates.get_or_try_init(|| {
            let dim = self.grid.dim();
            let xs: Vec<Float> = (0..dim.size_x as i64)
                .map(|i| self.cell_centre(i, 0).0)
                .collect();
            let ys: Vec<Float> = (0..dim.size_y as i64)
                .map(|j| self.cell_centre(0, j).1)
                .collect();
            vector_vector_grid(&xs, &ys)
        })
    }
}
