use crate::error::{FieldError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

/// Leading two dimensions of a sample array. `size_x` is the length of the
/// first axis (rows), `size_y` the length of the second (columns).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDim {
    pub size_x: usize,
    pub size_y: usize,
}

impl FieldDim {
    pub fn new(size_x: usize, size_y: usize) -> FieldDim {
        FieldDim { size_x, size_y }
    }

    pub fn len(&self) -> usize {
        self.size_x * self.size_y
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.size_x, self.size_y]
    }

    #[inline(always)]
    pub fn get_index(&self, pos: Pos) -> usize {
        // Cells are stored in a 1d vec, row after row.
        // Here is the layout for size_x = 3, size_y = 3,
        // with the 1D vec position in []
        // ----------------------------------
        // |   [0]    |   [1]    |   [2]    |
        // |  row: 0  |  row: 0  |  row: 0  |
        // |  col: 0  |  col: 1  |  col: 2  |
        // ----------------------------------
        // |   [3]    |   [4]    |   [5]    |
        // |  row: 1  |  row: 1  |  row: 1  |
        // |  col: 0  |  col: 1  |  col: 2  |
        // ----------------------------------
        // |   [6]    |   [7]    |   [8]    |
        // |  row: 2  |  row: 2  |  row: 2  |
        // |  col: 0  |  col: 1  |  col: 2  |
        // ----------------------------------
        // A row walks the first (x) axis, a column the second (y) axis.

        if !cfg!(feature = "unchecked") {
            assert!(pos.row < self.size_x);
            assert!(pos.col < self.size_y);
        }

        pos.row * self.size_y + pos.col
    }
}

/// Dense 2D array of samples with an optional trailing component axis.
///
/// Components of one cell are contiguous, so `data[get_index(pos) * n_comp + c]`
/// is component `c` of cell `pos`. Scalar grids have `n_comp == 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    dim: FieldDim,
    n_comp: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn new(size_x: usize, size_y: usize, data: Vec<T>) -> Result<Grid<T>> {
        Grid::with_components(size_x, size_y, 1, data)
    }

    pub fn with_components(
        size_x: usize,
        size_y: usize,
        n_comp: usize,
        data: Vec<T>,
    ) -> Result<Grid<T>> {
        if size_x == 0 || size_y == 0 || n_comp == 0 {
            return Err(FieldError::DegenerateInput(format!(
                "grid of shape ({}, {}, {}) holds no samples",
                size_x, size_y, n_comp
            )));
        }
        if data.len() != size_x * size_y * n_comp {
            return Err(FieldError::shape(
                &[size_x, size_y, n_comp],
                &[data.len()],
            ));
        }
        Ok(Grid {
            dim: FieldDim::new(size_x, size_y),
            n_comp,
            data,
        })
    }

    /// Builds a scalar grid from `f(row, col)`.
    pub fn from_fn<F>(size_x: usize, size_y: usize, mut f: F) -> Result<Grid<T>>
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(size_x * size_y);
        for row in 0..size_x {
            for col in 0..size_y {
                data.push(f(row, col));
            }
        }
        Grid::new(size_x, size_y, data)
    }

    /// A grid of the same dimensions with every entry set to `value`.
    /// Only reachable from an existing, already validated grid.
    pub(crate) fn filled(dim: FieldDim, n_comp: usize, value: T) -> Grid<T> {
        Grid {
            dim,
            n_comp,
            data: vec![value; dim.len() * n_comp],
        }
    }

    pub fn dim(&self) -> FieldDim {
        self.dim
    }

    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    /// Full shape, `[size_x, size_y, n_comp]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.dim.size_x, self.dim.size_y, self.n_comp]
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// All components of the cell at `pos`.
    pub fn at(&self, pos: Pos) -> &[T] {
        let start = self.dim.get_index(pos) * self.n_comp;
        &self.data[start..start + self.n_comp]
    }

    pub fn at_mut(&mut self, pos: Pos) -> &mut [T] {
        let start = self.dim.get_index(pos) * self.n_comp;
        &mut self.data[start..start + self.n_comp]
    }

    /// First component of the cell at `pos`.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.at(Pos { row, col })[0]
    }

    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            dim: self.dim,
            n_comp: self.n_comp,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Copies component `comp` of every cell into a contiguous plane.
    pub fn component_plane(&self, comp: usize) -> Vec<T> {
        if !cfg!(feature = "unchecked") {
            assert!(comp < self.n_comp);
        }
        self.data
            .iter()
            .skip(comp)
            .step_by(self.n_comp)
            .copied()
            .collect()
    }

    pub fn set_component_plane(&mut self, comp: usize, plane: &[T]) {
        if !cfg!(feature = "unchecked") {
            assert!(comp < self.n_comp);
            assert_eq!(plane.len(), self.dim.len());
        }
        for (v, p) in self
            .data
            .iter_mut()
            .skip(comp)
            .step_by(self.n_comp)
            .zip(plane)
        {
            *v = *p;
        }
    }

    pub(crate) fn check_dim(&self, dim: FieldDim) -> Result<()> {
        if self.dim != dim {
            return Err(FieldError::shape(&dim.shape(), &self.dim.shape()));
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn row_major_order() {
        let dim = FieldDim::new(3, 4);
        assert_eq!(dim.get_index(Pos { row: 0, col: 0 }), 0);
        assert_eq!(dim.get_index(Pos { row: 0, col: 3 }), 3);
        assert_eq!(dim.get_index(Pos { row: 1, col: 0 }), 4);
        assert_eq!(dim.get_index(Pos { row: 2, col: 3 }), 11);
    }

    #[test]
    fn grid_init() {
        let grid = Grid::from_fn(3, 2, |row, col| (10 * row + col) as f64).unwrap();
        assert_eq!(grid.shape(), [3, 2, 1]);
        assert_eq!(grid.data(), &[0.0, 1.0, 10.0, 11.0, 20.0, 21.0]);
        assert_eq!(grid.get(2, 1), 21.0);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            Grid::new(2, 2, vec![0.0; 3]),
            Err(FieldError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Grid::<f64>::new(0, 2, vec![]),
            Err(FieldError::DegenerateInput(_))
        ));
    }

    #[test]
    fn component_planes() {
        let data: Vec<f64> = (0..8).map(|v| v as f64).collect();
        let mut grid = Grid::with_components(2, 2, 2, data).unwrap();
        assert_eq!(grid.at(Pos { row: 1, col: 0 }), &[4.0, 5.0]);
        assert_eq!(grid.component_plane(1), vec![1.0, 3.0, 5.0, 7.0]);

        grid.set_component_plane(0, &[-1.0, -2.0, -3.0, -4.0]);
        assert_eq!(
            grid.data(),
            &[-1.0, 1.0, -2.0, 3.0, -3.0, 5.0, -4.0, 7.0]
        );
    }
}
