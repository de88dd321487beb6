use crate::error::{FieldError, Result};
use crate::flds::field::{FieldDim, Grid};
use crate::maths::vector_vector_grid;
use crate::{Float, PI};
use itertools::izip;

/// Sample frequencies of a length `n` discrete Fourier transform with sample
/// spacing `d`, in the native FFT ordering: `0, 1, ..., (n-1)/2` then the
/// negative frequencies `-(n/2), ..., -1`, all divided by `n * d`.
pub fn fft_freq(n: usize, d: Float) -> Vec<Float> {
    let norm = 1.0 / (n as Float * d);
    (0..n)
        .map(|i| {
            if i <= (n - 1) / 2 {
                i as Float * norm
            } else {
                (i as Float - n as Float) * norm
            }
        })
        .collect()
}

/// Wave vectors associated with the bins of a 2D FFT.
///
/// Never mutated after construction; filters share one instance by `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveVectors {
    dim: FieldDim,
    k_x: Vec<Float>,
    k_y: Vec<Float>,
    k_norm: Vec<Float>,
}

impl WaveVectors {
    pub fn new(size_x: usize, size_y: usize, d: Float) -> Result<WaveVectors> {
        if size_x == 0 || size_y == 0 {
            return Err(FieldError::DegenerateInput(format!(
                "cannot build wave vectors for a ({}, {}) window",
                size_x, size_y
            )));
        }
        if !(d > 0.0) || !d.is_finite() {
            return Err(FieldError::DegenerateInput(format!(
                "sample spacing must be positive, got {}",
                d
            )));
        }
        let freq_x = fft_freq(size_x, d);
        let freq_y = fft_freq(size_y, d);

        let mut k_x = vec![0.0; size_x * size_y];
        let mut k_y = vec![0.0; size_x * size_y];
        for i in 0..size_x {
            for j in 0..size_y {
                let ind = i * size_y + j;
                // row frequency broadcast across columns
                k_x[ind] = 2.0 * PI * freq_x[i];
                // column frequency broadcast across rows
                k_y[ind] = 2.0 * PI * freq_y[j];
            }
        }
        Ok(WaveVectors::from_components(
            FieldDim::new(size_x, size_y),
            k_x,
            k_y,
        ))
    }

    /// Takes a caller supplied `(size_x, size_y, 2)` grid of wave vectors.
    pub fn from_grid(grid: &Grid<Float>) -> Result<WaveVectors> {
        if grid.n_comp() != 2 {
            let dim = grid.dim();
            return Err(FieldError::shape(
                &[dim.size_x, dim.size_y, 2],
                &grid.shape(),
            ));
        }
        Ok(WaveVectors::from_components(
            grid.dim(),
            grid.component_plane(0),
            grid.component_plane(1),
        ))
    }

    fn from_components(dim: FieldDim, k_x: Vec<Float>, k_y: Vec<Float>) -> WaveVectors {
        let mut k_norm = vec![0.0; dim.len()];
        for (norm, kx, ky) in izip!(&mut k_norm, &k_x, &k_y) {
            *norm = (kx * kx + ky * ky).sqrt();
        }
        WaveVectors {
            dim,
            k_x,
            k_y,
            k_norm,
        }
    }

    pub fn dim(&self) -> FieldDim {
        self.dim
    }

    pub fn k_x(&self) -> &[Float] {
        &self.k_x
    }

    pub fn k_y(&self) -> &[Float] {
        &self.k_y
    }

    pub fn k_norm(&self) -> &[Float] {
        &self.k_norm
    }

    /// The norms as a scalar `(size_x, size_y)` grid.
    pub fn k_norm_grid(&self) -> Grid<Float> {
        let mut grid = Grid::filled(self.dim, 1, 0.0);
        grid.data_mut().copy_from_slice(&self.k_norm);
        grid
    }

    /// The wave vectors as a `(size_x, size_y, 2)` grid.
    pub fn to_grid(&self) -> Grid<Float> {
        let mut grid = Grid::filled(self.dim, 2, 0.0);
        grid.set_component_plane(0, &self.k_x);
        grid.set_component_plane(1, &self.k_y);
        grid
    }
}

/// `(nx, ny, 2)` grid of 2π-scaled FFT frequency pairs for sample spacing `d`.
pub fn wave_vectors(nx: usize, ny: usize, d: Float) -> Result<Grid<Float>> {
    if nx == 0 || ny == 0 || !(d > 0.0) || !d.is_finite() {
        return Err(FieldError::DegenerateInput(format!(
            "wave vectors need a non-empty window and positive spacing, got ({}, {}) and {}",
            nx, ny, d
        )));
    }
    let two_pi_x: Vec<Float> = fft_freq(nx, d).iter().map(|f| 2.0 * PI * f).collect();
    let two_pi_y: Vec<Float> = fft_freq(ny, d).iter().map(|f| 2.0 * PI * f).collect();
    vector_vector_grid(&two_pi_x, &two_pi_y)
}

/// Euclidean norm of each entry of a `(nx, ny, 2)` wave-vector grid.
pub fn wave_vector_norm(wave_vectors: &Grid<Float>) -> Result<Grid<Float>> {
    Ok(WaveVectors::from_grid(wave_vectors)?.k_norm_grid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flds::field::Pos;
    use crate::E_TOL;

    #[test]
    fn matches_fft_ordering() {
        let even = fft_freq(4, 1.0);
        assert_eq!(even, vec![0.0, 0.25, -0.5, -0.25]);
        let odd = fft_freq(5, 0.5);
        let expected = [0.0, 0.4, 0.8, -0.8, -0.4];
        for (v, e) in odd.iter().zip(expected.iter()) {
            assert!((v - e).abs() < E_TOL);
        }
    }

    #[test]
    fn broadcast_layout() {
        let wv = wave_vectors(4, 3, 1.0).unwrap();
        assert_eq!(wv.shape(), [4, 3, 2]);
        // first component only varies along rows
        for col in 0..3 {
            assert!((wv.at(Pos { row: 1, col })[0] - 0.5 * PI).abs() < E_TOL);
            assert!((wv.at(Pos { row: 2, col })[0] + PI).abs() < E_TOL);
        }
        // second component only varies along columns
        for row in 0..4 {
            let k = wv.at(Pos { row, col: 2 })[1];
            assert!((k + 2.0 * PI / 3.0).abs() < E_TOL);
        }
    }

    #[test]
    fn norm_and_struct_agree() {
        let grid = wave_vectors(6, 4, 0.5).unwrap();
        let norm = wave_vector_norm(&grid).unwrap();
        let wv = WaveVectors::new(6, 4, 0.5).unwrap();
        assert_eq!(norm.shape(), [6, 4, 1]);
        for (a, b) in norm.data().iter().zip(wv.k_norm()) {
            assert!((a - b).abs() < E_TOL);
        }
        assert_eq!(wv.k_norm()[0], 0.0);
        assert_eq!(wv.to_grid(), grid);
    }

    #[test]
    fn rejects_zero_spacing() {
        assert!(matches!(
            WaveVectors::new(4, 4, 0.0),
            Err(FieldError::DegenerateInput(_))
        ));
    }
}
