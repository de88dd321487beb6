use crate::flds::field::{FieldDim, Grid};
use crate::Float;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::FftPlanner;
use std::sync::Arc;

/// Planned 2D transforms for one grid size.
///
/// Each component plane is transformed along its contiguous axis, transposed,
/// transformed along the other axis and transposed back.
pub struct Fft2D {
    dim: FieldDim,
    fft_x: Arc<dyn rustfft::Fft<Float>>,
    ifft_x: Arc<dyn rustfft::Fft<Float>>,
    fft_y: Arc<dyn rustfft::Fft<Float>>,
    ifft_y: Arc<dyn rustfft::Fft<Float>>,
    xscratch: Vec<Complex<Float>>,
    yscratch: Vec<Complex<Float>>,
    wrkspace: Vec<Complex<Float>>,
}

impl Fft2D {
    pub fn new(dim: FieldDim) -> Fft2D {
        let mut planner = FftPlanner::new();
        let fft_x = planner.plan_fft_forward(dim.size_x);
        let ifft_x = planner.plan_fft_inverse(dim.size_x);
        let fft_y = planner.plan_fft_forward(dim.size_y);
        let ifft_y = planner.plan_fft_inverse(dim.size_y);
        let xscratch_len = fft_x
            .get_outofplace_scratch_len()
            .max(ifft_x.get_outofplace_scratch_len());
        let yscratch_len = fft_y
            .get_outofplace_scratch_len()
            .max(ifft_y.get_outofplace_scratch_len());

        Fft2D {
            dim,
            fft_x,
            ifft_x,
            fft_y,
            ifft_y,
            xscratch: vec![Complex::zero(); xscratch_len],
            yscratch: vec![Complex::zero(); yscratch_len],
            wrkspace: vec![Complex::zero(); dim.len()],
        }
    }

    /// `out_vec[col][row] = in_vec[row][col]` for a `rows x cols` input.
    fn transpose_out_of_place(
        in_vec: &[Complex<Float>],
        out_vec: &mut [Complex<Float>],
        rows: usize,
        cols: usize,
    ) {
        if !cfg!(feature = "unchecked") {
            assert_eq!(in_vec.len(), out_vec.len());
            assert_eq!(in_vec.len(), rows * cols);
        }
        for i in 0..rows {
            for j in 0..cols {
                if cfg!(feature = "unchecked") {
                    unsafe {
                        // lengths were asserted equal to rows * cols in
                        // checked builds
                        *out_vec.get_unchecked_mut(j * rows + i) =
                            *in_vec.get_unchecked(i * cols + j);
                    }
                } else {
                    out_vec[j * rows + i] = in_vec[i * cols + j];
                }
            }
        }
    }

    fn process_plane(&mut self, plane: &mut [Complex<Float>], inverse: bool) {
        let size_x = self.dim.size_x;
        let size_y = self.dim.size_y;
        let (along_y, along_x) = if inverse {
            (&self.ifft_y, &self.ifft_x)
        } else {
            (&self.fft_y, &self.fft_x)
        };

        // every row is a contiguous run of size_y samples
        along_y.process_outofplace_with_scratch(plane, &mut self.wrkspace, &mut self.yscratch);
        Fft2D::transpose_out_of_place(&self.wrkspace, plane, size_x, size_y);

        // now every column is contiguous
        along_x.process_outofplace_with_scratch(plane, &mut self.wrkspace, &mut self.xscratch);
        Fft2D::transpose_out_of_place(&self.wrkspace, plane, size_y, size_x);
    }

    fn process(&mut self, grid: &mut Grid<Complex<Float>>, inverse: bool) {
        if !cfg!(feature = "unchecked") {
            assert_eq!(self.dim, grid.dim());
        }
        if grid.n_comp() == 1 {
            self.process_plane(grid.data_mut(), inverse);
            return;
        }
        for comp in 0..grid.n_comp() {
            let mut plane = grid.component_plane(comp);
            self.process_plane(&mut plane, inverse);
            grid.set_component_plane(comp, &plane);
        }
    }

    /// Unnormalised forward transform over the two leading axes.
    pub fn fft(&mut self, grid: &mut Grid<Complex<Float>>) {
        self.process(grid, false);
    }

    /// Inverse transform over the two leading axes, normalised by `1 / (size_x * size_y)`
    /// so that `inv_fft(fft(x)) == x`.
    pub fn inv_fft(&mut self, grid: &mut Grid<Complex<Float>>) {
        self.process(grid, true);
        let norm = (self.dim.len() as Float).powi(-1);
        for v in grid.data_mut().iter_mut() {
            *v *= norm;
        }
    }
}

/// Forward 2D transform of a real grid.
pub fn fft2(grid: &Grid<Float>) -> Grid<Complex<Float>> {
    let mut spectral = grid.map(|&v| Complex::new(v, 0.0));
    Fft2D::new(grid.dim()).fft(&mut spectral);
    spectral
}

/// Inverse 2D transform; the result is complex in general.
pub fn ifft2(spectral: &Grid<Complex<Float>>) -> Grid<Complex<Float>> {
    let mut signal = spectral.clone();
    Fft2D::new(spectral.dim()).inv_fft(&mut signal);
    signal
}
