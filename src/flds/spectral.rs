use crate::error::{FieldError, Result};
use crate::flds::fft_2d::Fft2D;
use crate::flds::field::Grid;
use crate::flds::filter::FourierFilter;
use crate::flds::grid_field::{Extent, GridField};
use crate::flds::wave_num::WaveVectors;
use crate::maths::divide_arrays;
use crate::{Float, SpectralParams};
use itertools::izip;
use log::debug;
use rustfft::num_complex::Complex;

/// A grid field paired with its Fourier transform.
///
/// The extent is the box of side `d * size` along each axis centred on the
/// origin. The forward transform is computed once, at construction.
#[derive(Debug)]
pub struct SpectralGridField {
    field: GridField,
    filter: FourierFilter,
    sample_spacing: Float,
}

impl SpectralGridField {
    pub fn new(grid: Grid<Float>, d: Float) -> Result<SpectralGridField> {
        let dim = grid.dim();
        if !(d > 0.0) || !d.is_finite() {
            return Err(FieldError::DegenerateInput(format!(
                "sample spacing must be positive, got {}",
                d
            )));
        }
        let mut spectral = grid.map(|&v| Complex::new(v, 0.0));
        Fft2D::new(dim).fft(&mut spectral);
        let filter = FourierFilter::new(spectral, d)?;

        let extent = Extent::centred(d * dim.size_x as Float, d * dim.size_y as Float);
        debug!(
            "spectral grid {}x{} over {:?}",
            dim.size_x, dim.size_y, extent
        );
        Ok(SpectralGridField {
            field: GridField::new(grid, extent)?,
            filter,
            sample_spacing: d,
        })
    }

    pub fn from_params(grid: Grid<Float>, params: &SpectralParams) -> Result<SpectralGridField> {
        SpectralGridField::new(grid, params.sample_spacing)
    }

    pub fn field(&self) -> &GridField {
        &self.field
    }

    pub fn filter(&self) -> &FourierFilter {
        &self.filter
    }

    pub fn sample_spacing(&self) -> Float {
        self.sample_spacing
    }

    /// The grid convolved with a normalised Gaussian of standard deviation
    /// `sigma`, done as a product in frequency space.
    pub fn gaussian_smoothed(&self, sigma: Float) -> Grid<Float> {
        self.filter
            .gaussian_filter(sigma)
            .get_signal()
            .map(|v| v.re)
    }
}

/// Projections of the Fourier transform of a `(size_x, size_y, 2)` vector
/// grid on the normalised wave vectors, unit sample spacing.
///
/// Returns `(k̂ × F, k̂ · F)`, the transverse and longitudinal parts. The
/// `k = 0` bin, where `k̂` is undefined, is set to zero in both.
pub fn wave_vector_projections(
    grid: &Grid<Float>,
) -> Result<(Grid<Complex<Float>>, Grid<Complex<Float>>)> {
    let dim = grid.dim();
    if grid.n_comp() != 2 {
        return Err(FieldError::shape(
            &[dim.size_x, dim.size_y, 2],
            &grid.shape(),
        ));
    }
    let mut spectral = grid.map(|&v| Complex::new(v, 0.0));
    Fft2D::new(dim).fft(&mut spectral);
    let wave_vectors = WaveVectors::new(dim.size_x, dim.size_y, 1.0)?;

    let f_x = spectral.component_plane(0);
    let f_y = spectral.component_plane(1);
    let mut cross = Vec::with_capacity(dim.len());
    let mut dot = Vec::with_capacity(dim.len());
    for (kx, ky, fx, fy) in izip!(wave_vectors.k_x(), wave_vectors.k_y(), &f_x, &f_y) {
        cross.push(*fy * *kx - *fx * *ky);
        dot.push(*fx * *kx + *fy * *ky);
    }
    let cross = divide_arrays(&cross, wave_vectors.k_norm())?;
    let dot = divide_arrays(&dot, wave_vectors.k_norm())?;
    Ok((
        Grid::new(dim.size_x, dim.size_y, cross)?,
        Grid::new(dim.size_x, dim.size_y, dot)?,
    ))
}
