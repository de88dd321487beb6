use crate::error::Result;
use crate::flds::fft_2d::ifft2;
use crate::flds::field::Grid;
use crate::flds::wave_num::WaveVectors;
use crate::{Float, PI};
use log::trace;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use std::sync::Arc;

/// Filters a signal through its Fourier components.
///
/// The coefficients must be in the native 2D FFT ordering. Every filtering
/// method returns a new filter with a freshly allocated coefficient array and
/// leaves `self` untouched; the wave vectors are shared along the chain.
#[derive(Clone, Debug)]
pub struct FourierFilter {
    signal_fft: Grid<Complex<Float>>,
    wave_vectors: Arc<WaveVectors>,
}

impl FourierFilter {
    /// Builds the wave vectors from the sample spacing `d`.
    pub fn new(signal_fft: Grid<Complex<Float>>, d: Float) -> Result<FourierFilter> {
        let dim = signal_fft.dim();
        let wave_vectors = WaveVectors::new(dim.size_x, dim.size_y, d)?;
        trace!(
            "fourier filter over a {}x{}x{} spectrum, spacing {}",
            dim.size_x,
            dim.size_y,
            signal_fft.n_comp(),
            d
        );
        Ok(FourierFilter {
            signal_fft,
            wave_vectors: Arc::new(wave_vectors),
        })
    }

    /// Uses caller supplied wave vectors, which must cover the same leading
    /// shape as the coefficients.
    pub fn with_wave_vectors(
        signal_fft: Grid<Complex<Float>>,
        wave_vectors: Arc<WaveVectors>,
    ) -> Result<FourierFilter> {
        signal_fft.check_dim(wave_vectors.dim())?;
        Ok(FourierFilter {
            signal_fft,
            wave_vectors,
        })
    }

    pub fn signal_fft(&self) -> &Grid<Complex<Float>> {
        &self.signal_fft
    }

    pub fn wave_vectors(&self) -> &Arc<WaveVectors> {
        &self.wave_vectors
    }

    /// Inverse transform of the current coefficients.
    pub fn get_signal(&self) -> Grid<Complex<Float>> {
        ifft2(&self.signal_fft)
    }

    /// Scales every bin by `factor(|k|)`, broadcasting over components.
    fn scaled<F>(&self, factor: F) -> FourierFilter
    where
        F: Fn(Float) -> Float,
    {
        let n_comp = self.signal_fft.n_comp();
        let mut filtered = self.signal_fft.clone();
        for (bin, &k) in filtered
            .data_mut()
            .chunks_mut(n_comp)
            .zip(self.wave_vectors.k_norm())
        {
            let f = factor(k);
            for v in bin.iter_mut() {
                *v *= f;
            }
        }
        FourierFilter {
            signal_fft: filtered,
            wave_vectors: Arc::clone(&self.wave_vectors),
        }
    }

    /// Zeroes every bin for which `cut(|k|)` holds.
    fn masked<F>(&self, cut: F) -> FourierFilter
    where
        F: Fn(Float) -> bool,
    {
        let n_comp = self.signal_fft.n_comp();
        let mut filtered = self.signal_fft.clone();
        for (bin, &k) in filtered
            .data_mut()
            .chunks_mut(n_comp)
            .zip(self.wave_vectors.k_norm())
        {
            if cut(k) {
                for v in bin.iter_mut() {
                    *v = Complex::zero();
                }
            }
        }
        FourierFilter {
            signal_fft: filtered,
            wave_vectors: Arc::clone(&self.wave_vectors),
        }
    }

    /// Zeroes components whose wave-vector norm is strictly below `threshold`.
    pub fn cut_low_wave_frequencies(&self, threshold: Float) -> FourierFilter {
        self.masked(|k| k < threshold)
    }

    /// Zeroes components whose wave-vector norm is strictly above `threshold`.
    pub fn cut_high_wave_frequencies(&self, threshold: Float) -> FourierFilter {
        self.masked(|k| k > threshold)
    }

    /// Zeroes components with wave lengths below `threshold`.
    pub fn cut_low_wave_lengths(&self, threshold: Float) -> FourierFilter {
        self.cut_high_wave_frequencies(2.0 * PI / threshold)
    }

    /// Zeroes components with wave lengths above `threshold`.
    pub fn cut_high_wave_lengths(&self, threshold: Float) -> FourierFilter {
        self.cut_low_wave_frequencies(2.0 * PI / threshold)
    }

    /// Multiplies each component by `exp(-sigma^2 |k|^2 / 2)`, i.e. convolves
    /// the signal with a normalised Gaussian of standard deviation `sigma`.
    pub fn gaussian_filter(&self, sigma: Float) -> FourierFilter {
        if sigma == 0.0 {
            return self.clone();
        }
        let half_var = 0.5 * sigma * sigma;
        self.scaled(|k| (-half_var * k * k).exp())
    }
}
