//! Small array helpers shared by the spectral and radial code.

use crate::error::{FieldError, Result};
use crate::flds::field::Grid;
use crate::Float;
use num_traits::Zero;
use std::ops::Div;

/// Element-wise `num / den`, with zero wherever `den` is zero.
pub fn divide_arrays<T>(num: &[T], den: &[Float]) -> Result<Vec<T>>
where
    T: Copy + Zero + Div<Float, Output = T>,
{
    if num.len() != den.len() {
        return Err(FieldError::shape(&[den.len()], &[num.len()]));
    }
    Ok(num
        .iter()
        .zip(den)
        .map(|(&n, &d)| if d == 0.0 { T::zero() } else { n / d })
        .collect())
}

/// From `v1 = (v1_i)` and `v2 = (v2_j)` builds the `(len(v1), len(v2), 2)`
/// grid `M[i, j] = (v1_i, v2_j)`.
pub fn vector_vector_grid(v1: &[Float], v2: &[Float]) -> Result<Grid<Float>> {
    let mut data = Vec::with_capacity(2 * v1.len() * v2.len());
    for &a in v1 {
        for &b in v2 {
            data.push(a);
            data.push(b);
        }
    }
    Grid::with_components(v1.len(), v2.len(), 2, data)
}

/// Counts values into `n_bins` equal bins over `[v_min, v_max)`.
#[derive(Clone, Debug)]
pub struct Histogram {
    v_min: Float,
    v_max: Float,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(n_bins: usize, v_min: Float, v_max: Float) -> Result<Histogram> {
        if n_bins == 0 || !(v_max > v_min) {
            return Err(FieldError::DegenerateInput(format!(
                "histogram needs bins over a non-empty range, got {} bins over [{}, {})",
                n_bins, v_min, v_max
            )));
        }
        Ok(Histogram {
            v_min,
            v_max,
            counts: vec![0; n_bins],
        })
    }

    fn bin_width(&self) -> Float {
        (self.v_max - self.v_min) / self.counts.len() as Float
    }

    /// Adds values to the counts. Values outside `[v_min, v_max)` are dropped.
    pub fn add_values(&mut self, values: &[Float]) {
        let width = self.bin_width();
        let n_bins = self.counts.len();
        for &v in values {
            if !(v >= self.v_min && v < self.v_max) {
                continue;
            }
            // rounding can push values just under v_max into the next bin
            let bin = (((v - self.v_min) / width) as usize).min(n_bins - 1);
            self.counts[bin] += 1;
        }
    }

    pub fn reset(&mut self) {
        for c in self.counts.iter_mut() {
            *c = 0;
        }
    }

    /// Lower edge of every bin.
    pub fn bins(&self) -> Vec<Float> {
        let width = self.bin_width();
        (0..self.counts.len())
            .map(|i| self.v_min + i as Float * width)
            .collect()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Fraction of counted values in each bin; all zero if nothing was counted.
    pub fn normalised(&self) -> Vec<Float> {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .map(|&c| c as Float / total as Float)
            .collect()
    }
}
