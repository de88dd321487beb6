//! Evaluation of a periodic field known only at scattered samples.

pub mod interp;

pub use interp::{Interpolation, ScatteredInterpolator};

use crate::error::{FieldError, Result};
use crate::{Float, PeriodicParams};
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Settings of one [`PeriodicWrap::evaluate`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalOptions {
    pub method: Interpolation,
    /// Value used outside the convex hull of the samples (linear only).
    pub fill_value: Float,
    /// Number of threads; `None` or `Some(0)` uses one per CPU.
    pub worker_count: Option<usize>,
}

impl Default for EvalOptions {
    fn default() -> EvalOptions {
        EvalOptions {
            method: Interpolation::Linear,
            fill_value: 0.0,
            worker_count: None,
        }
    }
}

impl From<&PeriodicParams> for EvalOptions {
    fn from(params: &PeriodicParams) -> EvalOptions {
        EvalOptions {
            method: params.method,
            fill_value: params.fill_value,
            worker_count: params.worker_count,
        }
    }
}

/// Extends scattered samples of a field to all of space by periodic tiling.
///
/// The value at `x` is the sum, over every integer vector `m` such that
/// `x + p m` lies in the bounding box of the samples, of the samples
/// interpolated at `x + p m`. Read-only once built, so a batch of queries can
/// be spread over threads sharing one instance.
#[derive(Clone, Debug)]
pub struct PeriodicWrap {
    interp: ScatteredInterpolator,
    period: Vec<Float>,
    min: Vec<Float>,
    max: Vec<Float>,
}

impl PeriodicWrap {
    /// `points` holds `n` points of `period.len()` coordinates and `values`
    /// `n` rows of `k` components, both flattened point after point.
    pub fn new(points: Vec<Float>, values: Vec<Float>, period: Vec<Float>) -> Result<PeriodicWrap> {
        let dim = period.len();
        if dim == 0 {
            return Err(FieldError::DegenerateInput(
                "period must have at least one component".to_string(),
            ));
        }
        if period.iter().any(|p| !(*p > 0.0) || !p.is_finite()) {
            return Err(FieldError::DegenerateInput(format!(
                "period components must be positive, got {:?}",
                period
            )));
        }
        if points.is_empty() || points.len() % dim != 0 {
            return Err(FieldError::shape(&[points.len() / dim, dim], &[points.len()]));
        }
        let n = points.len() / dim;
        if values.is_empty() || values.len() % n != 0 {
            return Err(FieldError::shape(&[n], &[values.len()]));
        }
        let n_comp = values.len() / n;

        let mut min = vec![Float::INFINITY; dim];
        let mut max = vec![Float::NEG_INFINITY; dim];
        for point in points.chunks(dim) {
            for (axis, &x) in point.iter().enumerate() {
                min[axis] = min[axis].min(x);
                max[axis] = max[axis].max(x);
            }
        }
        Ok(PeriodicWrap {
            interp: ScatteredInterpolator::new(dim, n_comp, points, values)?,
            period,
            min,
            max,
        })
    }

    pub fn dim(&self) -> usize {
        self.period.len()
    }

    pub fn n_comp(&self) -> usize {
        self.interp.n_comp()
    }

    pub fn period(&self) -> &[Float] {
        &self.period
    }

    /// Per-axis `(min, max)` of the sample coordinates.
    pub fn bounds(&self) -> Vec<(Float, Float)> {
        self.min.iter().copied().zip(self.max.iter().copied()).collect()
    }

    /// Inclusive range of image shifts along `axis` that bring `x` within
    /// the sample bounds.
    fn shifts(&self, axis: usize, x: Float) -> std::ops::RangeInclusive<i64> {
        let p = self.period[axis];
        let lo = ((self.min[axis] - x) / p).ceil() as i64;
        let hi = ((self.max[axis] - x) / p).floor() as i64;
        lo..=hi
    }

    /// Value of the periodic field at one point.
    pub fn evaluate_point(&self, x: &[Float], method: Interpolation, fill_value: Float) -> Result<Vec<Float>> {
        if x.len() != self.dim() {
            return Err(FieldError::shape(&[self.dim()], &[x.len()]));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::DegenerateInput(format!(
                "query coordinates must be finite, got {:?}",
                x
            )));
        }
        method.check_dim(self.dim())?;

        let mut total = vec![0.0; self.n_comp()];
        let mut image = vec![0.0; self.dim()];
        // an empty range on any axis leaves the sum at zero
        for m in (0..self.dim())
            .map(|axis| self.shifts(axis, x[axis]))
            .multi_cartesian_product()
        {
            for (axis, shifted) in image.iter_mut().enumerate() {
                *shifted = x[axis] + self.period[axis] * m[axis] as Float;
            }
            let v = self.interp.interpolate(&image, method, fill_value)?;
            for (t, v) in total.iter_mut().zip(v) {
                *t += v;
            }
        }
        Ok(total)
    }

    /// Values at a batch of query points, flattened point after point as in
    /// [`PeriodicWrap::new`]. Output rows follow the query order.
    ///
    /// Queries run on a thread pool built for this call. The first failing
    /// query fails the batch with [`FieldError::Worker`].
    pub fn evaluate(&self, queries: &[Float], options: &EvalOptions) -> Result<Vec<Float>> {
        let dim = self.dim();
        if queries.len() % dim != 0 {
            return Err(FieldError::shape(&[queries.len() / dim, dim], &[queries.len()]));
        }
        options.method.check_dim(dim)?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(options.worker_count.unwrap_or(0))
            .build()
            .map_err(|e| FieldError::WorkerPool(e.to_string()))?;
        debug!(
            "evaluating {} queries on {} threads",
            queries.len() / dim,
            pool.current_num_threads()
        );

        let rows: Vec<Vec<Float>> = pool.install(|| {
            queries
                .par_chunks(dim)
                .enumerate()
                .map(|(index, x)| {
                    self.evaluate_point(x, options.method, options.fill_value)
                        .map_err(|e| FieldError::Worker {
                            index,
                            source: Box::new(e),
                        })
                })
                .collect::<Result<Vec<_>>>()
        })?;
        Ok(rows.concat())
    }
}
