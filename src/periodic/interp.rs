use crate::error::{FieldError, Result};
use crate::Float;
use delaunator::{triangulate, Point};
use log::{trace, warn};
use serde::Deserialize;

/// Tolerance on barycentric coordinates when deciding whether a point lies
/// in a triangle, so points on shared edges are not lost to rounding.
const BARY_TOL: Float = 1E3 * Float::EPSILON;

/// How scattered samples are interpolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Value of the closest sample, in any number of dimensions.
    Nearest,
    /// Piecewise linear over the samples' convex hull, in one or two
    /// dimensions; the fill value is used outside the hull.
    Linear,
}

impl Default for Interpolation {
    fn default() -> Interpolation {
        Interpolation::Linear
    }
}

impl Interpolation {
    pub fn name(self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Linear => "linear",
        }
    }

    /// Fails unless the method handles `dim`-dimensional samples.
    pub fn check_dim(self, dim: usize) -> Result<()> {
        match self {
            Interpolation::Linear if dim > 2 => Err(FieldError::UnsupportedDimension {
                method: self.name(),
                dim,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
enum Mesh {
    /// Sample indices sorted by coordinate.
    Line(Vec<usize>),
    Triangles(Vec<[usize; 3]>),
    /// No linear mesh in this dimension.
    Unsupported,
}

/// Interpolates values known at scattered points.
///
/// `points` holds `n` points of `dim` coordinates, `values` the `n_comp`
/// components of each, both flat and point-major.
#[derive(Clone, Debug)]
pub struct ScatteredInterpolator {
    dim: usize,
    n_comp: usize,
    points: Vec<Float>,
    values: Vec<Float>,
    mesh: Mesh,
}

impl ScatteredInterpolator {
    pub fn new(
        dim: usize,
        n_comp: usize,
        points: Vec<Float>,
        values: Vec<Float>,
    ) -> Result<ScatteredInterpolator> {
        if dim == 0 || n_comp == 0 || points.is_empty() {
            return Err(FieldError::DegenerateInput(format!(
                "need at least one sample with coordinates and values, got dim {} and {} components",
                dim, n_comp
            )));
        }
        if points.len() % dim != 0 {
            return Err(FieldError::shape(&[points.len() / dim, dim], &[points.len()]));
        }
        let n = points.len() / dim;
        if values.len() != n * n_comp {
            return Err(FieldError::shape(&[n, n_comp], &[values.len()]));
        }
        if points.iter().any(|x| !x.is_finite()) {
            return Err(FieldError::DegenerateInput(
                "sample coordinates must be finite".to_string(),
            ));
        }

        let mesh = match dim {
            1 => {
                let mut order: Vec<usize> = (0..n).collect();
                order.sort_by(|&a, &b| points[a].total_cmp(&points[b]));
                Mesh::Line(order)
            }
            2 => {
                let coords: Vec<Point> = points
                    .chunks(2)
                    .map(|p| Point {
                        x: p[0] as f64,
                        y: p[1] as f64,
                    })
                    .collect();
                let result = triangulate(&coords);
                let triangles: Vec<[usize; 3]> = result
                    .triangles
                    .chunks(3)
                    .map(|t| [t[0], t[1], t[2]])
                    .collect();
                if triangles.is_empty() && n > 1 {
                    warn!(
                        "{} samples do not span a triangle; linear interpolation will give the fill value",
                        n
                    );
                }
                trace!("triangulated {} samples into {} triangles", n, triangles.len());
                Mesh::Triangles(triangles)
            }
            _ => Mesh::Unsupported,
        };

        Ok(ScatteredInterpolator {
            dim,
            n_comp,
            points,
            values,
            mesh,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    pub fn len(&self) -> usize {
        self.points.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Float] {
        &self.points
    }

    fn point(&self, i: usize) -> &[Float] {
        &self.points[i * self.dim..(i + 1) * self.dim]
    }

    fn value(&self, i: usize) -> &[Float] {
        &self.values[i * self.n_comp..(i + 1) * self.n_comp]
    }

    /// Interpolated value at `q`.
    pub fn interpolate(&self, q: &[Float], method: Interpolation, fill_value: Float) -> Result<Vec<Float>> {
        if q.len() != self.dim {
            return Err(FieldError::shape(&[self.dim], &[q.len()]));
        }
        match method {
            Interpolation::Nearest => Ok(self.nearest(q)),
            Interpolation::Linear => self.linear(q, fill_value),
        }
    }

    fn nearest(&self, q: &[Float]) -> Vec<Float> {
        let mut best = 0;
        let mut best_dist = Float::INFINITY;
        for i in 0..self.len() {
            let dist: Float = self
                .point(i)
                .iter()
                .zip(q)
                .map(|(p, x)| (p - x) * (p - x))
                .sum();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        self.value(best).to_vec()
    }

    fn linear(&self, q: &[Float], fill_value: Float) -> Result<Vec<Float>> {
        match &self.mesh {
            Mesh::Line(order) => Ok(self.linear_1d(order, q[0], fill_value)),
            Mesh::Triangles(triangles) => Ok(self.linear_2d(triangles, q, fill_value)),
            Mesh::Unsupported => Err(FieldError::UnsupportedDimension {
                method: Interpolation::Linear.name(),
                dim: self.dim,
            }),
        }
    }

    fn linear_1d(&self, order: &[usize], x: Float, fill_value: Float) -> Vec<Float> {
        let first = self.points[order[0]];
        let last = self.points[order[order.len() - 1]];
        if x < first || x > last {
            return vec![fill_value; self.n_comp];
        }
        // number of samples at or left of x, at least one
        let above = order.partition_point(|&i| self.points[i] <= x);
        if above == order.len() {
            return self.value(order[above - 1]).to_vec();
        }
        let (i0, i1) = (order[above - 1], order[above]);
        let (x0, x1) = (self.points[i0], self.points[i1]);
        let t = (x - x0) / (x1 - x0);
        self.value(i0)
            .iter()
            .zip(self.value(i1))
            .map(|(v0, v1)| v0 + t * (v1 - v0))
            .collect()
    }

    fn linear_2d(&self, triangles: &[[usize; 3]], q: &[Float], fill_value: Float) -> Vec<Float> {
        for tri in triangles {
            let a = self.point(tri[0]);
            let b = self.point(tri[1]);
            let c = self.point(tri[2]);
            let det = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
            if det == 0.0 {
                continue;
            }
            let l0 = ((b[1] - c[1]) * (q[0] - c[0]) + (c[0] - b[0]) * (q[1] - c[1])) / det;
            let l1 = ((c[1] - a[1]) * (q[0] - c[0]) + (a[0] - c[0]) * (q[1] - c[1])) / det;
            let l2 = 1.0 - l0 - l1;
            if l0 >= -BARY_TOL && l1 >= -BARY_TOL && l2 >= -BARY_TOL {
                let mut out = vec![0.0; self.n_comp];
                for (w, &i) in [l0, l1, l2].iter().zip(tri.iter()) {
                    for (o, v) in out.iter_mut().zip(self.value(i)) {
                        *o += w * v;
                    }
                }
                return out;
            }
        }
        vec![fill_value; self.n_comp]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::E_TOL;

    #[test]
    fn piecewise_linear_line() {
        // samples given out of order
        let interp =
            ScatteredInterpolator::new(1, 1, vec![2.0, 0.0, 1.0], vec![4.0, 0.0, 1.0]).unwrap();
        let at = |x: Float| interp.interpolate(&[x], Interpolation::Linear, -1.0).unwrap()[0];
        assert!((at(0.5) - 0.5).abs() < E_TOL);
        assert!((at(1.5) - 2.5).abs() < E_TOL);
        assert_eq!(at(2.0), 4.0);
        assert_eq!(at(0.0), 0.0);
        assert_eq!(at(2.5), -1.0);
        assert_eq!(at(-0.1), -1.0);
    }

    #[test]
    fn triangles_reproduce_planes() {
        let points: Vec<Float> = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let values: Vec<Float> = points.chunks(2).map(|p| p[0] + 2.0 * p[1]).collect();
        let interp = ScatteredInterpolator::new(2, 1, points, values).unwrap();
        let queries: [[Float; 2]; 4] = [[0.25, 0.5], [0.9, 0.1], [1.0, 1.0], [0.5, 0.5]];
        for q in queries.iter() {
            let v = interp.interpolate(q, Interpolation::Linear, 0.0).unwrap();
            assert!((v[0] - (q[0] + 2.0 * q[1])).abs() < E_TOL);
        }
        let outside = interp.interpolate(&[1.5, 0.5], Interpolation::Linear, 9.0).unwrap();
        assert_eq!(outside, vec![9.0]);
    }

    #[test]
    fn nearest_in_three_dimensions() {
        let points = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let values = vec![1.0, -1.0, 2.0, -2.0];
        let interp = ScatteredInterpolator::new(3, 2, points, values).unwrap();
        let v = interp
            .interpolate(&[0.8, 0.6, 0.9], Interpolation::Nearest, 0.0)
            .unwrap();
        assert_eq!(v, vec![2.0, -2.0]);
        assert!(matches!(
            interp.interpolate(&[0.0, 0.0, 0.0], Interpolation::Linear, 0.0),
            Err(FieldError::UnsupportedDimension { dim: 3, .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_samples() {
        assert!(ScatteredInterpolator::new(2, 1, vec![0.0, 1.0, 2.0], vec![0.0]).is_err());
        assert!(ScatteredInterpolator::new(1, 1, vec![0.0, 1.0], vec![0.0]).is_err());
        assert!(ScatteredInterpolator::new(1, 1, vec![Float::NAN], vec![0.0]).is_err());
    }
}
