//! Cylindrical averages of periodic grids.
//!
//! Every variant treats cell `(0, 0)` as the zero-radius point and the grid as
//! periodic, so index `-i` is the reflection of index `i`. Profiles are
//! returned as `(radius, mean)` pairs sorted by ascending radius, each sample
//! of a bin weighted equally.

use crate::error::{FieldError, Result};
use crate::flds::field::{FieldDim, Grid, Pos};
use crate::flds::ghosts::PeriodicIndex;
use crate::Float;
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Exact radius used as a bin key. Two radii share a bin only when their bits
/// agree (after folding `-0.0` onto `0.0`); no tolerance is applied.
#[derive(Clone, Copy, Debug)]
pub struct RadiusKey(Float);

impl RadiusKey {
    pub fn new(r: Float) -> RadiusKey {
        if r == 0.0 {
            RadiusKey(0.0)
        } else {
            RadiusKey(r)
        }
    }

    pub fn radius(self) -> Float {
        self.0
    }
}

impl PartialEq for RadiusKey {
    fn eq(&self, other: &RadiusKey) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RadiusKey {}

impl PartialOrd for RadiusKey {
    fn partial_cmp(&self, other: &RadiusKey) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RadiusKey {
    fn cmp(&self, other: &RadiusKey) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Sample values collected per radius key. Reading a key that was never
/// written gives an empty list.
#[derive(Clone, Debug)]
pub struct RadialAccumulator<K> {
    bins: BTreeMap<K, Vec<Float>>,
}

impl<K: Ord> Default for RadialAccumulator<K> {
    fn default() -> RadialAccumulator<K> {
        RadialAccumulator {
            bins: BTreeMap::new(),
        }
    }
}

impl<K: Ord> RadialAccumulator<K> {
    pub fn new() -> RadialAccumulator<K> {
        RadialAccumulator::default()
    }

    pub fn push(&mut self, key: K, values: &[Float]) {
        self.bins.entry(key).or_insert_with(Vec::new).extend_from_slice(values);
    }

    pub fn get(&self, key: &K) -> &[Float] {
        self.bins.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Mean of every bin, in ascending key order.
    pub fn means(&self) -> impl Iterator<Item = (&K, Float)> + '_ {
        self.bins.iter().map(|(k, values)| (k, mean(values)))
    }
}

/// Mean of `values`, zero for an empty slice.
fn mean(values: &[Float]) -> Float {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<Float>() / values.len() as Float
}

fn check_scalar(grid: &Grid<Float>) -> Result<()> {
    if grid.n_comp() != 1 {
        let dim = grid.dim();
        return Err(FieldError::shape(&[dim.size_x, dim.size_y, 1], &grid.shape()));
    }
    Ok(())
}

/// Values at `(i, j)`, `(-i, j)`, `(i, -j)` and `(-i, -j)`.
fn reflections(grid: &Grid<Float>, index: &PeriodicIndex, i: usize, j: usize) -> [Float; 4] {
    let (i, j) = (i as i64, j as i64);
    let at = |row: i64, col: i64| grid.at(index.wrap(row, col))[0];
    [at(i, j), at(-i, j), at(i, -j), at(-i, -j)]
}

/// Cylindrical average of a grid covering a box of sides `box_lengths`.
///
/// Radii are computed from the physical cell separations and used directly as
/// bin keys; only radii up to half the shortest side are kept.
pub fn radial_profile(grid: &Grid<Float>, box_lengths: [Float; 2]) -> Result<Vec<(Float, Float)>> {
    check_scalar(grid)?;
    if box_lengths.iter().any(|l| !(*l > 0.0) || !l.is_finite()) {
        return Err(FieldError::DegenerateInput(format!(
            "box lengths must be positive, got {:?}",
            box_lengths
        )));
    }
    let FieldDim { size_x, size_y } = grid.dim();
    let index = PeriodicIndex::new(grid.dim());
    let sep_x = box_lengths[0] / size_x as Float;
    let sep_y = box_lengths[1] / size_y as Float;
    let r_max = box_lengths[0].min(box_lengths[1]) / 2.0;

    let mut acc = RadialAccumulator::new();
    for i in 0..size_x {
        for j in 0..size_y {
            let dx = i as Float * sep_x;
            let dy = j as Float * sep_y;
            let r = (dx * dx + dy * dy).sqrt();
            if r <= r_max {
                acc.push(RadiusKey::new(r), &reflections(grid, &index, i, j));
            }
        }
    }
    debug!("radial profile: {} bins up to r = {}", acc.len(), r_max);
    Ok(acc.means().map(|(k, m)| (k.radius(), m)).collect())
}

/// Cylindrical average of a square grid covering a box of side `box_length`.
///
/// Bins on the integer squared radius `i^2 + j^2` (in cells), so equal radii
/// always merge; cells up to half the side are kept.
pub fn radial_profile_square(grid: &Grid<Float>, box_length: Float) -> Result<Vec<(Float, Float)>> {
    check_scalar(grid)?;
    let FieldDim { size_x, size_y } = grid.dim();
    if size_x != size_y {
        return Err(FieldError::shape(&[size_x, size_x], &[size_x, size_y]));
    }
    if !(box_length > 0.0) || !box_length.is_finite() {
        return Err(FieldError::DegenerateInput(format!(
            "box length must be positive, got {}",
            box_length
        )));
    }
    let n = size_x;
    let index = PeriodicIndex::new(grid.dim());
    let sep = box_length / n as Float;

    // i^2 + j^2 <= (n / 2)^2, kept in integers
    let max_key = n * n / 4;
    let mut sums = vec![0.0; max_key + 1];
    let mut counts = vec![0usize; max_key + 1];
    for i in 0..n {
        for j in 0..n {
            let key = i * i + j * j;
            if 4 * key > n * n {
                continue;
            }
            for v in reflections(grid, &index, i, j).iter() {
                sums[key] += v;
                counts[key] += 1;
            }
        }
    }

    let mut profile = Vec::new();
    for (key, (s, &c)) in sums.iter().zip(&counts).enumerate() {
        if c > 0 {
            profile.push((sep * (key as Float).sqrt(), s / c as Float));
        }
    }
    debug!("square radial profile: {} bins", profile.len());
    Ok(profile)
}

fn accumulate_by_radius(
    grid: &Grid<Float>,
    radii: &Grid<Float>,
) -> Result<RadialAccumulator<RadiusKey>> {
    check_scalar(grid)?;
    if radii.shape() != grid.shape() {
        return Err(FieldError::shape(&grid.shape(), &radii.shape()));
    }
    let mut acc = RadialAccumulator::new();
    for (&v, &r) in grid.data().iter().zip(radii.data()) {
        acc.push(RadiusKey::new(r), &[v]);
    }
    debug!("radial profile over a radius grid: {} bins", acc.len());
    Ok(acc)
}

/// Cylindrical average with the radius of each cell read from `radii`, a
/// grid of the same shape. Every cell contributes once; there is no folding
/// and no cutoff.
pub fn radial_profile_with_grid(
    grid: &Grid<Float>,
    radii: &Grid<Float>,
) -> Result<Vec<(Float, Float)>> {
    let acc = accumulate_by_radius(grid, radii)?;
    Ok(acc.means().map(|(k, m)| (k.radius(), m)).collect())
}

/// Like [`radial_profile_with_grid`], also returning the grid with every cell
/// replaced by the mean of its radius bin.
pub fn cylindrical_average(
    grid: &Grid<Float>,
    radii: &Grid<Float>,
) -> Result<(Vec<(Float, Float)>, Grid<Float>)> {
    let acc = accumulate_by_radius(grid, radii)?;
    let means: BTreeMap<RadiusKey, Float> = acc.means().map(|(k, m)| (*k, m)).collect();

    let mut averaged = Grid::filled(grid.dim(), 1, 0.0);
    let FieldDim { size_x, size_y } = grid.dim();
    for row in 0..size_x {
        for col in 0..size_y {
            let pos = Pos { row, col };
            let key = RadiusKey::new(radii.at(pos)[0]);
            if let Some(m) = means.get(&key) {
                averaged.at_mut(pos)[0] = *m;
            }
        }
    }
    let profile = means.into_iter().map(|(k, m)| (k.radius(), m)).collect();
    Ok((profile, averaged))
}
