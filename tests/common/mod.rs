use rand::prelude::*;
use rand_distr::StandardNormal;
use spectral_grid::{Float, Grid, PI};

#[allow(dead_code)]
pub const E_TOL: Float = if cfg!(feature = "dprec") { 1E-9 } else { 1E-3 };

/// Grid of normally distributed samples, reproducible from `seed`.
#[allow(dead_code)]
pub fn random_grid(size_x: usize, size_y: usize, seed: u64) -> Grid<Float> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..size_x * size_y)
        .map(|_| rng.sample::<Float, _>(StandardNormal))
        .collect();
    Grid::new(size_x, size_y, data).unwrap()
}

/// Sum of a mode along each axis:
/// `sin(2 pi m_x i / size_x) + cos(2 pi m_y j / size_y)`.
#[allow(dead_code)]
pub fn two_modes(size_x: usize, size_y: usize, m_x: usize, m_y: usize) -> Grid<Float> {
    Grid::from_fn(size_x, size_y, |i, j| {
        (2.0 * PI * (m_x * i) as Float / size_x as Float).sin()
            + (2.0 * PI * (m_y * j) as Float / size_y as Float).cos()
    })
    .unwrap()
}

/// Distance of each cell to cell `(0, 0)` on a periodic square grid, in cells.
#[allow(dead_code)]
pub fn periodic_radii(n: usize) -> Grid<Float> {
    Grid::from_fn(n, n, |i, j| {
        let di = i.min(n - i) as Float;
        let dj = j.min(n - j) as Float;
        (di * di + dj * dj).sqrt()
    })
    .unwrap()
}
