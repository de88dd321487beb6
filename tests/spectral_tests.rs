mod common;

use common::E_TOL;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use spectral_grid::flds::wave_vector_projections;
use spectral_grid::{Config, Float, Grid, Pos, Sampling, SpectralGridField, PI};

#[test]
fn random_grid_roundtrip() {
    let grid = common::random_grid(16, 12, 7);
    let spectral = SpectralGridField::new(grid.clone(), 0.25).unwrap();
    let signal = spectral.filter().get_signal();
    assert_eq!(signal.shape(), grid.shape());
    for (v1, v2) in signal.data().iter().zip(grid.data()) {
        assert!((v1.re - v2).abs() < E_TOL);
        assert!(v1.im.abs() < E_TOL);
    }
}

#[test]
fn same_threshold_cuts_keep_only_the_boundary() {
    let spectral = SpectralGridField::new(common::random_grid(12, 10, 3), 1.0).unwrap();
    let filter = spectral.filter();
    let norms = filter.wave_vectors().k_norm().to_vec();
    let t = norms[11];
    let cut = filter.cut_low_wave_frequencies(t).cut_high_wave_frequencies(t);
    let mut kept = 0;
    for ((v, orig), k) in cut
        .signal_fft()
        .data()
        .iter()
        .zip(filter.signal_fft().data())
        .zip(&norms)
    {
        if *k == t {
            assert_eq!(v, orig);
            kept += 1;
        } else {
            assert_eq!(*v, Complex::zero());
        }
    }
    assert!(kept >= 1);
}

#[test]
fn band_cuts_separate_modes() {
    // |k| = pi / 4 for the first mode, 5 pi / 8 for the second
    let grid = common::two_modes(16, 16, 2, 5);
    let spectral = SpectralGridField::new(grid.clone(), 1.0).unwrap();

    let low = spectral.filter().cut_high_wave_frequencies(1.0).get_signal();
    let high = spectral.filter().cut_low_wave_frequencies(1.0).get_signal();
    for i in 0..16 {
        for j in 0..16 {
            let pos = Pos { row: i, col: j };
            let sin_part = (2.0 * PI * (2 * i) as Float / 16.0).sin();
            let cos_part = (2.0 * PI * (5 * j) as Float / 16.0).cos();
            assert!((low.at(pos)[0].re - sin_part).abs() < E_TOL);
            assert!((high.at(pos)[0].re - cos_part).abs() < E_TOL);
        }
    }

    // the same split in terms of wave lengths, 2 pi / 1.0
    let long = spectral.filter().cut_low_wave_lengths(2.0 * PI).get_signal();
    for (a, b) in long.data().iter().zip(low.data()) {
        assert!((a - b).norm() < E_TOL);
    }
}

#[test]
fn smoothing_from_config() {
    let cfg = Config::from_toml_str(
        r#"
        [spectral]
        sample_spacing = 0.5
        sigma = 0.75
        "#,
    )
    .unwrap();
    let grid = common::random_grid(20, 16, 11);
    let spectral = SpectralGridField::from_params(grid.clone(), &cfg.spectral).unwrap();
    assert_eq!(spectral.sample_spacing(), 0.5);

    let smoothed = spectral.gaussian_smoothed(cfg.spectral.sigma);
    // the mean is untouched, the fluctuations are damped
    let sum: Float = grid.data().iter().sum();
    let smoothed_sum: Float = smoothed.data().iter().sum();
    assert!((sum - smoothed_sum).abs() < 10.0 * E_TOL);
    let power: Float = grid.data().iter().map(|v| v * v).sum();
    let smoothed_power: Float = smoothed.data().iter().map(|v| v * v).sum();
    assert!(smoothed_power < power);
}

#[test]
fn cell_centres_read_back_the_grid() {
    let grid = common::random_grid(8, 6, 5);
    let spectral = SpectralGridField::new(grid.clone(), 2.0).unwrap();
    let field = spectral.field();
    let coords = field.grid_coordinates().unwrap();
    for row in 0..8 {
        for col in 0..6 {
            let c = coords.at(Pos { row, col });
            let cell = field.value_at_cartesian(c[0], c[1], Sampling::Cell).unwrap();
            let smooth = field.value_at_cartesian(c[0], c[1], Sampling::Bilinear).unwrap();
            assert_eq!(cell[0], grid.get(row, col));
            assert!((smooth[0] - grid.get(row, col)).abs() < E_TOL);
        }
    }
    // extent is (-8, 8, -6, 6)
    assert!(field.value_at_cartesian(8.5, 0.0, Sampling::Cell).is_none());
    assert!(field
        .value_at_polar(5.0, 0.5 * PI, (0.0, 0.0), Sampling::Cell)
        .is_some());
}

#[test]
fn transverse_field_has_no_longitudinal_part() {
    // v = (0, cos(2 pi i / n)) varies across its own direction only
    let n = 8;
    let mut data = Vec::with_capacity(2 * n * n);
    for i in 0..n {
        for _ in 0..n {
            data.push(0.0);
            data.push((2.0 * PI * i as Float / n as Float).cos());
        }
    }
    let grid = Grid::with_components(n, n, 2, data).unwrap();
    let (cross, dot) = wave_vector_projections(&grid).unwrap();
    assert!(dot.data().iter().all(|v| v.norm() < E_TOL));
    // cos mode lands in bins (1, 0) and (n - 1, 0), k = (+-2 pi / n, 0)
    let peak = cross.at(Pos { row: 1, col: 0 })[0];
    assert!((peak.norm() - (n * n / 2) as Float).abs() < E_TOL);
}
