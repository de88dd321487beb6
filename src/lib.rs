use serde::Deserialize;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub mod error;
pub mod flds;
pub mod maths;
pub mod periodic;
pub mod radial;

pub use error::FieldError;
pub use flds::field::{FieldDim, Grid, Pos};
pub use flds::filter::FourierFilter;
pub use flds::grid_field::{Extent, GridField, Sampling};
pub use flds::spectral::SpectralGridField;
pub use periodic::{EvalOptions, Interpolation, PeriodicWrap};

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

pub const PI: Float = std::f64::consts::PI as Float;

#[cfg(all(test, feature = "dprec"))]
pub(crate) const E_TOL: Float = 1E-10;

#[cfg(all(test, not(feature = "dprec")))]
pub(crate) const E_TOL: Float = 1E-4;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spectral: SpectralParams,
    #[serde(default)]
    pub periodic: PeriodicParams,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpectralParams {
    pub sample_spacing: Float,
    pub sigma: Float,
}

impl Default for SpectralParams {
    fn default() -> SpectralParams {
        SpectralParams {
            sample_spacing: 1.0,
            sigma: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PeriodicParams {
    pub method: Interpolation,
    pub fill_value: Float,
    /// Number of evaluation threads, the CPU count when absent.
    pub worker_count: Option<usize>,
}

impl Config {
    pub fn new() -> Result<Config> {
        Config::from_file("config.toml")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not open the config file {}", path.display()))?;
        Config::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        toml::from_str(contents).with_context(|| "Could not parse Config file")
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let cfg = Config::from_toml_str(
            r#"
            [spectral]
            sample_spacing = 0.5
            sigma = 2.0

            [periodic]
            method = "nearest"
            fill_value = -1.0
            worker_count = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.spectral.sample_spacing, 0.5);
        assert_eq!(cfg.spectral.sigma, 2.0);
        assert_eq!(cfg.periodic.method, Interpolation::Nearest);
        assert_eq!(cfg.periodic.fill_value, -1.0);
        assert_eq!(cfg.periodic.worker_count, Some(3));
    }

    #[test]
    fn missing_entries_take_defaults() {
        let cfg = Config::from_toml_str("[periodic]\nfill_value = 2.5\n").unwrap();
        assert_eq!(cfg.spectral.sample_spacing, 1.0);
        assert_eq!(cfg.spectral.sigma, 0.0);
        assert_eq!(cfg.periodic.method, Interpolation::Linear);
        assert_eq!(cfg.periodic.fill_value, 2.5);
        assert_eq!(cfg.periodic.worker_count, None);

        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.periodic.method, Interpolation::Linear);
    }

    #[test]
    fn bad_config_is_reported() {
        assert!(Config::from_toml_str("[periodic]\nmethod = \"cubic\"\n").is_err());
        assert!(Config::from_file("no/such/config.toml").is_err());
    }
}
