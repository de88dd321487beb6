pub mod fft_2d;
pub mod field;
pub mod filter;
pub mod ghosts;
pub mod grid_field;
pub mod spectral;
pub mod wave_num;

pub use fft_2d::{fft2, ifft2, Fft2D};
pub use ghosts::PeriodicIndex;
pub use spectral::wave_vector_projections;
pub use wave_num::{fft_freq, wave_vector_norm, wave_vectors, WaveVectors};
