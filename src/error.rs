/// Errors surfaced by the grid, filter, profile and periodic-wrap layers.
///
/// Out-of-extent lookups are not errors; they come back as `None`.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("{method} interpolation is not supported in {dim} dimensions")]
    UnsupportedDimension { method: &'static str, dim: usize },

    #[error("failed to create thread pool: {0}")]
    WorkerPool(String),

    #[error("evaluation of query {index} failed")]
    Worker {
        index: usize,
        #[source]
        source: Box<FieldError>,
    },
}

pub type Result<T> = std::result::Result<T, FieldError>;

impl FieldError {
    pub(crate) fn shape(expected: &[usize], found: &[usize]) -> FieldError {
        FieldError::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}
