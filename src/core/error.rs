use thiserror::Error;

/// Errors produced while reading hand labels or grid coordinates.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum MatrixError {
    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Grid position ({row}, {col}) is outside the 13x13 matrix")]
    InvalidGridPosition { row: usize, col: usize },
}
