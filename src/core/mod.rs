/// Card values and their matrix ordering.
mod value;
/// Export `Value`
pub use self::value::Value;

/// The 169 hand categories.
mod hand;
/// Export `Hand`
pub use self::hand::Hand;

/// Matrix layout and combinatorial accounting.
mod matrix;
pub use self::matrix::{
    GRID_SIZE, GridRow, HAND_COUNT, TOTAL_COMBINATIONS, chebyshev_distance, combinations, grid,
    total_combinations,
};

mod error;
pub use self::error::MatrixError;
