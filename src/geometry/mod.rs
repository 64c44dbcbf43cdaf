//! Integer geometry for puzzle grids
//!
//! Coordinates follow screen convention: `x` grows to the right and `y` grows
//! downwards, so [`UP`] is `(0, -1)`.

mod grid;
mod point;

pub use grid::{Beam, Grid};
pub use point::{
    Point, DIAGONAL_DIRECTIONS, DIRECTIONS, DOWN, DOWN_LEFT, DOWN_RIGHT, LEFT, MAIN_DIRECTIONS,
    RIGHT, UP, UP_LEFT, UP_RIGHT,
};
