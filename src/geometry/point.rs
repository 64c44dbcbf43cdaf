//! 2D integer point / vector

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point on the integer grid, also used as a direction vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub const UP: Point = Point::new(0, -1);
pub const DOWN: Point = Point::new(0, 1);
pub const LEFT: Point = Point::new(-1, 0);
pub const RIGHT: Point = Point::new(1, 0);
pub const UP_RIGHT: Point = Point::new(1, -1);
pub const UP_LEFT: Point = Point::new(-1, -1);
pub const DOWN_RIGHT: Point = Point::new(1, 1);
pub const DOWN_LEFT: Point = Point::new(-1, 1);

/// The four orthogonal directions
pub const MAIN_DIRECTIONS: [Point; 4] = [UP, DOWN, LEFT, RIGHT];

/// The four diagonal directions
pub const DIAGONAL_DIRECTIONS: [Point; 4] = [UP_RIGHT, UP_LEFT, DOWN_RIGHT, DOWN_LEFT];

/// All eight directions, orthogonal first
pub const DIRECTIONS: [Point; 8] = [
    UP, DOWN, LEFT, RIGHT, UP_RIGHT, UP_LEFT, DOWN_RIGHT, DOWN_LEFT,
];

impl Point {
    pub const ORIGIN: Point = Point::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point
    pub fn manhattan(&self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbors
    pub fn neighbors(&self) -> impl Iterator<Item = Point> + '_ {
        MAIN_DIRECTIONS.iter().map(move |d| *self + *d)
    }

    /// All eight neighbors, diagonals included
    pub fn all_neighbors(&self) -> impl Iterator<Item = Point> + '_ {
        DIRECTIONS.iter().map(move |d| *self + *d)
    }

    /// Quarter turn clockwise when used as a direction (`UP` becomes `RIGHT`)
    pub fn turn_right(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Quarter turn counter-clockwise when used as a direction (`UP` becomes `LEFT`)
    pub fn turn_left(&self) -> Point {
        Point::new(self.y, -self.x)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, factor: i32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
