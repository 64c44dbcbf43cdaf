//! Sparse grid keyed by point
//!
//! Cells are stored in a map, so a grid can have holes and negative
//! coordinates. Transforms mirror or rotate the grid inside its own extent:
//!
//! - `rotate_cw`:  `(x, y) -> (max_y - y, x)`
//! - `rotate_ccw`: `(x, y) -> (y, max_x - x)`
//! - `flip_x`:     `(x, y) -> (max_x - x, y)`
//! - `flip_y`:     `(x, y) -> (x, max_y - y)`
//!
//! For a grid anchored at the origin these are the usual quarter turns and
//! mirror images.

use std::collections::HashMap;
use std::fmt;

use super::point::Point;

/// A sparse 2D grid of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cells: HashMap<Point, T>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }
}

impl<T> Grid<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dense grid from rows; row `y`, column `x` lands at `(x, y)`
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = T>,
    {
        let mut cells = HashMap::new();
        for (y, row) in (0..).zip(rows) {
            for (x, value) in (0..).zip(row) {
                cells.insert(Point::new(x, y), value);
            }
        }
        Self { cells }
    }

    pub fn get(&self, point: Point) -> Option<&T> {
        self.cells.get(&point)
    }

    pub fn get_xy(&self, x: i32, y: i32) -> Option<&T> {
        self.get(Point::new(x, y))
    }

    pub fn get_mut(&mut self, point: Point) -> Option<&mut T> {
        self.cells.get_mut(&point)
    }

    /// Set a cell, returning the previous value
    pub fn insert(&mut self, point: Point, value: T) -> Option<T> {
        self.cells.insert(point, value)
    }

    pub fn remove(&mut self, point: Point) -> Option<T> {
        self.cells.remove(&point)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.cells.contains_key(&point)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        self.cells.iter().map(|(p, v)| (*p, v))
    }

    /// Points holding a value equal to `needle`
    pub fn find<'a>(&'a self, needle: &'a T) -> impl Iterator<Item = Point> + 'a
    where
        T: PartialEq,
    {
        self.iter().filter(move |(_, v)| *v == needle).map(|(p, _)| p)
    }

    /// Smallest and largest corner of the occupied area, `None` when empty
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self.cells.keys();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }

    /// Values seen walking from `source` in `direction`, excluding `source`
    ///
    /// Holes are skipped. A source outside the grid walks in until it reaches
    /// the bounds; the walk ends once it is outside and heading away, or when a
    /// coordinate would overflow. A zero direction yields nothing. Use `take(n)` to limit the reach.
    pub fn beam(&self, source: Point, direction: Point) -> Beam<'_, T> {
        let bounds = if direction == Point::ORIGIN {
            None
        } else {
            self.bounds()
        };
        Beam {
            grid: self,
            cursor: source,
            direction,
            bounds,
        }
    }

    /// Transform every key, keeping values
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            cells: self.cells.into_iter().map(|(p, v)| (f(p), v)).collect(),
        }
    }

    /// Transform every value, keeping keys
    pub fn map_values<U>(self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            cells: self.cells.into_iter().map(|(p, v)| (p, f(v))).collect(),
        }
    }

    /// Rotate a quarter turn clockwise
    pub fn rotate_cw(self) -> Self {
        let Some((_, max)) = self.bounds() else {
            return self;
        };
        self.map_points(|p| Point::new(max.y - p.y, p.x))
    }

    /// Rotate a quarter turn counter-clockwise
    pub fn rotate_ccw(self) -> Self {
        let Some((_, max)) = self.bounds() else {
            return self;
        };
        self.map_points(|p| Point::new(p.y, max.x - p.x))
    }

    /// Mirror left to right
    pub fn flip_x(self) -> Self {
        let Some((_, max)) = self.bounds() else {
            return self;
        };
        self.map_points(|p| Point::new(max.x - p.x, p.y))
    }

    /// Mirror top to bottom
    pub fn flip_y(self) -> Self {
        let Some((_, max)) = self.bounds() else {
            return self;
        };
        self.map_points(|p| Point::new(p.x, max.y - p.y))
    }
}

impl<T: fmt::Display> Grid<T> {
    /// Render rows top to bottom, writing `empty` for holes
    ///
    /// Every row ends with a newline; an empty grid renders as "".
    pub fn render(&self, empty: &str) -> String {
        let Some((min, max)) = self.bounds() else {
            return String::new();
        };
        let mut out = String::new();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                match self.get_xy(x, y) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push_str(empty),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Grid<char> {
    /// Parse a character grid, one line per row
    pub fn from_lines(text: &str) -> Self {
        Self::from_rows(text.lines().map(|line| line.chars()))
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(" "))
    }
}

impl<T> FromIterator<(Point, T)> for Grid<T> {
    fn from_iter<I: IntoIterator<Item = (Point, T)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Grid<T> {
    type Item = (Point, T);
    type IntoIter = std::collections::hash_map::IntoIter<Point, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

/// Iterator returned by [`Grid::beam`]
#[derive(Debug, Clone)]
pub struct Beam<'a, T> {
    grid: &'a Grid<T>,
    cursor: Point,
    direction: Point,
    bounds: Option<(Point, Point)>,
}

impl<'a, T> Iterator for Beam<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let (min, max) = self.bounds?;
        let Point { x: dx, y: dy } = self.direction;
        loop {
            let step = self
                .cursor
                .x
                .checked_add(dx)
                .zip(self.cursor.y.checked_add(dy));
            let Some((x, y)) = step else {
                self.bounds = None;
                return None;
            };
            self.cursor = Point::new(x, y);
            // Outside the box is only a dead end when heading further out
            let receding = (x < min.x && dx <= 0)
                || (x > max.x && dx >= 0)
                || (y < min.y && dy <= 0)
                || (y > max.y && dy >= 0);
            if receding {
                self.bounds = None;
                return None;
            }
            if let Some(value) = self.grid.get(self.cursor) {
                return Some(value);
            }
        }
    }
}
