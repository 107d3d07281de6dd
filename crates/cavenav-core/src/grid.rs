//! The [`Grid`] type: a dense 2D grid of cells stored row-major.
//!
//! Unlike a view type, a `Grid` owns its storage: cloning yields an
//! independent copy. Callers that need a scratch overlay (a path trace, a
//! next-generation buffer) clone the grid and mutate the clone.

use crate::geom::{Point, Range};

/// A 2D grid of `T` values with bounds `[0, width) × [0, height)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    cells: Vec<T>,
    bounds: Range,
}

impl<T: Copy> Grid<T> {
    /// Create a new grid of the given dimensions, filled with `fill`.
    ///
    /// Negative dimensions produce an empty grid.
    pub fn new(width: i32, height: i32, fill: T) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![fill; bounds.len()],
            bounds,
        }
    }

    /// Create a grid by evaluating `f` at every point, in row-major order.
    pub fn from_fn(width: i32, height: i32, f: impl FnMut(Point) -> T) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        let cells = bounds.iter().map(f).collect();
        Self { cells, bounds }
    }

    /// Build a grid from row-major rows. Returns `None` if the rows are
    /// ragged.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return None;
            }
            cells.extend_from_slice(row);
        }
        Some(Self {
            cells,
            bounds: Range::new(0, 0, width as i32, height as i32),
        })
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Size as a `Point` (width = x, height = y).
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.bounds.width() as usize + p.x as usize)
    }

    /// The cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<T> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Set the cell at `p`. Does nothing if out of bounds.
    #[inline]
    pub fn set(&mut self, p: Point, v: T) {
        if let Some(i) = self.index(p) {
            self.cells[i] = v;
        }
    }

    /// Fill the whole grid with `v`.
    pub fn fill(&mut self, v: T) {
        self.cells.fill(v);
    }

    /// A new grid of the same shape with `f` applied to every cell.
    pub fn map<U: Copy>(&self, mut f: impl FnMut(Point, T) -> U) -> Grid<U> {
        let cells = self
            .bounds
            .iter()
            .zip(self.cells.iter())
            .map(|(p, &c)| f(p, c))
            .collect();
        Grid {
            cells,
            bounds: self.bounds,
        }
    }

    /// Count how many cells satisfy a predicate.
    pub fn count_fn(&self, mut f: impl FnMut(Point, T) -> bool) -> usize {
        self.iter().filter(|&(p, c)| f(p, c)).count()
    }

    /// Iterate over `(Point, T)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, T)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }

    /// Row `y` as a slice, or `None` if out of bounds.
    pub fn row(&self, y: i32) -> Option<&[T]> {
        if y < 0 || y >= self.height() {
            return None;
        }
        let w = self.width() as usize;
        let start = y as usize * w;
        Some(&self.cells[start..start + w])
    }
}

impl<T: Copy + PartialEq> Grid<T> {
    /// Count how many cells equal `v`.
    pub fn count(&self, v: T) -> usize {
        self.cells.iter().filter(|&&c| c == v).count()
    }
}
