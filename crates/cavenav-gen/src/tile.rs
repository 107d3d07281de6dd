//! Categorical tiles and the [`TileMap`] produced by cave generation.

use cavenav_core::{Grid, Point, Range};

/// Value of a walkable cell in the binary grid returned by
/// [`TileMap::to_grid`].
pub const WALKABLE: u8 = 1;
/// Value of a blocked cell in the binary grid.
pub const BLOCKED: u8 = 0;

/// A cave tile category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    Floor,
    #[default]
    Wall,
}

impl Tile {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }

    /// Character used by [`TileMap::render`].
    #[inline]
    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => ' ',
            Tile::Wall => '#',
        }
    }
}

/// A generated cave: a grid of [`Tile`]s whose border is always WALL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    tiles: Grid<Tile>,
}

impl TileMap {
    pub(crate) fn from_grid(tiles: Grid<Tile>) -> Self {
        Self { tiles }
    }

    /// The tile at `p`, or `None` outside the map.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Tile> {
        self.tiles.at(p)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.tiles.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.tiles.height()
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.tiles.bounds()
    }

    /// The underlying tile grid.
    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    /// Number of FLOOR tiles.
    pub fn floor_count(&self) -> usize {
        self.tiles.count(Tile::Floor)
    }

    /// Convert to a binary walkability grid: FLOOR → [`WALKABLE`], anything
    /// else → [`BLOCKED`].
    pub fn to_grid(&self) -> Grid<u8> {
        self.tiles.map(|_, t| match t {
            Tile::Floor => WALKABLE,
            Tile::Wall => BLOCKED,
        })
    }

    /// Text dump, one line per row: `' '` for FLOOR, `'#'` for WALL.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.tiles.bounds().len() + self.height() as usize);
        for y in 0..self.height() {
            if let Some(row) = self.tiles.row(y) {
                out.extend(row.iter().map(|t| t.glyph()));
            }
            out.push('\n');
        }
        out
    }
}

impl From<TileMap> for Grid<Tile> {
    fn from(m: TileMap) -> Self {
        m.tiles
    }
}
