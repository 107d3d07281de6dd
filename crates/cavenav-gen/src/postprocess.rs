//! Clean-up passes run after cellular-automaton smoothing.

use cavenav_core::{Grid, Point, Range};

use crate::tile::Tile;

/// Optional clean-up passes, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostProcess {
    /// Remove lone wall pillars and fill sealed one-cell pockets.
    pub smooth_points: bool,
    /// Round off convex wall corners.
    pub smooth_corners: bool,
    /// Fill every floor region except the largest.
    pub keep_largest_region: bool,
}

/// Run the enabled passes in order: points, corners, regions.
pub(crate) fn apply(mut tiles: Grid<Tile>, interior: Range, post: &PostProcess) -> Grid<Tile> {
    if post.smooth_points {
        tiles = smooth_points(&tiles, interior);
    }
    if post.smooth_corners {
        tiles = smooth_corners(&tiles, interior);
    }
    if post.keep_largest_region {
        keep_largest_region(&mut tiles);
    }
    tiles
}

fn is_wall(tiles: &Grid<Tile>, p: Point) -> bool {
    tiles.at(p).is_none_or(Tile::is_wall)
}

fn smooth_points(prev: &Grid<Tile>, interior: Range) -> Grid<Tile> {
    prev.map(|p, t| {
        if !interior.contains(p) {
            return Tile::Wall;
        }
        let walls = p.neighbors_4().iter().filter(|&&n| is_wall(prev, n)).count();
        match t {
            Tile::Wall if walls == 0 => Tile::Floor,
            Tile::Floor if walls == 4 => Tile::Wall,
            _ => t,
        }
    })
}

fn smooth_corners(prev: &Grid<Tile>, interior: Range) -> Grid<Tile> {
    prev.map(|p, t| {
        if t != Tile::Wall || !interior.contains(p) {
            return t;
        }
        for dy in [-1, 1] {
            for dx in [-1, 1] {
                let open = !is_wall(prev, p.shift(dx, 0))
                    && !is_wall(prev, p.shift(0, dy))
                    && !is_wall(prev, p.shift(dx, dy));
                if open {
                    return Tile::Floor;
                }
            }
        }
        Tile::Wall
    })
}

/// Label 4-connected floor regions and wall off all but the largest.
/// Returns the size of the kept region.
fn keep_largest_region(tiles: &mut Grid<Tile>) -> usize {
    let bounds = tiles.bounds();
    let mut labels: Grid<i32> = Grid::new(bounds.width(), bounds.height(), -1);
    let mut sizes: Vec<usize> = Vec::new();
    let mut stack: Vec<Point> = Vec::new();

    for start in bounds.iter() {
        if tiles.at(start) != Some(Tile::Floor) || labels.at(start) != Some(-1) {
            continue;
        }
        let label = sizes.len() as i32;
        let mut size = 0;
        labels.set(start, label);
        stack.push(start);
        while let Some(p) = stack.pop() {
            size += 1;
            for n in p.neighbors_4() {
                if tiles.at(n) == Some(Tile::Floor) && labels.at(n) == Some(-1) {
                    labels.set(n, label);
                    stack.push(n);
                }
            }
        }
        sizes.push(size);
    }

    // Ties keep the region found first in row-major order.
    let Some((keep, &kept)) = sizes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
    else {
        return 0;
    };
    let keep = keep as i32;
    for p in bounds.iter() {
        if labels.at(p).is_some_and(|l| l >= 0 && l != keep) {
            tiles.set(p, Tile::Wall);
        }
    }
    log::trace!("kept floor region of {kept} cells out of {} regions", sizes.len());
    kept
}
