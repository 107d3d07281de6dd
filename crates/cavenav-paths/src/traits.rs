use cavenav_core::Point;

/// Neighbour enumeration for graph searches.
pub trait Pather {
    /// Append the neighbours of `p` to `buf`. The caller clears `buf` first.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// A [`Pather`] whose edges carry costs.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to the adjacent `to`. Must be >= 0.
    fn cost(&self, from: Point, to: Point) -> f32;
}
