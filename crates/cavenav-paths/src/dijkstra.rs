//! Single-source distance fields.

use std::collections::BinaryHeap;

use cavenav_core::{Point, Range};

use crate::traits::WeightedPather;

/// Reference into the cost array, ordered by `cost` for use in `BinaryHeap`.
#[derive(Clone, Copy, PartialEq)]
struct NodeRef {
    idx: usize,
    cost: f32,
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest cost first; ties
        // pop the lower index first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path cost from every reachable cell to one target cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    target: Point,
    bounds: Range,
    width: usize,
    cost: Vec<f32>,
    reached: usize,
}

impl DistanceField {
    /// Run Dijkstra from `target` over the cells of `bounds`.
    ///
    /// Edge costs must be non-negative. Cells outside `bounds` are never
    /// visited; a target outside `bounds` yields an empty field.
    pub fn compute<P: WeightedPather>(pather: &P, bounds: Range, target: Point) -> Self {
        let mut field = Self {
            target,
            bounds,
            width: bounds.width().max(0) as usize,
            cost: vec![f32::INFINITY; bounds.len()],
            reached: 0,
        };
        let Some(ti) = field.idx(target) else {
            return field;
        };

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        field.cost[ti] = 0.0;
        open.push(NodeRef { idx: ti, cost: 0.0 });

        let mut nbuf: Vec<Point> = Vec::with_capacity(8);

        while let Some(current) = open.pop() {
            let ci = current.idx;
            // Skip stale entries.
            if current.cost > field.cost[ci] {
                continue;
            }
            field.reached += 1;

            let cp = field.point(ci);
            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = field.idx(np) else {
                    continue;
                };
                let tentative = current.cost + pather.cost(cp, np);
                if tentative >= field.cost[ni] {
                    continue;
                }
                field.cost[ni] = tentative;
                open.push(NodeRef {
                    idx: ni,
                    cost: tentative,
                });
            }
        }

        field
    }

    /// The cell this field is rooted at.
    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Cost from `p` to the target, or `None` if `p` was not reached.
    #[inline]
    pub fn at(&self, p: Point) -> Option<f32> {
        let c = self.cost[self.idx(p)?];
        c.is_finite().then_some(c)
    }

    /// Number of cells reached, the target included.
    #[inline]
    pub fn reached(&self) -> usize {
        self.reached
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let x = (p.x - self.bounds.min.x) as usize;
        let y = (p.y - self.bounds.min.y) as usize;
        Some(y * self.width + x)
    }

    #[inline]
    fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.bounds.min.x;
        let y = (idx / self.width) as i32 + self.bounds.min.y;
        Point::new(x, y)
    }
}
