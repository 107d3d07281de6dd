//! Grid-to-graph conversion.
//!
//! Every walkable cell (non-zero value) of a binary grid becomes one node,
//! identified by its cell coordinates. Adjacent walkable cells are joined by
//! bidirectional edges of weight 1 (axis-aligned) or √2 (diagonal). A
//! diagonal edge exists only when both cells it squeezes between are also
//! walkable, so no edge cuts a wall corner.

use std::f32::consts::SQRT_2;

use cavenav_core::{Grid, Point, Range};

use crate::traits::{Pather, WeightedPather};

/// Which cell adjacencies become edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Axis-aligned neighbours only.
    Four,
    /// Axis-aligned and diagonal neighbours.
    #[default]
    Eight,
}

/// A weighted edge to an adjacent node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub to: Point,
    pub weight: f32,
}

/// Traversable nodes of a grid and their weighted adjacency.
///
/// Immutable once built. Neighbour lists are kept in a fixed order
/// (clockwise from up), so repeated conversions of the same grid compare
/// equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    bounds: Range,
    width: usize,
    connectivity: Connectivity,
    present: Vec<bool>,
    adjacency: Vec<Vec<Edge>>,
    node_count: usize,
    edge_count: usize,
}

/// Convert a binary grid into an 8-connected [`Graph`].
pub fn make_graph(grid: &Grid<u8>) -> Graph {
    make_graph_with(grid, Connectivity::Eight)
}

/// Convert a binary grid into a [`Graph`] with the given connectivity.
pub fn make_graph_with(grid: &Grid<u8>, connectivity: Connectivity) -> Graph {
    let bounds = grid.bounds();
    let walkable = |p: Point| grid.at(p).is_some_and(|v| v != 0);
    let present: Vec<bool> = grid.iter().map(|(_, v)| v != 0).collect();

    let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); bounds.len()];
    let mut node_count = 0;
    let mut half_edges = 0;
    for (i, p) in bounds.iter().enumerate() {
        if !present[i] {
            continue;
        }
        node_count += 1;
        let edges = &mut adjacency[i];
        for n in p.neighbors_8() {
            if !walkable(n) {
                continue;
            }
            let weight = if p.is_diagonal_to(n) {
                if connectivity == Connectivity::Four
                    || !walkable(Point::new(n.x, p.y))
                    || !walkable(Point::new(p.x, n.y))
                {
                    continue;
                }
                SQRT_2
            } else {
                1.0
            };
            edges.push(Edge { to: n, weight });
        }
        half_edges += edges.len();
    }

    let g = Graph {
        bounds,
        width: bounds.width().max(0) as usize,
        connectivity,
        present,
        adjacency,
        node_count,
        edge_count: half_edges / 2,
    };
    log::debug!(
        "built {:?}-connected graph over {}: {} nodes, {} edges",
        connectivity,
        bounds,
        g.node_count,
        g.edge_count
    );
    g
}

impl Graph {
    /// The cell range the graph was built over.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `p` is a node (a walkable cell).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.present[i])
    }

    /// Edges leaving `p`; empty for non-nodes.
    #[inline]
    pub fn neighbors(&self, p: Point) -> &[Edge] {
        match self.idx(p) {
            Some(i) => &self.adjacency[i],
            None => &[],
        }
    }

    /// Weight of the edge between `a` and `b`, if there is one.
    pub fn weight(&self, a: Point, b: Point) -> Option<f32> {
        self.neighbors(a).iter().find(|e| e.to == b).map(|e| e.weight)
    }

    /// All nodes in row-major order.
    pub fn nodes(&self) -> impl Iterator<Item = Point> + '_ {
        self.bounds
            .iter()
            .zip(self.present.iter())
            .filter_map(|(p, &here)| here.then_some(p))
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Flat index of `p`, or `None` if out of range.
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let x = (p.x - self.bounds.min.x) as usize;
        let y = (p.y - self.bounds.min.y) as usize;
        Some(y * self.width + x)
    }
}

impl Pather for Graph {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(Graph::neighbors(self, p).iter().map(|e| e.to));
    }
}

impl WeightedPather for Graph {
    fn cost(&self, from: Point, to: Point) -> f32 {
        self.weight(from, to).unwrap_or(f32::INFINITY)
    }
}
