//! Connected-component labelling.

use cavenav_core::{Grid, Point};

use crate::graph::Graph;

/// Component labels for every node of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    labels: Grid<i32>,
    sizes: Vec<usize>,
}

impl Graph {
    /// Label every node with a connected-component ID.
    ///
    /// Two nodes share a label if a chain of edges joins them. Labels are
    /// assigned in row-major order of each component's first node, so they
    /// are stable across identical graphs.
    pub fn components(&self) -> Components {
        let b = self.bounds();
        let mut labels = Grid::new(b.width(), b.height(), -1);
        let mut sizes = Vec::new();
        let mut stack: Vec<Point> = Vec::new();

        for start in self.nodes() {
            if labels.at(start) != Some(-1) {
                continue;
            }

            // Iterative DFS from `start`.
            let label = sizes.len() as i32;
            let mut size = 0;
            labels.set(start, label);
            stack.push(start);

            while let Some(p) = stack.pop() {
                size += 1;
                for e in self.neighbors(p) {
                    if labels.at(e.to) == Some(-1) {
                        labels.set(e.to, label);
                        stack.push(e.to);
                    }
                }
            }

            sizes.push(size);
        }

        Components { labels, sizes }
    }
}

impl Components {
    /// Component of node `p`, or `None` if `p` is not a node.
    #[inline]
    pub fn label(&self, p: Point) -> Option<usize> {
        match self.labels.at(p) {
            Some(l) if l >= 0 => Some(l as usize),
            _ => None,
        }
    }

    /// Number of components.
    #[inline]
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Node count of component `label` (0 for unknown labels).
    #[inline]
    pub fn size(&self, label: usize) -> usize {
        self.sizes.get(label).copied().unwrap_or(0)
    }

    /// Label of the component with the most nodes; ties go to the lower
    /// label.
    pub fn largest(&self) -> Option<usize> {
        self.sizes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map(|(l, _)| l)
    }

    /// Whether `a` and `b` are nodes of the same component.
    #[inline]
    pub fn connected(&self, a: Point, b: Point) -> bool {
        matches!((self.label(a), self.label(b)), (Some(x), Some(y)) if x == y)
    }
}
