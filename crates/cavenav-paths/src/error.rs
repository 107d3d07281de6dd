use std::fmt;

use cavenav_core::{Point, Range};

/// Setup-time errors. These are fatal for the caller: fix the
/// configuration and rebuild.
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
    /// A [`NavInfo`](crate::NavInfo) field is out of range.
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
    /// The collision grid does not cover the same cells as the graph.
    ConfigurationMismatch { graph: Range, grid: Range },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, reason } => {
                write!(f, "invalid navigation configuration: `{field}` {reason}")
            }
            Self::ConfigurationMismatch { graph, grid } => {
                write!(f, "collision grid bounds {grid} do not match graph bounds {graph}")
            }
        }
    }
}

impl std::error::Error for NavError {}

/// Per-step query errors. Recoverable: the caller decides whether to drop
/// the route or retry from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// The cell is not walkable or lies outside the map.
    Wall(Point),
    /// No path connects the two cells.
    NoRoute { from: Point, to: Point },
    /// A position, angle or distance was NaN or infinite.
    NonFinite,
    /// [`resolve_move`](crate::NavigationGraph::resolve_move) was called
    /// before a collision grid was bound.
    NoCollisionGrid,
}

impl QueryError {
    /// Heading reported in place of a real one when a query fails.
    pub const SENTINEL_ANGLE: f32 = f32::NAN;
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wall(p) => write!(f, "cell {p} is a wall"),
            Self::NoRoute { from, to } => write!(f, "no route from {from} to {to}"),
            Self::NonFinite => write!(f, "non-finite query input"),
            Self::NoCollisionGrid => write!(f, "no collision grid bound"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Flatten a heading result into a bare angle, using
/// [`QueryError::SENTINEL_ANGLE`] for failures.
#[inline]
pub fn angle_or_sentinel(r: Result<f32, QueryError>) -> f32 {
    r.unwrap_or(QueryError::SENTINEL_ANGLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_never_a_heading() {
        let a = angle_or_sentinel(Err(QueryError::Wall(Point::new(1, 2))));
        assert!(a.is_nan());
        assert_eq!(angle_or_sentinel(Ok(90.0)), 90.0);
    }

    #[test]
    fn display_messages() {
        let e = QueryError::NoRoute {
            from: Point::new(4, 3),
            to: Point::new(30, 16),
        };
        assert_eq!(e.to_string(), "no route from (4, 3) to (30, 16)");
        let e = NavError::ConfigurationMismatch {
            graph: Range::new(0, 0, 4, 4),
            grid: Range::new(0, 0, 5, 4),
        };
        assert_eq!(
            e.to_string(),
            "collision grid bounds [(0, 0)-(5, 4)) do not match graph bounds [(0, 0)-(4, 4))"
        );
    }
}
