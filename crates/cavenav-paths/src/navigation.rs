//! Target-relative steering over a [`Graph`].
//!
//! A [`NavigationGraph`] answers "which way should I move" for a position and
//! a target. Distance fields are cached per route in a caller-owned
//! [`RouteCtx`], so a mover that keeps the same target cell pays for one
//! Dijkstra run and then only for a neighbour scan per step.

use std::ops::BitOr;

use cavenav_core::{Grid, Point, Vec2};

use crate::cc::Components;
use crate::dijkstra::DistanceField;
use crate::error::{NavError, QueryError};
use crate::graph::Graph;
use crate::info::NavInfo;
use crate::router::Router;

// ---------------------------------------------------------------------------
// MoveFlags
// ---------------------------------------------------------------------------

/// Bitmask of steering options.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveFlags(pub u32);

impl MoveFlags {
    pub const NONE: Self = Self(0);
    /// Only step to axis-aligned neighbours.
    pub const CARDINAL_ONLY: Self = Self(1 << 0);

    /// Whether this mask contains all the bits from `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// RouteCtx
// ---------------------------------------------------------------------------

/// Per-route cache of the distance field for the current target cell.
///
/// Owned by the caller and passed to every query of one route. A fresh
/// context holds no field; the first query builds one, and later queries
/// rebuild it only when the target cell changes. Not meant to be shared
/// between routes.
#[derive(Debug, Clone, Default)]
pub struct RouteCtx {
    field: Option<DistanceField>,
    recomputations: usize,
}

impl RouteCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the cached field. The next query recomputes it.
    pub fn reset(&mut self) {
        self.field = None;
    }

    /// Whether a distance field is cached.
    #[inline]
    pub fn is_routed(&self) -> bool {
        self.field.is_some()
    }

    /// Target cell of the cached field.
    #[inline]
    pub fn target(&self) -> Option<Point> {
        self.field.as_ref().map(DistanceField::target)
    }

    #[inline]
    pub fn field(&self) -> Option<&DistanceField> {
        self.field.as_ref()
    }

    /// How many distance fields this context has built, resets included.
    #[inline]
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

// ---------------------------------------------------------------------------
// NavigationGraph
// ---------------------------------------------------------------------------

/// A graph plus the coordinate metadata to steer through it.
///
/// Read-only after setup; many routes may query one instance concurrently
/// as long as each brings its own [`RouteCtx`].
#[derive(Debug, Clone)]
pub struct NavigationGraph {
    graph: Graph,
    info: NavInfo,
    components: Components,
    router: Option<Router>,
}

impl NavigationGraph {
    /// Take ownership of `graph` and validate `info`.
    pub fn new(graph: Graph, info: NavInfo) -> Result<Self, NavError> {
        info.validate()?;
        let components = graph.components();
        log::debug!(
            "navigation graph over {} with {} components, {} world units per cell",
            graph.bounds(),
            components.count(),
            info.scale()
        );
        Ok(Self {
            graph,
            info,
            components,
            router: None,
        })
    }

    /// Attach the collision grid used by [`resolve_move`](Self::resolve_move).
    ///
    /// The grid must cover exactly the cells the graph was built from.
    pub fn bind_grid(&mut self, grid: Grid<u8>) -> Result<(), NavError> {
        if grid.bounds() != self.graph.bounds() {
            return Err(NavError::ConfigurationMismatch {
                graph: self.graph.bounds(),
                grid: grid.bounds(),
            });
        }
        self.router = Some(Router::new(grid, self.info)?);
        Ok(())
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn info(&self) -> NavInfo {
        self.info
    }

    /// The bound collision router, if any.
    #[inline]
    pub fn router(&self) -> Option<&Router> {
        self.router.as_ref()
    }

    /// The cell containing world position `v`.
    #[inline]
    pub fn cell_of(&self, v: Vec2) -> Point {
        self.info.cell_of(v)
    }

    /// Whether some path joins cells `a` and `b`. Needs no distance field.
    #[inline]
    pub fn is_reachable(&self, a: Point, b: Point) -> bool {
        self.components.connected(a, b)
    }

    /// The cell to step into next on the way from `from` to `to`.
    ///
    /// Returns the target cell itself once `from` is inside it. Otherwise
    /// the result is the neighbour with the smallest distance to the target,
    /// among those strictly closer than the current cell; ties go to the
    /// first neighbour clockwise from up.
    pub fn next_cell(
        &self,
        ctx: &mut RouteCtx,
        from: Vec2,
        to: Vec2,
        flags: MoveFlags,
    ) -> Result<Point, QueryError> {
        if !from.is_finite() || !to.is_finite() {
            return Err(QueryError::NonFinite);
        }
        let target = self.info.cell_of(to);
        if !self.graph.contains(target) {
            return Err(QueryError::Wall(target));
        }
        let field = self.field_for(ctx, target);

        let here = self.info.cell_of(from);
        if !self.graph.contains(here) {
            return Err(QueryError::Wall(here));
        }
        let no_route = QueryError::NoRoute {
            from: here,
            to: target,
        };
        let Some(d_here) = field.at(here) else {
            return Err(no_route);
        };
        if here == target {
            return Ok(target);
        }

        let cardinal_only = flags.contains(MoveFlags::CARDINAL_ONLY);
        let mut best: Option<(Point, f32)> = None;
        for e in self.graph.neighbors(here) {
            if cardinal_only && here.is_diagonal_to(e.to) {
                continue;
            }
            let Some(d) = field.at(e.to) else {
                continue;
            };
            if d < d_here && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((e.to, d));
            }
        }
        best.map(|(p, _)| p).ok_or(no_route)
    }

    /// Heading in degrees, in `[0, 360)`, for a mover at `from` heading for
    /// `to`.
    ///
    /// Steers at the centre of the next cell, or straight at `to` once the
    /// next cell is the target cell. Use
    /// [`angle_or_sentinel`](crate::angle_or_sentinel) to flatten failures
    /// into a NaN heading.
    pub fn get_move_direction(
        &self,
        ctx: &mut RouteCtx,
        from: Vec2,
        to: Vec2,
        flags: MoveFlags,
    ) -> Result<f32, QueryError> {
        let next = self.next_cell(ctx, from, to, flags)?;
        let aim = if next == self.info.cell_of(to) {
            to
        } else {
            self.info.cell_center(next)
        };
        Ok((aim - from).angle_deg())
    }

    /// Resolve a move against the bound collision grid.
    ///
    /// See [`Router::resolve_move`].
    pub fn resolve_move(&self, from: Vec2, angle: f32, distance: f32) -> Result<Vec2, QueryError> {
        self.router
            .as_ref()
            .ok_or(QueryError::NoCollisionGrid)?
            .resolve_move(from, angle, distance)
    }

    /// The cached field for `target`, rebuilt if `ctx` holds another one.
    fn field_for<'c>(&self, ctx: &'c mut RouteCtx, target: Point) -> &'c DistanceField {
        if ctx.target() != Some(target) {
            ctx.field = None;
        }
        let recomputations = &mut ctx.recomputations;
        ctx.field.get_or_insert_with(|| {
            let field = DistanceField::compute(&self.graph, self.graph.bounds(), target);
            *recomputations += 1;
            log::debug!("distance field to {target}: {} cells reached", field.reached());
            field
        })
    }
}
