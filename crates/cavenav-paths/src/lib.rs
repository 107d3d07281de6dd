//! Grid navigation for generated caves.
//!
//! This crate turns a binary walkable/blocked grid into a weighted graph and
//! steers movers through it:
//!
//! - **Graph conversion** ([`make_graph`]): one node per walkable cell,
//!   edges of weight 1 (axis-aligned) or √2 (diagonal).
//! - **Distance fields** ([`DistanceField`]): Dijkstra from a single target.
//! - **Steering** ([`NavigationGraph::get_move_direction`]): heading toward
//!   the neighbour closest to the target, with the field cached per route
//!   in a caller-owned [`RouteCtx`].
//! - **Collision** ([`Router::resolve_move`]): swept moves that slide along
//!   walls.
//!
//! # Coordinates
//!
//! World positions are [`Vec2`](cavenav_core::Vec2)s; cells are
//! [`Point`](cavenav_core::Point)s. [`NavInfo`] converts between them, one
//! cell spanning `cell_width * COARSE_FACTOR` world units horizontally.
//! Headings are degrees in `[0, 360)`, with y growing downward.
//!
//! # Errors
//!
//! Setup problems are [`NavError`]s. Per-step failures are [`QueryError`]s
//! the caller may recover from.

mod cc;
mod dijkstra;
mod error;
mod graph;
mod info;
mod navigation;
mod router;
mod traits;

pub use cc::Components;
pub use dijkstra::DistanceField;
pub use error::{NavError, QueryError, angle_or_sentinel};
pub use graph::{Connectivity, Edge, Graph, make_graph, make_graph_with};
pub use info::{COARSE_FACTOR, NavInfo};
pub use navigation::{MoveFlags, NavigationGraph, RouteCtx};
pub use router::{MAX_SLIDES, Router};
pub use traits::{Pather, WeightedPather};
