//! Shared driver code for the cavenav demos.
//!
//! [`Walk`] steers one mover through a [`NavigationGraph`] the way a game
//! loop would: ask for a heading, resolve the move, repeat until the target
//! cell is reached or a query fails.

use cavenav_core::{Grid, Point, Vec2};
use cavenav_gen::{CaveInfo, GenError, GenerationParams, TileMap, generate};
use cavenav_paths::{
    MoveFlags, NavError, NavInfo, NavigationGraph, QueryError, RouteCtx, make_graph,
};

/// Overlay value marking a visited cell in a trace grid.
pub const TRACE: u8 = 2;

/// Setup failures for a demo scenario.
#[derive(Debug)]
pub enum DemoError {
    Gen(GenError),
    Nav(NavError),
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gen(e) => write!(f, "{e}"),
            Self::Nav(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DemoError {}

impl From<GenError> for DemoError {
    fn from(e: GenError) -> Self {
        Self::Gen(e)
    }
}

impl From<NavError> for DemoError {
    fn from(e: NavError) -> Self {
        Self::Nav(e)
    }
}

/// A generated cave wired up for navigation.
pub struct World {
    pub map: TileMap,
    pub nav: NavigationGraph,
}

impl World {
    pub fn new(info: CaveInfo, params: GenerationParams) -> Result<Self, DemoError> {
        let map = generate(info, params)?;
        let grid = map.to_grid();
        let nav_info = NavInfo::new(map.height(), info.cell_width, info.cell_height);
        let mut nav = NavigationGraph::new(make_graph(&grid), nav_info)?;
        nav.bind_grid(grid)?;
        Ok(Self { map, nav })
    }
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The mover entered the target cell after this many moves.
    Reached(usize),
    /// A query failed.
    Stopped(QueryError),
    /// The iteration budget ran out.
    Exhausted,
}

/// One mover heading for one target.
pub struct Walk<'a> {
    nav: &'a NavigationGraph,
    ctx: RouteCtx,
    pos: Vec2,
    to: Vec2,
    step: f32,
    flags: MoveFlags,
    trace: Vec<Point>,
}

impl<'a> Walk<'a> {
    pub fn new(nav: &'a NavigationGraph, from: Vec2, to: Vec2, step: f32) -> Self {
        Self {
            nav,
            ctx: RouteCtx::new(),
            pos: from,
            to,
            step,
            flags: MoveFlags::NONE,
            trace: vec![nav.cell_of(from)],
        }
    }

    pub fn with_flags(mut self, flags: MoveFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Cells visited so far, without repeats of consecutive cells.
    #[inline]
    pub fn trace(&self) -> &[Point] {
        &self.trace
    }

    /// Whether the mover is in the target cell.
    pub fn arrived(&self) -> bool {
        self.nav.cell_of(self.pos) == self.nav.cell_of(self.to)
    }

    /// Make one move. Returns the heading used.
    pub fn advance(&mut self) -> Result<f32, QueryError> {
        let angle = self
            .nav
            .get_move_direction(&mut self.ctx, self.pos, self.to, self.flags)?;
        self.pos = self.nav.resolve_move(self.pos, angle, self.step)?;
        let cell = self.nav.cell_of(self.pos);
        if self.trace.last() != Some(&cell) {
            self.trace.push(cell);
        }
        Ok(angle)
    }

    /// Advance until arrival, failure, or `max_moves` moves.
    pub fn run(&mut self, max_moves: usize) -> Outcome {
        for i in 0..max_moves {
            if self.arrived() {
                return Outcome::Reached(i);
            }
            match self.advance() {
                Ok(angle) => log::debug!("move {i}: heading {angle:.1} to {}", self.pos),
                Err(e) => return Outcome::Stopped(e),
            }
        }
        if self.arrived() {
            Outcome::Reached(max_moves)
        } else {
            Outcome::Exhausted
        }
    }

    /// Copy of `grid` with the visited cells set to [`TRACE`].
    pub fn overlay(&self, grid: &Grid<u8>) -> Grid<u8> {
        let mut out = grid.clone();
        for &p in &self.trace {
            out.set(p, TRACE);
        }
        out
    }
}

/// Text dump of a trace overlay: `#` walls, `*` trace, blanks elsewhere.
pub fn render_overlay(grid: &Grid<u8>) -> String {
    let mut s = String::with_capacity(grid.bounds().len() + grid.height() as usize);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            s.push(match grid.at(Point::new(x, y)) {
                Some(0) | None => '#',
                Some(TRACE) => '*',
                Some(_) => ' ',
            });
        }
        s.push('\n');
    }
    s
}
