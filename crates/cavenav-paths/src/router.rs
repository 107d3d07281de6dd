//! Collision-resolved movement with wall sliding.
//!
//! Moves are swept cell by cell through the collision grid, so a long step
//! can never skip over a thin wall. On contact the component of the
//! remaining displacement that points into the wall is dropped and the rest
//! is swept again, up to [`MAX_SLIDES`] times.

use cavenav_core::{Grid, Point, Vec2};

use crate::error::{NavError, QueryError};
use crate::info::NavInfo;

/// Upper bound on slide iterations after the first contact.
pub const MAX_SLIDES: usize = 4;

/// Gap kept between a stopped mover and the wall face, in cell units.
const SKIN: f32 = 1e-3;

/// First blocked cell boundary along a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hit {
    /// Fraction of the swept displacement travelled before contact.
    t: f32,
    /// Unit normal of the wall face, pointing back at the mover.
    normal: Vec2,
}

/// Resolves requested moves against a binary collision grid.
///
/// The grid is authoritative: any cell with value 0, and everything outside
/// the grid, blocks movement.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    grid: Grid<u8>,
    info: NavInfo,
}

impl Router {
    pub fn new(grid: Grid<u8>, info: NavInfo) -> Result<Self, NavError> {
        info.validate()?;
        Ok(Self { grid, info })
    }

    #[inline]
    pub fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    #[inline]
    pub fn info(&self) -> NavInfo {
        self.info
    }

    /// Whether cell `p` exists and is walkable.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.grid.at(p).is_some_and(|v| v != 0)
    }

    /// Move from `from` along heading `angle` (degrees) by up to `distance`
    /// world units, sliding along walls.
    ///
    /// The returned position is never inside a blocked cell and never
    /// farther than `distance` from `from`. Negative distances are treated
    /// as zero.
    pub fn resolve_move(&self, from: Vec2, angle: f32, distance: f32) -> Result<Vec2, QueryError> {
        if !from.is_finite() || !angle.is_finite() || !distance.is_finite() {
            return Err(QueryError::NonFinite);
        }
        let start = self.info.cell_of(from);
        if !self.is_walkable(start) {
            return Err(QueryError::Wall(start));
        }

        let mut pos = self.info.to_cells(from);
        let mut rem = self.info.to_cells(Vec2::from_angle_deg(angle) * distance.max(0.0));
        let mut last_valid = from;

        for slide in 0..=MAX_SLIDES {
            if rem.length_squared() <= f32::EPSILON * f32::EPSILON {
                break;
            }
            let Some(hit) = self.sweep(pos, rem) else {
                pos += rem;
                self.accept(pos, &mut last_valid);
                break;
            };

            // Stop just short of the face, then keep only the tangential part.
            let into = rem.dot(hit.normal).abs();
            let t = if into > 0.0 { (hit.t - SKIN / into).max(0.0) } else { hit.t };
            pos += rem * t;
            self.accept(pos, &mut last_valid);
            rem = rem * (1.0 - t);
            rem = rem - hit.normal * rem.dot(hit.normal);
            log::trace!(
                "move from {from} hit wall at t={:.3} (normal {}), slide {slide}",
                hit.t,
                hit.normal
            );
        }

        Ok(last_valid)
    }

    /// Record `pos` (cell units) as the latest valid stop if it is walkable.
    fn accept(&self, pos: Vec2, last_valid: &mut Vec2) {
        let world = self.info.to_world(pos);
        if self.is_walkable(self.info.cell_of(world)) {
            *last_valid = world;
        }
    }

    /// Walk the cells crossed by `pos → pos + delta` (cell units) and report
    /// the first boundary into a blocked cell.
    fn sweep(&self, pos: Vec2, delta: Vec2) -> Option<Hit> {
        let (step_x, t_delta_x, mut t_max_x) = axis_steps(pos.x, delta.x);
        let (step_y, t_delta_y, mut t_max_y) = axis_steps(pos.y, delta.y);
        let mut cell = Point::new(pos.x.floor() as i32, pos.y.floor() as i32);

        loop {
            // Exact corner crossings step along y first.
            let (t, normal) = if t_max_x < t_max_y {
                let t = t_max_x;
                cell.x += step_x;
                t_max_x += t_delta_x;
                (t, Vec2::new(-step_x as f32, 0.0))
            } else {
                let t = t_max_y;
                cell.y += step_y;
                t_max_y += t_delta_y;
                (t, Vec2::new(0.0, -step_y as f32))
            };
            if t > 1.0 {
                return None;
            }
            if !self.is_walkable(cell) {
                return Some(Hit { t, normal });
            }
        }
    }
}

/// Step direction, parametric cell width and first boundary crossing along
/// one axis of a sweep.
fn axis_steps(p: f32, d: f32) -> (i32, f32, f32) {
    if d > 0.0 {
        (1, 1.0 / d, (p.floor() + 1.0 - p) / d)
    } else if d < 0.0 {
        (-1, -1.0 / d, (p - p.floor()) / -d)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid<u8> {
        let rows: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| r.bytes().map(|b| u8::from(b != b'#')).collect())
            .collect();
        Grid::from_rows(&rows).unwrap()
    }

    fn router(rows: &[&str]) -> Router {
        Router::new(grid(rows), NavInfo::new(rows.len() as i32, 1, 1)).unwrap()
    }

    fn scale_of(r: &Router) -> f32 {
        r.info().scale().x
    }

    fn room() -> Router {
        router(&[
            "########",
            "#......#",
            "#......#",
            "#......#",
            "#......#",
            "########",
        ])
    }

    #[test]
    fn free_move_is_exact() {
        let r = room();
        let s = scale_of(&r);
        let from = Vec2::new(1.5 * s, 1.5 * s);
        let to = r.resolve_move(from, 0.0, 2.0 * s).unwrap();
        assert!((to.x - 3.5 * s).abs() < 1e-3);
        assert!((to.y - 1.5 * s).abs() < 1e-3);

        let to = r.resolve_move(from, 90.0, s).unwrap();
        assert!((to.x - 1.5 * s).abs() < 1e-3);
        assert!((to.y - 2.5 * s).abs() < 1e-3);
    }

    #[test]
    fn zero_and_negative_distance_stay_put() {
        let r = room();
        let s = scale_of(&r);
        let from = Vec2::new(2.5 * s, 2.5 * s);
        assert_eq!(r.resolve_move(from, 45.0, 0.0), Ok(from));
        assert_eq!(r.resolve_move(from, 45.0, -10.0), Ok(from));
    }

    #[test]
    fn head_on_wall_stops_at_face() {
        let r = room();
        let s = scale_of(&r);
        let from = Vec2::new(2.5 * s, 2.5 * s);
        // Straight left into the x = 1 | x = 0 boundary.
        let to = r.resolve_move(from, 180.0, 10.0 * s).unwrap();
        assert_eq!(r.info().cell_of(to), Point::new(1, 2));
        assert!(to.x < 1.01 * s && to.x >= 1.0 * s);
        assert!((to.y - 2.5 * s).abs() < 1e-3);
    }

    #[test]
    fn oblique_hit_slides_along_wall() {
        let r = room();
        let s = scale_of(&r);
        let from = Vec2::new(1.5 * s, 3.5 * s);
        // Down-right at 45°: hits the bottom wall, then slides right.
        let to = r.resolve_move(from, 45.0, 3.0 * s).unwrap();
        assert_eq!(r.info().cell_of(to), Point::new(3, 4));
        assert!(to.y > 4.99 * s);
        assert!(from.distance(to) <= 3.0 * s + 1e-3);
    }

    #[test]
    fn long_moves_do_not_tunnel() {
        let r = router(&[
            "#######",
            "#..#..#",
            "#..#..#",
            "#######",
        ]);
        let s = scale_of(&r);
        let from = Vec2::new(1.5 * s, 1.5 * s);
        let to = r.resolve_move(from, 0.0, 100.0 * s).unwrap();
        assert_eq!(r.info().cell_of(to), Point::new(2, 1));
    }

    #[test]
    fn concave_corner_terminates() {
        let r = room();
        let s = scale_of(&r);
        let from = Vec2::new(6.5 * s, 4.5 * s);
        let to = r.resolve_move(from, 45.0, 50.0 * s).unwrap();
        assert_eq!(r.info().cell_of(to), Point::new(6, 4));
    }

    #[test]
    fn start_in_wall_is_rejected() {
        let r = room();
        let s = scale_of(&r);
        assert_eq!(
            r.resolve_move(Vec2::new(0.5 * s, 0.5 * s), 0.0, 1.0),
            Err(QueryError::Wall(Point::new(0, 0)))
        );
        assert_eq!(
            r.resolve_move(Vec2::new(-5.0 * s, 0.5 * s), 0.0, 1.0),
            Err(QueryError::Wall(Point::new(-5, 0)))
        );
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let r = room();
        let s = scale_of(&r);
        let from = Vec2::new(2.5 * s, 2.5 * s);
        assert_eq!(r.resolve_move(from, f32::NAN, 1.0), Err(QueryError::NonFinite));
        assert_eq!(r.resolve_move(from, 0.0, f32::INFINITY), Err(QueryError::NonFinite));
        assert_eq!(
            r.resolve_move(Vec2::new(f32::NAN, 0.0), 0.0, 1.0),
            Err(QueryError::NonFinite)
        );
    }

    #[test]
    fn never_ends_in_a_wall() {
        let r = router(&[
            "##########",
            "#....#...#",
            "#.##...#.#",
            "#..#.#...#",
            "##...##..#",
            "#..#....##",
            "##########",
        ]);
        let s = scale_of(&r);
        let starts: Vec<Vec2> = r
            .grid()
            .iter()
            .filter(|&(_, v)| v != 0)
            .map(|(p, _)| Vec2::new((p.x as f32 + 0.3) * s, (p.y as f32 + 0.7) * s))
            .collect();
        for from in starts {
            for k in 0..24 {
                let angle = k as f32 * 15.0 + 0.5;
                for dist in [0.2, 1.0, 3.7, 12.0] {
                    let d = dist * s;
                    let to = r.resolve_move(from, angle, d).unwrap();
                    assert!(r.is_walkable(r.info().cell_of(to)), "{from} {angle} {d} -> {to}");
                    assert!(from.distance(to) <= d + 1e-3, "{from} {angle} {d} -> {to}");
                }
            }
        }
    }

    #[test]
    fn bad_info_is_rejected() {
        let err = Router::new(grid(&["."]), NavInfo::new(1, -1, 8)).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfiguration { field: "cell_width", .. }));
    }

    #[test]
    fn sweep_steps_through_exact_corners() {
        let r = router(&["...", "...", "..."]);
        // Diagonal through the (1,1) corner exactly: y is crossed first.
        assert_eq!(r.sweep(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0)), None);
        let walled = router(&["...", ".#.", "..."]);
        let hit = walled.sweep(Vec2::new(0.5, 1.5), Vec2::new(2.0, 0.0)).unwrap();
        assert!((hit.t - 0.25).abs() < 1e-6);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
    }
}
