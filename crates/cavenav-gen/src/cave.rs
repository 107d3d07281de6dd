//! Cellular-automaton cave generation.
//!
//! A [`Cave`] seeds its interior with random walls (or thresholded Perlin
//! noise), forces the border to WALL, then runs each [`GenerationStep`]
//! `reps` times. A step is a synchronous birth/survival rule over wall counts
//! in the 3×3 and 5×5 windows around every interior cell: each pass reads
//! only the previous generation and writes a fresh grid.

use cavenav_core::{Grid, Point, Range};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::error::GenError;
use crate::perlin;
use crate::postprocess::{self, PostProcess};
use crate::tile::{Tile, TileMap};

/// Cave dimensions in cells, plus the pixel size of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaveInfo {
    pub cave_width: i32,
    pub cave_height: i32,
    /// WALL thickness added on the left and right.
    pub border_width: i32,
    /// WALL thickness added on the top and bottom.
    pub border_height: i32,
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for CaveInfo {
    fn default() -> Self {
        Self {
            cave_width: 32,
            cave_height: 32,
            border_width: 1,
            border_height: 1,
            cell_width: 8,
            cell_height: 8,
        }
    }
}

impl CaveInfo {
    /// Full map size including the border on both sides.
    #[inline]
    pub fn map_size(&self) -> Point {
        Point::new(
            self.cave_width + 2 * self.border_width,
            self.cave_height + 2 * self.border_height,
        )
    }

    /// The non-border cells of the map.
    #[inline]
    pub fn interior(&self) -> Range {
        let sz = self.map_size();
        Range::new(0, 0, sz.x, sz.y).inset(self.border_width, self.border_height)
    }

    fn validate(&self) -> Result<(), GenError> {
        positive("cave_width", self.cave_width)?;
        positive("cave_height", self.cave_height)?;
        non_negative("border_width", self.border_width)?;
        non_negative("border_height", self.border_height)?;
        positive("cell_width", self.cell_width)?;
        positive("cell_height", self.cell_height)
    }
}

fn positive(field: &'static str, v: i32) -> Result<(), GenError> {
    if v <= 0 {
        return Err(GenError::invalid(field, format!("must be positive, got {v}")));
    }
    Ok(())
}

fn non_negative(field: &'static str, v: i32) -> Result<(), GenError> {
    if v < 0 {
        return Err(GenError::invalid(field, format!("must not be negative, got {v}")));
    }
    Ok(())
}

/// One cellular-automaton smoothing rule, applied `reps` times.
///
/// Counts are numbers of WALL cells around a cell, excluding the cell
/// itself: at most 8 in the 3×3 window and 24 in the 5×5 window. Cells
/// outside the map count as WALL. Ranges are inclusive; a range that can
/// never be met simply never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStep {
    /// A FLOOR cell becomes WALL if its 3×3 count is in `b3_min..=b3_max`.
    pub b3_min: i32,
    pub b3_max: i32,
    /// ... or its 5×5 count is in `b5_min..=b5_max`.
    pub b5_min: i32,
    pub b5_max: i32,
    /// A WALL cell stays WALL if its 3×3 count is in `s3_min..=s3_max`.
    pub s3_min: i32,
    pub s3_max: i32,
    /// ... or its 5×5 count is in `s5_min..=s5_max`; otherwise it opens up.
    pub s5_min: i32,
    pub s5_max: i32,
    pub reps: u32,
}

impl Default for GenerationStep {
    fn default() -> Self {
        Self {
            b3_min: 3,
            b3_max: 4,
            b5_min: 12,
            b5_max: 16,
            s3_min: 2,
            s3_max: 5,
            s5_min: 10,
            s5_max: 14,
            reps: 2,
        }
    }
}

impl GenerationStep {
    /// Next state of a cell given its current tile and wall counts.
    #[inline]
    pub fn next(&self, tile: Tile, walls3: i32, walls5: i32) -> Tile {
        let in3 = |lo: i32, hi: i32| (lo..=hi).contains(&walls3);
        let in5 = |lo: i32, hi: i32| (lo..=hi).contains(&walls5);
        let wall = match tile {
            Tile::Floor => in3(self.b3_min, self.b3_max) || in5(self.b5_min, self.b5_max),
            Tile::Wall => in3(self.s3_min, self.s3_max) || in5(self.s5_min, self.s5_max),
        };
        if wall { Tile::Wall } else { Tile::Floor }
    }
}

/// Parameters controlling the seeding and smoothing of a cave.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationParams {
    pub seed: u64,
    /// Noise octaves (Perlin seeding only).
    pub octaves: u32,
    /// Seed with thresholded Perlin noise instead of independent coin flips.
    pub perlin: bool,
    /// Probability that an interior cell starts as WALL.
    pub wall_chance: f64,
    /// Noise frequency (Perlin seeding only).
    pub frequency: f64,
    /// Noise amplitude (Perlin seeding only).
    pub amplitude: f64,
    pub generations: Vec<GenerationStep>,
    pub post: PostProcess,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 424242,
            octaves: 1,
            perlin: false,
            wall_chance: 0.65,
            frequency: 13.7,
            amplitude: 1.0,
            generations: vec![GenerationStep::default()],
            post: PostProcess::default(),
        }
    }
}

impl GenerationParams {
    fn validate(&self) -> Result<(), GenError> {
        if !self.wall_chance.is_finite() || !(0.0..=1.0).contains(&self.wall_chance) {
            return Err(GenError::invalid(
                "wall_chance",
                format!("must be within [0, 1], got {}", self.wall_chance),
            ));
        }
        if self.perlin {
            if self.octaves == 0 {
                return Err(GenError::invalid("octaves", "must be at least 1 with perlin seeding"));
            }
            if !self.frequency.is_finite() || self.frequency <= 0.0 {
                return Err(GenError::invalid(
                    "frequency",
                    format!("must be positive with perlin seeding, got {}", self.frequency),
                ));
            }
            if !self.amplitude.is_finite() {
                return Err(GenError::invalid("amplitude", "must be finite"));
            }
        }
        Ok(())
    }
}

/// A validated cave description. [`generate`](Cave::generate) is a pure
/// function of the info and params it was built with.
#[derive(Debug, Clone)]
pub struct Cave {
    info: CaveInfo,
    params: GenerationParams,
}

impl Cave {
    /// Validate `info` and `params`.
    pub fn new(info: CaveInfo, params: GenerationParams) -> Result<Self, GenError> {
        info.validate()?;
        params.validate()?;
        Ok(Self { info, params })
    }

    pub fn info(&self) -> &CaveInfo {
        &self.info
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate the tile map.
    pub fn generate(&self) -> TileMap {
        let sz = self.info.map_size();
        let interior = self.info.interior();

        let mut tiles = if self.params.perlin {
            perlin::seed_tiles(sz.x, sz.y, interior, &self.params)
        } else {
            let mut rng = StdRng::seed_from_u64(self.params.seed);
            let wall_chance = self.params.wall_chance;
            Grid::from_fn(sz.x, sz.y, |p| {
                if !interior.contains(p) {
                    return Tile::Wall;
                }
                let r: f64 = rng.random();
                if r < wall_chance { Tile::Wall } else { Tile::Floor }
            })
        };

        for (i, step) in self.params.generations.iter().enumerate() {
            for rep in 0..step.reps {
                let (next, changed) = smooth_pass(&tiles, interior, step);
                log::trace!("step {i} rep {rep}: {changed} cells changed");
                tiles = next;
            }
        }

        tiles = postprocess::apply(tiles, interior, &self.params.post);

        let map = TileMap::from_grid(tiles);
        log::debug!(
            "generated {}x{} cave (seed {}): {} floor cells",
            map.width(),
            map.height(),
            self.params.seed,
            map.floor_count()
        );
        map
    }
}

/// Validate and generate in one call.
pub fn generate(info: CaveInfo, params: GenerationParams) -> Result<TileMap, GenError> {
    Ok(Cave::new(info, params)?.generate())
}

/// WALL counts in the 3×3 and 5×5 windows around `center`, excluding it.
fn wall_counts(tiles: &Grid<Tile>, center: Point) -> (i32, i32) {
    let mut walls3 = 0;
    let mut walls5 = 0;
    for dy in -2..=2 {
        for dx in -2..=2 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let wall = tiles.at(center.shift(dx, dy)).is_none_or(Tile::is_wall);
            if wall {
                walls5 += 1;
                if dx.abs() <= 1 && dy.abs() <= 1 {
                    walls3 += 1;
                }
            }
        }
    }
    (walls3, walls5)
}

/// One synchronous smoothing pass. Returns the next generation and the
/// number of cells that changed.
fn smooth_pass(prev: &Grid<Tile>, interior: Range, step: &GenerationStep) -> (Grid<Tile>, usize) {
    let mut changed = 0;
    let next = prev.map(|p, t| {
        if !interior.contains(p) {
            return Tile::Wall;
        }
        let (walls3, walls5) = wall_counts(prev, p);
        let n = step.next(t, walls3, walls5);
        if n != t {
            changed += 1;
        }
        n
    });
    (next, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Cave {
        Cave::new(CaveInfo::default(), GenerationParams::default()).unwrap()
    }

    fn border_is_wall(map: &TileMap, info: &CaveInfo) -> bool {
        let interior = info.interior();
        map.bounds()
            .iter()
            .filter(|p| !interior.contains(*p))
            .all(|p| map.at(p) == Some(Tile::Wall))
    }

    #[test]
    fn map_dimensions_include_border() {
        let map = reference().generate();
        assert_eq!(map.width(), 34);
        assert_eq!(map.height(), 34);
        let info = CaveInfo {
            cave_width: 10,
            cave_height: 6,
            border_width: 3,
            border_height: 2,
            ..CaveInfo::default()
        };
        let map = generate(info, GenerationParams::default()).unwrap();
        assert_eq!((map.width(), map.height()), (16, 10));
        assert!(border_is_wall(&map, &info));
    }

    #[test]
    fn same_inputs_same_map() {
        assert_eq!(reference().generate(), reference().generate());
    }

    #[test]
    fn different_seed_different_map() {
        let other = GenerationParams {
            seed: 7,
            ..GenerationParams::default()
        };
        let a = reference().generate();
        let b = generate(CaveInfo::default(), other).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn border_always_wall() {
        for seed in [1, 2, 3, 424242] {
            for wall_chance in [0.0, 0.3, 0.65, 1.0] {
                let params = GenerationParams {
                    seed,
                    wall_chance,
                    ..GenerationParams::default()
                };
                let info = CaveInfo::default();
                let map = generate(info, params).unwrap();
                assert!(border_is_wall(&map, &info), "seed {seed} chance {wall_chance}");
            }
        }
    }

    #[test]
    fn perlin_border_always_wall() {
        let params = GenerationParams {
            perlin: true,
            octaves: 3,
            ..GenerationParams::default()
        };
        let info = CaveInfo::default();
        let map = generate(info, params.clone()).unwrap();
        assert!(border_is_wall(&map, &info));
        assert_eq!(map, generate(info, params).unwrap());
    }

    #[test]
    fn zero_border_is_allowed() {
        let info = CaveInfo {
            border_width: 0,
            border_height: 0,
            ..CaveInfo::default()
        };
        let map = generate(info, GenerationParams::default()).unwrap();
        assert_eq!((map.width(), map.height()), (32, 32));
    }

    #[test]
    fn no_steps_keeps_seeding() {
        let all_floor = GenerationParams {
            wall_chance: 0.0,
            generations: Vec::new(),
            ..GenerationParams::default()
        };
        let info = CaveInfo::default();
        let map = generate(info, all_floor).unwrap();
        assert_eq!(map.floor_count(), info.interior().len());
    }

    #[test]
    fn step_rule_birth_and_survival() {
        let step = GenerationStep::default();
        // Birth through either window.
        assert_eq!(step.next(Tile::Floor, 3, 0), Tile::Wall);
        assert_eq!(step.next(Tile::Floor, 0, 12), Tile::Wall);
        assert_eq!(step.next(Tile::Floor, 5, 17), Tile::Floor);
        // Survival through either window.
        assert_eq!(step.next(Tile::Wall, 2, 0), Tile::Wall);
        assert_eq!(step.next(Tile::Wall, 8, 14), Tile::Wall);
        assert_eq!(step.next(Tile::Wall, 8, 24), Tile::Floor);
    }

    #[test]
    fn unreachable_thresholds_never_fire() {
        let never = GenerationStep {
            b3_min: 9,
            b3_max: 20,
            b5_min: 25,
            b5_max: 30,
            s3_min: 0,
            s3_max: 8,
            s5_min: 0,
            s5_max: 24,
            reps: 3,
        };
        let seeded = GenerationParams {
            generations: Vec::new(),
            ..GenerationParams::default()
        };
        let smoothed = GenerationParams {
            generations: vec![never],
            ..GenerationParams::default()
        };
        let info = CaveInfo::default();
        assert_eq!(generate(info, seeded).unwrap(), generate(info, smoothed).unwrap());
    }

    #[test]
    fn pass_is_synchronous() {
        // A single wall in open floor: with "birth at exactly 1 neighbour",
        // all eight neighbours are born in the same pass. An in-place update
        // would see freshly born walls and stop short.
        let info = CaveInfo {
            cave_width: 9,
            cave_height: 9,
            border_width: 0,
            border_height: 0,
            ..CaveInfo::default()
        };
        let interior = info.interior();
        let mut g = Grid::new(9, 9, Tile::Floor);
        g.set(Point::new(4, 4), Tile::Wall);
        let step = GenerationStep {
            b3_min: 1,
            b3_max: 1,
            b5_min: 99,
            b5_max: 99,
            s3_min: 0,
            s3_max: 8,
            s5_min: 0,
            s5_max: 0,
            reps: 1,
        };
        let (next, changed) = smooth_pass(&g, interior, &step);
        for n in Point::new(4, 4).neighbors_8() {
            assert_eq!(next.at(n), Some(Tile::Wall), "{n}");
        }
        assert_eq!(next.at(Point::new(4, 4)), Some(Tile::Wall));
        assert_eq!(changed, 8);
    }

    #[test]
    fn wall_counts_treat_outside_as_wall() {
        let g = Grid::new(5, 5, Tile::Floor);
        assert_eq!(wall_counts(&g, Point::new(2, 2)), (0, 0));
        // Corner: 5 of 8 and 16 of 24 neighbours lie outside.
        assert_eq!(wall_counts(&g, Point::new(0, 0)), (5, 16));
    }

    #[test]
    fn invalid_configuration_rejected() {
        let bad_info = CaveInfo {
            cave_width: -1,
            ..CaveInfo::default()
        };
        let err = Cave::new(bad_info, GenerationParams::default()).unwrap_err();
        assert!(matches!(err, GenError::InvalidConfiguration { field: "cave_width", .. }));

        let bad_border = CaveInfo {
            border_height: -2,
            ..CaveInfo::default()
        };
        assert!(Cave::new(bad_border, GenerationParams::default()).is_err());

        let bad_chance = GenerationParams {
            wall_chance: 1.5,
            ..GenerationParams::default()
        };
        assert!(Cave::new(CaveInfo::default(), bad_chance).is_err());

        let bad_perlin = GenerationParams {
            perlin: true,
            octaves: 0,
            ..GenerationParams::default()
        };
        assert!(Cave::new(CaveInfo::default(), bad_perlin).is_err());

        // Octaves are irrelevant without perlin seeding.
        let unused_octaves = GenerationParams {
            octaves: 0,
            ..GenerationParams::default()
        };
        assert!(Cave::new(CaveInfo::default(), unused_octaves).is_ok());
    }

    #[test]
    fn error_message_names_field() {
        let err = GenError::invalid("cell_width", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid cave configuration: `cell_width` must be positive, got 0"
        );
    }
}
