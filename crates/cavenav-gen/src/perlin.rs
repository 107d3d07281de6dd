//! Fractal Perlin seeding, the alternative to independent coin flips.

use cavenav_core::{Grid, Point, Range};
use noise::{NoiseFn, Perlin};

use crate::cave::GenerationParams;
use crate::tile::Tile;

const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;

/// Fold a 64-bit seed into the 32 bits `Perlin` accepts.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Fractional Brownian motion, normalised back into `[-1, 1]`.
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;
    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= PERSISTENCE;
        frequency *= LACUNARITY;
    }
    if max_value > 0.0 { total / max_value } else { 0.0 }
}

/// Seed a tile grid by thresholding noise: interior cells whose normalised
/// noise value falls below `wall_chance` are WALL. Cells outside `interior`
/// are WALL.
pub(crate) fn seed_tiles(
    width: i32,
    height: i32,
    interior: Range,
    params: &GenerationParams,
) -> Grid<Tile> {
    let noise = Perlin::new(fold_seed(params.seed));
    let (w, h) = (width.max(1) as f64, height.max(1) as f64);
    Grid::from_fn(width, height, |p: Point| {
        if !interior.contains(p) {
            return Tile::Wall;
        }
        let nx = p.x as f64 / w * params.frequency;
        let ny = p.y as f64 / h * params.frequency;
        let v = fbm(&noise, nx, ny, params.octaves) * params.amplitude;
        let v = ((v + 1.0) * 0.5).clamp(0.0, 1.0);
        if v < params.wall_chance { Tile::Wall } else { Tile::Floor }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fbm_stays_normalised() {
        let noise = Perlin::new(7);
        for i in 0..50 {
            let v = fbm(&noise, i as f64 * 0.37, i as f64 * 0.11, 4);
            assert!((-1.0..=1.0).contains(&v));
        }
        assert_eq!(fbm(&noise, 1.5, 2.5, 0), 0.0);
    }

    fn params(wall_chance: f64) -> GenerationParams {
        GenerationParams {
            seed: 3,
            octaves: 2,
            perlin: true,
            wall_chance,
            frequency: 5.0,
            ..GenerationParams::default()
        }
    }

    #[test]
    fn thresholds_follow_wall_chance() {
        let interior = Range::new(1, 1, 19, 19);
        // Normalised noise never exceeds 1, so every interior cell is WALL.
        let all_wall = seed_tiles(20, 20, interior, &params(1.0 + 1e-9));
        assert_eq!(all_wall.count(Tile::Floor), 0);
        let all_floor = seed_tiles(20, 20, interior, &params(0.0));
        assert_eq!(all_floor.count(Tile::Floor), interior.len());
    }

    #[test]
    fn same_seed_same_grid() {
        let interior = Range::new(1, 1, 15, 15);
        let a = seed_tiles(16, 16, interior, &params(0.5));
        let b = seed_tiles(16, 16, interior, &params(0.5));
        assert_eq!(a, b);
    }
}
