//! Cellular-automaton cave generation for cavenav.
//!
//! [`Cave`] turns a [`CaveInfo`] and [`GenerationParams`] into a
//! [`TileMap`] whose border is always WALL. Generation is deterministic: the
//! same info and params always yield the same map.

pub mod cave;
pub mod error;
mod perlin;
pub mod postprocess;
pub mod tile;

pub use cave::{Cave, CaveInfo, GenerationParams, GenerationStep, generate};
pub use error::GenError;
pub use postprocess::PostProcess;
pub use tile::{BLOCKED, Tile, TileMap, WALKABLE};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn params_round_trip() {
        let params = GenerationParams {
            post: PostProcess {
                keep_largest_region: true,
                ..PostProcess::default()
            },
            ..GenerationParams::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: GenerationParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn tile_map_round_trip() {
        let map = generate(CaveInfo::default(), GenerationParams::default()).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        let back: TileMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
