//! Generate the reference cave and walk a mover across it.
//!
//! Run: cargo run --bin cave-route
//! Set `RUST_LOG=debug` to see every move.

use cavenav_core::Vec2;
use cavenav_demos::{Outcome, Walk, World, render_overlay};
use cavenav_gen::{CaveInfo, GenerationParams};
use env_logger::Env;

const MAX_MOVES: usize = 2000;
const STEP: f32 = 13.0;

fn main() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    let info = CaveInfo::default();
    let world = match World::new(info, GenerationParams::default()) {
        Ok(w) => w,
        Err(e) => {
            log::error!("setup failed: {e}");
            std::process::exit(1);
        }
    };
    log::info!("cave:\n{}", world.map.render());

    let from = Vec2::new(300.0, 250.0);
    let to = Vec2::new(1950.0, 1086.0);
    log::info!(
        "routing from {from} (cell {}) to {to} (cell {})",
        world.nav.cell_of(from),
        world.nav.cell_of(to)
    );

    let mut walk = Walk::new(&world.nav, from, to, STEP);
    let outcome = walk.run(MAX_MOVES);
    log::info!("trace:\n{}", render_overlay(&walk.overlay(&world.map.to_grid())));

    match outcome {
        Outcome::Reached(moves) => {
            log::info!("reached {} after {moves} moves", walk.pos());
        }
        Outcome::Stopped(e) => {
            log::warn!("stopped at {}: {e}", walk.pos());
            std::process::exit(1);
        }
        Outcome::Exhausted => {
            log::warn!("gave up after {MAX_MOVES} moves at {}", walk.pos());
            std::process::exit(1);
        }
    }
}
