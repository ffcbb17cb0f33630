//! Tile Platformer native entry point
//!
//! Runs a scripted session on a built-in demo level and logs what happened.
//!
//! Usage: `tile-platformer [tuning.json] [progress.json]`

use std::path::PathBuf;

use tile_platformer::consts::FRAME_MS;
use tile_platformer::sim::{GameEvent, GamePhase, GameState, Level, TickInput, tick};
use tile_platformer::{Progress, Tuning};

const DEMO_LEVEL: [&str; 7] = [
    "............................",
    "..........GGG...............",
    "...........A................",
    "......PPP.........PPP.......",
    "....................C.......",
    "S..C.....B......J.........XE",
    "GGGGGGGGGGGGGGGGGGGGGGGGGGGG",
];

const DEMO_FRAMES: u64 = 600;
const DEMO_SEED: u64 = 0x5EED;

/// Scripted input: run right, hop periodically, keep shooting
fn scripted_input(frame: u64) -> TickInput {
    TickInput {
        right: true,
        jump: frame % 45 < 10,
        shoot: frame % 20 == 0,
        ..Default::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Platformer (native) starting...");

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(&path),
        None => Tuning::default(),
    };
    let progress_path = args.next();

    let level = Level::from_grid(&DEMO_LEVEL, tile_platformer::consts::TILE_SIZE);
    let mut state = GameState::new(0, level, DEMO_SEED, tuning);

    let mut kills = 0;
    let mut hurt = 0;
    for frame in 0..DEMO_FRAMES {
        tick(&mut state, &scripted_input(frame), FRAME_MS);
        for event in state.drain_events() {
            match event {
                GameEvent::EnemyKilled { visual } => {
                    kills += 1;
                    log::info!("Frame {frame}: killed {visual:?}");
                }
                GameEvent::PlayerHurt { hearts } => {
                    hurt += 1;
                    log::info!("Frame {frame}: player hurt, {hearts} hearts left");
                }
                other => log::info!("Frame {frame}: {other:?}"),
            }
        }
        if state.phase != GamePhase::Playing {
            break;
        }
    }

    log::info!(
        "Session over after {} ticks: {:?}, {} kills, {} hits taken, {}/{} collected, player at {:?}",
        state.time_ticks,
        state.phase,
        kills,
        hurt,
        state.level.collected_count(),
        state.level.collectibles.len(),
        state.player.body.pos
    );

    if let Some(path) = progress_path {
        let mut progress = Progress::load_or_default(&path);
        if state.phase == GamePhase::LevelComplete && progress.mark_completed(state.level_index) {
            match progress.save(&path) {
                Ok(()) => log::info!("Progress saved to {}", path.display()),
                Err(e) => log::warn!("{e}"),
            }
        }
        log::info!("Highest unlocked level: {}", progress.highest_unlocked());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core is driven by an external frontend on wasm32
}
