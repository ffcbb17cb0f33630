//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives in [`GameState`]; the driver
//! only supplies input and a frame duration.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::enemy::{Enemy, Visual};
use super::level::Level;
use super::player::Player;
use super::projectile::Projectile;
use super::tiles::LevelBounds;
use crate::tuning::{CameraTuning, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player reached the unlocked exit
    LevelComplete,
    /// Player ran out of hearts
    GameOver,
}

/// Something that happened during a tick, for render/audio/persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerHurt { hearts: u8 },
    EnemyKilled { visual: Visual },
    BossDefeated,
    CollectiblePicked { remaining: usize },
    LevelComplete { level_index: u32 },
    PlayerDied,
}

/// Viewport origin in level pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
        }
    }

    /// Center on `target`, never showing anything outside the level
    pub fn follow(&mut self, target: Vec2, bounds: LevelBounds) {
        let max_x = (bounds.width - self.viewport.x).max(0.0);
        let max_y = (bounds.height - self.viewport.y).max(0.0);
        self.x = (target.x - self.viewport.x / 2.0).clamp(0.0, max_x);
        self.y = (target.y - self.viewport.y / 2.0).clamp(0.0, max_y);
    }
}

/// Complete game state for one level run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub level_index: u32,
    pub level: Level,
    /// Untouched copy of the level for restarts
    initial_level: Level,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player bullets (the player does not track them after firing)
    pub player_bullets: Vec<Projectile>,
    pub clock: Clock,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// One-shot guard for the boss-death effects
    pub boss_defeated: bool,
    pub camera: Camera,
    pub tuning: Tuning,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state for `level` with the given seed
    pub fn new(level_index: u32, level: Level, seed: u64, tuning: Tuning) -> Self {
        let player_size = Vec2::new(tuning.player.width, tuning.player.height);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level_index,
            player: Player::new(level.player_start(player_size), &tuning.player),
            initial_level: level.clone(),
            level,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            clock: Clock::new(),
            time_ticks: 0,
            phase: GamePhase::Playing,
            boss_defeated: false,
            camera: Camera::new(&tuning.camera),
            tuning,
            events: Vec::new(),
        };

        state.spawn_enemies();
        state.camera.follow(state.player.body.center(), state.level.bounds);
        log::info!(
            "Level {} started (seed {}, {} enemies, {} collectibles)",
            level_index,
            seed,
            state.enemies.len(),
            state.level.collectibles.len()
        );
        state
    }

    fn spawn_enemies(&mut self) {
        self.enemies = self
            .level
            .spawns
            .iter()
            .map(|spawn| {
                Enemy::spawn(
                    spawn,
                    self.level.tile_size,
                    &self.level.tiles,
                    &self.tuning,
                    &mut self.rng,
                )
            })
            .collect();
    }

    /// Respawn the player and enemies and restore the level (collectibles,
    /// boss gate) after a game over
    pub fn restart(&mut self) {
        self.level = self.initial_level.clone();
        let player_size = self.player.body.size;
        self.player.reset(self.level.player_start(player_size));
        self.player_bullets.clear();
        self.spawn_enemies();
        self.boss_defeated = false;
        self.phase = GamePhase::Playing;
        self.events.clear();
        self.camera.follow(self.player.body.center(), self.level.bounds);
        log::info!("Level {} restarted", self.level_index);
    }

    /// All collectibles taken and the player overlaps the exit
    pub fn check_level_complete(&self) -> bool {
        self.level.check_level_complete(&self.player.body.rect())
    }

    /// Take the events recorded by the most recent tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }
}
