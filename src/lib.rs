//! Tile Platformer - simulation core for a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, entity behaviors, frame tick)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Completed-levels progress
//! - `error`: Load errors for JSON config and progress files

pub mod error;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::LoadError;
pub use persistence::Progress;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Milliseconds the clock advances per tick
    pub const FRAME_MS: u64 = 1000 / TICK_RATE as u64;

    /// Level grid
    pub const TILE_SIZE: f32 = 64.0;
    /// One-way platforms only occupy the top strip of their tile
    pub const ONE_WAY_THICKNESS: f32 = 8.0;

    /// Default flat level used when no level source is available
    pub const DEFAULT_LEVEL_COLS: usize = 40;
    pub const DEFAULT_LEVEL_ROWS: usize = 10;
}

/// Unit vector for an angle in radians (screen space, +y points down)
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Velocity that moves `from` toward `to` by at most `speed`.
///
/// Never overshoots: when the remaining distance is shorter than `speed` the
/// returned step lands exactly on `to`. Returns `None` when already there.
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, speed: f32) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return None;
    }
    if distance <= speed {
        Some(delta)
    } else {
        Some(delta / distance * speed)
    }
}

/// Single-axis version of [`step_toward`]
#[inline]
pub fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    delta.clamp(-max_step, max_step)
}
