//! Game balance and physics tuning
//!
//! Every behavior constant lives here so levels can be rebalanced from a
//! JSON file without touching code. Missing sections or fields fall back to
//! the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Player controller tuning (speeds in px/frame, times in ms)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Upward impulse (negative is up)
    pub jump_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub max_hearts: u8,
    pub invulnerable_ms: u64,

    // === Dash ===
    pub dash_speed: f32,
    pub dash_ms: u64,
    pub dash_cooldown_ms: u64,
    /// Two presses of the same direction within this window trigger a dash
    pub double_tap_ms: u64,
    /// Dash stays legal this long after leaving the ground
    pub dash_grace_ms: u64,

    // === Jump / shoot ===
    pub double_jump_grace_ms: u64,
    pub shoot_cooldown_ms: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
            speed: 5.0,
            jump_speed: -15.0,
            gravity: 0.8,
            max_fall_speed: 15.0,
            max_hearts: 3,
            invulnerable_ms: 1000,

            dash_speed: 15.0,
            dash_ms: 150,
            dash_cooldown_ms: 500,
            double_tap_ms: 250,
            dash_grace_ms: 150,

            double_jump_grace_ms: 500,
            shoot_cooldown_ms: 300,
        }
    }
}

/// Patrolling enemies (basic, fast, tank, jumping)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub health: u32,
    pub damage: u8,

    pub fast_speed: f32,
    pub tank_size: f32,
    pub tank_speed: f32,
    pub tank_health: u32,

    pub jump_speed: f32,
    /// Frames between jumps, re-rolled after every jump
    pub jump_interval_min: u32,
    pub jump_interval_max: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 32.0,
            speed: 1.0,
            gravity: 0.8,
            max_fall_speed: 10.0,
            health: 1,
            damage: 1,

            fast_speed: 2.0,
            tank_size: 48.0,
            tank_speed: 0.5,
            tank_health: 3,

            jump_speed: -12.0,
            jump_interval_min: 90,
            jump_interval_max: 150,
        }
    }
}

/// Ceiling-hanging ambusher (times in frames)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbushTuning {
    pub size: f32,
    pub health: u32,
    pub damage: u8,
    pub detection_range: f32,
    /// Half-angle of the detection cone, measured from straight down
    pub cone_half_angle_deg: f32,
    pub line_of_sight_samples: u32,
    pub dash_speed: f32,
    pub max_dash_distance: f32,
    pub stay_frames: u32,
    pub return_speed: f32,
    pub return_snap_distance: f32,
    pub attack_cooldown: u32,
    /// Horizontal reach when looking for a ceiling tile at spawn
    pub hang_search_radius: f32,
}

impl Default for AmbushTuning {
    fn default() -> Self {
        Self {
            size: 32.0,
            health: 2,
            damage: 1,
            detection_range: 300.0,
            cone_half_angle_deg: 37.5,
            line_of_sight_samples: 10,
            dash_speed: 8.0,
            max_dash_distance: 250.0,
            stay_frames: 30,
            return_speed: 3.0,
            return_snap_distance: 5.0,
            attack_cooldown: 60,
            hang_search_radius: 48.0,
        }
    }
}

/// Boss attack script (times in frames)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub size: f32,
    pub health: u32,
    pub damage: u8,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub walk_speed: f32,
    pub attack_cooldown: u32,
    pub ultimate_cooldown: u32,
    /// Every n-th attack is the ultimate
    pub ultimate_every: u32,

    // === Jump-shoot ===
    pub rise_speed: f32,
    pub track_speed: f32,
    pub hover_height: f32,
    pub volley_interval: u32,
    pub volleys: u32,

    // === Jump-slam ===
    pub slam_jump_speed: f32,
    pub slam_gravity_multiplier: f32,
    pub slam_drift: f32,
    pub slam_recovery: u32,
    pub slam_bullets_per_side: u32,

    // === Ultimate ===
    pub ultimate_height: f32,
    pub ultimate_rise_speed: f32,
    pub ultimate_interval: u32,
    pub ultimate_duration: u32,
    pub ultimate_angle_step_deg: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub bullet_damage: u8,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            size: 96.0,
            health: 30,
            damage: 1,
            gravity: 0.8,
            max_fall_speed: 15.0,
            walk_speed: 1.0,
            attack_cooldown: 120,
            ultimate_cooldown: 240,
            ultimate_every: 4,

            rise_speed: 6.0,
            track_speed: 4.0,
            hover_height: 200.0,
            volley_interval: 30,
            volleys: 3,

            slam_jump_speed: -16.0,
            slam_gravity_multiplier: 2.0,
            slam_drift: 3.0,
            slam_recovery: 30,
            slam_bullets_per_side: 3,

            ultimate_height: 250.0,
            ultimate_rise_speed: 4.0,
            ultimate_interval: 4,
            ultimate_duration: 180,
            ultimate_angle_step_deg: 12.0,

            bullet_speed: 5.0,
            bullet_size: 12.0,
            bullet_damage: 1,
        }
    }
}

/// Player bullets and projectile lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub damage: u8,
    /// How far outside the level a projectile may travel before it expires
    pub bounds_margin: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 12.0,
            speed: 10.0,
            damage: 1,
            bounds_margin: 32.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub ambush: AmbushTuning,
    pub boss: BossTuning,
    pub projectile: ProjectileTuning,
    pub camera: CameraTuning,
}

impl Tuning {
    /// Parse tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
        let tuning = Self::from_json(&contents).map_err(|e| LoadError::parse(path, &e))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Save tuning as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| LoadError::parse(path, &e))?;
        fs::write(path, json).map_err(|e| LoadError::io(path, &e))
    }
}
