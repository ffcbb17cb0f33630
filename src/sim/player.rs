//! Player controller
//!
//! Input-driven state on top of the kinematic body: run, jump with a
//! time-windowed air jump, double-tap dash, cooldown-gated shooting and
//! heart-based health with a post-hit invulnerability window.
//!
//! All timers are millisecond timestamps from the simulation clock compared
//! by subtraction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Facing, MoveParams};
use super::projectile::ShotRequest;
use super::tiles::{LevelBounds, TileSet};
use crate::tuning::PlayerTuning;

/// Digital controls sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Dash {
    started_ms: u64,
    facing: Facing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub hearts: u8,
    pub max_hearts: u8,
    pub invulnerable: bool,
    invulnerable_since: u64,
    invulnerable_ms: u64,
    dash: Option<Dash>,
    last_dash_ms: Option<u64>,
    last_grounded_ms: Option<u64>,
    /// Last direction press, for double-tap detection
    last_tap: Option<(Facing, u64)>,
    /// Start of the air-jump window while the charge is unused
    air_jump_window: Option<u64>,
    last_shot_ms: Option<u64>,
    #[serde(skip)]
    prev_input: PlayerInput,
}

impl Player {
    /// Create a player with its top-left corner at `pos`
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(tuning.width, tuning.height)),
            hearts: tuning.max_hearts,
            max_hearts: tuning.max_hearts,
            invulnerable: false,
            invulnerable_since: 0,
            invulnerable_ms: tuning.invulnerable_ms,
            dash: None,
            last_dash_ms: None,
            last_grounded_ms: None,
            last_tap: None,
            air_jump_window: None,
            last_shot_ms: None,
            prev_input: PlayerInput::default(),
        }
    }

    /// Advance one frame. Returns a shot when the player fired this frame.
    pub fn update(
        &mut self,
        input: PlayerInput,
        tiles: &TileSet,
        bounds: LevelBounds,
        now: u64,
        tuning: &PlayerTuning,
    ) -> Option<ShotRequest> {
        self.invulnerable_ms = tuning.invulnerable_ms;
        self.expire_timers(now, tuning);

        let left_pressed = input.left && !self.prev_input.left;
        let right_pressed = input.right && !self.prev_input.right;
        let jump_pressed = input.jump && !self.prev_input.jump;
        self.prev_input = input;

        if left_pressed {
            self.register_tap(Facing::Left, now, tuning);
        }
        if right_pressed {
            self.register_tap(Facing::Right, now, tuning);
        }

        match self.dash {
            Some(dash) => {
                self.body.vel.x = dash.facing.sign() * tuning.dash_speed;
                self.body.vel.y = 0.0;
            }
            None => {
                self.body.vel.x = 0.0;
                if input.left {
                    self.body.vel.x = -tuning.speed;
                    self.body.facing = Facing::Left;
                }
                if input.right {
                    self.body.vel.x = tuning.speed;
                    self.body.facing = Facing::Right;
                }
            }
        }

        let params = MoveParams {
            gravity: tuning.gravity,
            max_fall_speed: tuning.max_fall_speed,
            apply_gravity: self.dash.is_none(),
            collide_one_way: true,
        };
        self.body.step(tiles, bounds, &params);

        if self.body.on_ground {
            self.last_grounded_ms = Some(now);
            self.air_jump_window = None;
        }

        // Jumps see this frame's grounded state
        if jump_pressed && self.dash.is_none() {
            self.try_jump(now, tuning);
        }

        if input.shoot {
            return self.try_shoot(now, tuning);
        }
        None
    }

    fn expire_timers(&mut self, now: u64, tuning: &PlayerTuning) {
        if self.invulnerable && now.saturating_sub(self.invulnerable_since) > tuning.invulnerable_ms {
            self.invulnerable = false;
        }
        if let Some(dash) = self.dash {
            if now.saturating_sub(dash.started_ms) >= tuning.dash_ms {
                self.dash = None;
                self.body.vel.x = 0.0;
            }
        }
    }

    fn register_tap(&mut self, facing: Facing, now: u64, tuning: &PlayerTuning) {
        let double_tap = matches!(
            self.last_tap,
            Some((last, at)) if last == facing && now.saturating_sub(at) <= tuning.double_tap_ms
        );
        if double_tap && self.can_dash(now, tuning) {
            self.start_dash(facing, now);
            self.last_tap = None;
        } else {
            self.last_tap = Some((facing, now));
        }
    }

    /// Not dashing, off cooldown, and grounded recently enough
    pub fn can_dash(&self, now: u64, tuning: &PlayerTuning) -> bool {
        let off_cooldown = self
            .last_dash_ms
            .is_none_or(|at| now.saturating_sub(at) >= tuning.dash_cooldown_ms);
        let grounded_recently = self.body.on_ground
            || self
                .last_grounded_ms
                .is_some_and(|at| now.saturating_sub(at) <= tuning.dash_grace_ms);
        self.dash.is_none() && off_cooldown && grounded_recently
    }

    fn start_dash(&mut self, facing: Facing, now: u64) {
        log::debug!("Player dash {facing:?} at {now}ms");
        self.dash = Some(Dash {
            started_ms: now,
            facing,
        });
        self.last_dash_ms = Some(now);
        self.body.facing = facing;
        self.body.vel.y = 0.0;
    }

    fn try_jump(&mut self, now: u64, tuning: &PlayerTuning) {
        if self.body.on_ground {
            self.body.vel.y = tuning.jump_speed;
            self.body.on_ground = false;
            self.air_jump_window = Some(now);
        } else if let Some(opened) = self.air_jump_window {
            if now.saturating_sub(opened) <= tuning.double_jump_grace_ms {
                self.body.vel.y = tuning.jump_speed;
                self.air_jump_window = None;
            }
        }
    }

    fn try_shoot(&mut self, now: u64, tuning: &PlayerTuning) -> Option<ShotRequest> {
        let ready = self
            .last_shot_ms
            .is_none_or(|at| now.saturating_sub(at) >= tuning.shoot_cooldown_ms);
        if !ready {
            return None;
        }
        self.last_shot_ms = Some(now);
        Some(ShotRequest {
            origin: self.body.center(),
            facing: self.body.facing,
        })
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    /// Lose hearts unless invulnerable or dashing. Returns true if applied.
    pub fn take_damage(&mut self, amount: u8, now: u64) -> bool {
        if self.invulnerable || self.is_dashing() || self.hearts == 0 {
            return false;
        }
        self.hearts = self.hearts.saturating_sub(amount);
        self.invulnerable = true;
        self.invulnerable_since = now;
        true
    }

    /// Remaining invulnerability in ms (for blink rendering)
    pub fn invulnerable_remaining(&self, now: u64) -> u64 {
        if !self.invulnerable {
            return 0;
        }
        self.invulnerable_ms
            .saturating_sub(now.saturating_sub(self.invulnerable_since))
    }

    pub fn heal(&mut self, hearts: u8) {
        self.hearts = self.hearts.saturating_add(hearts).min(self.max_hearts);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hearts > 0
    }

    /// Respawn at `pos` with full hearts and every timer cleared
    pub fn reset(&mut self, pos: Vec2) {
        self.body.teleport(pos);
        self.body.facing = Facing::Right;
        self.hearts = self.max_hearts;
        self.invulnerable = false;
        self.dash = None;
        self.last_dash_ms = None;
        self.last_grounded_ms = None;
        self.last_tap = None;
        self.air_jump_window = None;
        self.last_shot_ms = None;
        self.prev_input = PlayerInput::default();
    }
}
