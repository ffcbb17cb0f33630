//! Straight-line projectiles
//!
//! A projectile keeps its spawn velocity for life. It expires when it leaves
//! the level (plus a margin) or when whoever it hit calls [`Projectile::hit`].
//! Entity collision is the frame orchestrator's job.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Facing;
use super::rect::Rect;
use super::tiles::LevelBounds;
use crate::direction_from_angle;
use crate::tuning::{BossTuning, ProjectileTuning};

/// Who fired the projectile (also selects the sprite)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Player,
    Boss,
}

/// Where a fired player shot should appear. The player only reports the
/// shot; the caller turns it into a [`Projectile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub origin: Vec2,
    pub facing: Facing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// px/frame
    pub vel: Vec2,
    pub damage: u8,
    pub active: bool,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn new(center: Vec2, size: Vec2, vel: Vec2, damage: u8, kind: ProjectileKind) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
            vel,
            damage,
            active: true,
            kind,
        }
    }

    /// Player bullet travelling horizontally from the shot origin
    pub fn from_shot(shot: &ShotRequest, tuning: &ProjectileTuning) -> Self {
        Self::new(
            shot.origin,
            Vec2::new(tuning.width, tuning.height),
            Vec2::new(tuning.speed * shot.facing.sign(), 0.0),
            tuning.damage,
            ProjectileKind::Player,
        )
    }

    /// Boss bullet fired at `angle` radians (0 = right, π/2 = down)
    pub fn boss_shot(center: Vec2, angle: f32, tuning: &BossTuning) -> Self {
        Self::new(
            center,
            Vec2::splat(tuning.bullet_size),
            direction_from_angle(angle) * tuning.bullet_speed,
            tuning.bullet_damage,
            ProjectileKind::Boss,
        )
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Move one frame and expire once outside the level by more than `margin`
    pub fn update(&mut self, bounds: LevelBounds, margin: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel;
        if bounds.is_outside(&self.rect(), margin) {
            self.active = false;
        }
    }

    /// Single-hit contract: a projectile damages at most one target
    pub fn hit(&mut self) {
        self.active = false;
    }
}
