//! Enemy chassis and patrol behaviors
//!
//! Every enemy shares the same chassis: one kinematic body, a hit-point
//! counter and an `active` flag. What differs is the behavior stored in
//! [`EnemyKind`]; all variants are driven through the same
//! [`Enemy::update`] call with an [`UpdateContext`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ambush::AmbushBrain;
use super::body::{Body, Facing, MoveParams, MoveReport};
use super::boss::BossBrain;
use super::level::{EnemySpawn, SpawnKind};
use super::projectile::Projectile;
use super::rect::Rect;
use super::tiles::{LevelBounds, TileSet};
use crate::tuning::{EnemyTuning, Tuning};

/// Everything an enemy may read about the world this frame
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    pub tiles: &'a TileSet,
    pub bounds: LevelBounds,
    pub player_rect: Rect,
    pub tuning: &'a Tuning,
}

/// Sprite selector for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Basic,
    Fast,
    Tank,
    Jumping,
    Ambush,
    Boss,
}

/// Horizontal range the enemy's center x turns around at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub start_x: f32,
    pub end_x: f32,
}

/// Walker flavors (same behavior, different stats)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkerStyle {
    Basic,
    Fast,
    Tank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks back and forth, turning at walls, level edges and patrol bounds
    Basic(WalkerStyle),
    /// Walks like Basic and hops when the countdown (frames) runs out
    Jumping { jump_timer: u32 },
    Ambush(AmbushBrain),
    Boss(Box<BossBrain>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub health: u32,
    pub max_health: u32,
    /// Contact damage to the player
    pub damage: u8,
    /// Patrol speed (px/frame)
    pub speed: f32,
    pub active: bool,
    pub patrol: Option<Patrol>,
    pub kind: EnemyKind,
}

/// Top-left position of a body whose bottom-center sits on `feet`
fn standing_pos(feet: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(feet.x - size.x / 2.0, feet.y - size.y)
}

impl Enemy {
    fn with_body(body: Body, health: u32, damage: u8, speed: f32, kind: EnemyKind) -> Self {
        Self {
            body,
            health,
            max_health: health,
            damage,
            speed,
            active: true,
            patrol: None,
            kind,
        }
    }

    pub fn walker(feet: Vec2, style: WalkerStyle, tuning: &EnemyTuning) -> Self {
        let (size, speed, health) = match style {
            WalkerStyle::Basic => (tuning.size, tuning.speed, tuning.health),
            WalkerStyle::Fast => (tuning.size, tuning.fast_speed, tuning.health),
            WalkerStyle::Tank => (tuning.tank_size, tuning.tank_speed, tuning.tank_health),
        };
        let size = Vec2::splat(size);
        let body = Body::new(standing_pos(feet, size), size);
        Self::with_body(body, health, tuning.damage, speed, EnemyKind::Basic(style))
    }

    pub fn jumping(feet: Vec2, tuning: &EnemyTuning, rng: &mut impl Rng) -> Self {
        let size = Vec2::splat(tuning.size);
        let body = Body::new(standing_pos(feet, size), size);
        let jump_timer = roll_jump_timer(tuning, rng);
        Self::with_body(
            body,
            tuning.health,
            tuning.damage,
            tuning.speed,
            EnemyKind::Jumping { jump_timer },
        )
    }

    /// Ambusher anchored beneath the nearest tile above its spawn point
    pub fn ambush(spawn_center: Vec2, tiles: &TileSet, tuning: &Tuning) -> Self {
        let ambush = &tuning.ambush;
        let size = Vec2::splat(ambush.size);
        let hang = AmbushBrain::find_hang_position(spawn_center, size, tiles, ambush.hang_search_radius)
            .unwrap_or(spawn_center - size / 2.0);
        Self::ambush_at(hang, tuning)
    }

    /// Ambusher with an explicit hang position (top-left)
    pub fn ambush_at(hang: Vec2, tuning: &Tuning) -> Self {
        let ambush = &tuning.ambush;
        let body = Body::new(hang, Vec2::splat(ambush.size));
        Self::with_body(
            body,
            ambush.health,
            ambush.damage,
            0.0,
            EnemyKind::Ambush(AmbushBrain::new(hang)),
        )
    }

    pub fn boss(feet: Vec2, tuning: &Tuning) -> Self {
        let boss = &tuning.boss;
        let size = Vec2::splat(boss.size);
        let body = Body::new(standing_pos(feet, size), size);
        Self::with_body(
            body,
            boss.health,
            boss.damage,
            boss.walk_speed,
            EnemyKind::Boss(Box::new(BossBrain::new(boss))),
        )
    }

    /// Build an enemy from a level spawn descriptor. Ground enemies stand on
    /// the bottom edge of their spawn tile. A patrol range applies to
    /// walkers and jumpers only.
    pub fn spawn(
        spawn: &EnemySpawn,
        tile_size: f32,
        tiles: &TileSet,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Self {
        let center = Vec2::new(spawn.x, spawn.y);
        let feet = Vec2::new(spawn.x, spawn.y + tile_size / 2.0);
        let enemy = match spawn.kind {
            SpawnKind::Basic => Self::walker(feet, WalkerStyle::Basic, &tuning.enemy),
            SpawnKind::Fast => Self::walker(feet, WalkerStyle::Fast, &tuning.enemy),
            SpawnKind::Tank => Self::walker(feet, WalkerStyle::Tank, &tuning.enemy),
            SpawnKind::Jumping => Self::jumping(feet, &tuning.enemy, rng),
            SpawnKind::Ambush => return Self::ambush(center, tiles, tuning),
            SpawnKind::Boss => return Self::boss(feet, tuning),
        };
        match spawn.patrol {
            Some(patrol) => enemy.with_patrol(patrol.start_x, patrol.end_x),
            None => enemy,
        }
    }

    pub fn with_patrol(mut self, start_x: f32, end_x: f32) -> Self {
        self.patrol = Some(Patrol { start_x, end_x });
        self
    }

    /// Advance one frame. Inactive enemies are skipped.
    pub fn update(&mut self, ctx: &UpdateContext<'_>, rng: &mut impl Rng) {
        if !self.active {
            return;
        }

        let Self {
            body,
            speed,
            patrol,
            kind,
            ..
        } = self;

        match kind {
            EnemyKind::Basic(_) => {
                walk(body, *speed, *patrol, ctx);
            }
            EnemyKind::Jumping { jump_timer } => {
                walk(body, *speed, *patrol, ctx);
                let tuning = &ctx.tuning.enemy;
                *jump_timer = jump_timer.saturating_sub(1);
                if *jump_timer == 0 && body.on_ground {
                    body.vel.y = tuning.jump_speed;
                    body.on_ground = false;
                    *jump_timer = roll_jump_timer(tuning, rng);
                }
            }
            EnemyKind::Ambush(brain) => brain.update(body, ctx),
            EnemyKind::Boss(brain) => brain.update(body, ctx, rng),
        }
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.active {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.active = false;
            return true;
        }
        false
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.active && self.health > 0
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn visual(&self) -> Visual {
        match &self.kind {
            EnemyKind::Basic(WalkerStyle::Basic) => Visual::Basic,
            EnemyKind::Basic(WalkerStyle::Fast) => Visual::Fast,
            EnemyKind::Basic(WalkerStyle::Tank) => Visual::Tank,
            EnemyKind::Jumping { .. } => Visual::Jumping,
            EnemyKind::Ambush(_) => Visual::Ambush,
            EnemyKind::Boss(_) => Visual::Boss,
        }
    }

    /// Live boss bullets (empty for everything else)
    pub fn bullets(&self) -> &[Projectile] {
        match &self.kind {
            EnemyKind::Boss(brain) => &brain.bullets,
            _ => &[],
        }
    }

    pub fn bullets_mut(&mut self) -> &mut [Projectile] {
        match &mut self.kind {
            EnemyKind::Boss(brain) => &mut brain.bullets,
            _ => &mut [],
        }
    }

    /// Drop spent bullets so only live ones are exposed
    pub fn prune_bullets(&mut self) {
        if let EnemyKind::Boss(brain) = &mut self.kind {
            brain.bullets.retain(|b| b.active);
        }
    }
}

fn roll_jump_timer(tuning: &EnemyTuning, rng: &mut impl Rng) -> u32 {
    let min = tuning.jump_interval_min.min(tuning.jump_interval_max);
    rng.random_range(min..=tuning.jump_interval_max)
}

/// Patrol step: walk in the facing direction, turn around at most once
fn walk(body: &mut Body, speed: f32, patrol: Option<Patrol>, ctx: &UpdateContext<'_>) -> MoveReport {
    let tuning = &ctx.tuning.enemy;
    body.vel.x = body.facing.sign() * speed;
    let report = body.step(
        ctx.tiles,
        ctx.bounds,
        &MoveParams::falling(tuning.gravity, tuning.max_fall_speed),
    );

    let mut facing = body.facing;
    if report.blocked_horizontally() {
        facing = facing.flipped();
    }
    if let Some(patrol) = patrol {
        let center_x = body.center().x;
        if center_x <= patrol.start_x {
            body.pos.x = patrol.start_x - body.size.x / 2.0;
            facing = Facing::Right;
        } else if center_x >= patrol.end_x {
            body.pos.x = patrol.end_x - body.size.x / 2.0;
            facing = Facing::Left;
        }
    }
    body.facing = facing;
    report
}
