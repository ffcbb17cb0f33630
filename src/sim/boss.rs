//! Boss attack state machine
//!
//! Between attacks the boss walks toward the player while a frame cooldown
//! runs down. Every `ultimate_every`-th attack is the ultimate; the rest are
//! a coin flip between jump-shoot and jump-slam. An attack runs to
//! completion before another can be chosen.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Facing, MoveParams};
use super::enemy::UpdateContext;
use super::projectile::Projectile;
use crate::approach;
use crate::tuning::BossTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackChoice {
    JumpShoot,
    JumpSlam,
    Ultimate,
}

/// Pick the attack for the `counter`-th attack (1-based)
pub fn choose_attack(counter: u32, every: u32, rng: &mut impl Rng) -> AttackChoice {
    if every > 0 && counter % every == 0 {
        AttackChoice::Ultimate
    } else if rng.random_bool(0.5) {
        AttackChoice::JumpShoot
    } else {
        AttackChoice::JumpSlam
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpShootPhase {
    /// Flying up to hover height above the player
    Rising,
    /// Tracking the player horizontally, firing spread volleys
    Hovering { frames: u32, volleys: u32 },
    /// Dropping back down under gravity
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpSlamPhase {
    /// Airborne; `fired` once the side bullets went out
    Jumping { fired: bool },
    /// Landed, recovering
    Slamming { frames_left: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UltimatePhase {
    Rising { target_y: f32 },
    /// Stationary, firing a rotating stream
    Shooting { frames: u32, angle: f32 },
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossAttack {
    JumpShoot(JumpShootPhase),
    JumpSlam(JumpSlamPhase),
    Ultimate(UltimatePhase),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBrain {
    pub current: Option<BossAttack>,
    /// Attacks started so far
    pub attack_counter: u32,
    /// Frames until the next attack may start
    pub cooldown: u32,
    /// Bullets owned by the boss; they die with it
    pub bullets: Vec<Projectile>,
}

impl BossBrain {
    pub fn new(tuning: &BossTuning) -> Self {
        Self {
            current: None,
            attack_counter: 0,
            cooldown: tuning.attack_cooldown,
            bullets: Vec::new(),
        }
    }

    pub fn update(&mut self, body: &mut Body, ctx: &UpdateContext<'_>, rng: &mut impl Rng) {
        let margin = ctx.tuning.projectile.bounds_margin;
        for bullet in &mut self.bullets {
            bullet.update(ctx.bounds, margin);
        }

        let player_x = ctx.player_rect.center_x();
        body.facing = if player_x < body.center().x {
            Facing::Left
        } else {
            Facing::Right
        };

        self.current = match self.current.take() {
            None => self.idle(body, ctx, rng),
            Some(BossAttack::JumpShoot(phase)) => self.jump_shoot(phase, body, ctx),
            Some(BossAttack::JumpSlam(phase)) => self.jump_slam(phase, body, ctx),
            Some(BossAttack::Ultimate(phase)) => self.ultimate(phase, body, ctx),
        };

        self.bullets.retain(|bullet| bullet.active);
    }

    /// Start `choice` right away, regardless of cooldown
    pub fn begin(&mut self, choice: AttackChoice, body: &mut Body, tuning: &BossTuning) {
        body.on_ground = false;
        let attack = match choice {
            AttackChoice::JumpShoot => BossAttack::JumpShoot(JumpShootPhase::Rising),
            AttackChoice::JumpSlam => {
                body.vel.y = tuning.slam_jump_speed;
                BossAttack::JumpSlam(JumpSlamPhase::Jumping { fired: false })
            }
            AttackChoice::Ultimate => BossAttack::Ultimate(UltimatePhase::Rising {
                target_y: (body.pos.y - tuning.ultimate_height).max(0.0),
            }),
        };
        log::debug!("Boss begins {:?} (attack #{})", choice, self.attack_counter);
        self.current = Some(attack);
    }

    fn idle(&mut self, body: &mut Body, ctx: &UpdateContext<'_>, rng: &mut impl Rng) -> Option<BossAttack> {
        let tuning = &ctx.tuning.boss;
        let dx = ctx.player_rect.center_x() - body.center().x;
        body.vel.x = if dx.abs() > tuning.walk_speed {
            body.facing.sign() * tuning.walk_speed
        } else {
            0.0
        };
        body.step(ctx.tiles, ctx.bounds, &self.gravity(tuning, 1.0));

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }

        self.attack_counter += 1;
        let choice = choose_attack(self.attack_counter, tuning.ultimate_every, rng);
        self.begin(choice, body, tuning);
        self.current
    }

    fn jump_shoot(&mut self, phase: JumpShootPhase, body: &mut Body, ctx: &UpdateContext<'_>) -> Option<BossAttack> {
        let tuning = &ctx.tuning.boss;
        let target_x = ctx.player_rect.center_x() - body.size.x / 2.0;
        let hover_y = (ctx.player_rect.top() - tuning.hover_height).max(0.0);

        let next = match phase {
            JumpShootPhase::Rising => {
                let dy = approach(body.pos.y, hover_y, tuning.rise_speed).min(0.0);
                body.vel = Vec2::new(approach(body.pos.x, target_x, tuning.track_speed), dy);
                let report = body.step(ctx.tiles, ctx.bounds, &MoveParams::flying());
                if dy == 0.0 || report.hit_ceiling || body.pos.y <= hover_y {
                    JumpShootPhase::Hovering {
                        frames: 0,
                        volleys: 0,
                    }
                } else {
                    JumpShootPhase::Rising
                }
            }
            JumpShootPhase::Hovering { frames, volleys } => {
                body.vel = Vec2::new(approach(body.pos.x, target_x, tuning.track_speed), 0.0);
                body.step(ctx.tiles, ctx.bounds, &MoveParams::flying());

                let frames = frames + 1;
                let mut volleys = volleys;
                if frames % tuning.volley_interval.max(1) == 0 {
                    self.fire_spread(body.center(), tuning);
                    volleys += 1;
                }
                if volleys >= tuning.volleys {
                    JumpShootPhase::Falling
                } else {
                    JumpShootPhase::Hovering { frames, volleys }
                }
            }
            JumpShootPhase::Falling => {
                body.vel.x = 0.0;
                body.step(ctx.tiles, ctx.bounds, &self.gravity(tuning, 1.0));
                if body.on_ground {
                    return self.finish(tuning.attack_cooldown);
                }
                JumpShootPhase::Falling
            }
        };
        Some(BossAttack::JumpShoot(next))
    }

    fn jump_slam(&mut self, phase: JumpSlamPhase, body: &mut Body, ctx: &UpdateContext<'_>) -> Option<BossAttack> {
        let tuning = &ctx.tuning.boss;

        let next = match phase {
            JumpSlamPhase::Jumping { fired } => {
                let dx = ctx.player_rect.center_x() - body.center().x;
                body.vel.x = if dx.abs() > tuning.slam_drift {
                    dx.signum() * tuning.slam_drift
                } else {
                    0.0
                };
                body.step(ctx.tiles, ctx.bounds, &self.gravity(tuning, tuning.slam_gravity_multiplier));

                let fired = if !fired && (body.vel.y > 0.0 || body.on_ground) {
                    self.fire_sides(body, tuning);
                    true
                } else {
                    fired
                };
                if body.on_ground {
                    JumpSlamPhase::Slamming {
                        frames_left: tuning.slam_recovery,
                    }
                } else {
                    JumpSlamPhase::Jumping { fired }
                }
            }
            JumpSlamPhase::Slamming { frames_left } => {
                body.vel.x = 0.0;
                body.step(ctx.tiles, ctx.bounds, &self.gravity(tuning, 1.0));
                if frames_left <= 1 {
                    return self.finish(tuning.attack_cooldown);
                }
                JumpSlamPhase::Slamming {
                    frames_left: frames_left - 1,
                }
            }
        };
        Some(BossAttack::JumpSlam(next))
    }

    fn ultimate(&mut self, phase: UltimatePhase, body: &mut Body, ctx: &UpdateContext<'_>) -> Option<BossAttack> {
        let tuning = &ctx.tuning.boss;

        let next = match phase {
            UltimatePhase::Rising { target_y } => {
                let dy = approach(body.pos.y, target_y, tuning.ultimate_rise_speed).min(0.0);
                body.vel = Vec2::new(0.0, dy);
                let report = body.step(ctx.tiles, ctx.bounds, &MoveParams::flying());
                if dy == 0.0 || report.hit_ceiling || body.pos.y <= target_y {
                    UltimatePhase::Shooting {
                        frames: 0,
                        angle: 0.0,
                    }
                } else {
                    UltimatePhase::Rising { target_y }
                }
            }
            UltimatePhase::Shooting { frames, angle } => {
                body.vel = Vec2::ZERO;
                let frames = frames + 1;
                let mut angle = angle;
                if frames % tuning.ultimate_interval.max(1) == 0 {
                    self.bullets
                        .push(Projectile::boss_shot(body.center(), angle, tuning));
                    angle = (angle + tuning.ultimate_angle_step_deg.to_radians()) % (2.0 * PI);
                }
                if frames >= tuning.ultimate_duration {
                    UltimatePhase::Descending
                } else {
                    UltimatePhase::Shooting { frames, angle }
                }
            }
            UltimatePhase::Descending => {
                body.vel.x = 0.0;
                body.step(ctx.tiles, ctx.bounds, &self.gravity(tuning, 1.0));
                if body.on_ground {
                    return self.finish(tuning.ultimate_cooldown);
                }
                UltimatePhase::Descending
            }
        };
        Some(BossAttack::Ultimate(next))
    }

    fn finish(&mut self, cooldown: u32) -> Option<BossAttack> {
        self.cooldown = cooldown;
        None
    }

    fn gravity(&self, tuning: &BossTuning, multiplier: f32) -> MoveParams {
        MoveParams::falling(tuning.gravity * multiplier, tuning.max_fall_speed)
    }

    /// Three bullets fanned around straight down
    fn fire_spread(&mut self, center: Vec2, tuning: &BossTuning) {
        for offset in [-FRAC_PI_4, 0.0, FRAC_PI_4] {
            self.bullets
                .push(Projectile::boss_shot(center, FRAC_PI_2 + offset, tuning));
        }
    }

    /// Horizontal bullets out of both flanks, spread over the body height
    fn fire_sides(&mut self, body: &Body, tuning: &BossTuning) {
        let per_side = tuning.slam_bullets_per_side;
        let center_x = body.center().x;
        for i in 0..per_side {
            let y = body.pos.y + body.size.y * (i + 1) as f32 / (per_side + 1) as f32;
            let origin = Vec2::new(center_x, y);
            self.bullets.push(Projectile::boss_shot(origin, PI, tuning));
            self.bullets.push(Projectile::boss_shot(origin, 0.0, tuning));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::tiles::{LevelBounds, TileSet};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WIDTH: f32 = 3000.0;
    const HEIGHT: f32 = 4000.0;

    struct Arena {
        tuning: Tuning,
        tiles: TileSet,
        player_rect: Rect,
        rng: Pcg32,
    }

    impl Arena {
        fn new(player_rect: Rect) -> Self {
            Self {
                tuning: Tuning::default(),
                tiles: TileSet::default(),
                player_rect,
                rng: Pcg32::seed_from_u64(42),
            }
        }

        fn boss_on_floor(&self) -> (Body, BossBrain) {
            let size = Vec2::splat(self.tuning.boss.size);
            let mut body = Body::new(Vec2::new(WIDTH / 2.0 - size.x / 2.0, HEIGHT - size.y), size);
            body.on_ground = true;
            (body, BossBrain::new(&self.tuning.boss))
        }

        fn frame(&mut self, brain: &mut BossBrain, body: &mut Body) {
            let ctx = UpdateContext {
                tiles: &self.tiles,
                bounds: LevelBounds::new(WIDTH, HEIGHT),
                player_rect: self.player_rect,
                tuning: &self.tuning,
            };
            brain.update(body, &ctx, &mut self.rng);
        }

        /// Run frames until `done` holds, panicking after `limit`
        fn run_until(&mut self, brain: &mut BossBrain, body: &mut Body, limit: u32, done: impl Fn(&BossBrain) -> bool) {
            for _ in 0..limit {
                self.frame(brain, body);
                if done(brain) {
                    return;
                }
            }
            panic!("condition not reached in {limit} frames, state {:?}", brain.current);
        }
    }

    #[test]
    fn test_every_fourth_attack_is_ultimate() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            for counter in 1..=12 {
                let choice = choose_attack(counter, 4, &mut rng);
                if counter % 4 == 0 {
                    assert_eq!(choice, AttackChoice::Ultimate);
                } else {
                    assert_ne!(choice, AttackChoice::Ultimate);
                }
            }
        }
    }

    #[test]
    fn test_both_regular_attacks_get_picked() {
        let mut rng = Pcg32::seed_from_u64(9);
        let picks: Vec<_> = (0..64).map(|_| choose_attack(1, 4, &mut rng)).collect();
        assert!(picks.contains(&AttackChoice::JumpShoot));
        assert!(picks.contains(&AttackChoice::JumpSlam));
    }

    #[test]
    fn test_waits_for_cooldown_before_attacking() {
        let mut arena = Arena::new(Rect::new(100.0, HEIGHT - 48.0, 32.0, 48.0));
        let (mut body, mut brain) = arena.boss_on_floor();
        let cooldown = brain.cooldown;

        for _ in 0..cooldown {
            arena.frame(&mut brain, &mut body);
            assert!(brain.current.is_none());
        }
        arena.frame(&mut brain, &mut body);
        assert!(brain.current.is_some());
        assert_eq!(brain.attack_counter, 1);

        // Walks toward the player while idle
        assert!(body.center().x < WIDTH / 2.0);
    }

    #[test]
    fn test_no_new_attack_while_one_is_running() {
        let mut arena = Arena::new(Rect::new(1484.0, 100.0, 32.0, 48.0));
        let (mut body, mut brain) = arena.boss_on_floor();
        brain.begin(AttackChoice::JumpShoot, &mut body, &arena.tuning.boss);
        brain.cooldown = 0;

        for _ in 0..50 {
            arena.frame(&mut brain, &mut body);
            assert_eq!(brain.attack_counter, 0);
            assert!(matches!(brain.current, Some(BossAttack::JumpShoot(_))));
        }
    }

    #[test]
    fn test_jump_shoot_fires_three_volleys() {
        // Player far above so the hover point is near the top of the arena
        let mut arena = Arena::new(Rect::new(1484.0, 100.0, 32.0, 48.0));
        let (mut body, mut brain) = arena.boss_on_floor();
        brain.begin(AttackChoice::JumpShoot, &mut body, &arena.tuning.boss);

        arena.run_until(&mut brain, &mut body, 2000, |brain| {
            matches!(brain.current, Some(BossAttack::JumpShoot(JumpShootPhase::Falling)))
        });
        assert_eq!(body.pos.y, 0.0);
        assert_eq!(brain.bullets.len(), 9);
        let straight_down = brain
            .bullets
            .iter()
            .filter(|b| b.vel.x.abs() < 1e-4 && b.vel.y > 0.0)
            .count();
        assert_eq!(straight_down, 3);

        arena.run_until(&mut brain, &mut body, 2000, |brain| brain.current.is_none());
        assert_eq!(body.bottom(), HEIGHT);
        assert_eq!(brain.cooldown, arena.tuning.boss.attack_cooldown);
    }

    #[test]
    fn test_jump_slam_fires_sides_once() {
        let mut arena = Arena::new(Rect::new(1484.0, HEIGHT - 48.0, 32.0, 48.0));
        let (mut body, mut brain) = arena.boss_on_floor();
        brain.begin(AttackChoice::JumpSlam, &mut body, &arena.tuning.boss);

        arena.run_until(&mut brain, &mut body, 500, |brain| {
            matches!(brain.current, Some(BossAttack::JumpSlam(JumpSlamPhase::Slamming { .. })))
        });
        let per_side = arena.tuning.boss.slam_bullets_per_side as usize;
        assert_eq!(brain.bullets.len(), per_side * 2);
        assert_eq!(brain.bullets.iter().filter(|b| b.vel.x < 0.0).count(), per_side);
        assert_eq!(brain.bullets.iter().filter(|b| b.vel.x > 0.0).count(), per_side);

        arena.run_until(&mut brain, &mut body, 500, |brain| brain.current.is_none());
        assert_eq!(brain.bullets.len(), per_side * 2);
        assert_eq!(brain.cooldown, arena.tuning.boss.attack_cooldown);
    }

    #[test]
    fn test_ultimate_cycle() {
        // Mid-level floor so the whole stream stays inside the arena
        let floor_y = HEIGHT / 2.0;
        let mut arena = Arena::new(Rect::new(100.0, floor_y - 48.0, 32.0, 48.0));
        arena.tiles = TileSet::new(vec![Rect::new(0.0, floor_y, WIDTH, 64.0)], vec![]);
        let (mut body, mut brain) = arena.boss_on_floor();
        body.pos.y = floor_y - body.size.y;
        brain.attack_counter = 3;
        brain.cooldown = 0;
        let start_y = body.pos.y;

        arena.frame(&mut brain, &mut body);
        assert_eq!(brain.attack_counter, 4);
        assert!(matches!(brain.current, Some(BossAttack::Ultimate(_))));

        arena.run_until(&mut brain, &mut body, 500, |brain| {
            matches!(brain.current, Some(BossAttack::Ultimate(UltimatePhase::Shooting { .. })))
        });
        assert_eq!(body.pos.y, start_y - arena.tuning.boss.ultimate_height);

        arena.run_until(&mut brain, &mut body, 500, |brain| {
            matches!(brain.current, Some(BossAttack::Ultimate(UltimatePhase::Descending)))
        });
        let tuning = &arena.tuning.boss;
        assert_eq!(
            brain.bullets.len() as u32,
            tuning.ultimate_duration / tuning.ultimate_interval
        );

        arena.run_until(&mut brain, &mut body, 500, |brain| brain.current.is_none());
        assert_eq!(brain.cooldown, arena.tuning.boss.ultimate_cooldown);
        assert_eq!(body.bottom(), floor_y);
    }
}
