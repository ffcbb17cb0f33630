//! Fixed timestep simulation tick
//!
//! One call per rendered frame. The order inside a frame is fixed: player,
//! enemies, bullets, hit resolution, pickups, exit/death checks, camera,
//! then cleanup.

use super::enemy::UpdateContext;
use super::player::PlayerInput;
use super::projectile::Projectile;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    /// Start the level over (only honored after a game over)
    pub restart: bool,
}

impl TickInput {
    /// The part of the input the player controller consumes
    pub fn controls(&self) -> PlayerInput {
        PlayerInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
            shoot: self.shoot,
        }
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    state.events.clear();

    if input.restart && state.phase == GamePhase::GameOver {
        state.restart();
        return;
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    state.clock.advance(dt_ms);
    state.time_ticks += 1;
    let now = state.clock.now();

    // Player first: enemies target where the player is this frame
    let shot = state.player.update(
        input.controls(),
        &state.level.tiles,
        state.level.bounds,
        now,
        &state.tuning.player,
    );
    if let Some(shot) = shot {
        state
            .player_bullets
            .push(Projectile::from_shot(&shot, &state.tuning.projectile));
    }

    let ctx = UpdateContext {
        tiles: &state.level.tiles,
        bounds: state.level.bounds,
        player_rect: state.player.body.rect(),
        tuning: &state.tuning,
    };
    for enemy in &mut state.enemies {
        enemy.update(&ctx, &mut state.rng);
    }

    let margin = state.tuning.projectile.bounds_margin;
    for bullet in &mut state.player_bullets {
        bullet.update(state.level.bounds, margin);
    }

    resolve_enemy_contact(state, now);
    let boss_killed = resolve_player_bullets(state);
    resolve_boss_bullets(state, now);

    // Boss-death effects happen exactly once, between resolution passes
    if boss_killed && !state.boss_defeated {
        state.boss_defeated = true;
        state.level.open_boss_gate();
        state.events.push(GameEvent::BossDefeated);
        log::info!("Boss defeated at tick {}", state.time_ticks);
    }

    let picked = state.level.collect_overlapping(&state.player.body.rect());
    if picked > 0 {
        let remaining = state.level.collectibles.len() - state.level.collected_count();
        state.events.push(GameEvent::CollectiblePicked { remaining });
        log::debug!("Picked {} collectible(s), {} remaining", picked, remaining);
    }

    if state.check_level_complete() {
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelComplete {
            level_index: state.level_index,
        });
        log::info!("Level {} complete at tick {}", state.level_index, state.time_ticks);
    } else if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::PlayerDied);
        log::info!("Player died at tick {}", state.time_ticks);
    }

    state
        .camera
        .follow(state.player.body.center(), state.level.bounds);

    for enemy in &mut state.enemies {
        enemy.prune_bullets();
    }
    state.enemies.retain(|e| e.active);
    state.player_bullets.retain(|b| b.active);
}

/// Touching a live enemy costs hearts; at most one enemy hits per frame
fn resolve_enemy_contact(state: &mut GameState, now: u64) {
    let player_rect = state.player.body.rect();
    let Some(damage) = state
        .enemies
        .iter()
        .find(|e| e.is_alive() && e.rect().intersects(&player_rect))
        .map(|e| e.damage)
    else {
        return;
    };

    if state.player.take_damage(damage, now) {
        state.events.push(GameEvent::PlayerHurt {
            hearts: state.player.hearts,
        });
        log::debug!("Player touched an enemy, {} hearts left", state.player.hearts);
    }
}

/// Each player bullet damages the first live enemy it overlaps. Returns
/// true if a boss died this frame.
fn resolve_player_bullets(state: &mut GameState) -> bool {
    let mut boss_killed = false;
    for bullet in state.player_bullets.iter_mut().filter(|b| b.active) {
        let rect = bullet.rect();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && e.rect().intersects(&rect))
        else {
            continue;
        };

        bullet.hit();
        if enemy.take_damage(u32::from(bullet.damage)) {
            state.events.push(GameEvent::EnemyKilled {
                visual: enemy.visual(),
            });
            boss_killed |= enemy.is_boss();
        }
    }
    boss_killed
}

/// Boss bullets are spent on contact with the player, hurt or not
fn resolve_boss_bullets(state: &mut GameState, now: u64) {
    let player_rect = state.player.body.rect();
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        for bullet in enemy.bullets_mut().iter_mut().filter(|b| b.active) {
            if !bullet.rect().intersects(&player_rect) {
                continue;
            }
            bullet.hit();
            if state.player.take_damage(bullet.damage, now) {
                state.events.push(GameEvent::PlayerHurt {
                    hearts: state.player.hearts,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::enemy::{Enemy, EnemyKind, Visual, WalkerStyle};
    use crate::sim::level::Level;
    use crate::sim::projectile::ProjectileKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state_for(grid: &[&str]) -> GameState {
        GameState::new(0, Level::from_grid(grid, 64.0), 12345, Tuning::default())
    }

    /// Tick `frames` times with the same input, collecting every event
    fn run(state: &mut GameState, input: TickInput, frames: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            tick(state, &input, FRAME_MS);
            events.extend(state.events.iter().copied());
        }
        events
    }

    const WIDE: [&str; 2] = ["S...................", "GGGGGGGGGGGGGGGGGGGG"];

    /// Park an idle boss far from the player with still bullets at `centers`
    fn boss_with_bullets(state: &mut GameState, centers: &[Vec2]) {
        let mut boss = Enemy::boss(Vec2::new(1100.0, 64.0), &state.tuning);
        let EnemyKind::Boss(brain) = &mut boss.kind else {
            panic!("expected a boss");
        };
        for &center in centers {
            brain.bullets.push(Projectile::new(
                center,
                Vec2::splat(12.0),
                Vec2::ZERO,
                1,
                ProjectileKind::Boss,
            ));
        }
        state.enemies.push(boss);
    }

    #[test]
    fn test_boss_bullets_hurt_once_and_are_removed() {
        let mut state = state_for(&WIDE);
        let center = state.player.body.center();
        boss_with_bullets(&mut state, &[center, center]);

        let events = run(&mut state, TickInput::default(), 1);
        assert_eq!(state.player.hearts, 2);
        assert_eq!(events, vec![GameEvent::PlayerHurt { hearts: 2 }]);
        assert!(state.enemies[0].bullets().is_empty());
    }

    #[test]
    fn test_boss_bullet_spent_while_invulnerable() {
        let mut state = state_for(&WIDE);
        assert!(state.player.take_damage(1, state.clock.now()));
        let center = state.player.body.center();
        boss_with_bullets(&mut state, &[center]);

        let events = run(&mut state, TickInput::default(), 1);
        assert_eq!(state.player.hearts, 2);
        assert!(events.is_empty());
        assert!(state.enemies[0].bullets().is_empty());
    }

    #[test]
    fn test_boss_bullet_spent_while_dashing() {
        let mut state = state_for(&WIDE);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, right, 1);
        run(&mut state, TickInput::default(), 1);
        run(&mut state, right, 1);
        assert!(state.player.is_dashing());

        let center = state.player.body.center();
        boss_with_bullets(&mut state, &[center]);
        let events = run(&mut state, TickInput::default(), 1);

        assert!(state.player.is_dashing());
        assert_eq!(state.player.hearts, state.player.max_hearts);
        assert!(events.is_empty());
        assert!(state.enemies[0].bullets().is_empty());
    }

    #[test]
    fn test_player_shot_kills_enemy() {
        let mut state = state_for(&["..........", "S....B....", "GGGGGGGGGG"]);
        assert_eq!(state.enemies.len(), 1);

        let fire = TickInput {
            shoot: true,
            ..Default::default()
        };
        let mut events = run(&mut state, fire, 1);
        assert_eq!(state.player_bullets.len(), 1);
        events.extend(run(&mut state, TickInput::default(), 60));

        assert!(state.enemies.is_empty());
        assert!(state.player_bullets.is_empty());
        assert!(events.contains(&GameEvent::EnemyKilled {
            visual: Visual::Basic
        }));
    }

    #[test]
    fn test_contact_damage_once_per_frame() {
        let mut state = state_for(&["S.........", "GGGGGGGGGG"]);
        let feet = Vec2::new(state.player.body.center().x, state.player.body.bottom());
        for _ in 0..2 {
            state
                .enemies
                .push(Enemy::walker(feet, WalkerStyle::Basic, &state.tuning.enemy));
        }

        let events = run(&mut state, TickInput::default(), 1);
        assert_eq!(state.player.hearts, 2);
        assert!(state.player.invulnerable);
        assert_eq!(events, vec![GameEvent::PlayerHurt { hearts: 2 }]);

        run(&mut state, TickInput::default(), 5);
        assert_eq!(state.player.hearts, 2);
    }

    #[test]
    fn test_boss_death_opens_gate_once() {
        let mut state = state_for(&["S.....X...", "GGGGGGGGGG"]);
        let gate_tiles = state.level.boss_gate.len();
        let solid_before = state.level.tiles.solid().len();

        let mut boss = Enemy::boss(Vec2::new(550.0, 64.0), &state.tuning);
        boss.health = 1;
        let center = boss.body.center();
        state.enemies.push(boss);
        state.player_bullets.push(Projectile::new(
            center,
            Vec2::new(16.0, 12.0),
            Vec2::new(10.0, 0.0),
            1,
            ProjectileKind::Player,
        ));

        let events = run(&mut state, TickInput::default(), 1);
        assert!(state.boss_defeated);
        assert!(events.contains(&GameEvent::BossDefeated));
        assert_eq!(state.level.tiles.solid().len(), solid_before - gate_tiles);
        assert!(state.boss().is_none());

        let events = run(&mut state, TickInput::default(), 10);
        assert!(!events.contains(&GameEvent::BossDefeated));
        assert_eq!(state.level.tiles.solid().len(), solid_before - gate_tiles);
    }

    #[test]
    fn test_reaching_exit_completes_level() {
        let mut state = state_for(&["S.E", "GGG"]);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let events = run(&mut state, right, 60);

        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::LevelComplete { .. })).count(),
            1
        );

        // Ticks are no-ops once the level is over
        let ticks = state.time_ticks;
        let now = state.clock.now();
        run(&mut state, right, 5);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.clock.now(), now);
    }

    #[test]
    fn test_collectible_gates_exit() {
        let mut state = state_for(&["S...C..E", "GGGGGGGG"]);
        state.level.collectibles[0].rect.y -= 1000.0;

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, right, 200);
        assert_eq!(state.phase, GamePhase::Playing);

        state.level.collectibles[0].rect.y += 1000.0;
        state.player.reset(state.level.player_start(state.player.body.size));
        let events = run(&mut state, right, 200);
        assert!(events.contains(&GameEvent::CollectiblePicked { remaining: 0 }));
        assert_eq!(state.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut state = state_for(&["S....B....", "GGGGGGGGGG"]);
        state.player.hearts = 1;
        let feet = Vec2::new(state.player.body.center().x, state.player.body.bottom());
        state
            .enemies
            .push(Enemy::walker(feet, WalkerStyle::Basic, &state.tuning.enemy));

        let events = run(&mut state, TickInput::default(), 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::PlayerDied));

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        run(&mut state, restart, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.hearts, state.player.max_hearts);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let grid = ["..........", "S..J...J..", "GGGGGGGGGG"];
        let mut state1 = state_for(&grid);
        let mut state2 = state_for(&grid);

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for frame in 0..400 {
            let input = &inputs[frame % inputs.len()];
            tick(&mut state1, input, FRAME_MS);
            tick(&mut state2, input, FRAME_MS);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.body.pos, b.body.pos);
        }
    }
}
