//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, timers on the simulation clock only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod ambush;
pub mod body;
pub mod boss;
pub mod clock;
pub mod enemy;
pub mod level;
pub mod player;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;
pub mod tiles;

pub use ambush::{AmbushBrain, AmbushState};
pub use body::{Body, Facing, MoveParams, MoveReport};
pub use boss::{AttackChoice, BossAttack, BossBrain, choose_attack};
pub use clock::Clock;
pub use enemy::{Enemy, EnemyKind, Patrol, UpdateContext, Visual, WalkerStyle};
pub use level::{Collectible, EnemySpawn, Level, SpawnKind};
pub use player::{Player, PlayerInput};
pub use projectile::{Projectile, ProjectileKind, ShotRequest};
pub use rect::Rect;
pub use state::{Camera, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use tiles::{LevelBounds, TileSet};
