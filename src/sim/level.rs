//! Level snapshot and character-grid builder
//!
//! Grid legend:
//! - `.` or space: empty
//! - `G`, `D`: solid ground / dirt
//! - `P`: one-way platform (top strip of the tile)
//! - `X`: boss gate, solid until the boss dies
//! - `C`: collectible
//! - `E`: exit
//! - `S`: player spawn
//! - `B`, `F`, `T`, `J`, `A`, `K`: basic, fast, tank, jumping, ambush, boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Patrol;
use super::rect::Rect;
use super::tiles::{LevelBounds, TileSet};
use crate::consts::{DEFAULT_LEVEL_COLS, DEFAULT_LEVEL_ROWS, ONE_WAY_THICKNESS, TILE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Basic,
    Fast,
    Tank,
    Jumping,
    Ambush,
    Boss,
}

impl SpawnKind {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'B' => Some(Self::Basic),
            'F' => Some(Self::Fast),
            'T' => Some(Self::Tank),
            'J' => Some(Self::Jumping),
            'A' => Some(Self::Ambush),
            'K' => Some(Self::Boss),
            _ => None,
        }
    }
}

/// Enemy spawn point (center of the spawn tile)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub kind: SpawnKind,
    /// Optional turnaround range for walkers and jumpers
    #[serde(default)]
    pub patrol: Option<Patrol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    pub collected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub tiles: TileSet,
    pub bounds: LevelBounds,
    pub tile_size: f32,
    pub collectibles: Vec<Collectible>,
    pub exit: Option<Rect>,
    pub spawns: Vec<EnemySpawn>,
    /// Solid tiles that disappear once the boss is defeated
    pub boss_gate: Vec<Rect>,
    /// Center of the player spawn tile
    pub player_spawn: Vec2,
}

impl Level {
    /// Build a level from rows of tile codes. Short rows are padded with
    /// empty tiles; unknown codes are treated as empty.
    pub fn from_grid<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Self {
        let cols = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);

        let mut solid = Vec::new();
        let mut one_way = Vec::new();
        let mut level = Self {
            tiles: TileSet::default(),
            bounds: LevelBounds::new(cols as f32 * tile_size, rows.len() as f32 * tile_size),
            tile_size,
            collectibles: Vec::new(),
            exit: None,
            spawns: Vec::new(),
            boss_gate: Vec::new(),
            player_spawn: Vec2::splat(tile_size * 1.5),
        };
        let mut found_spawn = false;

        for (row, line) in rows.iter().enumerate() {
            for (col, code) in line.as_ref().chars().enumerate() {
                let tile = Rect::new(col as f32 * tile_size, row as f32 * tile_size, tile_size, tile_size);
                match code {
                    '.' | ' ' => {}
                    'G' | 'D' => solid.push(tile),
                    'P' => one_way.push(Rect::new(tile.x, tile.y, tile_size, ONE_WAY_THICKNESS)),
                    'X' => {
                        solid.push(tile);
                        level.boss_gate.push(tile);
                    }
                    'C' => level.collectibles.push(Collectible {
                        rect: Rect::from_center(tile.center(), Vec2::splat(tile_size / 2.0)),
                        collected: false,
                    }),
                    'E' => level.exit = Some(tile),
                    'S' => {
                        level.player_spawn = tile.center();
                        found_spawn = true;
                    }
                    other => match SpawnKind::from_code(other) {
                        Some(kind) => level.spawns.push(EnemySpawn {
                            x: tile.center_x(),
                            y: tile.center_y(),
                            kind,
                            patrol: None,
                        }),
                        None => log::warn!("Unknown tile code {:?} at row {}, col {}", other, row, col),
                    },
                }
            }
        }

        if !found_spawn {
            log::warn!("Level has no player spawn, using {:?}", level.player_spawn);
        }
        level.tiles = TileSet::new(solid, one_way);
        level
    }

    /// Fallback level: one flat floor, the player at the left end and the
    /// exit at the right end
    pub fn flat_default() -> Self {
        let cols = DEFAULT_LEVEL_COLS;
        let mut rows = vec![".".repeat(cols); DEFAULT_LEVEL_ROWS];
        let last = DEFAULT_LEVEL_ROWS - 1;
        rows[last] = "G".repeat(cols);
        rows[last - 1] = format!("S{}E.", ".".repeat(cols - 3));
        Self::from_grid(&rows, TILE_SIZE)
    }

    /// Top-left position standing a body of `size` on the bottom edge of the
    /// spawn tile
    pub fn player_start(&self, size: Vec2) -> Vec2 {
        Vec2::new(
            self.player_spawn.x - size.x / 2.0,
            self.player_spawn.y + self.tile_size / 2.0 - size.y,
        )
    }

    pub fn collected_count(&self) -> usize {
        self.collectibles.iter().filter(|c| c.collected).count()
    }

    /// True when nothing is left to pick up (vacuously true with none)
    pub fn all_collected(&self) -> bool {
        self.collectibles.iter().all(|c| c.collected)
    }

    #[inline]
    pub fn is_exit_unlocked(&self) -> bool {
        self.all_collected()
    }

    /// Mark every uncollected item overlapping `rect` as collected.
    /// Returns how many were picked up.
    pub fn collect_overlapping(&mut self, rect: &Rect) -> usize {
        let mut picked = 0;
        for item in self.collectibles.iter_mut().filter(|c| !c.collected) {
            if item.rect.intersects(rect) {
                item.collected = true;
                picked += 1;
            }
        }
        picked
    }

    /// Exit is unlocked and the player overlaps it
    pub fn check_level_complete(&self, player_rect: &Rect) -> bool {
        self.is_exit_unlocked() && self.exit.is_some_and(|exit| exit.intersects(player_rect))
    }

    /// Remove the boss gate tiles. Returns false if they were already gone.
    pub fn open_boss_gate(&mut self) -> bool {
        if self.boss_gate.is_empty() {
            return false;
        }
        let removed = self.tiles.remove_solid(&self.boss_gate);
        log::info!("Boss gate opened ({} tiles removed)", removed);
        self.boss_gate.clear();
        true
    }

    pub fn reset_collectibles(&mut self) {
        for item in &mut self.collectibles {
            item.collected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: [&str; 5] = [
        "..........",
        "..A....C..",
        "...PPP....",
        "S.B..X..KE",
        "GGGGGGGGGG",
    ];

    #[test]
    fn test_from_grid_classifies_tiles() {
        let level = Level::from_grid(&GRID, 64.0);

        assert_eq!(level.bounds, LevelBounds::new(640.0, 320.0));
        assert_eq!(level.tiles.solid().len(), 11);
        assert_eq!(level.tiles.one_way().len(), 3);
        assert_eq!(level.tiles.one_way()[0], Rect::new(192.0, 128.0, 64.0, ONE_WAY_THICKNESS));
        assert_eq!(level.boss_gate, vec![Rect::new(320.0, 192.0, 64.0, 64.0)]);
        assert_eq!(level.exit, Some(Rect::new(576.0, 192.0, 64.0, 64.0)));
        assert_eq!(level.player_spawn, Vec2::new(32.0, 224.0));
        assert_eq!(level.collectibles.len(), 1);
        assert_eq!(level.collectibles[0].rect.center(), Vec2::new(480.0, 96.0));

        let kinds: Vec<_> = level.spawns.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SpawnKind::Ambush, SpawnKind::Basic, SpawnKind::Boss]);
        assert_eq!((level.spawns[1].x, level.spawns[1].y), (160.0, 224.0));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let level = Level::from_grid(&["G", "GGGG", ""], 32.0);
        assert_eq!(level.bounds, LevelBounds::new(128.0, 96.0));
        assert_eq!(level.tiles.solid().len(), 5);
    }

    #[test]
    fn test_flat_default() {
        let level = Level::flat_default();
        assert_eq!(
            level.bounds,
            LevelBounds::new(DEFAULT_LEVEL_COLS as f32 * TILE_SIZE, DEFAULT_LEVEL_ROWS as f32 * TILE_SIZE)
        );
        assert_eq!(level.tiles.solid().len(), DEFAULT_LEVEL_COLS);
        assert!(level.exit.is_some());
        assert!(level.spawns.is_empty());

        let start = level.player_start(Vec2::new(32.0, 48.0));
        assert_eq!(start.y + 48.0, level.tiles.solid()[0].top());
    }

    #[test]
    fn test_exit_unlocked_without_collectibles() {
        let level = Level::from_grid(&["S.E", "GGG"], 64.0);
        assert!(level.collectibles.is_empty());
        assert!(level.all_collected());
        assert!(level.is_exit_unlocked());

        let on_exit = Rect::new(140.0, 16.0, 32.0, 48.0);
        assert!(level.check_level_complete(&on_exit));
        let elsewhere = Rect::new(10.0, 16.0, 32.0, 48.0);
        assert!(!level.check_level_complete(&elsewhere));
    }

    #[test]
    fn test_exit_locked_until_collected() {
        let mut level = Level::from_grid(&["SCE", "GGG"], 64.0);
        let on_exit = Rect::new(140.0, 16.0, 32.0, 48.0);
        assert!(!level.check_level_complete(&on_exit));

        let on_coin = Rect::new(80.0, 16.0, 32.0, 48.0);
        assert_eq!(level.collect_overlapping(&on_coin), 1);
        assert_eq!(level.collect_overlapping(&on_coin), 0);
        assert_eq!(level.collected_count(), 1);
        assert!(level.check_level_complete(&on_exit));

        level.reset_collectibles();
        assert!(!level.is_exit_unlocked());
    }

    #[test]
    fn test_open_boss_gate_is_idempotent() {
        let mut level = Level::from_grid(&GRID, 64.0);
        let before = level.tiles.solid().len();

        assert!(level.open_boss_gate());
        let after_once = level.tiles.solid().to_vec();
        assert_eq!(after_once.len(), before - 1);

        assert!(!level.open_boss_gate());
        assert_eq!(level.tiles.solid(), after_once.as_slice());
    }
}
