//! Axis-separated move-and-collide for every moving entity
//!
//! Each frame a body moves horizontally and resolves against solid tiles,
//! then gains gravity, then moves vertically and resolves against solid and
//! one-way tiles, and finally gets clamped to the level. Horizontal always
//! runs before vertical; callers rely on that order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tiles::{LevelBounds, TileSet};

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Per-call physics parameters
#[derive(Debug, Clone, Copy)]
pub struct MoveParams {
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Off for gravity-exempt modes (dash, hovering, ambush flight)
    pub apply_gravity: bool,
    /// Off for bodies that fly through platforms
    pub collide_one_way: bool,
}

impl MoveParams {
    pub fn falling(gravity: f32, max_fall_speed: f32) -> Self {
        Self {
            gravity,
            max_fall_speed,
            apply_gravity: true,
            collide_one_way: true,
        }
    }

    /// No gravity, solid tiles only
    pub fn flying() -> Self {
        Self {
            gravity: 0.0,
            max_fall_speed: f32::MAX,
            apply_gravity: false,
            collide_one_way: false,
        }
    }
}

/// What happened during one move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Horizontal move was stopped by a solid tile
    pub hit_wall: bool,
    /// Clamped to the left or right edge of the level
    pub hit_edge: bool,
    /// Rising move was stopped by a solid tile
    pub hit_ceiling: bool,
    /// Falling move was stopped by a tile or the level floor
    pub landed: bool,
}

impl MoveReport {
    /// Horizontal motion was blocked by a wall or the level edge
    #[inline]
    pub fn blocked_horizontally(&self) -> bool {
        self.hit_wall || self.hit_edge
    }

    #[inline]
    pub fn blocked(&self) -> bool {
        self.hit_wall || self.hit_edge || self.hit_ceiling || self.landed
    }
}

/// Kinematic state embedded in every moving entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// px/frame
    pub vel: Vec2,
    pub on_ground: bool,
    pub facing: Facing,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            on_ground: false,
            facing: Facing::Right,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Place the body without any collision, clearing velocity
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
    }

    /// Advance one frame with the current velocity.
    ///
    /// Leaves the body overlapping no solid tile, and overlapping a one-way
    /// tile only when it landed on it from above this frame.
    pub fn step(&mut self, tiles: &TileSet, bounds: LevelBounds, params: &MoveParams) -> MoveReport {
        let mut report = MoveReport::default();
        let was_grounded = self.on_ground;

        self.move_horizontal(tiles, &mut report);

        if params.apply_gravity && !self.on_ground {
            self.vel.y = (self.vel.y + params.gravity).min(params.max_fall_speed);
        }

        self.move_vertical(tiles, params.collide_one_way, was_grounded, &mut report);
        self.clamp_to_level(bounds, &mut report);

        report
    }

    fn move_horizontal(&mut self, tiles: &TileSet, report: &mut MoveReport) {
        let dx = self.vel.x;
        self.pos.x += dx;
        if dx == 0.0 {
            return;
        }

        for tile in tiles.solid() {
            if !self.rect().intersects(tile) {
                continue;
            }
            if dx > 0.0 {
                self.pos.x = tile.left() - self.size.x;
            } else {
                self.pos.x = tile.right();
            }
            report.hit_wall = true;
        }
    }

    fn move_vertical(
        &mut self,
        tiles: &TileSet,
        collide_one_way: bool,
        was_grounded: bool,
        report: &mut MoveReport,
    ) {
        let dy = self.vel.y;
        let prev_bottom = self.bottom();

        // Airborne unless this frame proves otherwise
        self.on_ground = false;
        self.pos.y += dy;

        for tile in tiles.solid() {
            if !self.rect().intersects(tile) {
                continue;
            }
            if dy > 0.0 {
                self.pos.y = tile.top() - self.size.y;
                self.vel.y = 0.0;
                self.on_ground = true;
                report.landed = true;
            } else if dy < 0.0 {
                self.pos.y = tile.bottom();
                self.vel.y = 0.0;
                report.hit_ceiling = true;
            }
        }

        if collide_one_way && self.vel.y > 0.0 {
            for tile in tiles.one_way() {
                if prev_bottom <= tile.top() && self.rect().intersects(tile) {
                    self.pos.y = tile.top() - self.size.y;
                    self.vel.y = 0.0;
                    self.on_ground = true;
                    report.landed = true;
                    break;
                }
            }
        }

        // Standing still: probe one pixel down so a resting body does not
        // flicker airborne for a frame
        if dy == 0.0 && was_grounded && !self.on_ground {
            self.on_ground = self.support_below(tiles, collide_one_way);
        }
    }

    /// Something solid (or a one-way top) directly under the feet
    fn support_below(&self, tiles: &TileSet, collide_one_way: bool) -> bool {
        let probe = self.rect().offset(0.0, 1.0);
        if tiles.solid_overlap(&probe) {
            return true;
        }
        collide_one_way
            && tiles
                .one_way()
                .iter()
                .any(|tile| self.bottom() <= tile.top() && probe.intersects(tile))
    }

    fn clamp_to_level(&mut self, bounds: LevelBounds, report: &mut MoveReport) {
        if self.bottom() >= bounds.height {
            self.pos.y = bounds.height - self.size.y;
            self.vel.y = 0.0;
            self.on_ground = true;
            report.landed = true;
        }

        let max_x = (bounds.width - self.size.x).max(0.0);
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            report.hit_edge = true;
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            report.hit_edge = true;
        }
    }
}
