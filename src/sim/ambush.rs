//! Ceiling ambusher
//!
//! Hangs under a tile, watches a downward cone for the player and dives at
//! them in a straight line. After a short pause at the end of the dive it
//! flies back to its perch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, MoveParams};
use super::enemy::UpdateContext;
use super::rect::Rect;
use super::tiles::TileSet;
use crate::step_toward;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AmbushState {
    /// Pinned to the hang position, watching
    Idle,
    /// Diving toward `target` (top-left position)
    Attacking { target: Vec2 },
    /// Paused where the dive ended
    Staying { frames_left: u32 },
    /// Flying back to the hang position
    Returning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbushBrain {
    /// Top-left position while hanging
    pub hang: Vec2,
    pub state: AmbushState,
    /// Frames until the next dive may start; only counts down while idle
    pub cooldown: u32,
}

impl AmbushBrain {
    pub fn new(hang: Vec2) -> Self {
        Self {
            hang,
            state: AmbushState::Idle,
            cooldown: 0,
        }
    }

    /// Top-left position directly beneath the nearest tile above `center`
    /// (solid or one-way) within `radius` horizontally
    pub fn find_hang_position(center: Vec2, size: Vec2, tiles: &TileSet, radius: f32) -> Option<Vec2> {
        tiles
            .solid()
            .iter()
            .chain(tiles.one_way())
            .filter(|tile| tile.bottom() <= center.y && (tile.center_x() - center.x).abs() <= radius)
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
            .map(|tile| Vec2::new(tile.center_x() - size.x / 2.0, tile.bottom()))
    }

    pub fn update(&mut self, body: &mut Body, ctx: &UpdateContext<'_>) {
        let tuning = &ctx.tuning.ambush;

        match self.state {
            AmbushState::Idle => {
                body.pos = self.hang;
                body.vel = Vec2::ZERO;
                if self.cooldown > 0 {
                    self.cooldown -= 1;
                    return;
                }

                let from = body.center();
                let to = ctx.player_rect.center();
                if in_detection_cone(from, to, tuning.detection_range, tuning.cone_half_angle_deg)
                    && has_line_of_sight(from, to, ctx.tiles.solid(), tuning.line_of_sight_samples)
                {
                    let target = clamp_reach(from, to, tuning.max_dash_distance) - body.size / 2.0;
                    log::debug!("Ambusher at {:?} diving toward {:?}", self.hang, target);
                    self.state = AmbushState::Attacking { target };
                    self.cooldown = tuning.attack_cooldown;
                }
            }
            AmbushState::Attacking { target } => {
                let Some(step) = step_toward(body.pos, target, tuning.dash_speed) else {
                    self.stay(body, tuning.stay_frames);
                    return;
                };
                let final_step = body.pos.distance(target) <= tuning.dash_speed;
                body.vel = step;
                let report = body.step(ctx.tiles, ctx.bounds, &MoveParams::flying());

                if report.blocked() {
                    self.stay(body, tuning.stay_frames);
                } else if final_step {
                    body.pos = target;
                    self.stay(body, tuning.stay_frames);
                }
            }
            AmbushState::Staying { frames_left } => {
                body.vel = Vec2::ZERO;
                self.state = if frames_left <= 1 {
                    AmbushState::Returning
                } else {
                    AmbushState::Staying {
                        frames_left: frames_left - 1,
                    }
                };
            }
            AmbushState::Returning => {
                if body.pos.distance(self.hang) > tuning.return_snap_distance {
                    if let Some(step) = step_toward(body.pos, self.hang, tuning.return_speed) {
                        body.vel = step;
                        let report = body.step(ctx.tiles, ctx.bounds, &MoveParams::flying());
                        if report.blocked() {
                            // Wedged against geometry: go straight home
                            log::debug!("Ambusher blocked on return, snapping to {:?}", self.hang);
                            body.pos = self.hang;
                        }
                    }
                }
                if body.pos.distance(self.hang) <= tuning.return_snap_distance {
                    body.pos = self.hang;
                    body.vel = Vec2::ZERO;
                    self.state = AmbushState::Idle;
                }
            }
        }
    }

    fn stay(&mut self, body: &mut Body, frames: u32) {
        body.vel = Vec2::ZERO;
        self.state = AmbushState::Staying {
            frames_left: frames.max(1),
        };
    }
}

/// Player strictly below and within a downward cone of `half_angle_deg`
/// around the vertical
pub fn in_detection_cone(from: Vec2, to: Vec2, range: f32, half_angle_deg: f32) -> bool {
    let delta = to - from;
    if delta.y <= 0.0 || delta.length() > range {
        return false;
    }
    delta.x.abs() <= delta.y * half_angle_deg.to_radians().tan()
}

/// Coarse line-of-sight: `samples` evenly spaced interior points of the
/// segment must all miss every solid tile
pub fn has_line_of_sight(from: Vec2, to: Vec2, solid: &[Rect], samples: u32) -> bool {
    (1..=samples).all(|i| {
        let t = i as f32 / (samples + 1) as f32;
        let point = from.lerp(to, t);
        !solid.iter().any(|tile| tile.contains_point(point))
    })
}

/// `to`, pulled back along the segment so it is at most `max` from `from`
fn clamp_reach(from: Vec2, to: Vec2, max: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max || distance <= f32::EPSILON {
        return to;
    }
    from + delta / distance * max
}
