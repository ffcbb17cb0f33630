//! Static level geometry
//!
//! Solid tiles block from every direction. One-way tiles only stop a body
//! that falls onto them from above.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Level pixel extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub width: f32,
    pub height: f32,
}

impl LevelBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if `rect` lies entirely outside the level grown by `margin`
    pub fn is_outside(&self, rect: &Rect, margin: f32) -> bool {
        rect.right() < -margin
            || rect.left() > self.width + margin
            || rect.bottom() < -margin
            || rect.top() > self.height + margin
    }
}

/// Solid and one-way tile rects for a loaded level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileSet {
    solid: Vec<Rect>,
    one_way: Vec<Rect>,
}

impl TileSet {
    pub fn new(solid: Vec<Rect>, one_way: Vec<Rect>) -> Self {
        Self { solid, one_way }
    }

    #[inline]
    pub fn solid(&self) -> &[Rect] {
        &self.solid
    }

    #[inline]
    pub fn one_way(&self) -> &[Rect] {
        &self.one_way
    }

    /// Remove every solid tile equal to one in `subset`.
    ///
    /// Tiles are matched by value, so removing the same subset twice leaves
    /// the set unchanged the second time. Returns how many tiles were removed.
    pub fn remove_solid(&mut self, subset: &[Rect]) -> usize {
        let before = self.solid.len();
        self.solid.retain(|tile| !subset.contains(tile));
        before - self.solid.len()
    }

    /// Any solid tile overlapping `rect`
    pub fn solid_overlap(&self, rect: &Rect) -> bool {
        self.solid.iter().any(|tile| tile.intersects(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_solid_is_idempotent() {
        let gate = Rect::new(128.0, 0.0, 64.0, 64.0);
        let floor = Rect::new(0.0, 64.0, 64.0, 64.0);
        let mut tiles = TileSet::new(vec![floor, gate], vec![]);

        assert_eq!(tiles.remove_solid(&[gate]), 1);
        let after_once = tiles.solid().to_vec();
        assert_eq!(tiles.remove_solid(&[gate]), 0);
        assert_eq!(tiles.solid(), after_once.as_slice());
        assert_eq!(tiles.solid(), &[floor]);
    }

    #[test]
    fn test_bounds_margin() {
        let bounds = LevelBounds::new(100.0, 100.0);
        let just_out = Rect::new(110.0, 10.0, 5.0, 5.0);
        assert!(!bounds.is_outside(&just_out, 32.0));
        assert!(bounds.is_outside(&just_out, 0.0));
        assert!(bounds.is_outside(&Rect::new(-50.0, 10.0, 5.0, 5.0), 32.0));
    }
}
