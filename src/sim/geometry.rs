//! Axis-aligned collision boxes
//!
//! Screen space: x grows to the right, y grows downward. A box is its top-left
//! corner plus a size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle used for collision approximation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl CollisionBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// True when the box has no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Move a box defined relative to an entity into world space
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            pos: self.pos + offset,
            size: self.size,
        }
    }

    /// Shrink inward by `margin` on every side (never below zero size)
    pub fn shrink(&self, margin: f32) -> Self {
        let size = (self.size - Vec2::splat(2.0 * margin)).max(Vec2::ZERO);
        Self {
            pos: self.pos + Vec2::splat(margin),
            size,
        }
    }

    /// Strict overlap test: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &CollisionBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
