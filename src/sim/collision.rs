//! Collision tests
//!
//! Everything in the arena is either a circle or an axis-aligned square.
//! Tests are strict (`<`): touching edges do not count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision shape centered on an entity's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hitbox {
    Circle { radius: f32 },
    Square { half_extent: f32 },
}

impl Hitbox {
    /// Does a probe of radius `pad` at `probe` overlap this shape at `center`?
    ///
    /// For squares the pad is added to the half extent on both axes, so the
    /// probe is effectively treated as a square too.
    pub fn overlaps(&self, center: Vec2, probe: Vec2, pad: f32) -> bool {
        match *self {
            Hitbox::Circle { radius } => circles_overlap(center, radius, probe, pad),
            Hitbox::Square { half_extent } => boxes_overlap(center, half_extent, probe, pad),
        }
    }
}

/// Two circles overlap when their centers are closer than the summed radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Axis-aligned squares overlap when both axis distances are under the summed extents
#[inline]
pub fn boxes_overlap(a: Vec2, ha: f32, b: Vec2, hb: f32) -> bool {
    let d = (a - b).abs();
    let reach = ha + hb;
    d.x < reach && d.y < reach
}
