//! Shared movement and collision helpers
//!
//! The small geometry library every zone simulator leans on: seek steps,
//! circular push-out, flat knockback, and circle-vs-rect resolution. All
//! functions are pure and degrade to no-ops on degenerate input; a zero
//! separation substitutes a distance of 1 instead of producing NaN.

use glam::Vec2;

use crate::dir_toward;

/// One seek step toward `target` at `speed`. The step is clamped to the
/// remaining distance so a chaser settles on its target instead of
/// oscillating across it.
pub fn seek(pos: Vec2, target: Vec2, speed: f32, dt: f32) -> Vec2 {
    let dist = pos.distance(target);
    let step = (speed * dt).min(dist);
    pos + dir_toward(pos, target) * step
}

/// Push a circle of `radius` at `p` out of the circle at `center` with
/// `circle_r`, radially, to exact contact distance. Returns `p` untouched
/// when there is no overlap.
pub fn push_out_of_circle(p: Vec2, radius: f32, center: Vec2, circle_r: f32) -> Vec2 {
    let keep_out = circle_r + radius;
    if p.distance(center) < keep_out {
        center + dir_toward(center, p) * keep_out
    } else {
        p
    }
}

/// Flat positional knockback away from `from`.
pub fn knockback(p: Vec2, from: Vec2, amount: f32) -> Vec2 {
    p + dir_toward(from, p) * amount
}

/// Resolve a circle against an axis-aligned rectangle along the axis of
/// minimal penetration. Single shape, single pass - callers run this once
/// per tile per frame, not to convergence.
pub fn resolve_circle_rect(pos: Vec2, radius: f32, min: Vec2, size: Vec2) -> Vec2 {
    let max = min + size;
    let closest = Vec2::new(pos.x.clamp(min.x, max.x), pos.y.clamp(min.y, max.y));

    if closest != pos {
        // Center outside the rect: push along the center-to-closest axis
        let d = pos - closest;
        let dist = d.length();
        if dist < radius {
            return closest + d / if dist > 0.0 { dist } else { 1.0 } * radius;
        }
        return pos;
    }

    // Center inside the rect: exit through the nearest face
    let left = pos.x - min.x;
    let right = max.x - pos.x;
    let top = pos.y - min.y;
    let bottom = max.y - pos.y;
    let smallest = left.min(right).min(top).min(bottom);

    if smallest == left {
        Vec2::new(min.x - radius, pos.y)
    } else if smallest == right {
        Vec2::new(max.x + radius, pos.y)
    } else if smallest == top {
        Vec2::new(pos.x, min.y - radius)
    } else {
        Vec2::new(pos.x, max.y + radius)
    }
}
