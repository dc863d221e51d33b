//! Integer rectangles in world space and the local box transforms used by
//! hit/hurt/push boxes.

use serde::{Deserialize, Serialize};

/// A local box `[x, y, w, h]` relative to the fighter body, stored facing right.
pub type BoxRect = [i32; 4];

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_box(b: BoxRect) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    /// Strict overlap test. Empty rectangles never collide.
    pub fn colliderect(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn collidepoint(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Keep the rectangle horizontally inside `[min, max]`.
    pub fn clamp_x(&mut self, min: i32, max: i32) {
        self.x = self.x.max(min).min(max - self.w);
    }

    /// Normalized rectangle spanning two corner points (at least 1x1).
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(
            x0.min(x1),
            y0.min(y1),
            (x1 - x0).abs().max(1),
            (y1 - y0).abs().max(1),
        )
    }
}

/// Mirror a local box inside a body of the given width.
pub fn mirror_local(b: BoxRect, width: i32) -> BoxRect {
    let [x, y, w, h] = b;
    [width - (x + w), y, w, h]
}

/// Convert a local box to world space, mirroring it when the fighter faces left.
pub fn local_to_world(b: BoxRect, body: &Rect, flip: bool) -> Rect {
    let b = if flip { mirror_local(b, body.w) } else { b };
    Rect::new(body.x + b[0], body.y + b[1], b[2], b[3])
}

/// Convert a world rectangle back to a right-facing local box.
pub fn world_to_local(r: &Rect, body: &Rect, flip: bool) -> BoxRect {
    let local = [r.x - body.x, r.y - body.y, r.w, r.h];
    if flip {
        mirror_local(local, body.w)
    } else {
        local
    }
}
