//! 2D geometry primitives shared by paths, markers and diagram layout.
//!
//! Everything here works in scene units (the coordinate system tutorial
//! scripts author their waypoints in). No pixel or viewport knowledge —
//! that conversion happens in the view layer.

/// A point (or free vector) in the 2D scene plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0).
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation: returns `self` at `frac = 0`, `other` at
    /// `frac = 1`. `frac` is not clamped — callers clamp time first.
    pub fn lerp(&self, other: &Point2, frac: f64) -> Point2 {
        Point2 {
            x: self.x + (other.x - self.x) * frac,
            y: self.y + (other.y - self.y) * frac,
        }
    }

    /// Both coordinates are finite (rejects NaN and ±∞).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box accumulated from a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    /// A degenerate box containing exactly one point.
    pub fn at(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    /// A box spanning the two given corners (in any order).
    pub fn spanning(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}
