//! Phase clocks: one rotating hand per path.
//!
//! A clock encodes a path's accumulated phase as a dial angle. During
//! animation the animator spins the hand continuously
//! (`τ · t · frequency + π · parity`); at the end it snaps to the path's
//! final phase. The clock itself is a pure view model — angle, glow flag
//! and the unit-circle hand vector a renderer needs to draw it.

use std::f64::consts::TAU;

use crate::geometry::Point2;
use crate::glow::{GlowTarget, GlyphIndex};

/// One rotating-dial phase display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseClock {
    angle: f64,
    glowing: bool,
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hand angle in radians. The raw (unwrapped) value is kept so
    /// a fast path's many full turns stay distinguishable from a slow
    /// path's fraction of one.
    pub fn set_angle(&mut self, radians: f64) {
        self.angle = radians;
    }

    /// Raw accumulated angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Angle folded into `[0, τ)` — what the dial actually shows.
    pub fn dial_angle(&self) -> f64 {
        self.angle.rem_euclid(TAU)
    }

    /// Unit vector the hand points along.
    pub fn hand_direction(&self) -> Point2 {
        Point2::new(self.angle.cos(), self.angle.sin())
    }

    pub fn set_glow(&mut self, on: bool) {
        self.glowing = on;
    }

    pub fn is_glowing(&self) -> bool {
        self.glowing
    }
}

impl GlowTarget for [PhaseClock] {
    fn glyph_count(&self) -> usize {
        self.len()
    }

    fn set_glow(&mut self, index: GlyphIndex, on: bool) {
        if let Some(clock) = self.get_mut(index.0) {
            clock.set_glow(on);
        }
    }
}

// Owned rows need their own impl: a bare slice is unsized and cannot be
// handed to the glow manager as a trait object.
impl GlowTarget for Vec<PhaseClock> {
    fn glyph_count(&self) -> usize {
        self.len()
    }

    fn set_glow(&mut self, index: GlyphIndex, on: bool) {
        self.as_mut_slice().set_glow(index, on);
    }
}
