//! A colored set of photon paths animated together.
//!
//! The `LightLayer` owns its paths, their visual glyphs (marker position,
//! detected flag, highlight flag) and the embedded frame-loop animator.
//! Nothing outside the layer mutates a path after construction; geometry
//! edits go through [`LightLayer::change_point_on_all_paths`] or
//! [`LightLayer::change_detector_position`] so derived timing data is
//! recomputed before the next frame reads it.
//!
//! Phase lives here, not on the path: it depends on the layer's frequency
//! (its color), so a path only knows its traversal time and parity.
//! `phase = τ · total_time · frequency + π · parity`.

use std::f64::consts::{PI, TAU};

use crossbeam_channel::Receiver;
use log::warn;

use crate::animator::{final_clock_angle, AnimationPhase, PathAnimator, TickReport};
use crate::clock::PhaseClock;
use crate::config::EngineConfig;
use crate::geometry::Point2;
use crate::glow::{GlowTarget, GlyphIndex};
use crate::path::PhotonPath;

/// Named light colors with their tutorial-scale frequencies.
///
/// Frequencies are in cycles per second of *virtual* animation time,
/// scaled so a clock hand makes a few readable turns per screen crossing —
/// the same ratios as the visible spectrum, not its absolute magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightColor {
    Red,
    Amber,
    Green,
    Cyan,
    Blue,
    Violet,
}

impl LightColor {
    /// Default frequency for this color (cycles per virtual second).
    pub fn nominal_frequency(&self) -> f64 {
        match self {
            LightColor::Red => 4.6,
            LightColor::Amber => 5.1,
            LightColor::Green => 5.6,
            LightColor::Cyan => 6.1,
            LightColor::Blue => 6.7,
            LightColor::Violet => 7.3,
        }
    }

    /// Display color for renderers.
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            LightColor::Red => [0.90, 0.25, 0.21, 1.0],
            LightColor::Amber => [0.95, 0.70, 0.20, 1.0],
            LightColor::Green => [0.42, 0.75, 0.35, 1.0],
            LightColor::Cyan => [0.25, 0.75, 0.80, 1.0],
            LightColor::Blue => [0.28, 0.47, 0.90, 1.0],
            LightColor::Violet => [0.60, 0.35, 0.85, 1.0],
        }
    }
}

impl std::fmt::Display for LightColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LightColor::Red => "red",
            LightColor::Amber => "amber",
            LightColor::Green => "green",
            LightColor::Cyan => "cyan",
            LightColor::Blue => "blue",
            LightColor::Violet => "violet",
        };
        f.write_str(name)
    }
}

/// Visual state paired with one path: the photon marker and highlight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathGlyph {
    /// Current photon marker position.
    pub marker: Point2,
    /// Marker has reached the end of its path.
    pub detected: bool,
    /// Highlight flag driven by the glow manager.
    pub glowing: bool,
}

/// One path's contribution to the interference diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeSample {
    /// Arrow length before normalization (the path's unit amplitude).
    pub amplitude: f64,
    /// Accumulated phase in radians at the detector.
    pub phase: f64,
}

/// An unordered collection of paths sharing one color and frequency.
#[derive(Debug)]
pub struct LightLayer {
    color: LightColor,
    frequency: f64,
    config: EngineConfig,
    paths: Vec<PhotonPath>,
    glyphs: Vec<PathGlyph>,
    animator: PathAnimator,
}

impl LightLayer {
    /// Create a layer with an explicit frequency. A non-finite or
    /// non-positive frequency falls back to the color's nominal one.
    pub fn new(color: LightColor, frequency: f64, config: EngineConfig) -> Self {
        let frequency = if frequency.is_finite() && frequency > 0.0 {
            frequency
        } else {
            warn!(
                "invalid layer frequency {}; using nominal {} frequency",
                frequency, color
            );
            color.nominal_frequency()
        };
        Self {
            color,
            frequency,
            config,
            paths: Vec::new(),
            glyphs: Vec::new(),
            animator: PathAnimator::new(),
        }
    }

    /// Create a layer at the color's nominal frequency.
    pub fn with_nominal_frequency(color: LightColor, config: EngineConfig) -> Self {
        Self::new(color, color.nominal_frequency(), config)
    }

    pub fn color(&self) -> LightColor {
        self.color
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frequency after the global adjust constant.
    pub fn effective_frequency(&self) -> f64 {
        self.frequency * self.config.frequency_scale
    }

    /// Register a path, recomputing it under this layer's configuration
    /// and creating its paired glyph. The returned index is append-only
    /// stable until [`clear`](Self::clear).
    pub fn add_path(&mut self, mut path: PhotonPath) -> GlyphIndex {
        path.recompute(&self.config);
        let glyph = PathGlyph {
            marker: path.start_position().unwrap_or_else(Point2::origin),
            ..Default::default()
        };
        self.paths.push(path);
        self.glyphs.push(glyph);
        GlyphIndex(self.paths.len() - 1)
    }

    pub fn path(&self, index: GlyphIndex) -> Option<&PhotonPath> {
        self.paths.get(index.0)
    }

    pub fn paths(&self) -> &[PhotonPath] {
        &self.paths
    }

    pub fn glyph(&self, index: GlyphIndex) -> Option<&PathGlyph> {
        self.glyphs.get(index.0)
    }

    pub fn glyphs(&self) -> &[PathGlyph] {
        &self.glyphs
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Slowest path's traversal time; 0.0 for an empty layer.
    pub fn max_total_time(&self) -> f64 {
        self.paths
            .iter()
            .map(|p| p.total_time())
            .fold(0.0_f64, f64::max)
    }

    /// Derived amplitude/phase pairs, one per path, in path order.
    ///
    /// Pure function of current path state — no caching, so geometry edits
    /// are reflected immediately. An empty layer yields an empty list and
    /// callers must treat the empty sum as zero probability.
    pub fn amplitudes(&self) -> Vec<AmplitudeSample> {
        let f = self.effective_frequency();
        self.paths
            .iter()
            .map(|p| AmplitudeSample {
                amplitude: p.unit_amplitude(),
                phase: TAU * p.total_time() * f + if p.final_parity() { PI } else { 0.0 },
            })
            .collect()
    }

    /// Start animating every path from its source. Returns the completion
    /// channel: one message when all markers are detected, disconnect if
    /// the run is cleared first.
    pub fn animate(&mut self) -> Receiver<()> {
        for (glyph, path) in self.glyphs.iter_mut().zip(&self.paths) {
            glyph.marker = path.start_position().unwrap_or_else(Point2::origin);
            glyph.detected = false;
        }
        self.animator.start(&self.paths, &self.config)
    }

    /// Advance one frame. The host owns the timer; each call is one tick.
    /// `clocks` is the index-aligned clock row driven in lockstep.
    pub fn tick(&mut self, clocks: &mut [PhaseClock]) -> TickReport {
        let f = self.effective_frequency();
        self.animator
            .advance(&self.paths, &mut self.glyphs, clocks, f)
    }

    pub fn pause(&mut self) {
        self.animator.pause();
    }

    pub fn resume(&mut self) {
        self.animator.resume();
    }

    pub fn animation_phase(&self) -> AnimationPhase {
        self.animator.phase()
    }

    /// Snap every marker and clock to its end-of-path state without
    /// animating. Completes an in-flight run (one completion message, no
    /// skipped waypoint events). Idempotent.
    pub fn set_final_state(&mut self, clocks: &mut [PhaseClock]) {
        let f = self.effective_frequency();
        for (i, path) in self.paths.iter().enumerate() {
            if let Some(glyph) = self.glyphs.get_mut(i) {
                glyph.marker = path.end_position().unwrap_or_else(Point2::origin);
                glyph.detected = true;
            }
            if let Some(clock) = clocks.get_mut(i) {
                clock.set_angle(final_clock_angle(path, f));
            }
        }
        self.animator.finish_now();
    }

    /// Release all paths and glyphs and cancel any in-flight animation.
    /// Safe to call repeatedly — a second clear is a no-op.
    pub fn clear(&mut self) {
        self.animator.cancel();
        self.paths.clear();
        self.glyphs.clear();
    }

    /// Move waypoint `index` to `p` on every path that has one, then
    /// recompute each — the single sanctioned route for external geometry
    /// edits (e.g. a drag handler moving a shared slit).
    pub fn change_point_on_all_paths(&mut self, index: usize, p: Point2) {
        if !p.is_finite() {
            warn!("ignoring non-finite waypoint drag target ({}, {})", p.x, p.y);
            return;
        }
        for path in &mut self.paths {
            path.move_waypoint(index, p, &self.config);
        }
    }

    /// Move the terminal waypoint (the draggable detector) on every path.
    pub fn change_detector_position(&mut self, p: Point2) {
        if !p.is_finite() {
            warn!("ignoring non-finite detector target ({}, {})", p.x, p.y);
            return;
        }
        for path in &mut self.paths {
            path.change_last_segment_endpoint(p, &self.config);
        }
    }
}

impl GlowTarget for LightLayer {
    fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    fn set_glow(&mut self, index: GlyphIndex, on: bool) {
        if let Some(glyph) = self.glyphs.get_mut(index.0) {
            glyph.glowing = on;
        }
    }
}
