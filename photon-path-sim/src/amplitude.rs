//! The arrow diagram: head-to-tail amplitude vectors and the summed total.
//!
//! Each path contributes one arrow of length `amplitude` at angle `phase`.
//! Arrows chain head-to-tail in path order (a rendering convention, not
//! physics — addition commutes) and the resulting total vector encodes the
//! detection probability as its squared length. This is the quantum
//! combination rule: amplitudes add *before* squaring, which is the entire
//! pedagogical point — probability is never `Σ aᵢ²`.
//!
//! [`compute_diagram`] is a pure function so the layout math is testable
//! without any view state; [`AmplitudeVectorView`] wraps it with viewport
//! fitting and per-arrow highlighting.

use num_complex::Complex;
use num_traits::Zero;

use crate::geometry::{Bounds, Point2};
use crate::glow::{GlowTarget, GlyphIndex};
use crate::light_layer::{AmplitudeSample, LightLayer};

/// One rendered arrow of the chain, in amplitude units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramArrow {
    pub start: Point2,
    pub end: Point2,
}

impl DiagramArrow {
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// Pure layout of an amplitude diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    /// Per-path arrows chained head-to-tail from the origin.
    pub arrows: Vec<DiagramArrow>,
    /// The summed vector, from the origin to the chain's head.
    pub total: DiagramArrow,
    /// Bounding box of the chain (always contains the origin).
    pub bounds: Bounds,
}

impl DiagramLayout {
    /// Layout of an empty amplitude list: a zero-length total at the origin.
    pub fn empty() -> Self {
        let origin = Point2::origin();
        Self {
            arrows: Vec::new(),
            total: DiagramArrow {
                start: origin,
                end: origin,
            },
            bounds: Bounds::at(origin),
        }
    }
}

/// Sum the samples as complex amplitudes: `Σ aᵢ·e^{iφᵢ}`.
pub fn total_amplitude(samples: &[AmplitudeSample]) -> Complex<f64> {
    samples
        .iter()
        .fold(Complex::zero(), |acc, s| {
            acc + Complex::from_polar(s.amplitude, s.phase)
        })
}

/// Build the head-to-tail chain for the given samples.
///
/// Pure function: no view state, no scaling — coordinates are in amplitude
/// units, ready for an independent fit-to-viewport pass.
pub fn compute_diagram(samples: &[AmplitudeSample]) -> DiagramLayout {
    if samples.is_empty() {
        return DiagramLayout::empty();
    }
    let mut arrows = Vec::with_capacity(samples.len());
    let mut head = Point2::origin();
    let mut bounds = Bounds::at(head);
    for s in samples {
        let next = Point2::new(
            head.x + s.amplitude * s.phase.cos(),
            head.y + s.amplitude * s.phase.sin(),
        );
        arrows.push(DiagramArrow {
            start: head,
            end: next,
        });
        bounds.include(next);
        head = next;
    }
    DiagramLayout {
        arrows,
        total: DiagramArrow {
            start: Point2::origin(),
            end: head,
        },
        bounds,
    }
}

/// Renders an amplitude diagram into a viewport, with per-arrow glow.
#[derive(Debug, Clone)]
pub struct AmplitudeVectorView {
    viewport: Bounds,
    viewport_scale: Option<f64>,
    samples: Vec<AmplitudeSample>,
    layout: DiagramLayout,
    display_scale: f64,
    glow: Vec<bool>,
}

impl AmplitudeVectorView {
    pub fn new(viewport: Bounds) -> Self {
        Self {
            viewport,
            viewport_scale: None,
            samples: Vec::new(),
            layout: DiagramLayout::empty(),
            display_scale: 1.0,
            glow: Vec::new(),
        }
    }

    /// Pin the amplitude-unit → viewport-unit scale, instead of fitting.
    /// Used to keep the scale steady while arrows are added one at a time
    /// over an animated sequence. `None` restores auto-fit.
    pub fn set_viewport_scale(&mut self, scale: Option<f64>) {
        self.viewport_scale = scale;
    }

    /// Recompute the diagram from the layer's current amplitudes.
    pub fn draw_amplitudes(&mut self, layer: &LightLayer) -> &DiagramLayout {
        self.draw_samples(layer.amplitudes())
    }

    /// Recompute the diagram from explicit samples.
    pub fn draw_samples(&mut self, samples: Vec<AmplitudeSample>) -> &DiagramLayout {
        self.layout = compute_diagram(&samples);
        self.display_scale = match self.viewport_scale {
            Some(s) => s,
            None => {
                let w = self.layout.bounds.width();
                let h = self.layout.bounds.height();
                let fit_w = if w > 0.0 { self.viewport.width() / w } else { f64::INFINITY };
                let fit_h = if h > 0.0 { self.viewport.height() / h } else { f64::INFINITY };
                let fit = fit_w.min(fit_h);
                if fit.is_finite() { fit } else { 1.0 }
            }
        };
        self.glow.resize(samples.len(), false);
        self.samples = samples;
        &self.layout
    }

    pub fn layout(&self) -> &DiagramLayout {
        &self.layout
    }

    pub fn samples(&self) -> &[AmplitudeSample] {
        &self.samples
    }

    /// Amplitude-unit → viewport-unit factor used for the last draw.
    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Length of the summed vector, in amplitude units.
    pub fn total_amplitude_length(&self) -> f64 {
        total_amplitude(&self.samples).norm()
    }

    /// Detection probability: squared length of the total vector.
    /// Zero for an empty diagram — the "nothing happened yet" state.
    pub fn probability(&self) -> f64 {
        total_amplitude(&self.samples).norm_sqr()
    }

    /// Total vector length divided by arrow count: 1.0 exactly when every
    /// arrow is unit length and co-phase, the perfect-coherence reference.
    pub fn normalized_total_amplitude(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total_amplitude_length() / self.samples.len() as f64
    }

    pub fn is_glowing(&self, index: GlyphIndex) -> bool {
        self.glow.get(index.0).copied().unwrap_or(false)
    }
}

impl GlowTarget for AmplitudeVectorView {
    fn glyph_count(&self) -> usize {
        self.glow.len()
    }

    fn set_glow(&mut self, index: GlyphIndex, on: bool) {
        if let Some(flag) = self.glow.get_mut(index.0) {
            *flag = on;
        }
    }
}
