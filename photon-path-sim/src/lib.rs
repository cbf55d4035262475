//! # photon-path-sim
//!
//! Photon path-amplitude simulation and multi-representation animation
//! synchronizer, the engine behind QED "many paths" tutorials.
//!
//! A photon's possible routes are polylines with per-segment optical
//! density and hard-reflection phase inversions. The engine computes each
//! path's traversal time and accumulated phase, animates photon markers in
//! lockstep with rotating phase clocks, and sums the per-path amplitude
//! vectors head-to-tail into a detection probability:
//!
//! ```text
//! PhotonPath (time & parity)
//!   ↓ owned by
//! LightLayer (color, frequency, amplitude samples)
//!   ↓ driven by
//! PathAnimator (frame loop, waypoint events, completion channel)
//!   ↓ read by
//! PhaseClock + AmplitudeVectorView   (φ = τ·t·f + π·parity, P = |Σ a·e^{iφ}|²)
//!   ↖ correlated by GlowManager (index-aligned highlighting)
//! ```
//!
//! The three representations — marker motion, clock dials, arrow diagram —
//! stay mathematically consistent frame by frame under a variable-speed,
//! pausable, event-emitting animation clock. Everything is transient view
//! data: tutorial scripts rebuild layers per step from literal coordinates.
//!
//! ## Example
//!
//! ```
//! use photon_path_sim::prelude::*;
//!
//! let cfg = EngineConfig::default();
//! let path = PhotonPath::from_waypoints(
//!     1.0,
//!     [Waypoint::new(0.0, 0.0), Waypoint::new(100.0, 0.0)],
//!     &cfg,
//! );
//! let mut layer = LightLayer::new(LightColor::Green, 2.0, cfg);
//! layer.add_path(path);
//! let mut clocks = vec![PhaseClock::new()];
//! let done = layer.animate();
//! while layer.tick(&mut clocks).running {}
//! assert_eq!(done.try_recv(), Ok(()));
//!
//! let mut view = AmplitudeVectorView::new(Bounds::spanning(
//!     Point2::new(0.0, 0.0),
//!     Point2::new(200.0, 200.0),
//! ));
//! view.draw_amplitudes(&layer);
//! assert!(view.probability() > 0.0);
//! ```

pub mod amplitude;
pub mod animator;
pub mod clock;
pub mod config;
pub mod geometry;
pub mod glow;
pub mod light_layer;
pub mod path;

pub mod prelude {
    pub use crate::amplitude::{
        compute_diagram, total_amplitude, AmplitudeVectorView, DiagramArrow, DiagramLayout,
    };
    pub use crate::animator::{
        AnimationEvent, AnimationPhase, PathAnimator, TickReport,
    };
    pub use crate::clock::PhaseClock;
    pub use crate::config::{ConfigError, EngineConfig};
    pub use crate::geometry::{Bounds, Point2};
    pub use crate::glow::{GlowManager, GlowTarget, GlyphIndex, HighlightGesture};
    pub use crate::light_layer::{AmplitudeSample, LightColor, LightLayer, PathGlyph};
    pub use crate::path::{PhotonPath, Waypoint, WaypointTiming};
}
