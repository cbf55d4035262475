//! Photon paths: piecewise-linear routes with per-segment optical density.
//!
//! A `PhotonPath` is an ordered polyline of waypoints. Each waypoint may
//! change the running index of refraction (slowing every segment from that
//! waypoint onward) and may flip the running phase parity (a hard
//! reflection's half-turn phase shift). From these the path derives a
//! cumulative time/parity table used for marker interpolation, clock
//! angles and edge-triggered waypoint events.
//!
//! Derived data is recomputed in full by [`PhotonPath::recompute`]; there
//! is no incremental update. Mutating one waypoint invalidates every
//! downstream cumulative value, and owners batch multi-waypoint edits into
//! a single recompute.

use log::warn;
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::geometry::Point2;

/// One stop along a photon path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position in scene units.
    pub position: Point2,
    /// `Some(n)` with `n > 0` replaces the running index of refraction for
    /// all segments from this waypoint onward. `None` (or a non-positive
    /// value, the legacy `0` sentinel) leaves it unchanged.
    pub refraction_hint: Option<f64>,
    /// Hard reflection here: toggles the running phase parity.
    pub phase_invert: bool,
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            refraction_hint: None,
            phase_invert: false,
        }
    }

    pub fn at(position: Point2) -> Self {
        Self {
            position,
            refraction_hint: None,
            phase_invert: false,
        }
    }

    /// Change the optical density from this waypoint onward.
    pub fn with_refraction(mut self, ior: f64) -> Self {
        self.refraction_hint = Some(ior);
        self
    }

    /// Mark this waypoint as a hard reflection (phase inversion).
    pub fn with_phase_inversion(mut self) -> Self {
        self.phase_invert = true;
        self
    }
}

/// Cumulative traversal state snapshotted at one waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointTiming {
    /// Elapsed time from the path start to this waypoint (seconds).
    pub time: f64,
    /// Phase parity after every inversion up to and including this waypoint.
    pub parity: bool,
}

/// A possible photon route: ordered waypoints plus derived timing data.
#[derive(Debug, Clone)]
pub struct PhotonPath {
    waypoints: SmallVec<[Waypoint; 8]>,
    timings: SmallVec<[WaypointTiming; 8]>,
    total_time: f64,
    unit_amplitude: f64,
}

impl PhotonPath {
    /// An empty path with the given arrow length before normalization.
    pub fn new(unit_amplitude: f64) -> Self {
        Self {
            waypoints: SmallVec::new(),
            timings: SmallVec::new(),
            total_time: 0.0,
            unit_amplitude,
        }
    }

    /// Build a path from waypoints and recompute derived data immediately.
    pub fn from_waypoints<I>(unit_amplitude: f64, waypoints: I, cfg: &EngineConfig) -> Self
    where
        I: IntoIterator<Item = Waypoint>,
    {
        let mut path = Self::new(unit_amplitude);
        for w in waypoints {
            path.add_waypoint(w);
        }
        path.recompute(cfg);
        path
    }

    /// Append a waypoint. Non-finite coordinates are rejected with a
    /// warning and `false` — drag gestures transiently produce NaN
    /// positions and a bad intermediate value must not poison the path.
    ///
    /// Does not recompute; call [`recompute`](Self::recompute) once the
    /// edit batch is done.
    pub fn add_waypoint(&mut self, w: Waypoint) -> bool {
        if !w.position.is_finite() {
            warn!(
                "dropping waypoint with non-finite position ({}, {})",
                w.position.x, w.position.y
            );
            return false;
        }
        self.waypoints.push(w);
        true
    }

    /// Rebuild the cumulative time/parity table from scratch.
    ///
    /// Walks waypoints in order carrying the running index of refraction
    /// (starting at 1.0) and phase parity, accumulating
    /// `time += distance · ior / speed_of_light` per segment.
    pub fn recompute(&mut self, cfg: &EngineConfig) {
        self.timings.clear();
        self.total_time = 0.0;

        let mut ior = 1.0;
        let mut parity = false;
        let mut time = 0.0;
        let mut prev: Option<Point2> = None;

        for w in &self.waypoints {
            if let Some(prev) = prev {
                time += prev.distance(&w.position) * ior / cfg.speed_of_light;
            }
            if let Some(hint) = w.refraction_hint {
                if hint.is_finite() && hint > 0.0 {
                    ior = hint;
                }
            }
            parity ^= w.phase_invert;
            self.timings.push(WaypointTiming { time, parity });
            prev = Some(w.position);
        }
        self.total_time = time;
    }

    /// Total traversal time in seconds; 0 for paths with fewer than two
    /// waypoints.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn unit_amplitude(&self) -> f64 {
        self.unit_amplitude
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Cumulative timing snapshot at waypoint `index`.
    pub fn timing(&self, index: usize) -> Option<WaypointTiming> {
        self.timings.get(index).copied()
    }

    /// Parity after all inversions along the whole path.
    pub fn final_parity(&self) -> bool {
        self.timings.last().map(|t| t.parity).unwrap_or(false)
    }

    pub fn start_position(&self) -> Option<Point2> {
        self.waypoints.first().map(|w| w.position)
    }

    pub fn end_position(&self) -> Option<Point2> {
        self.waypoints.last().map(|w| w.position)
    }

    /// Marker position at elapsed time `t`.
    ///
    /// Interpolation is piecewise-linear in *time*, not arc length: a
    /// segment's time share is proportional to `distance · ior`, so the
    /// marker visibly slows inside denser media. `t` outside
    /// `[0, total_time]` clamps to the path endpoints.
    pub fn position_at_time(&self, t: f64) -> Point2 {
        match self.waypoints.len() {
            0 => Point2::origin(),
            1 => self.waypoints[0].position,
            _ => {
                if t <= 0.0 {
                    return self.waypoints[0].position;
                }
                if t >= self.total_time {
                    return self.waypoints[self.waypoints.len() - 1].position;
                }
                for i in 0..self.waypoints.len() - 1 {
                    let t0 = self.timings[i].time;
                    let t1 = self.timings[i + 1].time;
                    if t <= t1 {
                        let dur = t1 - t0;
                        // Zero-duration segment: snap to its far end.
                        let frac = if dur > 0.0 { (t - t0) / dur } else { 1.0 };
                        return self.waypoints[i]
                            .position
                            .lerp(&self.waypoints[i + 1].position, frac);
                    }
                }
                self.waypoints[self.waypoints.len() - 1].position
            }
        }
    }

    /// Index of the last waypoint whose cumulative time is ≤ `t`.
    ///
    /// Comparing this across two frames detects segment-boundary crossings
    /// so waypoint events fire exactly once, edge-triggered, even at
    /// irregular effective frame steps.
    pub fn last_waypoint_index_before(&self, t: f64) -> usize {
        self.timings
            .iter()
            .rposition(|wt| wt.time <= t)
            .unwrap_or(0)
    }

    /// Phase parity at the last waypoint passed by time `t`.
    pub fn parity_at_time(&self, t: f64) -> bool {
        self.timings
            .get(self.last_waypoint_index_before(t))
            .map(|wt| wt.parity)
            .unwrap_or(false)
    }

    /// Move the terminal waypoint (a draggable detector) and recompute.
    /// Non-finite targets are dropped like any other bad waypoint.
    pub fn change_last_segment_endpoint(&mut self, p: Point2, cfg: &EngineConfig) -> bool {
        if !p.is_finite() {
            warn!(
                "ignoring non-finite detector position ({}, {})",
                p.x, p.y
            );
            return false;
        }
        match self.waypoints.last_mut() {
            Some(last) => {
                last.position = p;
                self.recompute(cfg);
                true
            }
            None => false,
        }
    }

    /// Move waypoint `index` (layer-level uniform edits) and recompute.
    pub(crate) fn move_waypoint(&mut self, index: usize, p: Point2, cfg: &EngineConfig) -> bool {
        match self.waypoints.get_mut(index) {
            Some(w) => {
                w.position = p;
                self.recompute(cfg);
                true
            }
            None => false,
        }
    }
}
