//! Frame-loop state machine driving photon markers and phase clocks.
//!
//! The animator advances virtual time in fixed steps: the slowest path's
//! traversal time (divided by the animation speed multiplier) sets the
//! wall-clock duration, a fixed frame rate turns that into a frame count,
//! and every [`PathAnimator::advance`] maps the frame counter back to a
//! virtual elapsed time shared by all paths. Paths of different lengths
//! therefore finish in lockstep relative to their own durations, and each
//! marker's speed stays consistent with optical path length and index of
//! refraction.
//!
//! Waypoint events are edge-triggered: the animator compares
//! `last_waypoint_index_before` across consecutive frames and fires every
//! crossed waypoint in order, exactly once — including several at once
//! when a high speed multiplier steps over multiple waypoints in a single
//! frame.
//!
//! Completion is signalled twice over: a `Finished` event in the final
//! tick's report, and one message on the crossbeam channel handed out by
//! [`PathAnimator::start`]. Cancelling (`cancel`, or `LightLayer::clear`)
//! drops the sender, so a waiting receiver observes disconnect rather than
//! a phantom completion.

use std::f64::consts::{PI, TAU};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;
use smallvec::SmallVec;

use crate::clock::PhaseClock;
use crate::config::EngineConfig;
use crate::glow::GlyphIndex;
use crate::light_layer::PathGlyph;
use crate::path::PhotonPath;

/// Where the frame loop currently is.
///
/// `Finished` is transient: the tick that detects the last path emits
/// `Finished`, signals completion and drops straight back to `Idle`, so it
/// never appears as a resting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Running,
    Paused,
}

/// Something that happened during one frame advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    /// The marker crossed (or landed on) a waypoint. For a given path
    /// these fire in waypoint order, exactly once each per run.
    WaypointReached { path: GlyphIndex, waypoint: usize },
    /// The marker reached the end of its path.
    PathDetected { path: GlyphIndex },
    /// Every path has been detected; fires exactly once per `start`.
    Finished,
}

/// Outcome of one frame advance.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Events in firing order: per path, waypoints before detection; all
    /// path advances before a trailing `Finished`.
    pub events: SmallVec<[AnimationEvent; 8]>,
    /// Virtual elapsed time after this tick.
    pub virtual_time: f64,
    /// Whether the animator is still running after this tick.
    pub running: bool,
}

/// Frame-loop state for one set of paths.
#[derive(Debug)]
pub struct PathAnimator {
    phase: AnimationPhase,
    frame: u64,
    total_frames: u64,
    max_time: f64,
    prev_t: f64,
    detected: SmallVec<[bool; 8]>,
    completion_tx: Option<Sender<()>>,
}

impl Default for PathAnimator {
    fn default() -> Self {
        Self {
            phase: AnimationPhase::Idle,
            frame: 0,
            total_frames: 0,
            max_time: 0.0,
            prev_t: 0.0,
            detected: SmallVec::new(),
            completion_tx: None,
        }
    }
}

impl PathAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == AnimationPhase::Running
    }

    /// Begin a run over `paths`. Restarting while a previous run is in
    /// flight cancels it first (its receiver sees disconnect).
    ///
    /// Returns the completion channel: exactly one `()` arrives when every
    /// path has been detected.
    pub fn start(&mut self, paths: &[PhotonPath], cfg: &EngineConfig) -> Receiver<()> {
        // Drop any stale sender before handing out a new channel.
        self.completion_tx = None;

        self.max_time = paths
            .iter()
            .map(|p| p.total_time())
            .fold(0.0_f64, f64::max);
        let duration = self.max_time / cfg.animation_speed;
        self.total_frames = ((duration * cfg.frame_rate).ceil() as u64).max(1);
        self.frame = 0;
        self.prev_t = 0.0;
        self.detected.clear();
        self.detected.resize(paths.len(), false);
        self.phase = AnimationPhase::Running;

        debug!(
            "animation start: {} paths, max_time {:.4}s, {} frames",
            paths.len(),
            self.max_time,
            self.total_frames
        );

        let (tx, rx) = bounded(1);
        self.completion_tx = Some(tx);
        rx
    }

    /// Advance one frame: move markers, spin clocks, collect events.
    ///
    /// `clocks` is index-aligned with `paths`; a missing clock (shorter
    /// slice) is skipped rather than an error, since clocks may be rebuilt
    /// a step later than paths.
    pub fn advance(
        &mut self,
        paths: &[PhotonPath],
        glyphs: &mut [PathGlyph],
        clocks: &mut [PhaseClock],
        effective_frequency: f64,
    ) -> TickReport {
        let mut report = TickReport {
            virtual_time: self.prev_t,
            ..Default::default()
        };
        if self.phase != AnimationPhase::Running {
            return report;
        }

        self.frame = (self.frame + 1).min(self.total_frames);
        let t = self.max_time * self.frame as f64 / self.total_frames as f64;
        report.virtual_time = t;

        for (i, path) in paths.iter().enumerate() {
            if self.detected.get(i).copied().unwrap_or(true) {
                continue;
            }
            let index = GlyphIndex(i);
            let last = path.len().saturating_sub(1);

            // Edge-triggered waypoint crossings, in order, none skipped.
            let from = path.last_waypoint_index_before(self.prev_t);
            let to = path.last_waypoint_index_before(t);
            for w in (from + 1)..=to {
                if w < last {
                    report.events.push(AnimationEvent::WaypointReached {
                        path: index,
                        waypoint: w,
                    });
                }
            }

            if t >= path.total_time() {
                // Snap to the endpoint and fire the terminal trigger once.
                if let Some(glyph) = glyphs.get_mut(i) {
                    glyph.marker = path.position_at_time(path.total_time());
                    glyph.detected = true;
                }
                if let Some(clock) = clocks.get_mut(i) {
                    clock.set_angle(final_clock_angle(path, effective_frequency));
                }
                if !path.is_empty() {
                    report.events.push(AnimationEvent::WaypointReached {
                        path: index,
                        waypoint: last,
                    });
                }
                report.events.push(AnimationEvent::PathDetected { path: index });
                self.detected[i] = true;
            } else {
                if let Some(glyph) = glyphs.get_mut(i) {
                    glyph.marker = path.position_at_time(t);
                }
                if let Some(clock) = clocks.get_mut(i) {
                    clock.set_angle(running_clock_angle(path, t, effective_frequency));
                }
            }
        }

        self.prev_t = t;

        if self.detected.iter().all(|&d| d) {
            // All paths advanced before completion fires; exactly once.
            report.events.push(AnimationEvent::Finished);
            self.finish();
            report.running = false;
        } else {
            report.running = true;
        }
        report
    }

    /// Stop the frame timer without resetting the frame counter.
    pub fn pause(&mut self) {
        if self.phase == AnimationPhase::Running {
            self.phase = AnimationPhase::Paused;
        }
    }

    /// Resume from the same frame counter — virtual time never jumps.
    pub fn resume(&mut self) {
        if self.phase == AnimationPhase::Paused {
            self.phase = AnimationPhase::Running;
        }
    }

    /// Fast-forward: mark every path detected and signal completion (once)
    /// if a run was in flight. Skipped waypoint events are not emitted.
    pub fn finish_now(&mut self) {
        for d in self.detected.iter_mut() {
            *d = true;
        }
        if self.phase != AnimationPhase::Idle {
            self.finish();
        } else {
            self.completion_tx = None;
        }
    }

    /// Discard the run without signalling completion. The receiver from
    /// `start` observes disconnect — no stale callback can fire after the
    /// owner's state is gone.
    pub fn cancel(&mut self) {
        self.phase = AnimationPhase::Idle;
        self.frame = 0;
        self.prev_t = 0.0;
        self.detected.clear();
        self.completion_tx = None;
    }

    fn finish(&mut self) {
        debug!("animation finished after {} frames", self.frame);
        if let Some(tx) = self.completion_tx.take() {
            let _ = tx.send(());
        }
        // Finished auto-transitions back to Idle.
        self.phase = AnimationPhase::Idle;
        self.frame = 0;
        self.prev_t = 0.0;
    }
}

/// Continuously varying clock angle while the marker is mid-path:
/// `τ · t · f + π · parity`, with parity taken at the last passed waypoint.
pub fn running_clock_angle(path: &PhotonPath, t: f64, effective_frequency: f64) -> f64 {
    let parity = path.parity_at_time(t);
    TAU * t * effective_frequency + if parity { PI } else { 0.0 }
}

/// Clock angle once the path is fully traversed.
pub fn final_clock_angle(path: &PhotonPath, effective_frequency: f64) -> f64 {
    TAU * path.total_time() * effective_frequency
        + if path.final_parity() { PI } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light_layer::PathGlyph;
    use crate::path::Waypoint;

    fn straight(unit: f64, xs: &[f64], cfg: &EngineConfig) -> PhotonPath {
        PhotonPath::from_waypoints(unit, xs.iter().map(|&x| Waypoint::new(x, 0.0)), cfg)
    }

    fn glyphs(n: usize) -> Vec<PathGlyph> {
        (0..n).map(|_| PathGlyph::default()).collect()
    }

    fn run_to_completion(
        animator: &mut PathAnimator,
        paths: &[PhotonPath],
        glyphs: &mut [PathGlyph],
        clocks: &mut [PhaseClock],
        freq: f64,
    ) -> Vec<AnimationEvent> {
        let mut all = Vec::new();
        for _ in 0..10_000 {
            let report = animator.advance(paths, glyphs, clocks, freq);
            all.extend(report.events.iter().copied());
            if !report.running {
                break;
            }
        }
        all
    }

    #[test]
    fn completion_channel_fires_exactly_once() {
        let cfg = EngineConfig::default();
        let paths = vec![straight(1.0, &[0.0, 100.0], &cfg)];
        let mut g = glyphs(1);
        let mut clocks = vec![PhaseClock::new()];
        let mut animator = PathAnimator::new();

        let rx = animator.start(&paths, &cfg);
        let events = run_to_completion(&mut animator, &paths, &mut g, &mut clocks, 2.0);

        assert_eq!(rx.try_recv(), Ok(()), "one completion message expected");
        assert!(rx.try_recv().is_err(), "never a second message");
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, AnimationEvent::Finished))
                .count(),
            1
        );
        assert!(g[0].detected);
        assert_eq!(animator.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn skipped_waypoints_all_fire_in_order() {
        // 4 interior waypoints; animation compressed to very few frames so
        // a single step jumps several segment boundaries at once.
        let cfg = EngineConfig {
            animation_speed: 50.0, // exaggerated skip speed
            frame_rate: 25.0,
            ..Default::default()
        };
        let paths = vec![straight(
            1.0,
            &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0],
            &cfg,
        )];
        let mut g = glyphs(1);
        let mut clocks = vec![PhaseClock::new()];
        let mut animator = PathAnimator::new();
        let _rx = animator.start(&paths, &cfg);
        let events = run_to_completion(&mut animator, &paths, &mut g, &mut clocks, 1.0);

        let reached: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                AnimationEvent::WaypointReached { waypoint, .. } => Some(*waypoint),
                _ => None,
            })
            .collect();
        assert_eq!(
            reached,
            vec![1, 2, 3, 4, 5],
            "every interior waypoint then the terminal one, in order, once"
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, AnimationEvent::PathDetected { .. }))
                .count(),
            1
        );
        assert_eq!(events.last(), Some(&AnimationEvent::Finished));
    }

    #[test]
    fn paths_finish_in_lockstep_with_own_durations() {
        let cfg = EngineConfig::default();
        let paths = vec![
            straight(1.0, &[0.0, 50.0], &cfg),
            straight(1.0, &[0.0, 100.0], &cfg),
        ];
        let mut g = glyphs(2);
        let mut clocks = vec![PhaseClock::new(), PhaseClock::new()];
        let mut animator = PathAnimator::new();
        let _rx = animator.start(&paths, &cfg);

        let mut short_detected_at = None;
        let mut long_detected_at = None;
        for frame in 1..=10_000u64 {
            let report = animator.advance(&paths, &mut g, &mut clocks, 1.0);
            for e in &report.events {
                if let AnimationEvent::PathDetected { path } = e {
                    match path.0 {
                        0 => short_detected_at = Some(frame),
                        1 => long_detected_at = Some(frame),
                        _ => unreachable!(),
                    }
                }
            }
            if !report.running {
                break;
            }
        }
        let short = short_detected_at.expect("short path detected");
        let long = long_detected_at.expect("long path detected");
        assert!(
            short < long,
            "shorter path must land first (frames {} vs {})",
            short,
            long
        );
    }

    #[test]
    fn pause_preserves_virtual_time() {
        let cfg = EngineConfig::default();
        let paths = vec![straight(1.0, &[0.0, 100.0], &cfg)];
        let mut g = glyphs(1);
        let mut clocks = vec![PhaseClock::new()];
        let mut animator = PathAnimator::new();
        let _rx = animator.start(&paths, &cfg);

        let t1 = animator.advance(&paths, &mut g, &mut clocks, 1.0).virtual_time;
        animator.pause();
        for _ in 0..5 {
            let report = animator.advance(&paths, &mut g, &mut clocks, 1.0);
            assert!(report.events.is_empty(), "paused ticks do nothing");
            assert!((report.virtual_time - t1).abs() < 1e-12);
        }
        animator.resume();
        let t2 = animator.advance(&paths, &mut g, &mut clocks, 1.0).virtual_time;
        let step = paths[0].total_time() / animator_total_frames(&cfg, &paths);
        assert!(
            (t2 - t1 - step).abs() < 1e-9,
            "resume continues from the same frame counter"
        );
    }

    fn animator_total_frames(cfg: &EngineConfig, paths: &[PhotonPath]) -> f64 {
        let max_time = paths.iter().map(|p| p.total_time()).fold(0.0, f64::max);
        ((max_time / cfg.animation_speed) * cfg.frame_rate).ceil().max(1.0)
    }

    #[test]
    fn cancel_disconnects_without_completing() {
        let cfg = EngineConfig::default();
        let paths = vec![straight(1.0, &[0.0, 100.0], &cfg)];
        let mut animator = PathAnimator::new();
        let rx = animator.start(&paths, &cfg);
        animator.cancel();
        assert!(
            matches!(rx.try_recv(), Err(crossbeam_channel::TryRecvError::Disconnected)),
            "cancelled run must never look like a completion"
        );
        assert_eq!(animator.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn restart_cancels_previous_run() {
        let cfg = EngineConfig::default();
        let paths = vec![straight(1.0, &[0.0, 100.0], &cfg)];
        let mut animator = PathAnimator::new();
        let rx_old = animator.start(&paths, &cfg);
        let _rx_new = animator.start(&paths, &cfg);
        assert!(
            matches!(
                rx_old.try_recv(),
                Err(crossbeam_channel::TryRecvError::Disconnected)
            ),
            "first run's receiver must observe disconnect"
        );
    }

    #[test]
    fn empty_path_set_finishes_on_first_tick() {
        let cfg = EngineConfig::default();
        let paths: Vec<PhotonPath> = Vec::new();
        let mut animator = PathAnimator::new();
        let rx = animator.start(&paths, &cfg);
        let report = animator.advance(&paths, &mut [], &mut [], 1.0);
        assert_eq!(report.events.as_slice(), &[AnimationEvent::Finished]);
        assert!(!report.running);
        assert_eq!(rx.try_recv(), Ok(()));
    }

    #[test]
    fn clock_angle_tracks_reflection_parity() {
        let cfg = EngineConfig::default();
        let path = PhotonPath::from_waypoints(
            1.0,
            [
                Waypoint::new(0.0, 0.0),
                Waypoint::new(50.0, 0.0).with_phase_inversion(),
                Waypoint::new(100.0, 0.0),
            ],
            &cfg,
        );
        let f = 3.0;
        let before = running_clock_angle(&path, path.total_time() * 0.25, f);
        let after = running_clock_angle(&path, path.total_time() * 0.75, f);
        // Subtract the continuous rotation; the residual jump is exactly π.
        let rotation = TAU * path.total_time() * 0.5 * f;
        assert!(((after - before) - rotation - std::f64::consts::PI).abs() < 1e-9);
        assert!(
            (final_clock_angle(&path, f)
                - (TAU * path.total_time() * f + std::f64::consts::PI))
                .abs()
                < 1e-9
        );
    }
}
