//! # Two-Path Interference Example
//!
//! The smallest complete pipeline: a direct path and a mirror-bounce path
//! to the same detector, animated to completion, then summed into an
//! arrow diagram.
//!
//! Demonstrates:
//! - traversal time from geometry and the shared speed constant
//! - the mirror's hard reflection contributing a π phase flip
//! - clocks landing on exactly the phases the diagram sums
//!
//! Run: `cargo run --example two_path_interference`

use photon_path_sim::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        TWO-PATH INTERFERENCE — direct vs mirror bounce       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let cfg = EngineConfig::default();
    let mut layer = LightLayer::with_nominal_frequency(LightColor::Green, cfg.clone());

    // Source at (0,0), detector at (100,0), mirror along y = 40.
    let direct = PhotonPath::from_waypoints(
        1.0,
        [Waypoint::new(0.0, 0.0), Waypoint::new(100.0, 0.0)],
        &cfg,
    );
    let bounced = PhotonPath::from_waypoints(
        1.0,
        [
            Waypoint::new(0.0, 0.0),
            Waypoint::new(50.0, 40.0).with_phase_inversion(),
            Waypoint::new(100.0, 0.0),
        ],
        &cfg,
    );
    layer.add_path(direct);
    layer.add_path(bounced);

    println!("━━━ Path geometry ━━━");
    println!();
    println!("  {:>6}  {:>10}  {:>10}  {:>7}", "path", "length", "time (s)", "parity");
    for (i, path) in layer.paths().iter().enumerate() {
        let length: f64 = path
            .waypoints()
            .windows(2)
            .map(|w| w[0].position.distance(&w[1].position))
            .sum();
        println!(
            "  {:>6}  {:>10.3}  {:>10.4}  {:>7}",
            i,
            length,
            path.total_time(),
            if path.final_parity() { "π" } else { "0" }
        );
    }
    println!();

    // ── Animate to completion ────────────────────────────────────────────

    println!("━━━ Animation ━━━");
    println!();
    let mut clocks = vec![PhaseClock::new(), PhaseClock::new()];
    let done = layer.animate();
    let mut frames = 0u64;
    loop {
        let report = layer.tick(&mut clocks);
        frames += 1;
        for event in report.events.iter() {
            match event {
                AnimationEvent::WaypointReached { path, waypoint } => {
                    println!("  frame {:>3}: path {} reached waypoint {}", frames, path, waypoint)
                }
                AnimationEvent::PathDetected { path } => {
                    println!("  frame {:>3}: path {} detected", frames, path)
                }
                AnimationEvent::Finished => println!("  frame {:>3}: all paths finished", frames),
            }
        }
        if !report.running {
            break;
        }
    }
    assert_eq!(done.try_recv(), Ok(()));
    println!();

    // ── Sum the amplitudes ───────────────────────────────────────────────

    println!("━━━ Amplitude diagram ━━━");
    println!();
    let mut view = AmplitudeVectorView::new(Bounds::spanning(
        Point2::new(0.0, 0.0),
        Point2::new(200.0, 200.0),
    ));
    view.draw_amplitudes(&layer);

    println!("  {:>6}  {:>10}  {:>12}  {:>10}", "arrow", "amplitude", "phase (rad)", "clock");
    for (i, (s, clock)) in view.samples().iter().zip(&clocks).enumerate() {
        println!(
            "  {:>6}  {:>10.3}  {:>12.4}  {:>10.4}",
            i,
            s.amplitude,
            s.phase,
            clock.dial_angle()
        );
    }
    println!();
    println!("  |Σ amplitude|  = {:.4}", view.total_amplitude_length());
    println!("  probability    = {:.4}", view.probability());
    println!("  normalized     = {:.4}  (1.0 = perfect coherence)", view.normalized_total_amplitude());
    println!();

    // ── Reciprocal highlighting ──────────────────────────────────────────

    let mut manager = GlowManager::new();
    manager.assign(&mut [&mut layer, &mut clocks, &mut view]);
    manager.enable();
    manager.gesture(
        HighlightGesture::HoverStart(GlyphIndex(1)),
        &mut [&mut layer, &mut clocks, &mut view],
    );
    println!(
        "hovering clock #1 → path glowing: {}, arrow glowing: {}",
        layer.glyph(GlyphIndex(1)).map(|g| g.glowing).unwrap_or(false),
        view.is_glowing(GlyphIndex(1)),
    );
}
