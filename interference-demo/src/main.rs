//! Scripted interference tutorials run end to end against the engine.
//!
//! Three scenes, each the skeleton of an interactive tutorial step:
//! 1. **Feynman mirror** — a fan of reflection points across a mirror;
//!    the central (least-time) paths dominate the summed amplitude.
//! 2. **Glass slab** — the same geometric route with and without a denser
//!    medium; extra traversal time rotates the phase clock further.
//! 3. **Free exploration** — randomly scattered paths, the "click to add
//!    a path" sandbox; with many random phases the probability collapses.
//!
//! Run: `RUST_LOG=debug cargo run -p interference-demo`

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use photon_path_sim::prelude::*;

/// Animate a layer to completion, printing per-path clock results.
fn run_layer(layer: &mut LightLayer, clocks: &mut Vec<PhaseClock>) {
    clocks.clear();
    clocks.resize(layer.path_count(), PhaseClock::new());

    let done = layer.animate();
    let mut frames = 0u64;
    loop {
        let report = layer.tick(clocks.as_mut_slice());
        frames += 1;
        if !report.running {
            break;
        }
    }
    assert_eq!(done.try_recv(), Ok(()), "animation must signal completion");
    info!("animated {} paths in {} frames", layer.path_count(), frames);
}

fn summarize(name: &str, layer: &LightLayer, view: &mut AmplitudeVectorView) {
    view.draw_amplitudes(layer);
    println!("━━━ {} ━━━", name);
    println!(
        "  paths: {:>3}   |Σ| = {:>7.4}   P = {:>7.4}   coherence = {:>6.4}",
        layer.path_count(),
        view.total_amplitude_length(),
        view.probability(),
        view.normalized_total_amplitude(),
    );
    println!();
}

/// A fan of single-bounce mirror paths from source to detector.
fn feynman_mirror(cfg: &EngineConfig) {
    let mut layer = LightLayer::with_nominal_frequency(LightColor::Red, cfg.clone());
    let source = Point2::new(-60.0, 30.0);
    let detector = Point2::new(60.0, 30.0);

    // Reflection points spread along the mirror (y = 0).
    for i in 0..11 {
        let x = -50.0 + 10.0 * i as f64;
        let path = PhotonPath::from_waypoints(
            1.0,
            [
                Waypoint::at(source),
                Waypoint::new(x, 0.0).with_phase_inversion(),
                Waypoint::at(detector),
            ],
            cfg,
        );
        layer.add_path(path);
    }

    let mut clocks = Vec::new();
    run_layer(&mut layer, &mut clocks);

    let mut view = AmplitudeVectorView::new(viewport());
    summarize("Feynman mirror (11 bounce points)", &layer, &mut view);

    // The chain curls at the edges: neighbouring edge paths differ in
    // phase far more than neighbouring central paths.
    let amps = layer.amplitudes();
    let edge_delta = (amps[1].phase - amps[0].phase).abs();
    let center_delta = (amps[6].phase - amps[5].phase).abs();
    println!(
        "  neighbour phase delta — edge: {:.3} rad, center: {:.3} rad",
        edge_delta, center_delta
    );
    println!();

    // Pin the least-time path's glyph across all three representations.
    let mut manager = GlowManager::new();
    manager.assign(&mut [&mut layer, &mut clocks, &mut view]);
    manager.enable();
    manager.gesture(
        HighlightGesture::Tap(GlyphIndex(5)),
        &mut [&mut layer, &mut clocks, &mut view],
    );
    info!(
        "pinned path 5: glyph {}, clock {}, arrow {}",
        layer.glyph(GlyphIndex(5)).map(|g| g.glowing).unwrap_or(false),
        clocks[5].is_glowing(),
        view.is_glowing(GlyphIndex(5)),
    );
}

/// One straight route, vacuum vs glass: same geometry, different clocks.
fn glass_slab(cfg: &EngineConfig) {
    let route = |through_glass: bool| {
        let mut slab_entry = Waypoint::new(40.0, 0.0);
        if through_glass {
            slab_entry = slab_entry.with_refraction(1.5);
        }
        let mut slab_exit = Waypoint::new(80.0, 0.0);
        if through_glass {
            slab_exit = slab_exit.with_refraction(1.0);
        }
        [
            Waypoint::new(0.0, 0.0),
            slab_entry,
            slab_exit,
            Waypoint::new(120.0, 0.0),
        ]
    };

    let mut layer = LightLayer::with_nominal_frequency(LightColor::Blue, cfg.clone());
    layer.add_path(PhotonPath::from_waypoints(1.0, route(false), cfg));
    layer.add_path(PhotonPath::from_waypoints(1.0, route(true), cfg));

    let mut clocks = Vec::new();
    run_layer(&mut layer, &mut clocks);

    let mut view = AmplitudeVectorView::new(viewport());
    summarize("Glass slab (vacuum vs n = 1.5)", &layer, &mut view);

    let vacuum = layer.path(GlyphIndex(0)).unwrap().total_time();
    let glass = layer.path(GlyphIndex(1)).unwrap().total_time();
    println!(
        "  traversal — vacuum: {:.4} s, glass: {:.4} s (clock turns {:+.3})",
        vacuum,
        glass,
        (clocks[1].angle() - clocks[0].angle()) / std::f64::consts::TAU,
    );
    println!();
}

/// Randomly scattered two-bounce paths: decoherence by construction.
fn free_exploration(cfg: &EngineConfig) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut layer = LightLayer::with_nominal_frequency(LightColor::Violet, cfg.clone());

    for _ in 0..24 {
        let mid_a = Waypoint::new(rng.gen_range(10.0..50.0), rng.gen_range(-40.0..40.0));
        let mid_b = Waypoint::new(rng.gen_range(60.0..100.0), rng.gen_range(-40.0..40.0));
        let path = PhotonPath::from_waypoints(
            1.0,
            [
                Waypoint::new(0.0, 0.0),
                mid_a,
                mid_b,
                Waypoint::new(110.0, 0.0),
            ],
            cfg,
        );
        layer.add_path(path);
    }

    // Skip the animation: snap straight to the final state, as the
    // tutorial's fast-forward button would.
    let mut clocks = vec![PhaseClock::new(); layer.path_count()];
    layer.set_final_state(&mut clocks);

    let mut view = AmplitudeVectorView::new(viewport());
    // Fixed scale: the sandbox adds paths one at a time and the diagram
    // must not rescale under the student's cursor.
    view.set_viewport_scale(Some(8.0));
    summarize("Free exploration (24 random paths)", &layer, &mut view);

    layer.clear();
    assert!(layer.is_empty());
    info!("sandbox layer cleared for the next tutorial step");
}

fn viewport() -> Bounds {
    Bounds::spanning(Point2::new(0.0, 0.0), Point2::new(240.0, 240.0))
}

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     PHOTON PATH AMPLITUDES — three scripted tutorials        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let cfg = EngineConfig::default();
    feynman_mirror(&cfg);
    glass_slab(&cfg);
    free_exploration(&cfg);
}
