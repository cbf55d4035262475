// benches/path_benchmarks.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use photon_path_sim::prelude::*;

fn zigzag_path(n: usize, cfg: &EngineConfig) -> PhotonPath {
    let mut path = PhotonPath::new(1.0);
    for i in 0..n {
        let y = if i % 2 == 0 { 0.0 } else { 40.0 };
        let mut w = Waypoint::new(i as f64 * 10.0, y);
        if i % 7 == 3 {
            w = w.with_refraction(1.5);
        }
        if i % 11 == 5 {
            w = w.with_phase_inversion();
        }
        path.add_waypoint(w);
    }
    path.recompute(cfg);
    path
}

fn benchmark_path_math(c: &mut Criterion) {
    let cfg = EngineConfig::default();

    c.bench_function("path_recompute_1000_waypoints", |b| {
        let mut path = zigzag_path(1000, &cfg);
        b.iter(|| {
            path.recompute(black_box(&cfg));
            black_box(path.total_time());
        });
    });

    c.bench_function("position_at_time_sweep", |b| {
        let path = zigzag_path(1000, &cfg);
        let total = path.total_time();
        b.iter(|| {
            let mut acc = 0.0;
            for k in 0..64 {
                let t = total * k as f64 / 64.0;
                let p = path.position_at_time(black_box(t));
                acc += p.x + p.y;
            }
            black_box(acc);
        });
    });

    c.bench_function("compute_diagram_1000_arrows", |b| {
        let samples: Vec<AmplitudeSample> = (0..1000)
            .map(|i| AmplitudeSample {
                amplitude: 1.0,
                phase: i as f64 * 0.37,
            })
            .collect();
        b.iter(|| {
            let layout = compute_diagram(black_box(&samples));
            black_box(layout.total.length());
        });
    });
}

criterion_group!(benches, benchmark_path_math);
criterion_main!(benches);
