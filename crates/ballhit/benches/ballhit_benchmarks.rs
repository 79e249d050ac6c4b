use std::time::Duration;

use ballhit::physics::{Collision, max_angle, release_energy, speed};
use ballhit::{Canvas, Lab, Rotation, Shape, Side};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const TICK: Duration = Duration::from_millis(2);

fn loaded_lab(left: usize, right: usize, angle: f64) -> Lab {
    let mut lab = Lab::default();
    if let (Some(l), Some(r)) = (lab.balls().id(left), lab.balls().id(right)) {
        lab.hang(Side::Left, l);
        lab.hang(Side::Right, r);
    }
    lab.pull_right_arm(angle);
    lab
}

fn bench_physics(c: &mut Criterion) {
    let mut group = c.benchmark_group("ballhit/physics");

    group.bench_function("speed", |b| {
        let e = release_energy(45.0, 0.5, 0.03);
        b.iter(|| black_box(speed(black_box(20.0), e, 0.5, 0.03)));
    });

    group.bench_function("max_angle", |b| {
        b.iter(|| black_box(max_angle(black_box(0.004), 0.5, 0.03)));
    });

    group.bench_function("Collision::split", |b| {
        b.iter(|| black_box(Collision::Elastic.split(0.05, 0.02, black_box(1.5))));
    });

    group.finish();
}

fn bench_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("ballhit/runs");

    for (name, left, right) in [("metal", 2, 3), ("plasticine", 0, 1), ("heavy_striker", 2, 14)] {
        let lab = loaded_lab(left, right, 45.0);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut lab = lab.clone();
                let _ = lab.start();
                while lab.in_simulation() && !lab.simulation_finished() {
                    lab.tick(TICK);
                }
                black_box(lab.system().left_angle())
            });
        });
    }

    group.finish();
}

struct Sink(usize);

impl Canvas for Sink {
    fn draw(&mut self, shape: &Shape, transform: Option<Rotation>) {
        self.0 += usize::from(transform.is_some()) + usize::from(matches!(shape, Shape::Text { .. }));
    }
}

fn bench_draw(c: &mut Criterion) {
    let lab = loaded_lab(2, 3, 30.0);
    c.bench_function("ballhit/draw", |b| {
        b.iter(|| {
            let mut sink = Sink(0);
            lab.draw(&mut sink);
            black_box(sink.0)
        });
    });
}

criterion_group!(ballhit_benches, bench_physics, bench_runs, bench_draw);
criterion_main!(ballhit_benches);
