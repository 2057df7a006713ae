use std::hint::black_box;
use std::time::Instant;

use drift_common::Extent;
use drift_input::InputEvent;
use drift_kernel::physics::REFERENCE_FRAME_MS;
use drift_kernel::{Session, VehicleTuning};

fn make_session(extent: Extent, steer_x: Option<f32>) -> Session {
    let mut session = Session::new(VehicleTuning::default());
    session.resize(extent);
    session.reset();
    if let Some(x) = steer_x {
        session.apply_input(&InputEvent::PointerDown { x, y: 0.0 });
    }
    session
}

fn bench_steps(label: &str, extent: Extent, steer_x: Option<f32>, iterations: usize) {
    let mut session = make_session(extent, steer_x);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(session.step(black_box(REFERENCE_FRAME_MS)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  {label} ({iterations} steps): {per_iter:?}/step, total {elapsed:?}, skids={}, score={}",
        session.skids().len(),
        session.score().display()
    );
}

fn bench_state_hash(iterations: usize) {
    let mut session = make_session(Extent::new(100_000.0, 100_000.0), Some(0.0));
    for _ in 0..500 {
        session.step(REFERENCE_FRAME_MS);
    }

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(black_box(&session).state_hash());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  state hash ({} marks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        session.skids().len()
    );
}

fn main() {
    println!("=== Physics Step Benchmarks ===\n");

    println!("Straight line:");
    bench_steps("no input", Extent::new(800.0, 600.0), None, 100_000);

    println!("\nContinuous drift:");
    bench_steps("hold left", Extent::new(100_000.0, 100_000.0), Some(0.0), 100_000);
    bench_steps("hold right, small surface", Extent::new(200.0, 300.0), Some(199.0), 100_000);

    println!("\nState hash:");
    bench_state_hash(10_000);

    println!("\n=== Done ===");
}
