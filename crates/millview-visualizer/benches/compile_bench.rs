// Benchmark for toolpath compilation and statistics
// Run with: cargo bench -p millview-visualizer

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use millview_visualizer::{aggregate_statistics, compile};

fn generated_program(lines: usize) -> String {
    let mut gcode = String::from("G21\nG90\nG0 Z5\n");
    for i in 0..lines {
        let x = (i % 100) as f64;
        let y = (i / 100) as f64;
        if i % 10 == 0 {
            gcode.push_str(&format!("G2 X{} Y{} I0.5 J0 F800\n", x + 1.0, y));
        } else {
            gcode.push_str(&format!("G1 X{} Y{} Z-1 F1200\n", x, y));
        }
    }
    gcode
}

fn bench_compile(c: &mut Criterion) {
    let gcode = generated_program(10_000);
    c.bench_function("compile 10k lines", |b| {
        b.iter(|| {
            let program = compile(black_box(&gcode));
            assert!(program.toolpath.len() > 10_000);
        });
    });
}

fn bench_statistics(c: &mut Criterion) {
    let program = compile(&generated_program(10_000));
    c.bench_function("aggregate statistics 10k lines", |b| {
        b.iter(|| aggregate_statistics(black_box(&program)));
    });
}

criterion_group!(benches, bench_compile, bench_statistics);
criterion_main!(benches);
