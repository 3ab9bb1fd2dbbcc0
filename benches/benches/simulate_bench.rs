//! # Simulation Benchmarks
//!
//! Dense matrix-vector steps, O(dim²) each.
//!
//! Run: `cargo bench --bench simulate_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qsim_core::{apply_matrix, Circuit, Complex, Gate, GateMatrix, Simulator, StateVector};
use std::sync::Arc;

fn hadamard_like(dim: usize) -> GateMatrix {
    let scale = 1.0 / (dim as f64).sqrt();
    let rows = (0..dim)
        .map(|r| {
            (0..dim)
                .map(|c| {
                    let sign = if (r & c).count_ones() % 2 == 0 { 1.0 } else { -1.0 };
                    Complex::new(sign * scale, 0.0)
                })
                .collect()
        })
        .collect();
    GateMatrix::from_rows(rows).unwrap()
}

/// Benchmark one step as the register grows
fn bench_apply_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_matrix");

    for qubits in [2u32, 6, 10] {
        let dim = 1usize << qubits;
        let matrix = hadamard_like(dim);
        let vector = StateVector::basis(qubits, 0).unwrap();
        group.bench_with_input(BenchmarkId::new("qubits", qubits), &qubits, |b, _| {
            b.iter(|| black_box(apply_matrix(&matrix, vector.amplitudes())))
        });
    }

    group.finish();
}

/// Benchmark whole circuits with a shared gate repeated K times
fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_run");
    let qubits = 6;
    let gate = Arc::new(Gate::new("H", hadamard_like(1 << qubits)));
    let simulator = Simulator::new();

    for steps in [1usize, 8, 64] {
        let circuit = Circuit::new(vec![Arc::clone(&gate); steps]);
        group.bench_with_input(BenchmarkId::new("steps", steps), &circuit, |b, circ| {
            b.iter(|| {
                let state = StateVector::basis(qubits, 0).unwrap();
                black_box(simulator.run(state, circ).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_matrix, bench_run);
criterion_main!(benches);
