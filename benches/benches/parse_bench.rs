//! # Loader Benchmarks
//!
//! Complex literal parsing and full loads of generated init/circuit text.
//!
//! Run: `cargo bench --bench parse_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qsim_core::{load_circuit, load_state, parse_complex, CircuitOptions};

/// Benchmark single literals of each shape
fn bench_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("complex_literal");

    for literal in ["0", "-0.7071067812", "i", "-i2.5", "3+i2", "1.5e-3-i4.25E+2"] {
        group.bench_with_input(BenchmarkId::from_parameter(literal), literal, |b, s| {
            b.iter(|| black_box(parse_complex(black_box(s))))
        });
    }

    group.finish();
}

fn init_text(qubits: u32) -> String {
    let dim = 1usize << qubits;
    let amplitudes: Vec<String> = (0..dim)
        .map(|i| if i % 3 == 0 { "0.5+i0.25".to_string() } else { "-0.125".to_string() })
        .collect();
    format!("#qubits {qubits}\n#init [{}]\n", amplitudes.join(", "))
}

fn circuit_text(qubits: u32, gates: usize) -> String {
    let dim = 1usize << qubits;
    let mut text = String::new();
    for g in 0..gates {
        text.push_str(&format!("#define G{g} ["));
        for r in 0..dim {
            let row: Vec<&str> = (0..dim).map(|c| if c == r { "1" } else { "0" }).collect();
            text.push_str(&format!(" ({})\n", row.join(",")));
        }
        text.push_str("]\n");
    }
    let order: Vec<String> = (0..gates).map(|g| format!("G{g}")).collect();
    text.push_str(&format!("#circ {}\n", order.join(" ")));
    text
}

/// Benchmark state loading as the register grows
fn bench_load_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_state");

    for qubits in [4u32, 8, 12] {
        let text = init_text(qubits);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("qubits", qubits), &text, |b, t| {
            b.iter(|| black_box(load_state(t.as_bytes(), "init").unwrap()))
        });
    }

    group.finish();
}

/// Benchmark circuit loading; gate matrices dominate the input size
fn bench_load_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_circuit");
    let options = CircuitOptions::default();

    for qubits in [2u32, 4, 6] {
        let text = circuit_text(qubits, 4);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("qubits", qubits), &text, |b, t| {
            b.iter(|| black_box(load_circuit(t.as_bytes(), "circuit", qubits, &options).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_literals, bench_load_state, bench_load_circuit);
criterion_main!(benches);
