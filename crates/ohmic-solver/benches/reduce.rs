//! Benchmarks for network reduction.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ohmic_core::{Circuit, CircuitBuilder};
use ohmic_solver::solve_network;

/// A chain of `rungs` series resistors with a parallel partner across
/// every other segment.
fn ladder(rungs: usize) -> Circuit {
    let mut b = CircuitBuilder::new();
    let first = b.add_node();
    let mut prev = first;
    for i in 0..rungs {
        let next = b.add_node();
        b.add_resistor(prev, next, 100.0 + i as f64).unwrap();
        if i % 2 == 0 {
            b.add_resistor(prev, next, 220.0).unwrap();
        }
        prev = next;
    }
    b.supply(12.0, first, prev).unwrap();
    b.build().unwrap()
}

fn bench_solve_ladder(c: &mut Criterion) {
    for rungs in [8, 32, 128] {
        c.bench_function(&format!("solve_ladder_{rungs}"), |bench| {
            let circuit = ladder(rungs);
            bench.iter(|| solve_network(black_box(circuit.clone())).unwrap());
        });
    }
}

criterion_group!(benches, bench_solve_ladder);
criterion_main!(benches);
