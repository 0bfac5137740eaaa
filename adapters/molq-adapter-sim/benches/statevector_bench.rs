use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use molq_adapter_sim::{Estimator, Statevector, StatevectorEstimator};
use molq_ir::{Circuit, QubitId};
use molq_ops::{PauliHamiltonian, PauliTerm};

/// Ry layers with a CZ ladder between them.
fn layered_circuit(num_qubits: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::with_size("layered", num_qubits);
    for layer in 0..layers {
        for q in 0..num_qubits {
            circuit
                .ry(0.1 * (layer as f64 + q as f64 + 1.0), QubitId(q))
                .unwrap();
        }
        for q in 0..num_qubits - 1 {
            circuit.cz(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

fn ising(num_qubits: usize) -> PauliHamiltonian {
    let mut terms = Vec::new();
    for q in 0..num_qubits {
        terms.push(PauliTerm::x(-1.0, q));
        if q + 1 < num_qubits {
            terms.push(PauliTerm::zz(-1.0, q, q + 1));
        }
    }
    PauliHamiltonian::new(terms)
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("statevector");
    for n in [4u32, 8, 12, 16] {
        let circuit = layered_circuit(n, 4);
        group.bench_with_input(BenchmarkId::new("simulate", n), &circuit, |b, circuit| {
            b.iter(|| Statevector::from_circuit(black_box(circuit)).unwrap())
        });
    }
    group.finish();
}

fn bench_expectation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimator");
    for n in [4u32, 8, 12] {
        let circuit = layered_circuit(n, 4);
        let hamiltonian = ising(n as usize);
        let mut estimator = StatevectorEstimator::new();
        group.bench_function(BenchmarkId::new("ising", n), |b| {
            b.iter(|| {
                estimator
                    .estimate(black_box(&circuit), black_box(&hamiltonian))
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulation, bench_expectation);
criterion_main!(benches);
