//! Manager benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench manager
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use vds_bdd::manager::{Manager, ManagerConfig};
use vds_bdd::reachability::Reachability;
use vds_bdd::reference::BddId;

// ============================================================================
// Helper: N-Queens Problem (canonical BDD benchmark)
// ============================================================================

fn solve_queens(bdd: &Manager, n: usize) -> BddId {
    // q[i][j] = queen at row i, column j
    let q: Vec<Vec<BddId>> = (0..n)
        .map(|i| (0..n).map(|j| bdd.create_var(&format!("q{}_{}", i, j))).collect())
        .collect();

    let mut result = BddId::TRUE;

    // Exactly one queen per row
    for row in q.iter() {
        result = bdd.and2(result, bdd.or_many(row.iter().copied()));
        for j1 in 0..n {
            for j2 in (j1 + 1)..n {
                result = bdd.and2(result, bdd.nand2(row[j1], row[j2]));
            }
        }
    }

    // At most one queen per column
    for j in 0..n {
        for i1 in 0..n {
            for i2 in (i1 + 1)..n {
                result = bdd.and2(result, bdd.nand2(q[i1][j], q[i2][j]));
            }
        }
    }

    // At most one queen per diagonal
    for i1 in 0..n {
        for j1 in 0..n {
            for i2 in (i1 + 1)..n {
                let di = i2 - i1;
                for j2 in [j1 + di, j1.wrapping_sub(di)] {
                    if j2 < n {
                        result = bdd.and2(result, bdd.nand2(q[i1][j1], q[i2][j2]));
                    }
                }
            }
        }
    }

    result
}

fn bench_queens_cache_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager/queens_cache_size");
    group.sample_size(10);

    let n = 6;

    for cache_bits in [12, 14, 16, 18] {
        group.bench_with_input(
            BenchmarkId::new(format!("n={}", n), format!("2^{}", cache_bits)),
            &cache_bits,
            |b, &cache_bits| {
                b.iter(|| {
                    let bdd = Manager::with_config(ManagerConfig {
                        cache_bits,
                        ..ManagerConfig::default()
                    });
                    solve_queens(&bdd, n)
                });
            },
        );
    }

    group.finish();
}

fn bench_parity(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager/parity");

    for num_vars in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("xor", num_vars), &num_vars, |b, &num_vars| {
            b.iter(|| {
                let bdd = Manager::new();
                let vars: Vec<BddId> = (0..num_vars).map(|i| bdd.create_var(&format!("x{}", i))).collect();
                bdd.xor_many(vars)
            });
        });
    }

    group.finish();
}

fn bench_counter_reachability(c: &mut Criterion) {
    let mut group = c.benchmark_group("reachability/counter");
    group.sample_size(10);

    for bits in [4, 6, 8] {
        group.bench_with_input(BenchmarkId::new("bits", bits), &bits, |b, &bits| {
            b.iter(|| {
                let mut fsm = Reachability::new(bits, 0).unwrap();
                let s = fsm.states().to_vec();
                let bdd = fsm.manager();
                let mut carry = BddId::TRUE;
                let mut deltas = Vec::with_capacity(bits);
                for &bit in s.iter() {
                    deltas.push(bdd.xor2(bit, carry));
                    carry = bdd.and2(carry, bit);
                }
                fsm.set_transition_functions(&deltas).unwrap();
                fsm.reachable_state_count()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_queens_cache_size, bench_parity, bench_counter_reachability);
criterion_main!(benches);
