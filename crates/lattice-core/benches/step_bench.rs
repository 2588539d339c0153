// -------------------------------------------------------------------------
// SCPN Lattice Flow -- Time Step Benchmark
// Full LB step plus the streaming and collision stages in isolation.
// -------------------------------------------------------------------------

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lattice_core::boundary::NoOpBoundary;
use lattice_core::collide::{collide_bgk, reduce_macros};
use lattice_core::grid::Grid3D;
use lattice_core::solver::LatticeSolver;
use lattice_core::stream::stream;
use lattice_core::topology::Topology;
use lattice_core::transport::LoopbackTransport;
use lattice_types::config::{
    DomainConfig, OutputConfig, PhysicsConfig, RunParams, SimulationConfig,
};
use lattice_types::state::{alloc_distribution, MacroFields};
use lattice_types::velocity_set::W;
use std::hint::black_box;

fn make_config(n: usize) -> SimulationConfig {
    SimulationConfig {
        case_name: format!("bench-{n}"),
        domain: DomainConfig {
            global: [n, n, n],
            proc_grid: [1, 1, 1],
            periodic: [true, true, true],
            ghost_layers: 1,
        },
        physics: PhysicsConfig {
            tau: Some(0.8),
            nu: None,
            rho_floor: 1e-10,
        },
        run: RunParams {
            t_total: 1,
            t_out: 1,
            check_every: 0,
        },
        output: OutputConfig {
            directory: "out".to_string(),
            spacing: [1.0, 1.0, 1.0],
        },
        initial_condition: serde_json::Value::Null,
    }
}

fn bench_full_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_step");
    group.sample_size(20);
    for &n in &[16usize, 32] {
        let cfg = make_config(n);
        let topo = Topology::new(0, 1, [1, 1, 1], [true, true, true]).expect("topology");
        let mut solver = LatticeSolver::new(&cfg, topo, Box::new(NoOpBoundary)).expect("solver");
        solver.initialize_with(|_| (1.0, [0.01, 0.0, 0.0]));
        let transport = LoopbackTransport::new();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(&mut solver).step(&transport).expect("step"))
        });
    }
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let n = 32;
    let grid = Grid3D::new([n, n, n], 1).expect("grid");
    let mut f = alloc_distribution(grid.padded());
    for (a, mut component) in f.axis_iter_mut(ndarray::Axis(3)).enumerate() {
        component.fill(W[a]);
    }
    let mut f_next = alloc_distribution(grid.padded());
    let mut macros = MacroFields::new(grid.padded());

    group.bench_function("stream_32", |b| {
        b.iter(|| stream(black_box(&f), black_box(&mut f_next), &grid))
    });
    group.bench_function("reduce_32", |b| {
        b.iter(|| reduce_macros(black_box(&f), black_box(&mut macros), &grid, 1e-10))
    });
    reduce_macros(&f, &mut macros, &grid, 1e-10);
    group.bench_function("collide_32", |b| {
        b.iter(|| collide_bgk(black_box(&mut f), &macros, &grid, 0.8))
    });
    group.finish();
}

criterion_group!(benches, bench_full_step, bench_stages);
criterion_main!(benches);
