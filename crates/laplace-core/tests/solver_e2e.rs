// ─────────────────────────────────────────────────────────────────────
// Laplace DD — End-to-End Solver Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multi-rank integration tests: halo consistency, assembly ordering,
//! and complete runs to the uniform-boundary fixed point.

use std::thread;

use laplace_core::assemble::gather_and_assemble;
use laplace_core::comm::Communicator;
use laplace_core::halo::exchange_halo;
use laplace_core::layout::Topology;
use laplace_core::solver::solve;
use laplace_core::subgrid::Subgrid;
use laplace_types::config::SolverSettings;
use laplace_types::error::LaplaceError;
use laplace_types::scheme::Scheme;
use ndarray::Array2;

/// Run one closure per rank over a fresh communicator mesh and return
/// the per-rank results in rank order.
fn run_ranks<T, F>(topo: &Topology, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(Communicator) -> T + Sync,
{
    let comms = Communicator::mesh(topo.nranks);
    thread::scope(|scope| {
        let f = &f;
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| scope.spawn(move || f(comm)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("rank thread"))
            .collect()
    })
}

#[test]
fn halo_mirrors_neighbor_boundary_after_one_exchange() {
    // 3×3 block grid, deterministic rank-valued fill: after one
    // exchange every halo cell equals the neighbor's rank value.
    let topo = Topology::new(9, 9, Scheme::Block).expect("topology");
    let subs: Vec<Subgrid> = run_ranks(&topo, |comm| {
        let mut sub = Subgrid::new(&topo.layout(comm.rank()));
        exchange_halo(&comm, &mut sub).expect("exchange");
        sub
    });

    for sub in &subs {
        let rows = sub.layout.padded_rows();
        let cols = sub.layout.padded_cols();
        if let Some(up) = sub.layout.up {
            for j in 1..cols - 1 {
                assert_eq!(sub.cells[[0, j]], up as f32);
            }
        }
        if let Some(down) = sub.layout.down {
            for j in 1..cols - 1 {
                assert_eq!(sub.cells[[rows - 1, j]], down as f32);
            }
        }
        if let Some(left) = sub.layout.left {
            for i in 1..rows - 1 {
                assert_eq!(sub.cells[[i, 0]], left as f32);
            }
        }
        if let Some(right) = sub.layout.right {
            for i in 1..rows - 1 {
                assert_eq!(sub.cells[[i, cols - 1]], right as f32);
            }
        }
        // Corners are never populated by the exchange.
        assert_eq!(sub.cells[[0, 0]], -1.0);
        assert_eq!(sub.cells[[rows - 1, cols - 1]], -1.0);
    }
}

#[test]
fn strip_assembly_without_relaxation_reproduces_rank_rows() {
    // N=4, P=4, zero iterations: the trimmed interior-only result is
    // the four rank rows in order.
    let topo = Topology::new(4, 4, Scheme::Strip).expect("topology");
    let matrices: Vec<Option<Array2<f32>>> = run_ranks(&topo, |comm| {
        let sub = Subgrid::new(&topo.layout(comm.rank()));
        gather_and_assemble(&comm, &topo, &sub).expect("assemble")
    });

    let matrix = matrices[0].as_ref().expect("rank 0 matrix");
    assert!(matrices[1..].iter().all(|m| m.is_none()));
    for rank in 0..4 {
        for c in 0..4 {
            assert_eq!(matrix[[rank, c]], rank as f32);
        }
    }
}

#[test]
fn block_assembly_without_relaxation_places_blocks() {
    let topo = Topology::new(4, 4, Scheme::Block).expect("topology");
    let matrices: Vec<Option<Array2<f32>>> = run_ranks(&topo, |comm| {
        let sub = Subgrid::new(&topo.layout(comm.rank()));
        gather_and_assemble(&comm, &topo, &sub).expect("assemble")
    });

    let matrix = matrices[0].as_ref().expect("rank 0 matrix");
    for r in 0..4 {
        for c in 0..4 {
            let expected = (r / 2) * 2 + c / 2;
            assert_eq!(matrix[[r, c]], expected as f32);
        }
    }
}

#[test]
fn strip_run_reaches_uniform_boundary_fixed_point() {
    // N=8, P=2: the unique steady state with a constant −1 boundary
    // and no source term is −1 everywhere.
    let mut settings = SolverSettings::new(8, 2, Scheme::Strip);
    settings.precision = 1.0e-4;
    let report = solve(&settings).expect("solve");

    assert_eq!(report.matrix.dim(), (8, 8));
    assert!(report.global_error < settings.precision);
    for &v in report.matrix.iter() {
        assert!(
            (f64::from(v) + 1.0).abs() < 1.0e-2,
            "cell {v} not at the fixed point"
        );
    }
}

#[test]
fn block_run_reaches_uniform_boundary_fixed_point() {
    // N=9, P=9 (S=3).
    let mut settings = SolverSettings::new(9, 9, Scheme::Block);
    settings.precision = 1.0e-4;
    let report = solve(&settings).expect("solve");

    assert_eq!(report.matrix.dim(), (9, 9));
    assert!(report.global_error < settings.precision);
    for &v in report.matrix.iter() {
        assert!(
            (f64::from(v) + 1.0).abs() < 1.0e-2,
            "cell {v} not at the fixed point"
        );
    }
}

#[test]
fn global_error_decreases_monotonically() {
    let mut settings = SolverSettings::new(8, 2, Scheme::Strip);
    settings.precision = 1.0e-2;
    let report = solve(&settings).expect("solve");

    assert_eq!(report.error_history.len(), report.iterations);
    assert!(report.iterations > 1);
    for pair in report.error_history.windows(2) {
        assert!(
            pair[1] <= pair[0],
            "error increased: {} -> {}",
            pair[0],
            pair[1]
        );
    }
    let last = *report.error_history.last().expect("history");
    assert!(last < settings.precision);
}

#[test]
fn default_precision_run_terminates() {
    // Default threshold: the loop exits once the global error drops
    // under 1e-2.
    let settings = SolverSettings::new(8, 2, Scheme::Strip);
    let report = solve(&settings).expect("solve");
    assert!(report.global_error < 1.0e-2);
    assert!(report.iterations > 0);
}

#[test]
fn constraint_violations_fail_before_any_iteration() {
    let err = solve(&SolverSettings::new(10, 3, Scheme::Strip)).expect_err("strip divisibility");
    assert!(matches!(err, LaplaceError::Config(_)));

    let err = solve(&SolverSettings::new(10, 5, Scheme::Block)).expect_err("square rank count");
    assert!(matches!(err, LaplaceError::Config(_)));
}
