// ─────────────────────────────────────────────────────────────────────
// Laplace DD — SPMD Solver Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The lockstep rank program and the runtime that spawns it.
//!
//! Every rank runs the identical loop, branching only on its identity:
//! sweep, commit, halo exchange, then the blocking all-reduce that
//! decides convergence for everyone at once. There is no iteration
//! cap; the loop ends when the global error falls under the threshold
//! or a rank fails fatally.

use std::thread;
use std::time::Instant;

use log::{debug, info};
use ndarray::Array2;

use laplace_types::config::SolverSettings;
use laplace_types::error::{LaplaceError, LaplaceResult};

use crate::assemble::gather_and_assemble;
use crate::comm::Communicator;
use crate::halo::exchange_halo;
use crate::layout::Topology;
use crate::output::format_subgrid;
use crate::relax::{commit_sweep, jacobi_sweep};
use crate::subgrid::Subgrid;

/// What a finished run hands to the I/O collaborators.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The assembled N×N field, canonical order (row 0 = top).
    pub matrix: Array2<f32>,
    pub iterations: usize,
    /// Final global L2 update norm, strictly under the threshold.
    pub global_error: f64,
    /// Global error after each iteration, in order.
    pub error_history: Vec<f64>,
}

struct RankOutput {
    matrix: Option<Array2<f32>>,
    iterations: usize,
    global_error: f64,
    error_history: Vec<f64>,
}

/// Validate the topology, spawn one thread per rank, run the SPMD
/// program to convergence, and return rank 0's assembled result.
///
/// Constraint violations are caught here, before any rank exists, so
/// every rank observes the identical verdict. A rank failing mid-run
/// drops its channel endpoints; its peers then error out of their next
/// receive instead of blocking forever, and the first error in rank
/// order is returned.
pub fn solve(settings: &SolverSettings) -> LaplaceResult<SolveReport> {
    let topo = Topology::new(settings.n, settings.nranks, settings.scheme)?;
    let comms = Communicator::mesh(topo.nranks);

    let outputs: Vec<thread::Result<LaplaceResult<RankOutput>>> = thread::scope(|scope| {
        let topo = &topo;
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| scope.spawn(move || run_rank(comm, topo, settings)))
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    let mut root = None;
    for (rank, joined) in outputs.into_iter().enumerate() {
        let output =
            joined.map_err(|_| LaplaceError::Comm(format!("rank {rank} panicked")))??;
        if rank == 0 {
            root = Some(output);
        }
    }
    let root = root.ok_or_else(|| LaplaceError::Comm("rank 0 produced no output".to_string()))?;
    let matrix = root
        .matrix
        .ok_or_else(|| LaplaceError::Comm("rank 0 produced no matrix".to_string()))?;

    Ok(SolveReport {
        matrix,
        iterations: root.iterations,
        global_error: root.global_error,
        error_history: root.error_history,
    })
}

/// The rank program: identical on every rank, parameterized by the
/// communicator's rank and the derived layout.
fn run_rank(
    comm: Communicator,
    topo: &Topology,
    settings: &SolverSettings,
) -> LaplaceResult<RankOutput> {
    let layout = topo.layout(comm.rank());
    let mut sub = Subgrid::new(&layout);

    // Startup barrier: all ranks assemble before timing begins.
    comm.barrier();
    let start = Instant::now();

    // First halo refresh, so iteration 1 reads real neighbor data.
    exchange_halo(&comm, &mut sub)?;

    let mut next = sub.cells.clone();
    let mut error_history = Vec::new();
    let mut global_error = f64::INFINITY;
    let mut iterations = 0usize;

    while global_error >= settings.precision {
        let local_error_sum = jacobi_sweep(&sub.cells, &mut next);
        commit_sweep(&mut sub.cells, &next);
        exchange_halo(&comm, &mut sub)?;

        let global_sum = comm.all_reduce_sum(local_error_sum)?;
        global_error = global_sum.sqrt();
        iterations += 1;
        if comm.rank() == 0 {
            debug!("iteration {iterations} - error = {global_error:e}");
            error_history.push(global_error);
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    if let Some(times) = comm.gather_f64(elapsed)? {
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(0.0f64, f64::max);
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        info!("rank wall time: min {min:.6}s max {max:.6}s avg {avg:.6}s");
    }

    let matrix = gather_and_assemble(&comm, topo, &sub)?;

    if settings.dump_subgrids {
        // Barrier-ordered so rank dumps never interleave.
        for turn in 0..comm.size() {
            if turn == comm.rank() {
                print!("{}", format_subgrid(comm.rank(), &sub.cells));
            }
            comm.barrier();
        }
    }

    Ok(RankOutput {
        matrix,
        iterations,
        global_error,
        error_history,
    })
}
