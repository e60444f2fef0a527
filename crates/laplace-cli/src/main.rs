// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Command-Line Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `laplace-dd`: run the distributed Jacobi relaxation to convergence,
//! print the assembled matrix, and save it to the results file.

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::info;

use laplace_core::output::{save_matrix, write_matrix};
use laplace_core::solver::solve;
use laplace_types::config::SolverSettings;
use laplace_types::error::{LaplaceError, LaplaceResult};
use laplace_types::scheme::Scheme;

/// Distributed Laplace solver (Jacobi relaxation over message-passing ranks)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Global square grid dimension N.
    n: Option<usize>,

    /// Number of ranks; defaults to LAPLACE_NPROCS or the machine's
    /// available parallelism.
    #[arg(short = 'p', long)]
    ranks: Option<usize>,

    /// Decomposition scheme: strip or block.
    #[arg(short, long)]
    scheme: Option<String>,

    /// Convergence threshold on the global L2 update norm.
    #[arg(long)]
    precision: Option<f64>,

    /// Where to save the assembled matrix.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print each rank's padded subgrid after the run.
    #[arg(long)]
    dump_subgrids: bool,

    /// JSON settings file; command-line flags override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip printing the matrix to stdout.
    #[arg(short, long)]
    quiet: bool,
}

fn default_ranks() -> usize {
    if let Ok(value) = std::env::var("LAPLACE_NPROCS") {
        if let Ok(p) = value.parse::<usize>() {
            if p > 0 {
                return p;
            }
        }
    }
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

fn build_settings(args: &Args) -> LaplaceResult<SolverSettings> {
    let mut settings = match &args.config {
        Some(path) => SolverSettings::from_file(path)?,
        None => {
            let n = args.n.ok_or_else(|| {
                LaplaceError::Argument("grid dimension N is required without --config".into())
            })?;
            SolverSettings::new(n, args.ranks.unwrap_or_else(default_ranks), Scheme::Strip)
        }
    };

    if let Some(n) = args.n {
        settings.n = n;
    }
    if let Some(ranks) = args.ranks {
        settings.nranks = ranks;
    }
    if let Some(scheme) = &args.scheme {
        settings.scheme = Scheme::from_str(scheme)?;
    }
    if let Some(precision) = args.precision {
        settings.precision = precision;
    }
    if let Some(output) = &args.output {
        settings.results_path = output.clone();
    }
    if args.dump_subgrids {
        settings.dump_subgrids = true;
    }
    Ok(settings)
}

fn run() -> LaplaceResult<()> {
    let args = Args::parse();
    let settings = build_settings(&args)?;

    info!(
        "N={} P={} scheme={} precision={:e}",
        settings.n, settings.nranks, settings.scheme, settings.precision
    );

    let report = solve(&settings)?;
    info!(
        "converged after {} iterations, global error {:e}",
        report.iterations, report.global_error
    );

    if !args.quiet {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_matrix(&mut handle, &report.matrix)?;
        handle.flush()?;
    }

    save_matrix(&settings.results_path, &report.matrix)?;
    info!("matrix saved to {}", settings.results_path.display());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
