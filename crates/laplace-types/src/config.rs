// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LaplaceResult;
use crate::scheme::Scheme;

/// Solver run description: the globally-known inputs every rank
/// validates identically, plus the output knobs consumed by the I/O
/// collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Global square grid dimension N.
    pub n: usize,
    /// Number of cooperating ranks P.
    pub nranks: usize,
    #[serde(default)]
    pub scheme: Scheme,
    /// Convergence threshold on the global L2 update norm.
    #[serde(default = "default_precision")]
    pub precision: f64,
    /// Print each rank's padded subgrid in barrier order after the run.
    #[serde(default)]
    pub dump_subgrids: bool,
    /// Where the assembled matrix is saved.
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
}

fn default_precision() -> f64 {
    1.0e-2
}

fn default_results_path() -> PathBuf {
    PathBuf::from("result_laplace.txt")
}

impl SolverSettings {
    pub fn new(n: usize, nranks: usize, scheme: Scheme) -> Self {
        SolverSettings {
            n,
            nranks,
            scheme,
            precision: default_precision(),
            dump_subgrids: false,
            results_path: default_results_path(),
        }
    }

    /// Load from a JSON file.
    pub fn from_file(path: &Path) -> LaplaceResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}
