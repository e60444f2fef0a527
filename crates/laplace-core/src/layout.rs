// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Grid Partitioning
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Deterministic partition metadata for the rank topology.
//!
//! Every rank derives the identical `Topology` from the globally-known
//! (N, P, scheme) triple, so constraint violations are detected
//! redundantly by all ranks with no coordination.

use laplace_types::error::{LaplaceError, LaplaceResult};
use laplace_types::scheme::Scheme;

/// Validated rank topology for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// Global square grid dimension.
    pub n: usize,
    /// Total rank count.
    pub nranks: usize,
    pub scheme: Scheme,
    /// Block-grid side S = √P (1 for the strip scheme).
    pub side: usize,
}

/// One rank's owned region and neighbor identities. Any neighbor at a
/// domain edge is `None`; the fixed Dirichlet value −1 stands in there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLayout {
    pub rank: usize,
    /// Owned (interior) extents, excluding the one-cell margin.
    pub rows: usize,
    pub cols: usize,
    /// Global offset of the first owned row/column.
    pub row_start: usize,
    pub col_start: usize,
    pub up: Option<usize>,
    pub down: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl LocalLayout {
    /// Rows of the allocated subgrid including the margin.
    pub fn padded_rows(&self) -> usize {
        self.rows + 2
    }

    /// Columns of the allocated subgrid including the margin.
    pub fn padded_cols(&self) -> usize {
        self.cols + 2
    }
}

impl Topology {
    /// Validate (N, P, scheme) and build the topology.
    ///
    /// Fails with a `Config` error naming the violated divisibility or
    /// perfect-square constraint; the inputs are global, so every rank
    /// reaches the same verdict independently.
    pub fn new(n: usize, nranks: usize, scheme: Scheme) -> LaplaceResult<Self> {
        if n == 0 {
            return Err(LaplaceError::Config(
                "grid dimension N must be >= 1".to_string(),
            ));
        }
        if nranks == 0 {
            return Err(LaplaceError::Config(
                "rank count P must be >= 1".to_string(),
            ));
        }
        let side = match scheme {
            Scheme::Strip => {
                if n % nranks != 0 {
                    return Err(LaplaceError::Config(format!(
                        "STRIP requires the rank count to divide N: {n} mod {nranks} != 0"
                    )));
                }
                1
            }
            Scheme::Block => {
                let side = (nranks as f64).sqrt().round() as usize;
                if side * side != nranks {
                    return Err(LaplaceError::Config(format!(
                        "BLOCK requires a perfect-square rank count, got {nranks}"
                    )));
                }
                if n % side != 0 {
                    return Err(LaplaceError::Config(format!(
                        "BLOCK requires the block-grid side to divide N: {n} mod {side} != 0"
                    )));
                }
                side
            }
        };
        Ok(Topology {
            n,
            nranks,
            scheme,
            side,
        })
    }

    /// Owned region and neighbor identities for `rank`.
    pub fn layout(&self, rank: usize) -> LocalLayout {
        debug_assert!(rank < self.nranks, "rank {rank} out of range");
        match self.scheme {
            Scheme::Strip => {
                let rows = self.n / self.nranks;
                LocalLayout {
                    rank,
                    rows,
                    cols: self.n,
                    row_start: rank * rows,
                    col_start: 0,
                    up: (rank > 0).then(|| rank - 1),
                    down: (rank + 1 < self.nranks).then(|| rank + 1),
                    left: None,
                    right: None,
                }
            }
            Scheme::Block => {
                let s = self.side;
                let band = self.n / s;
                let block_row = rank / s;
                let block_col = rank % s;
                LocalLayout {
                    rank,
                    rows: band,
                    cols: band,
                    row_start: block_row * band,
                    col_start: block_col * band,
                    up: (block_row > 0).then(|| rank - s),
                    down: (block_row + 1 < s).then(|| rank + s),
                    left: (block_col > 0).then(|| rank - 1),
                    right: (block_col + 1 < s).then(|| rank + 1),
                }
            }
        }
    }

    /// Layouts for all ranks, in rank order.
    pub fn layouts(&self) -> Vec<LocalLayout> {
        (0..self.nranks).map(|r| self.layout(r)).collect()
    }
}
