// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Result Assembly
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gather every rank's interior cells on rank 0 and reorder them into
//! the canonical N×N matrix (row 0 = top physical row).

use ndarray::Array2;

use laplace_types::error::{LaplaceError, LaplaceResult};
use laplace_types::scheme::Scheme;

use crate::comm::{Communicator, Message};
use crate::layout::Topology;
use crate::subgrid::Subgrid;

/// Strip chunks arrive already globally row-ordered by rank: a direct
/// concatenation into consecutive row bands.
pub fn assemble_strip(chunks: &[Vec<f32>], n: usize, nranks: usize) -> Array2<f32> {
    let rows = n / nranks;
    let mut matrix = Array2::zeros((n, n));
    for (rank, chunk) in chunks.iter().enumerate() {
        debug_assert_eq!(chunk.len(), rows * n);
        for r in 0..rows {
            for c in 0..n {
                matrix[[rank * rows + r, c]] = chunk[r * n + c];
            }
        }
    }
    matrix
}

/// Block chunks need two reorder stages: first group by block-column
/// index (rank mod S) to recover the block row-major layout, then
/// scatter each chunk into its N/S × N/S footprint.
pub fn assemble_block(chunks: &[Vec<f32>], n: usize, side: usize) -> Array2<f32> {
    let band = n / side;

    // Stage 1: group chunks by block-column index. Within a group the
    // rank order is the block-row order.
    let mut ordered: Vec<&Vec<f32>> = Vec::with_capacity(chunks.len());
    for block_col in 0..side {
        for (rank, chunk) in chunks.iter().enumerate() {
            if rank % side == block_col {
                ordered.push(chunk);
            }
        }
    }

    // Stage 2: scatter each chunk into the absolute region of the
    // final matrix assigned to its block.
    let mut matrix = Array2::zeros((n, n));
    for (slot, chunk) in ordered.iter().enumerate() {
        debug_assert_eq!(chunk.len(), band * band);
        let block_col = slot / side;
        let block_row = slot % side;
        for r in 0..band {
            for c in 0..band {
                matrix[[block_row * band + r, block_col * band + c]] = chunk[r * band + c];
            }
        }
    }
    matrix
}

/// Every rank transmits its trimmed interior to rank 0; rank 0 returns
/// the assembled matrix, everyone else `None`.
pub fn gather_and_assemble(
    comm: &Communicator,
    topo: &Topology,
    sub: &Subgrid,
) -> LaplaceResult<Option<Array2<f32>>> {
    comm.send(
        0,
        Message::Interior {
            rank: comm.rank(),
            data: sub.interior_to_vec(),
        },
    )?;
    if comm.rank() != 0 {
        return Ok(None);
    }

    let mut chunks = Vec::with_capacity(comm.size());
    for from in 0..comm.size() {
        let layout = topo.layout(from);
        let chunk = comm.recv_interior(from)?;
        if chunk.len() != layout.rows * layout.cols {
            return Err(LaplaceError::Comm(format!(
                "rank 0: interior chunk from rank {from} has {} cells, expected {}",
                chunk.len(),
                layout.rows * layout.cols
            )));
        }
        chunks.push(chunk);
    }

    let matrix = match topo.scheme {
        Scheme::Strip => assemble_strip(&chunks, topo.n, topo.nranks),
        Scheme::Block => assemble_block(&chunks, topo.n, topo.side),
    };
    Ok(Some(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rank-valued chunks: each rank's interior filled with its index.
    fn rank_chunks(count: usize, cells: usize) -> Vec<Vec<f32>> {
        (0..count).map(|r| vec![r as f32; cells]).collect()
    }

    #[test]
    fn strip_concatenates_rank_bands() {
        // N=4, P=4: the assembled interior is the four rank rows in
        // order.
        let matrix = assemble_strip(&rank_chunks(4, 4), 4, 4);
        for rank in 0..4 {
            for c in 0..4 {
                assert_eq!(matrix[[rank, c]], rank as f32);
            }
        }
    }

    #[test]
    fn block_scatter_places_quadrants() {
        // N=4, S=2: rank r owns the 2×2 block at (r div 2, r mod 2).
        let matrix = assemble_block(&rank_chunks(4, 4), 4, 2);
        assert_eq!(matrix[[0, 0]], 0.0);
        assert_eq!(matrix[[0, 3]], 1.0);
        assert_eq!(matrix[[3, 0]], 2.0);
        assert_eq!(matrix[[3, 3]], 3.0);
        assert_eq!(matrix[[1, 1]], 0.0);
        assert_eq!(matrix[[2, 2]], 3.0);
    }

    #[test]
    fn block_preserves_cell_order_within_a_block() {
        // One 3×3 block per rank with distinct values, S=2.
        let chunks: Vec<Vec<f32>> = (0..4)
            .map(|r| (0..9).map(|i| (r * 100 + i) as f32).collect())
            .collect();
        let matrix = assemble_block(&chunks, 6, 2);
        // Rank 3 (block row 1, col 1), local cell (1, 2) = value 305.
        assert_eq!(matrix[[4, 5]], 305.0);
        // Rank 2 (block row 1, col 0), local cell (0, 0) = value 200.
        assert_eq!(matrix[[3, 0]], 200.0);
        // Rank 1 (block row 0, col 1), local cell (2, 1) = value 107.
        assert_eq!(matrix[[2, 4]], 107.0);
    }
}
