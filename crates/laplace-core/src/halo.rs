// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Halo Exchange
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Boundary-slice packing and the four-direction exchange.
//!
//! Row slices are the contiguous boundary row minus its corner cells;
//! corners are never populated and never read (diagonal neighbors do
//! not participate). Column slices are strided in row-major storage,
//! so they are packed into a contiguous buffer before send and
//! unpacked on receipt. The exchange only ever mutates this rank's
//! own margin.

use ndarray::{s, ArrayView1};

use laplace_types::error::LaplaceResult;

use crate::comm::{Communicator, HaloTag, Message};
use crate::subgrid::Subgrid;

/// Boundary row `row`, corners excluded.
fn pack_row(sub: &Subgrid, row: usize) -> Vec<f32> {
    sub.cells.slice(s![row, 1..-1]).to_vec()
}

/// Boundary column `col`, corners excluded, strided-to-contiguous.
fn pack_col(sub: &Subgrid, col: usize) -> Vec<f32> {
    sub.cells.slice(s![1..-1, col]).iter().copied().collect()
}

fn unpack_row(sub: &mut Subgrid, row: usize, data: &[f32]) {
    sub.cells
        .slice_mut(s![row, 1..-1])
        .assign(&ArrayView1::from(data));
}

fn unpack_col(sub: &mut Subgrid, col: usize, data: &[f32]) {
    sub.cells
        .slice_mut(s![1..-1, col])
        .assign(&ArrayView1::from(data));
}

/// Refresh the top/bottom halo rows with both vertical neighbors.
///
/// Tag 1 carries first interior rows upward, tag 2 carries last
/// interior rows downward; the opposite-direction pairing means every
/// send has its receive posted at the same logical step.
fn exchange_rows(comm: &Communicator, sub: &mut Subgrid) -> LaplaceResult<()> {
    let rows = sub.layout.padded_rows();
    let cols = sub.layout.cols;

    if let Some(up) = sub.layout.up {
        comm.send(
            up,
            Message::Halo {
                tag: HaloTag::RowUp,
                data: pack_row(sub, 1),
            },
        )?;
    }
    if let Some(down) = sub.layout.down {
        let data = comm.recv_halo(down, HaloTag::RowUp, cols)?;
        unpack_row(sub, rows - 1, &data);
    }

    if let Some(down) = sub.layout.down {
        comm.send(
            down,
            Message::Halo {
                tag: HaloTag::RowDown,
                data: pack_row(sub, rows - 2),
            },
        )?;
    }
    if let Some(up) = sub.layout.up {
        let data = comm.recv_halo(up, HaloTag::RowDown, cols)?;
        unpack_row(sub, 0, &data);
    }
    Ok(())
}

/// Refresh the left/right halo columns with both horizontal neighbors
/// (tags 3 and 4). No-op under the strip scheme, where the left/right
/// margins keep the fixed boundary value.
fn exchange_cols(comm: &Communicator, sub: &mut Subgrid) -> LaplaceResult<()> {
    let cols = sub.layout.padded_cols();
    let rows = sub.layout.rows;

    if let Some(right) = sub.layout.right {
        comm.send(
            right,
            Message::Halo {
                tag: HaloTag::ColRight,
                data: pack_col(sub, cols - 2),
            },
        )?;
    }
    if let Some(left) = sub.layout.left {
        let data = comm.recv_halo(left, HaloTag::ColRight, rows)?;
        unpack_col(sub, 0, &data);
    }

    if let Some(left) = sub.layout.left {
        comm.send(
            left,
            Message::Halo {
                tag: HaloTag::ColLeft,
                data: pack_col(sub, 1),
            },
        )?;
    }
    if let Some(right) = sub.layout.right {
        let data = comm.recv_halo(right, HaloTag::ColLeft, rows)?;
        unpack_col(sub, cols - 1, &data);
    }
    Ok(())
}

/// One full halo refresh: vertical pair, then horizontal pair. After
/// this returns, every margin cell facing a neighbor equals that
/// neighbor's current interior boundary.
pub fn exchange_halo(comm: &Communicator, sub: &mut Subgrid) -> LaplaceResult<()> {
    exchange_rows(comm, sub)?;
    exchange_cols(comm, sub)
}
