// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Matrix Output
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Text rendering of assembled matrices and per-rank subgrid dumps.
//! Consumers of the core's results; no algorithmic content.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use laplace_types::error::LaplaceResult;

/// Write the matrix one row per line, space-separated, rows emitted in
/// reverse (bottom-to-top) global row order.
pub fn write_matrix<W: Write>(writer: &mut W, matrix: &Array2<f32>) -> io::Result<()> {
    for i in (0..matrix.nrows()).rev() {
        for v in matrix.row(i) {
            write!(writer, "{v:.6} ")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Save the matrix to the results file in the same reversed-row
/// format.
pub fn save_matrix(path: &Path, matrix: &Array2<f32>) -> LaplaceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix(&mut writer, matrix)?;
    writer.flush()?;
    Ok(())
}

/// Render one rank's padded subgrid, top row first, two decimals per
/// cell (the debug dump format).
pub fn format_subgrid(rank: usize, cells: &Array2<f32>) -> String {
    let mut out = format!("subgrid of rank {rank}:\n");
    for row in cells.rows() {
        for v in row {
            out.push_str(&format!(" {v:.2}"));
        }
        out.push('\n');
    }
    out
}
