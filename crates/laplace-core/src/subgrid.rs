// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Local Subgrid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One rank's owned slice of the global field.
//!
//! The cell array carries a one-cell margin on all four sides. Margin
//! cells facing a neighbor are halo mirrors refreshed every exchange;
//! margin cells at a global edge hold the Dirichlet value −1 for the
//! whole run. Grid elements are `f32`; error accounting elsewhere is
//! always `f64`.

use ndarray::{s, Array2, ArrayView2};

use crate::layout::LocalLayout;

/// Fixed Dirichlet boundary value at every global edge.
pub const BOUNDARY_VALUE: f32 = -1.0;

#[derive(Debug, Clone)]
pub struct Subgrid {
    pub layout: LocalLayout,
    /// Padded cell array, shape (rows + 2) × (cols + 2).
    pub cells: Array2<f32>,
}

impl Subgrid {
    /// Allocate and fill: margin at −1, interior at `fill`.
    pub fn with_fill(layout: &LocalLayout, fill: f32) -> Self {
        let mut cells =
            Array2::from_elem((layout.padded_rows(), layout.padded_cols()), BOUNDARY_VALUE);
        cells.slice_mut(s![1..-1, 1..-1]).fill(fill);
        Subgrid {
            layout: layout.clone(),
            cells,
        }
    }

    /// The canonical deterministic fill: interior cells start at the
    /// owning rank's index.
    pub fn new(layout: &LocalLayout) -> Self {
        Self::with_fill(layout, layout.rank as f32)
    }

    /// Owned cells without the margin.
    pub fn interior(&self) -> ArrayView2<'_, f32> {
        self.cells.slice(s![1..-1, 1..-1])
    }

    /// Owned cells flattened row-major, as sent to the assembler.
    pub fn interior_to_vec(&self) -> Vec<f32> {
        self.interior().iter().copied().collect()
    }
}
