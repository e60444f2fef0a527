// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Jacobi Relaxation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One Jacobi sweep over a padded subgrid.
//!
//! Five-point stencil: each interior cell becomes the average of its
//! four face neighbors, read exclusively from the pre-sweep buffer
//! (Jacobi, not Gauss-Seidel). The margin supplies neighbor halos and
//! the fixed Dirichlet edges, so the loop body has no edge cases.

use ndarray::{s, Array2};

/// Sweep `cells` into `next` and return the local sum of squared
/// updates, accumulated in f64 regardless of the grid element type.
/// The margin of `next` is left untouched.
pub fn jacobi_sweep(cells: &Array2<f32>, next: &mut Array2<f32>) -> f64 {
    debug_assert_eq!(cells.dim(), next.dim());
    let (rows, cols) = cells.dim();
    let mut error_sum = 0.0f64;

    for i in 1..rows - 1 {
        for j in 1..cols - 1 {
            let bottom = cells[[i + 1, j]];
            let top = cells[[i - 1, j]];
            let left = cells[[i, j - 1]];
            let right = cells[[i, j + 1]];

            let updated = 0.25 * (bottom + top + left + right);
            next[[i, j]] = updated;

            let delta = f64::from(updated) - f64::from(cells[[i, j]]);
            error_sum += delta * delta;
        }
    }
    error_sum
}

/// Adopt the swept interior: copy `next`'s interior back into `cells`.
/// Behaviorally equivalent to a buffer swap, without disturbing the
/// margin.
pub fn commit_sweep(cells: &mut Array2<f32>, next: &Array2<f32>) {
    cells
        .slice_mut(s![1..-1, 1..-1])
        .assign(&next.slice(s![1..-1, 1..-1]));
}
