// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel Jacobi relaxation of Laplace's equation by domain
//! decomposition.
//!
//! The global N×N grid is split across P SPMD ranks (row strips or a
//! √P×√P block grid). Each iteration every rank sweeps its own
//! subgrid, refreshes its halo margin from its neighbors, and joins a
//! global all-reduce that decides convergence identically everywhere.
//! After convergence rank 0 reassembles the distributed field into one
//! globally-ordered matrix.

pub mod assemble;
pub mod comm;
pub mod halo;
pub mod layout;
pub mod output;
pub mod relax;
pub mod solver;
pub mod subgrid;

pub use crate::layout::{LocalLayout, Topology};
pub use crate::solver::{solve, SolveReport};
