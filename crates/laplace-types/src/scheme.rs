// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Decomposition Scheme
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LaplaceError;

/// How the global N×N grid is split across ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// 1D decomposition into P horizontal row bands; requires P to
    /// divide N.
    #[default]
    Strip,
    /// 2D decomposition into a √P×√P grid of square blocks; requires
    /// P to be a perfect square S² with S dividing N.
    Block,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Strip => write!(f, "strip"),
            Scheme::Block => write!(f, "block"),
        }
    }
}

impl FromStr for Scheme {
    type Err = LaplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strip" => Ok(Scheme::Strip),
            "block" => Ok(Scheme::Block),
            other => Err(LaplaceError::Argument(format!(
                "unknown decomposition scheme '{other}' (expected 'strip' or 'block')"
            ))),
        }
    }
}
