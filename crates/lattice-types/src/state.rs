// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array3, Array4};

use crate::velocity_set::Q;

/// Macroscopic fields on the padded subdomain, indexed `[k, j, i]`
/// (shape `[MZP, MYP, MXP]`). The C-order layout realizes the canonical
/// linearization `i + j*MXP + k*MXP*MYP`.
#[derive(Debug, Clone)]
pub struct MacroFields {
    pub rho: Array3<f64>,
    pub u: Array3<f64>,
    pub v: Array3<f64>,
    pub w: Array3<f64>,
}

impl MacroFields {
    /// Allocate zeroed fields for a padded shape `[MZP, MYP, MXP]`.
    pub fn new(padded: [usize; 3]) -> Self {
        MacroFields {
            rho: Array3::zeros(padded),
            u: Array3::zeros(padded),
            v: Array3::zeros(padded),
            w: Array3::zeros(padded),
        }
    }

    pub fn padded_shape(&self) -> [usize; 3] {
        let s = self.rho.shape();
        [s[0], s[1], s[2]]
    }
}

/// Allocate a zeroed distribution field of shape `[MZP, MYP, MXP, Q]`,
/// indexed `[k, j, i, a]` with the direction index innermost.
pub fn alloc_distribution(padded: [usize; 3]) -> Array4<f64> {
    Array4::zeros((padded[0], padded[1], padded[2], Q))
}
