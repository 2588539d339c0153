// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Collision & Macroscopic Reduction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! BGK collision and the macroscopic-variable reduction.

use lattice_types::state::MacroFields;
use lattice_types::velocity_set::{C, Q, W};
use ndarray::Array4;

use crate::grid::Grid3D;

/// Reduce distributions to `(rho, u, v, w)` over interior voxels.
///
/// The direction summation order is fixed, so any decomposition of the
/// same global lattice produces bitwise identical macros. `rho` keeps
/// the raw sum; the floor only guards the velocity division.
pub fn reduce_macros(f: &Array4<f64>, macros: &mut MacroFields, grid: &Grid3D, rho_floor: f64) {
    let (kz, jy, ix) = grid.interior_ranges();
    for k in kz {
        for j in jy.clone() {
            for i in ix.clone() {
                let mut rho = 0.0;
                let mut mx = 0.0;
                let mut my = 0.0;
                let mut mz = 0.0;
                for a in 0..Q {
                    let fa = f[[k, j, i, a]];
                    rho += fa;
                    mx += C[a][0] as f64 * fa;
                    my += C[a][1] as f64 * fa;
                    mz += C[a][2] as f64 * fa;
                }
                let denom = rho.max(rho_floor);
                macros.rho[[k, j, i]] = rho;
                macros.u[[k, j, i]] = mx / denom;
                macros.v[[k, j, i]] = my / denom;
                macros.w[[k, j, i]] = mz / denom;
            }
        }
    }
}

/// Maxwell-Boltzmann expansion to second order in velocity:
/// `w_a rho (1 + 3 c.u + 4.5 (c.u)^2 - 1.5 |u|^2)`.
pub fn equilibrium(rho: f64, u: f64, v: f64, w: f64) -> [f64; Q] {
    let usq = u * u + v * v + w * w;
    let mut feq = [0.0; Q];
    for a in 0..Q {
        let cu = C[a][0] as f64 * u + C[a][1] as f64 * v + C[a][2] as f64 * w;
        feq[a] = W[a] * rho * (1.0 + 3.0 * cu + 4.5 * cu * cu - 1.5 * usq);
    }
    feq
}

/// In-place BGK relaxation toward equilibrium over interior voxels,
/// reading the authoritative macros produced by `reduce_macros`.
pub fn collide_bgk(f: &mut Array4<f64>, macros: &MacroFields, grid: &Grid3D, tau: f64) {
    let omega = 1.0 / tau;
    let (kz, jy, ix) = grid.interior_ranges();
    for k in kz {
        for j in jy.clone() {
            for i in ix.clone() {
                let feq = equilibrium(
                    macros.rho[[k, j, i]],
                    macros.u[[k, j, i]],
                    macros.v[[k, j, i]],
                    macros.w[[k, j, i]],
                );
                for a in 0..Q {
                    let fa = f[[k, j, i, a]];
                    let post = fa - omega * (fa - feq[a]);
                    debug_assert!(
                        post >= -1e-12,
                        "negative distribution {post} at ({i},{j},{k}) direction {a}"
                    );
                    f[[k, j, i, a]] = post;
                }
            }
        }
    }
}
