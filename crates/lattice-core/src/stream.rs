// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Streaming
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Advection of the distribution field, one lattice step per direction.

use lattice_types::velocity_set::{C, Q};
use ndarray::Array4;

use crate::grid::Grid3D;

/// Double-buffered streaming: `dst(i,j,k,a) = src(i-cx, j-cy, k-cz, a)`
/// over interior voxels. Ghost layers are consumed, never written; the
/// caller swaps the buffers afterwards.
pub fn stream(src: &Array4<f64>, dst: &mut Array4<f64>, grid: &Grid3D) {
    let (kz, jy, ix) = grid.interior_ranges();
    for k in kz {
        for j in jy.clone() {
            for i in ix.clone() {
                for a in 0..Q {
                    let [cx, cy, cz] = C[a];
                    let si = (i as i64 - cx) as usize;
                    let sj = (j as i64 - cy) as usize;
                    let sk = (k as i64 - cz) as usize;
                    dst[[k, j, i, a]] = src[[sk, sj, si, a]];
                }
            }
        }
    }
}
