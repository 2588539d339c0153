// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Padded Subdomain Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Index arithmetic for the padded voxel grid.
//!
//! Fields are ndarray views of shape `[MZP, MYP, MXP]` (distribution:
//! `[MZP, MYP, MXP, Q]`), so linearization is defined in exactly one
//! place: the C-order layout plus the helpers below.

use lattice_types::error::{LatticeError, LatticeResult};
use lattice_types::velocity_set::Q;
use ndarray::{s, Array3, ArrayView3, Axis};

use crate::topology::Face;

/// Geometry of one rank's padded subdomain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid3D {
    mx: usize,
    my: usize,
    mz: usize,
    ghost: usize,
}

impl Grid3D {
    /// `interior` is `[MX, MY, MZ]`, `ghost` the layer thickness `n >= 1`.
    pub fn new(interior: [usize; 3], ghost: usize) -> LatticeResult<Self> {
        if ghost == 0 {
            return Err(LatticeError::Config(
                "ghost layer thickness must be >= 1".to_string(),
            ));
        }
        for (axis, &m) in interior.iter().enumerate() {
            if m == 0 {
                return Err(LatticeError::Config(format!(
                    "interior extent along axis {axis} must be positive"
                )));
            }
            if m < ghost {
                return Err(LatticeError::Config(format!(
                    "interior extent {m} along axis {axis} is thinner than ghost={ghost}"
                )));
            }
        }
        Ok(Grid3D {
            mx: interior[0],
            my: interior[1],
            mz: interior[2],
            ghost,
        })
    }

    pub fn interior(&self) -> [usize; 3] {
        [self.mx, self.my, self.mz]
    }

    pub fn ghost(&self) -> usize {
        self.ghost
    }

    pub fn mxp(&self) -> usize {
        self.mx + 2 * self.ghost
    }

    pub fn myp(&self) -> usize {
        self.my + 2 * self.ghost
    }

    pub fn mzp(&self) -> usize {
        self.mz + 2 * self.ghost
    }

    /// Padded ndarray shape `[MZP, MYP, MXP]`.
    pub fn padded(&self) -> [usize; 3] {
        [self.mzp(), self.myp(), self.mxp()]
    }

    pub fn padded_voxels(&self) -> usize {
        self.mxp() * self.myp() * self.mzp()
    }

    /// Canonical 3D linearization `i + j*MXP + k*MXP*MYP`.
    pub fn idx3(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.mxp() + k * self.mxp() * self.myp()
    }

    /// Canonical 4D linearization `a + Q*(i + j*MXP + k*MXP*MYP)`.
    pub fn idx4(&self, i: usize, j: usize, k: usize, a: usize) -> usize {
        a + Q * self.idx3(i, j, k)
    }

    pub fn is_interior(&self, i: usize, j: usize, k: usize) -> bool {
        let n = self.ghost;
        (n..n + self.mx).contains(&i)
            && (n..n + self.my).contains(&j)
            && (n..n + self.mz).contains(&k)
    }

    /// Interior index ranges in ndarray order `(k, j, i)`.
    pub fn interior_ranges(
        &self,
    ) -> (
        std::ops::Range<usize>,
        std::ops::Range<usize>,
        std::ops::Range<usize>,
    ) {
        let n = self.ghost;
        (n..n + self.mz, n..n + self.my, n..n + self.mx)
    }

    /// Interior view of a padded scalar field, shape `[MZ, MY, MX]`.
    pub fn interior_view<'a>(&self, field: &'a Array3<f64>) -> ArrayView3<'a, f64> {
        let (kz, jy, ix) = self.interior_ranges();
        field.slice(s![kz, jy, ix])
    }

    /// Interior extent along the axis a face is normal to.
    pub fn extent_along(&self, face: Face) -> usize {
        match face.axis() {
            0 => self.mx,
            1 => self.my,
            _ => self.mz,
        }
    }

    /// The ndarray axis a face's slab planes are indexed on: x is the
    /// innermost array axis, z the outermost.
    pub fn face_axis(&self, face: Face) -> Axis {
        Axis(2 - face.axis())
    }

    /// Elements in one face slab plane.
    pub fn plane_len(&self, face: Face) -> usize {
        match face.axis() {
            0 => self.myp() * self.mzp(),
            1 => self.mxp() * self.mzp(),
            _ => self.mxp() * self.myp(),
        }
    }

    /// Largest face slab plane; sizes the exchange scratch buffers.
    pub fn max_plane_len(&self) -> usize {
        Face::ALL
            .into_iter()
            .map(|f| self.plane_len(f))
            .max()
            .unwrap_or(0)
    }

    /// Plane coordinate of the layer-`l` interior slab on a face:
    /// `n + M - 1 - l` on a high face, `n + l` on a low face.
    pub fn interior_plane(&self, face: Face, layer: usize) -> usize {
        let n = self.ghost;
        let m = self.extent_along(face);
        if face.is_high() {
            n + m - 1 - layer
        } else {
            n + layer
        }
    }

    /// Plane coordinate of the layer-`l` ghost slab on a face:
    /// `n + M + l` on a high face, `n - 1 - l` on a low face.
    pub fn ghost_plane(&self, face: Face, layer: usize) -> usize {
        let n = self.ghost;
        let m = self.extent_along(face);
        if face.is_high() {
            n + m + layer
        } else {
            n - 1 - layer
        }
    }
}
