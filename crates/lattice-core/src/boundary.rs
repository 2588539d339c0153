// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Boundary Hook
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pluggable boundary treatment for domain-boundary faces.
//!
//! The halo exchange skips faces with no neighbor; the hook is then
//! responsible for the ghost slabs on exactly those faces. Wall, inflow
//! and outflow catalogues live outside the core; the default hook does
//! nothing, which is correct for fully periodic domains.

use lattice_types::error::LatticeResult;
use lattice_types::state::MacroFields;
use ndarray::Array4;

use crate::grid::Grid3D;
use crate::topology::Face;

pub trait BoundaryHook {
    /// Populate distribution ghost slabs on the given domain-boundary
    /// faces. Called once per step, after the distribution exchange.
    fn apply_distribution(
        &self,
        f: &mut Array4<f64>,
        grid: &Grid3D,
        boundary_faces: &[Face],
    ) -> LatticeResult<()>;

    /// Populate macroscopic ghost slabs on the given domain-boundary
    /// faces. Called once per step, after the macroscopic exchange.
    fn apply_macroscopic(
        &self,
        macros: &mut MacroFields,
        grid: &Grid3D,
        boundary_faces: &[Face],
    ) -> LatticeResult<()>;
}

/// Default hook: leaves ghost slabs alone. Fully periodic domains have
/// no boundary faces, so there is nothing to do.
#[derive(Debug, Default)]
pub struct NoOpBoundary;

impl BoundaryHook for NoOpBoundary {
    fn apply_distribution(
        &self,
        _f: &mut Array4<f64>,
        _grid: &Grid3D,
        _boundary_faces: &[Face],
    ) -> LatticeResult<()> {
        Ok(())
    }

    fn apply_macroscopic(
        &self,
        _macros: &mut MacroFields,
        _grid: &Grid3D,
        _boundary_faces: &[Face],
    ) -> LatticeResult<()> {
        Ok(())
    }
}
