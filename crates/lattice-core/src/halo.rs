// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Halo Exchange
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ghost-layer exchange between neighboring ranks.
//!
//! The six phases run in a fixed order: +Z, -Z, +X, -X, +Y, -Y, with
//! each full layer swept before the next. Because every slab spans the
//! padded extents of its plane, values updated by an earlier phase ride
//! along in later phases; edge and corner ghosts are therefore filled
//! transitively through two or three face hops, and one pass per layer
//! suffices.

use lattice_types::error::{LatticeError, LatticeResult};
use lattice_types::state::MacroFields;
use lattice_types::velocity_set::Q;
use ndarray::{Array4, ArrayViewMut3, Axis};

use crate::grid::Grid3D;
use crate::topology::{Face, Topology};
use crate::transport::Transport;

/// One exchange phase: send the interior slab of `send` to that face's
/// neighbor, receive into the ghost slab of `recv` (the opposite face).
#[derive(Debug, Clone, Copy)]
pub struct Phase {
    pub send: Face,
    pub recv: Face,
    pub tag: u16,
}

/// Fixed phase schedule; the tags keep concurrent +/- exchanges between
/// the same neighbor pair apart.
pub const PHASES: [Phase; 6] = [
    Phase { send: Face::Top, recv: Face::Bottom, tag: 111 },
    Phase { send: Face::Bottom, recv: Face::Top, tag: 222 },
    Phase { send: Face::East, recv: Face::West, tag: 333 },
    Phase { send: Face::West, recv: Face::East, tag: 444 },
    Phase { send: Face::North, recv: Face::South, tag: 555 },
    Phase { send: Face::South, recv: Face::North, tag: 666 },
];

/// Ghost-layer exchanger for one rank.
///
/// Owns the scratch buffers for slab packing, sized once at construction
/// to the largest face plane and reused for every exchange.
pub struct HaloExchanger {
    grid: Grid3D,
    send_buf: Vec<f64>,
    recv_buf: Vec<f64>,
}

impl HaloExchanger {
    pub fn new(grid: Grid3D) -> Self {
        let len = grid.max_plane_len();
        HaloExchanger {
            grid,
            send_buf: vec![0.0; len],
            recv_buf: vec![0.0; len],
        }
    }

    pub fn grid(&self) -> &Grid3D {
        &self.grid
    }

    /// Exchange ghost layers of one scalar field.
    ///
    /// At a domain-boundary face both halves of the pair are skipped and
    /// the ghost slab is left for the boundary hook.
    pub fn exchange_scalar<T: Transport>(
        &mut self,
        mut field: ArrayViewMut3<'_, f64>,
        topology: &Topology,
        transport: &T,
    ) -> LatticeResult<()> {
        let shape = field.shape();
        if shape != self.grid.padded().as_slice() {
            return Err(LatticeError::ShapeMismatch(format!(
                "field shape {shape:?} does not match padded grid {:?}",
                self.grid.padded()
            )));
        }
        for layer in 0..self.grid.ghost() {
            for phase in PHASES {
                let dest = topology.neighbor(phase.send);
                let source = topology.neighbor(phase.recv);
                if dest.is_none() && source.is_none() {
                    continue;
                }
                let axis = self.grid.face_axis(phase.send);
                let len = self.grid.plane_len(phase.send);
                if dest.is_some() {
                    let plane = field.index_axis(axis, self.grid.interior_plane(phase.send, layer));
                    for (dst, src) in self.send_buf[..len].iter_mut().zip(plane.iter()) {
                        *dst = *src;
                    }
                }
                transport.send_receive(
                    dest,
                    source,
                    phase.tag,
                    &self.send_buf[..len],
                    &mut self.recv_buf[..len],
                )?;
                if source.is_some() {
                    let mut plane =
                        field.index_axis_mut(axis, self.grid.ghost_plane(phase.recv, layer));
                    for (dst, src) in plane.iter_mut().zip(self.recv_buf[..len].iter()) {
                        *dst = *src;
                    }
                }
            }
        }
        Ok(())
    }

    /// Exchange ghost layers of the distribution field: one scalar
    /// exchange per direction component, in direction order.
    pub fn exchange_distribution<T: Transport>(
        &mut self,
        f: &mut Array4<f64>,
        topology: &Topology,
        transport: &T,
    ) -> LatticeResult<()> {
        for a in 0..Q {
            let component = f.index_axis_mut(Axis(3), a);
            self.exchange_scalar(component, topology, transport)?;
        }
        Ok(())
    }

    /// Exchange ghost layers of all four macroscopic fields.
    pub fn exchange_macros<T: Transport>(
        &mut self,
        macros: &mut MacroFields,
        topology: &Topology,
        transport: &T,
    ) -> LatticeResult<()> {
        self.exchange_scalar(macros.rho.view_mut(), topology, transport)?;
        self.exchange_scalar(macros.u.view_mut(), topology, transport)?;
        self.exchange_scalar(macros.v.view_mut(), topology, transport)?;
        self.exchange_scalar(macros.w.view_mut(), topology, transport)?;
        Ok(())
    }
}
