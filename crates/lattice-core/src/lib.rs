// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Lattice Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Distributed D3Q19 lattice-Boltzmann solver core: Cartesian process
//! topology, padded subdomain grid, ghost-layer exchange, streaming,
//! BGK collision, and the lockstep time loop.

pub mod boundary;
pub mod collide;
pub mod grid;
pub mod halo;
#[cfg(feature = "mpi")]
pub mod mpi_transport;
pub mod solver;
pub mod stream;
pub mod topology;
pub mod transport;
