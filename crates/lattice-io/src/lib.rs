// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Lattice IO
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Snapshot output for the lattice solver: collective gather of the
//! interior hyperslabs, one binary container per snapshot, and the
//! XDMF-family descriptors a visualizer opens directly.

pub mod descriptor;
pub mod snapshot;
