// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Cartesian Process Topology
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cartesian process grid and face-neighbor resolution.
//!
//! Built once per rank and passed by reference to every component that
//! needs neighbor ids. A missing neighbor (off a non-periodic edge) is
//! `None`.

use lattice_types::error::{LatticeError, LatticeResult};

/// The six subdomain faces. West/East are -x/+x, South/North -y/+y,
/// Bottom/Top -z/+z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    West,
    East,
    South,
    North,
    Bottom,
    Top,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::West,
        Face::East,
        Face::South,
        Face::North,
        Face::Bottom,
        Face::Top,
    ];

    /// Spatial axis the face is normal to: 0 = x, 1 = y, 2 = z.
    pub fn axis(self) -> usize {
        match self {
            Face::West | Face::East => 0,
            Face::South | Face::North => 1,
            Face::Bottom | Face::Top => 2,
        }
    }

    /// True on the +axis side (East, North, Top).
    pub fn is_high(self) -> bool {
        matches!(self, Face::East | Face::North | Face::Top)
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::West => Face::East,
            Face::East => Face::West,
            Face::South => Face::North,
            Face::North => Face::South,
            Face::Bottom => Face::Top,
            Face::Top => Face::Bottom,
        }
    }

    fn index(self) -> usize {
        match self {
            Face::West => 0,
            Face::East => 1,
            Face::South => 2,
            Face::North => 3,
            Face::Bottom => 4,
            Face::Top => 5,
        }
    }
}

/// Cartesian process topology for one rank.
///
/// Rank convention: `rank = (pz * Py + py) * Px + px`, x fastest, matching
/// the memory order of the voxel fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    rank: usize,
    dims: [usize; 3],
    periodic: [bool; 3],
    coords: [usize; 3],
    neighbors: [Option<usize>; 6],
}

impl Topology {
    pub fn new(
        rank: usize,
        nranks: usize,
        dims: [usize; 3],
        periodic: [bool; 3],
    ) -> LatticeResult<Self> {
        let cells = dims[0] * dims[1] * dims[2];
        if cells != nranks {
            return Err(LatticeError::Config(format!(
                "process grid {}x{}x{} does not match {nranks} ranks",
                dims[0], dims[1], dims[2]
            )));
        }
        if rank >= nranks {
            return Err(LatticeError::Config(format!(
                "rank {rank} out of range for {nranks} ranks"
            )));
        }
        let coords = Self::coords_of(rank, dims);
        let mut neighbors = [None; 6];
        for face in Face::ALL {
            neighbors[face.index()] = Self::shifted(coords, dims, periodic, face);
        }
        Ok(Topology {
            rank,
            dims,
            periodic,
            coords,
            neighbors,
        })
    }

    fn coords_of(rank: usize, dims: [usize; 3]) -> [usize; 3] {
        [
            rank % dims[0],
            (rank / dims[0]) % dims[1],
            rank / (dims[0] * dims[1]),
        ]
    }

    fn rank_at(coords: [usize; 3], dims: [usize; 3]) -> usize {
        (coords[2] * dims[1] + coords[1]) * dims[0] + coords[0]
    }

    fn shifted(
        coords: [usize; 3],
        dims: [usize; 3],
        periodic: [bool; 3],
        face: Face,
    ) -> Option<usize> {
        let axis = face.axis();
        let mut shifted = coords;
        if face.is_high() {
            if coords[axis] + 1 < dims[axis] {
                shifted[axis] = coords[axis] + 1;
            } else if periodic[axis] {
                shifted[axis] = 0;
            } else {
                return None;
            }
        } else if coords[axis] > 0 {
            shifted[axis] = coords[axis] - 1;
        } else if periodic[axis] {
            shifted[axis] = dims[axis] - 1;
        } else {
            return None;
        }
        Some(Self::rank_at(shifted, dims))
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    pub fn coords(&self) -> [usize; 3] {
        self.coords
    }

    /// Coordinates of an arbitrary rank under the same convention.
    pub fn coords_of_rank(&self, rank: usize) -> [usize; 3] {
        Self::coords_of(rank, self.dims)
    }

    pub fn neighbor(&self, face: Face) -> Option<usize> {
        self.neighbors[face.index()]
    }

    /// Faces that lie on the global domain boundary (no neighbor); the
    /// boundary hook populates their ghost slabs.
    pub fn boundary_faces(&self) -> Vec<Face> {
        Face::ALL
            .into_iter()
            .filter(|&f| self.neighbor(f).is_none())
            .collect()
    }
}
