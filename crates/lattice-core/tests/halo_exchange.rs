// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Multi-Rank Halo Exchange Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ghost-layer coherence across an in-process rank mesh: after one
//! exchange every ghost voxel must hold the interior value of the rank
//! that owns it, edge and corner ghosts included.

use lattice_core::boundary::BoundaryHook;
use lattice_core::grid::Grid3D;
use lattice_core::halo::HaloExchanger;
use lattice_core::topology::{Face, Topology};
use lattice_core::transport::{run_ranks, Transport};
use lattice_types::error::LatticeResult;
use lattice_types::state::{alloc_distribution, MacroFields};
use lattice_types::velocity_set::Q;
use ndarray::Array4;

const SENTINEL: f64 = -7.0;

/// Rank-independent pattern over global voxel coordinates and direction.
fn pattern(global: [usize; 3], n: [usize; 3], a: usize) -> f64 {
    (((global[2] * n[1] + global[1]) * n[0] + global[0]) * Q + a) as f64
}

fn wrap(v: isize, m: usize) -> usize {
    v.rem_euclid(m as isize) as usize
}

fn seed_pattern(
    f: &mut Array4<f64>,
    grid: &Grid3D,
    origin: [usize; 3],
    global: [usize; 3],
) {
    let n = grid.ghost();
    let (kz, jy, ix) = grid.interior_ranges();
    for k in kz {
        for j in jy.clone() {
            for i in ix.clone() {
                for a in 0..Q {
                    let g = [origin[0] + i - n, origin[1] + j - n, origin[2] + k - n];
                    f[[k, j, i, a]] = pattern(g, global, a);
                }
            }
        }
    }
}

/// Run the distribution exchange on every rank of a periodic mesh and
/// verify the full padded field against the wrapped global pattern.
fn check_periodic_pattern(dims: [usize; 3], global: [usize; 3]) {
    let size = dims[0] * dims[1] * dims[2];
    let local = [
        global[0] / dims[0],
        global[1] / dims[1],
        global[2] / dims[2],
    ];
    run_ranks(size, move |transport| {
        let topo = Topology::new(transport.rank(), size, dims, [true, true, true])?;
        let grid = Grid3D::new(local, 1)?;
        let mut ex = HaloExchanger::new(grid);
        let coords = topo.coords();
        let origin = [
            coords[0] * local[0],
            coords[1] * local[1],
            coords[2] * local[2],
        ];

        let mut f = alloc_distribution(grid.padded());
        f.fill(f64::NAN);
        seed_pattern(&mut f, &grid, origin, global);
        ex.exchange_distribution(&mut f, &topo, &transport)?;

        for k in 0..grid.mzp() {
            for j in 0..grid.myp() {
                for i in 0..grid.mxp() {
                    let g = [
                        wrap(origin[0] as isize + i as isize - 1, global[0]),
                        wrap(origin[1] as isize + j as isize - 1, global[1]),
                        wrap(origin[2] as isize + k as isize - 1, global[2]),
                    ];
                    for a in 0..Q {
                        let expected = pattern(g, global, a);
                        assert_eq!(
                            f[[k, j, i, a]],
                            expected,
                            "rank {} voxel ({i},{j},{k}) direction {a}",
                            transport.rank()
                        );
                    }
                }
            }
        }
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_ghosts_match_neighbors_2x2x2() {
    check_periodic_pattern([2, 2, 2], [8, 8, 8]);
}

#[test]
fn test_ghosts_match_neighbors_uneven_axes() {
    check_periodic_pattern([4, 1, 2], [8, 4, 4]);
}

#[test]
fn test_ghosts_match_neighbors_x_ring() {
    check_periodic_pattern([4, 1, 1], [8, 4, 4]);
}

/// Scenario: seed each rank with its rank id; after one exchange every
/// ghost voxel holds the id of the rank owning the wrapped coordinate.
#[test]
fn test_rank_id_pattern_2x2x2() {
    let dims = [2usize, 2, 2];
    let local = [4usize, 4, 4];
    run_ranks(8, move |transport| {
        let topo = Topology::new(transport.rank(), 8, dims, [true, true, true])?;
        let grid = Grid3D::new(local, 1)?;
        let mut ex = HaloExchanger::new(grid);
        let coords = topo.coords();
        let origin = [coords[0] * 4, coords[1] * 4, coords[2] * 4];

        let mut f = alloc_distribution(grid.padded());
        f.fill(-1.0);
        let (kz, jy, ix) = grid.interior_ranges();
        for k in kz {
            for j in jy.clone() {
                for i in ix.clone() {
                    for a in 0..Q {
                        f[[k, j, i, a]] = transport.rank() as f64;
                    }
                }
            }
        }
        ex.exchange_distribution(&mut f, &topo, &transport)?;

        for k in 0..grid.mzp() {
            for j in 0..grid.myp() {
                for i in 0..grid.mxp() {
                    let owner = [
                        wrap(origin[0] as isize + i as isize - 1, 8) / 4,
                        wrap(origin[1] as isize + j as isize - 1, 8) / 4,
                        wrap(origin[2] as isize + k as isize - 1, 8) / 4,
                    ];
                    let expected = ((owner[2] * 2 + owner[1]) * 2 + owner[0]) as f64;
                    for a in 0..Q {
                        assert_eq!(f[[k, j, i, a]], expected, "({i},{j},{k}) dir {a}");
                    }
                }
            }
        }
        Ok(())
    })
    .unwrap();
}

/// Writes a constant into the ghost slabs of its faces; stands in for a
/// real wall condition in the sentinel scenario.
struct SentinelBoundary {
    value: f64,
}

impl BoundaryHook for SentinelBoundary {
    fn apply_distribution(
        &self,
        f: &mut Array4<f64>,
        grid: &Grid3D,
        boundary_faces: &[Face],
    ) -> LatticeResult<()> {
        for &face in boundary_faces {
            for layer in 0..grid.ghost() {
                for a in 0..Q {
                    let mut component = f.index_axis_mut(ndarray::Axis(3), a);
                    let mut plane =
                        component.index_axis_mut(grid.face_axis(face), grid.ghost_plane(face, layer));
                    plane.fill(self.value);
                }
            }
        }
        Ok(())
    }

    fn apply_macroscopic(
        &self,
        macros: &mut MacroFields,
        grid: &Grid3D,
        boundary_faces: &[Face],
    ) -> LatticeResult<()> {
        for &face in boundary_faces {
            for layer in 0..grid.ghost() {
                let mut plane = macros
                    .rho
                    .index_axis_mut(grid.face_axis(face), grid.ghost_plane(face, layer));
                plane.fill(self.value);
            }
        }
        Ok(())
    }
}

/// Scenario: non-periodic axes. Domain-boundary ghost slabs are left
/// untouched by the exchange, then stamped by the boundary hook.
#[test]
fn test_boundary_sentinel_non_periodic() {
    let dims = [2usize, 2, 2];
    run_ranks(8, move |transport| {
        let topo = Topology::new(transport.rank(), 8, dims, [false, false, false])?;
        let grid = Grid3D::new([4, 4, 4], 1)?;
        let mut ex = HaloExchanger::new(grid);

        let mut f = alloc_distribution(grid.padded());
        f.fill(SENTINEL);
        let (kz, jy, ix) = grid.interior_ranges();
        for k in kz {
            for j in jy.clone() {
                for i in ix.clone() {
                    for a in 0..Q {
                        f[[k, j, i, a]] = transport.rank() as f64;
                    }
                }
            }
        }
        ex.exchange_distribution(&mut f, &topo, &transport)?;

        // Every voxel in a domain-boundary ghost slab still carries the
        // sentinel (all ranks share it, so transitively carried corner
        // values are sentinels too).
        for face in topo.boundary_faces() {
            let axis = grid.face_axis(face);
            for a in 0..Q {
                let component = f.index_axis(ndarray::Axis(3), a);
                let plane = component.index_axis(axis, grid.ghost_plane(face, 0));
                for &v in plane.iter() {
                    assert_eq!(v, SENTINEL, "rank {} face {face:?}", transport.rank());
                }
            }
        }

        // Interior faces received the neighbor's rank id.
        for face in Face::ALL {
            if let Some(nbr) = topo.neighbor(face) {
                let component = f.index_axis(ndarray::Axis(3), 0);
                let plane = component.index_axis(grid.face_axis(face), grid.ghost_plane(face, 0));
                // Sample the plane center, clear of edge/corner ghosts.
                let center = plane[[2, 2]];
                assert_eq!(center, nbr as f64, "rank {} face {face:?}", transport.rank());
            }
        }

        // The hook stamps the boundary slabs.
        let hook = SentinelBoundary { value: -9.0 };
        hook.apply_distribution(&mut f, &grid, &topo.boundary_faces())?;
        for face in topo.boundary_faces() {
            let component = f.index_axis(ndarray::Axis(3), 3);
            let plane = component.index_axis(grid.face_axis(face), grid.ghost_plane(face, 0));
            for &v in plane.iter() {
                assert_eq!(v, -9.0);
            }
        }
        Ok(())
    })
    .unwrap();
}

/// The scalar path moves macroscopic fields the same way the
/// distribution path moves components.
#[test]
fn test_macro_exchange_matches_scalar_semantics() {
    let dims = [2usize, 1, 1];
    run_ranks(2, move |transport| {
        let topo = Topology::new(transport.rank(), 2, dims, [true, true, true])?;
        let grid = Grid3D::new([4, 4, 4], 1)?;
        let mut ex = HaloExchanger::new(grid);

        let mut macros = MacroFields::new(grid.padded());
        let fill = (transport.rank() + 1) as f64;
        let (kz, jy, ix) = grid.interior_ranges();
        for k in kz {
            for j in jy.clone() {
                for i in ix.clone() {
                    macros.rho[[k, j, i]] = fill;
                    macros.u[[k, j, i]] = 10.0 * fill;
                    macros.v[[k, j, i]] = 20.0 * fill;
                    macros.w[[k, j, i]] = 30.0 * fill;
                }
            }
        }
        ex.exchange_macros(&mut macros, &topo, &transport)?;

        let other = if transport.rank() == 0 { 2.0 } else { 1.0 };
        assert_eq!(macros.rho[[2, 2, 0]], other);
        assert_eq!(macros.rho[[2, 2, 5]], other);
        assert_eq!(macros.u[[2, 2, 0]], 10.0 * other);
        assert_eq!(macros.v[[2, 2, 0]], 20.0 * other);
        assert_eq!(macros.w[[2, 2, 5]], 30.0 * other);
        // y and z wrap onto this rank's own interior.
        assert_eq!(macros.rho[[2, 0, 2]], fill);
        assert_eq!(macros.rho[[0, 2, 2]], fill);
        Ok(())
    })
    .unwrap();
}
