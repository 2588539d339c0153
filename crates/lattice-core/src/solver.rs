// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Time Loop
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The lockstep LB time loop.
//!
//! One step: distribution halo exchange, boundary hook, streaming,
//! macroscopic reduction, macroscopic halo exchange, boundary hook,
//! BGK collision. All field arrays are allocated once at construction.

use lattice_types::config::SimulationConfig;
use lattice_types::error::{LatticeError, LatticeResult};
use lattice_types::state::{alloc_distribution, MacroFields};
use lattice_types::velocity_set::C;
use ndarray::Array4;
use rayon::prelude::*;

use crate::boundary::BoundaryHook;
use crate::collide::{collide_bgk, equilibrium, reduce_macros};
use crate::grid::Grid3D;
use crate::halo::HaloExchanger;
use crate::stream::stream;
use crate::topology::{Face, Topology};
use crate::transport::Transport;

pub struct LatticeSolver {
    grid: Grid3D,
    topology: Topology,
    exchanger: HaloExchanger,
    hook: Box<dyn BoundaryHook>,
    boundary_faces: Vec<Face>,
    f: Array4<f64>,
    f_next: Array4<f64>,
    macros: MacroFields,
    tau: f64,
    rho_floor: f64,
    t_total: usize,
    t_out: usize,
    check_every: usize,
    step: usize,
}

impl LatticeSolver {
    /// Validate the configuration and allocate every field once.
    pub fn new(
        config: &SimulationConfig,
        topology: Topology,
        hook: Box<dyn BoundaryHook>,
    ) -> LatticeResult<Self> {
        config.validate()?;
        let expected_dims = config.domain.proc_grid;
        if topology.dims() != expected_dims {
            return Err(LatticeError::Config(format!(
                "topology dims {:?} do not match domain.proc_grid {:?}",
                topology.dims(),
                expected_dims
            )));
        }
        let grid = Grid3D::new(config.local_extent(), config.domain.ghost_layers)?;
        let boundary_faces = topology.boundary_faces();
        let exchanger = HaloExchanger::new(grid);
        let f = alloc_distribution(grid.padded());
        let f_next = alloc_distribution(grid.padded());
        let macros = MacroFields::new(grid.padded());
        Ok(LatticeSolver {
            grid,
            topology,
            exchanger,
            hook,
            boundary_faces,
            f,
            f_next,
            macros,
            tau: config.tau()?,
            rho_floor: config.physics.rho_floor,
            t_total: config.run.t_total,
            t_out: config.run.t_out,
            check_every: config.run.check_every,
            step: 0,
        })
    }

    /// Set every interior voxel to the equilibrium of `(rho, u)` supplied
    /// by the initial-condition closure, which receives global voxel
    /// coordinates `[gx, gy, gz]`. The external IC loader plugs in here.
    pub fn initialize_with<F>(&mut self, ic: F)
    where
        F: Fn([usize; 3]) -> (f64, [f64; 3]),
    {
        let origin = self.global_origin();
        let n = self.grid.ghost();
        let (kz, jy, ix) = self.grid.interior_ranges();
        for k in kz {
            for j in jy.clone() {
                for i in ix.clone() {
                    let gx = origin[0] + (i - n);
                    let gy = origin[1] + (j - n);
                    let gz = origin[2] + (k - n);
                    let (rho, vel) = ic([gx, gy, gz]);
                    let feq = equilibrium(rho, vel[0], vel[1], vel[2]);
                    for (a, &fa) in feq.iter().enumerate() {
                        self.f[[k, j, i, a]] = fa;
                    }
                }
            }
        }
        reduce_macros(&self.f, &mut self.macros, &self.grid, self.rho_floor);
        self.step = 0;
    }

    /// Global voxel coordinates of this rank's first interior voxel.
    pub fn global_origin(&self) -> [usize; 3] {
        let coords = self.topology.coords();
        let [mx, my, mz] = self.grid.interior();
        [coords[0] * mx, coords[1] * my, coords[2] * mz]
    }

    /// Advance one LB step.
    pub fn step<T: Transport>(&mut self, transport: &T) -> LatticeResult<()> {
        self.exchanger
            .exchange_distribution(&mut self.f, &self.topology, transport)?;
        self.hook
            .apply_distribution(&mut self.f, &self.grid, &self.boundary_faces)?;

        stream(&self.f, &mut self.f_next, &self.grid);
        std::mem::swap(&mut self.f, &mut self.f_next);

        reduce_macros(&self.f, &mut self.macros, &self.grid, self.rho_floor);
        self.exchanger
            .exchange_macros(&mut self.macros, &self.topology, transport)?;
        self.hook
            .apply_macroscopic(&mut self.macros, &self.grid, &self.boundary_faces)?;

        collide_bgk(&mut self.f, &self.macros, &self.grid, self.tau);
        self.step += 1;
        Ok(())
    }

    /// Run the configured number of steps, invoking `on_snapshot` at the
    /// output cadence and after the final step, and the global
    /// divergence check at its cadence.
    pub fn run<T, F>(&mut self, transport: &T, mut on_snapshot: F) -> LatticeResult<()>
    where
        T: Transport,
        F: FnMut(usize, &Self) -> LatticeResult<()>,
    {
        let mut last_written = None;
        for t in 1..=self.t_total {
            self.step(transport)?;
            if self.check_every > 0 && t % self.check_every == 0 {
                self.numeric_check(transport)?;
            }
            if t % self.t_out == 0 {
                on_snapshot(t, self)?;
                last_written = Some(t);
            }
        }
        if last_written != Some(self.t_total) {
            on_snapshot(self.t_total, self)?;
        }
        Ok(())
    }

    /// Global reduction of a local health flag; a hit aborts the run
    /// naming the step that produced it.
    pub fn numeric_check<T: Transport>(&self, transport: &T) -> LatticeResult<()> {
        let rho_bad = self
            .grid
            .interior_view(&self.macros.rho)
            .iter()
            .any(|&r| !r.is_finite() || r < self.rho_floor);
        let f_bad = match self.f.as_slice() {
            Some(flat) => flat.par_iter().any(|v| !v.is_finite()),
            None => self.f.iter().any(|v| !v.is_finite()),
        };
        if transport.all_reduce_any(rho_bad || f_bad) {
            return Err(LatticeError::Numerical {
                step: self.step,
                message: format!(
                    "rank {}: non-finite distribution or density below floor {}",
                    self.topology.rank(),
                    self.rho_floor
                ),
            });
        }
        Ok(())
    }

    /// Global interior mass, reduced over all ranks.
    pub fn total_mass<T: Transport>(&self, transport: &T) -> f64 {
        let local = self.grid.interior_view(&self.macros.rho).sum();
        transport.all_reduce_sum(local)
    }

    /// Global interior momentum `(sum rho*u, sum rho*v, sum rho*w)`.
    pub fn total_momentum<T: Transport>(&self, transport: &T) -> [f64; 3] {
        let (kz, jy, ix) = self.grid.interior_ranges();
        let mut local = [0.0; 3];
        for k in kz {
            for j in jy.clone() {
                for i in ix.clone() {
                    for a in 0..lattice_types::velocity_set::Q {
                        let fa = self.f[[k, j, i, a]];
                        local[0] += C[a][0] as f64 * fa;
                        local[1] += C[a][1] as f64 * fa;
                        local[2] += C[a][2] as f64 * fa;
                    }
                }
            }
        }
        [
            transport.all_reduce_sum(local[0]),
            transport.all_reduce_sum(local[1]),
            transport.all_reduce_sum(local[2]),
        ]
    }

    pub fn grid(&self) -> &Grid3D {
        &self.grid
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn macros(&self) -> &MacroFields {
        &self.macros
    }

    pub fn distribution(&self) -> &Array4<f64> {
        &self.f
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }
}
