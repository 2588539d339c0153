// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};

/// Top-level run configuration.
///
/// Validation happens in `validate()` before any field allocation; every
/// rejection names the offending field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub case_name: String,
    pub domain: DomainConfig,
    pub physics: PhysicsConfig,
    pub run: RunParams,
    pub output: OutputConfig,
    /// Opaque descriptor forwarded to the external initial-condition loader.
    #[serde(default)]
    pub initial_condition: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Global interior voxel counts `[Nx, Ny, Nz]`.
    pub global: [usize; 3],
    /// Process grid `[Px, Py, Pz]`; must divide the global counts.
    pub proc_grid: [usize; 3],
    /// Per-axis periodicity.
    pub periodic: [bool; 3],
    /// Ghost-layer thickness; D3Q19 needs 1.
    pub ghost_layers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// BGK relaxation time; stability requires `tau > 0.5`.
    #[serde(default)]
    pub tau: Option<f64>,
    /// Kinematic viscosity, used when `tau` is absent: `tau = 3 nu + 1/2`.
    #[serde(default)]
    pub nu: Option<f64>,
    /// Minimum density clamp for velocity computation.
    pub rho_floor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
    /// Number of LB steps.
    pub t_total: usize,
    /// Snapshot cadence in steps.
    pub t_out: usize,
    /// Divergence-check cadence in steps; 0 disables the check.
    #[serde(default)]
    pub check_every: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
    /// Voxel spacing `[dx, dy, dz]` declared in the snapshot descriptor.
    pub spacing: [f64; 3],
}

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

impl SimulationConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> LatticeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Resolved BGK relaxation time. `tau` takes precedence over `nu`.
    pub fn tau(&self) -> LatticeResult<f64> {
        match (self.physics.tau, self.physics.nu) {
            (Some(tau), _) => Ok(tau),
            (None, Some(nu)) => Ok(3.0 * nu + 0.5),
            (None, None) => Err(LatticeError::Config(
                "physics requires either tau or nu".to_string(),
            )),
        }
    }

    /// Interior voxel counts per rank, `[MX, MY, MZ]`.
    pub fn local_extent(&self) -> [usize; 3] {
        [
            self.domain.global[0] / self.domain.proc_grid[0],
            self.domain.global[1] / self.domain.proc_grid[1],
            self.domain.global[2] / self.domain.proc_grid[2],
        ]
    }

    /// Full startup validation. Must pass before any allocation.
    pub fn validate(&self) -> LatticeResult<()> {
        if self.case_name.is_empty() {
            return Err(LatticeError::Config("case_name must not be empty".to_string()));
        }
        for axis in 0..3 {
            let name = AXIS_NAMES[axis];
            if self.domain.global[axis] == 0 {
                return Err(LatticeError::Config(format!(
                    "domain.global[{name}] must be positive"
                )));
            }
            if self.domain.proc_grid[axis] == 0 {
                return Err(LatticeError::Config(format!(
                    "domain.proc_grid[{name}] must be positive"
                )));
            }
            if self.domain.global[axis] % self.domain.proc_grid[axis] != 0 {
                return Err(LatticeError::Config(format!(
                    "domain.proc_grid[{name}]={} does not divide domain.global[{name}]={}",
                    self.domain.proc_grid[axis], self.domain.global[axis]
                )));
            }
            if self.domain.global[axis] / self.domain.proc_grid[axis] < self.domain.ghost_layers {
                return Err(LatticeError::Config(format!(
                    "domain.global[{name}]/domain.proc_grid[{name}] is thinner than ghost_layers={}",
                    self.domain.ghost_layers
                )));
            }
        }
        if self.domain.ghost_layers == 0 {
            return Err(LatticeError::Config(
                "domain.ghost_layers must be >= 1".to_string(),
            ));
        }
        let tau = self.tau()?;
        if !tau.is_finite() || tau <= 0.5 {
            return Err(LatticeError::Config(format!(
                "physics.tau must be finite and > 0.5, got {tau}"
            )));
        }
        if !self.physics.rho_floor.is_finite() || self.physics.rho_floor <= 0.0 {
            return Err(LatticeError::Config(format!(
                "physics.rho_floor must be finite and > 0, got {}",
                self.physics.rho_floor
            )));
        }
        if self.run.t_total == 0 {
            return Err(LatticeError::Config("run.t_total must be positive".to_string()));
        }
        if self.run.t_out == 0 {
            return Err(LatticeError::Config("run.t_out must be positive".to_string()));
        }
        for axis in 0..3 {
            let s = self.output.spacing[axis];
            if !s.is_finite() || s <= 0.0 {
                return Err(LatticeError::Config(format!(
                    "output.spacing[{}] must be finite and > 0, got {s}",
                    AXIS_NAMES[axis]
                )));
            }
        }
        Ok(())
    }
}
